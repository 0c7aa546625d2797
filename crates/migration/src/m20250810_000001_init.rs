use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Buildings {
    Table,
    Id,
    Address,
    Latitude,
    Longitude,
}

#[derive(DeriveIden)]
enum Activities {
    Table,
    Id,
    Name,
    ParentId,
    Depth,
}

#[derive(DeriveIden)]
enum Organizations {
    Table,
    Id,
    Name,
    BuildingId,
}

#[derive(DeriveIden)]
enum Phones {
    Table,
    Id,
    Number,
    OrganizationId,
}

#[derive(DeriveIden)]
enum OrganizationActivity {
    Table,
    OrganizationId,
    ActivityId,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

// Schema-builder only so the same migration runs on Postgres and the
// SQLite databases used by the integration tests.
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Buildings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Buildings::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Buildings::Address).string_len(255).not_null())
                    .col(ColumnDef::new(Buildings::Latitude).double().not_null())
                    .col(ColumnDef::new(Buildings::Longitude).double().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_buildings_lat_lon")
                    .table(Buildings::Table)
                    .col(Buildings::Latitude)
                    .col(Buildings::Longitude)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Activities::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Activities::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Activities::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Activities::ParentId).integer())
                    .col(
                        ColumnDef::new(Activities::Depth)
                            .integer()
                            .not_null()
                            .default(1)
                            .check(Expr::col(Activities::Depth).between(1, 3)),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_activities_parent")
                            .from(Activities::Table, Activities::ParentId)
                            .to(Activities::Table, Activities::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_activities_name")
                    .table(Activities::Table)
                    .col(Activities::Name)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_activities_parent")
                    .table(Activities::Table)
                    .col(Activities::ParentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Organizations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Organizations::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Organizations::Name)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Organizations::BuildingId)
                            .integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_organizations_building")
                            .from(Organizations::Table, Organizations::BuildingId)
                            .to(Buildings::Table, Buildings::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_organizations_name")
                    .table(Organizations::Table)
                    .col(Organizations::Name)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_organizations_building")
                    .table(Organizations::Table)
                    .col(Organizations::BuildingId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Phones::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Phones::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Phones::Number).string_len(32).not_null())
                    .col(ColumnDef::new(Phones::OrganizationId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_phones_organization")
                            .from(Phones::Table, Phones::OrganizationId)
                            .to(Organizations::Table, Organizations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_phones_organization")
                    .table(Phones::Table)
                    .col(Phones::OrganizationId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(OrganizationActivity::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OrganizationActivity::OrganizationId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(OrganizationActivity::ActivityId)
                            .integer()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(OrganizationActivity::OrganizationId)
                            .col(OrganizationActivity::ActivityId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_org_activity_organization")
                            .from(
                                OrganizationActivity::Table,
                                OrganizationActivity::OrganizationId,
                            )
                            .to(Organizations::Table, Organizations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_org_activity_activity")
                            .from(
                                OrganizationActivity::Table,
                                OrganizationActivity::ActivityId,
                            )
                            .to(Activities::Table, Activities::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_org_activity_activity")
                    .table(OrganizationActivity::Table)
                    .col(OrganizationActivity::ActivityId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(OrganizationActivity::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Phones::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Organizations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Activities::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Buildings::Table).to_owned())
            .await?;
        Ok(())
    }
}
