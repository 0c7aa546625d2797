use sea_orm::entity::prelude::*;

/// Node in the business-activity tree. Depth is 1 for roots and grows by
/// one per level, capped at 3 by the taxonomy layer and a CHECK constraint.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "activities")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(indexed)]
    pub name: String,
    #[sea_orm(indexed)]
    pub parent_id: Option<i32>,
    pub depth: i32,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Parent,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Self::Parent => Entity::belongs_to(Entity)
                .from(Column::ParentId)
                .to(Column::Id)
                .into(),
        }
    }
}

impl Related<super::organization::Entity> for Entity {
    fn to() -> RelationDef {
        super::organization_activity::Relation::Organization.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::organization_activity::Relation::Activity.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
