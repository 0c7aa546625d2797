#![allow(dead_code)] // not every test binary uses every helper

use directory::query::OrganizationDetails;
use directory::seed::{seed_demo, SeededDirectory};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

pub struct TestContext {
    pub db: DatabaseConnection,
    pub seeded: SeededDirectory,
}

pub async fn setup() -> TestContext {
    // A single connection keeps every query on the same in-memory database.
    let mut options = ConnectOptions::new("sqlite::memory:".to_owned());
    options.max_connections(1).sqlx_logging(false);
    let db = Database::connect(options)
        .await
        .expect("connect to in-memory sqlite");
    Migrator::up(&db, None).await.expect("apply migrations");
    let seeded = seed_demo(&db).await.expect("seed demo data");
    TestContext { db, seeded }
}

pub fn ids(organizations: &[OrganizationDetails]) -> Vec<i32> {
    organizations.iter().map(|org| org.id).collect()
}

pub fn org_ids(ctx: &TestContext, keys: &[&str]) -> Vec<i32> {
    let mut resolved: Vec<i32> = keys
        .iter()
        .map(|key| ctx.seeded.organization(key).expect("seeded organization"))
        .collect();
    resolved.sort_unstable();
    resolved
}
