//! Demo dataset: eight buildings, a two-tree activity forest, and ten
//! organizations. Used by the `seed` CLI command and the integration
//! tests.

use std::collections::HashMap;

use entity::{building, organization, organization_activity, phone};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, Set};

use crate::error::{DirectoryError, DirectoryResult};
use crate::taxonomy;

const BUILDINGS: &[(&str, &str, f64, f64)] = &[
    ("b1", "1 Lenina St, Moscow", 55.7558, 37.6173),
    ("b2", "32/1 Blyukhera St, Moscow", 55.7702, 37.6537),
    ("b3", "10 Nevsky Prospekt, St. Petersburg", 59.9343, 30.3351),
    ("b4", "7 Tverskaya St, Moscow", 55.7579, 37.6136),
    ("b5", "10 Arbat St, Moscow", 55.7496, 37.5923),
    ("b6", "1 Red Square, Moscow", 55.7539, 37.6208),
    ("b7", "1 Leninskie Gory, Moscow", 55.7020, 37.5302),
    ("b8", "2 Palace Square, St. Petersburg", 59.9398, 30.3146),
];

// (key, name, parent key) — parents listed before their children.
const ACTIVITIES: &[(&str, &str, Option<&str>)] = &[
    ("food", "Food", None),
    ("meat", "Meat Products", Some("food")),
    ("dairy", "Dairy Products", Some("food")),
    ("cars", "Cars", None),
    ("trucks", "Trucks", Some("cars")),
    ("passenger", "Passenger Cars", Some("cars")),
    ("parts", "Spare Parts", Some("passenger")),
    ("accessories", "Accessories", Some("passenger")),
];

const ORGANIZATIONS: &[(&str, &str, &str, &[&str], &[&str])] = &[
    (
        "org1",
        "Horns and Hooves LLC",
        "b2",
        &["2-222-222", "3-333-333", "8-923-666-13-13"],
        &["meat", "dairy"],
    ),
    ("org2", "Meat House", "b1", &["8-800-100-00-01"], &["meat"]),
    (
        "org3",
        "AutoWorld",
        "b3",
        &["8-812-111-22-33"],
        &["passenger", "accessories"],
    ),
    ("org4", "CargoPro", "b1", &["8-800-555-55-55"], &["trucks"]),
    (
        "org5",
        "Tverskaya Deli",
        "b4",
        &["8-495-111-22-33"],
        &["meat"],
    ),
    ("org6", "Arbat Cafe", "b5", &["8-495-222-33-44"], &["dairy"]),
    ("org7", "Dairy Lane", "b1", &["8-495-333-44-55"], &["dairy"]),
    (
        "org8",
        "Kremlin Cafe",
        "b6",
        &["8-495-444-55-66"],
        &["dairy"],
    ),
    (
        "org9",
        "Red Square Foods",
        "b6",
        &["8-495-555-66-77"],
        &["meat"],
    ),
    (
        "org10",
        "University Canteen",
        "b7",
        &["8-495-666-77-88"],
        &["dairy"],
    ),
];

/// Handle over the freshly inserted demo records, keyed by the short
/// fixture names above.
#[derive(Clone, Debug, Default)]
pub struct SeededDirectory {
    buildings: HashMap<&'static str, i32>,
    activities: HashMap<&'static str, i32>,
    organizations: HashMap<&'static str, i32>,
}

impl SeededDirectory {
    pub fn building(&self, key: &str) -> Option<i32> {
        self.buildings.get(key).copied()
    }

    pub fn activity(&self, key: &str) -> Option<i32> {
        self.activities.get(key).copied()
    }

    pub fn organization(&self, key: &str) -> Option<i32> {
        self.organizations.get(key).copied()
    }
}

/// True once any organization exists; the CLI uses this to make seeding
/// idempotent.
pub async fn is_seeded(db: &DatabaseConnection) -> DirectoryResult<bool> {
    Ok(organization::Entity::find().count(db).await? > 0)
}

/// Inserts the demo dataset. Activities go through
/// [`taxonomy::create_activity`] so the depth invariant is enforced the
/// same way it would be for real data.
pub async fn seed_demo(db: &DatabaseConnection) -> DirectoryResult<SeededDirectory> {
    let mut seeded = SeededDirectory::default();

    for (key, address, latitude, longitude) in BUILDINGS {
        let created = building::ActiveModel {
            address: Set((*address).to_owned()),
            latitude: Set(*latitude),
            longitude: Set(*longitude),
            ..Default::default()
        }
        .insert(db)
        .await?;
        seeded.buildings.insert(*key, created.id);
    }

    for (key, name, parent_key) in ACTIVITIES {
        let parent_id = match parent_key {
            None => None,
            Some(parent) => Some(
                seeded
                    .activity(parent)
                    .ok_or(DirectoryError::NotFound("Activity"))?,
            ),
        };
        let created = taxonomy::create_activity(db, name, parent_id).await?;
        seeded.activities.insert(*key, created.id);
    }

    for (key, name, building_key, phones, tags) in ORGANIZATIONS {
        let building_id = seeded
            .building(building_key)
            .ok_or(DirectoryError::NotFound("Building"))?;
        let created = organization::ActiveModel {
            name: Set((*name).to_owned()),
            building_id: Set(building_id),
            ..Default::default()
        }
        .insert(db)
        .await?;
        for number in *phones {
            phone::ActiveModel {
                number: Set((*number).to_owned()),
                organization_id: Set(created.id),
                ..Default::default()
            }
            .insert(db)
            .await?;
        }
        for tag in *tags {
            let activity_id = seeded
                .activity(tag)
                .ok_or(DirectoryError::NotFound("Activity"))?;
            // exec_without_returning: composite-key rows have no generated
            // id to read back.
            organization_activity::Entity::insert(organization_activity::ActiveModel {
                organization_id: Set(created.id),
                activity_id: Set(activity_id),
            })
            .exec_without_returning(db)
            .await?;
        }
        seeded.organizations.insert(*key, created.id);
    }

    Ok(seeded)
}
