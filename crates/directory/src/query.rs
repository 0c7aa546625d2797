//! Directory query service: the read operations exposed to the HTTP layer.
//!
//! Every listing returns organizations "with details" (building, phones in
//! insertion order, activity tags), ordered by organization id ascending
//! and deduplicated. Related collections are bulk-loaded with one query
//! per relation.

use std::collections::{BTreeSet, HashMap};

use entity::{activity, building, organization, organization_activity, phone};
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, JoinType, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait,
};
use serde::Serialize;

use crate::error::{DirectoryError, DirectoryResult};
use crate::{geo, taxonomy};

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct BuildingRecord {
    pub id: i32,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl From<building::Model> for BuildingRecord {
    fn from(model: building::Model) -> Self {
        Self {
            id: model.id,
            address: model.address,
            latitude: model.latitude,
            longitude: model.longitude,
        }
    }
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct PhoneRecord {
    pub id: i32,
    pub number: String,
}

impl From<phone::Model> for PhoneRecord {
    fn from(model: phone::Model) -> Self {
        Self {
            id: model.id,
            number: model.number,
        }
    }
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct ActivityRecord {
    pub id: i32,
    pub name: String,
    pub parent_id: Option<i32>,
    pub depth: i32,
}

impl From<activity::Model> for ActivityRecord {
    fn from(model: activity::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            parent_id: model.parent_id,
            depth: model.depth,
        }
    }
}

/// An organization enriched with its building, full phone list, and
/// activity tags.
#[derive(Clone, Debug, Serialize)]
pub struct OrganizationDetails {
    pub id: i32,
    pub name: String,
    pub building: BuildingRecord,
    pub phones: Vec<PhoneRecord>,
    pub activities: Vec<ActivityRecord>,
}

/// Bulk-hydrates related records for a page of organizations: one query
/// each for buildings, phones, join rows, and activities.
async fn with_details(
    db: &DatabaseConnection,
    organizations: Vec<organization::Model>,
) -> DirectoryResult<Vec<OrganizationDetails>> {
    if organizations.is_empty() {
        return Ok(Vec::new());
    }
    let org_ids: Vec<i32> = organizations.iter().map(|org| org.id).collect();
    let building_ids: BTreeSet<i32> = organizations.iter().map(|org| org.building_id).collect();

    let buildings: HashMap<i32, building::Model> = building::Entity::find()
        .filter(building::Column::Id.is_in(building_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|b| (b.id, b))
        .collect();

    let mut phones: HashMap<i32, Vec<PhoneRecord>> = HashMap::new();
    for row in phone::Entity::find()
        .filter(phone::Column::OrganizationId.is_in(org_ids.clone()))
        .order_by_asc(phone::Column::Id)
        .all(db)
        .await?
    {
        phones
            .entry(row.organization_id)
            .or_default()
            .push(row.into());
    }

    let links = organization_activity::Entity::find()
        .filter(organization_activity::Column::OrganizationId.is_in(org_ids))
        .all(db)
        .await?;
    let activity_ids: BTreeSet<i32> = links.iter().map(|link| link.activity_id).collect();
    let activities: HashMap<i32, activity::Model> = activity::Entity::find()
        .filter(activity::Column::Id.is_in(activity_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|a| (a.id, a))
        .collect();
    let mut tags: HashMap<i32, Vec<ActivityRecord>> = HashMap::new();
    for link in links {
        if let Some(model) = activities.get(&link.activity_id) {
            tags.entry(link.organization_id)
                .or_default()
                .push(model.clone().into());
        }
    }

    organizations
        .into_iter()
        .map(|org| {
            let building = buildings.get(&org.building_id).cloned().ok_or_else(|| {
                DirectoryError::Db(DbErr::RecordNotFound(format!(
                    "building {} referenced by organization {}",
                    org.building_id, org.id
                )))
            })?;
            Ok(OrganizationDetails {
                id: org.id,
                name: org.name,
                building: building.into(),
                phones: phones.remove(&org.id).unwrap_or_default(),
                activities: tags.remove(&org.id).unwrap_or_default(),
            })
        })
        .collect()
}

/// Organizations located in the given building.
pub async fn by_building(
    db: &DatabaseConnection,
    building_id: i32,
) -> DirectoryResult<Vec<OrganizationDetails>> {
    let organizations = organization::Entity::find()
        .filter(organization::Column::BuildingId.eq(building_id))
        .order_by_asc(organization::Column::Id)
        .all(db)
        .await?;
    with_details(db, organizations).await
}

async fn by_activity_ids(
    db: &DatabaseConnection,
    activity_ids: Vec<i32>,
) -> DirectoryResult<Vec<OrganizationDetails>> {
    if activity_ids.is_empty() {
        return Ok(Vec::new());
    }
    let organizations = organization::Entity::find()
        .join_rev(
            JoinType::InnerJoin,
            organization_activity::Relation::Organization.def(),
        )
        .filter(organization_activity::Column::ActivityId.is_in(activity_ids))
        .distinct()
        .order_by_asc(organization::Column::Id)
        .all(db)
        .await?;
    with_details(db, organizations).await
}

/// Organizations tagged with exactly this activity.
pub async fn by_activity(
    db: &DatabaseConnection,
    activity_id: i32,
) -> DirectoryResult<Vec<OrganizationDetails>> {
    by_activity_ids(db, vec![activity_id]).await
}

/// Organizations tagged with the activity or any of its descendants. An
/// unknown activity id yields an empty list, not an error.
pub async fn by_activity_tree(
    db: &DatabaseConnection,
    activity_id: i32,
) -> DirectoryResult<Vec<OrganizationDetails>> {
    let activity_ids = taxonomy::descendant_ids(db, activity_id).await?;
    by_activity_ids(db, activity_ids).await
}

/// Resolves an activity by exact name (`NotFound` if absent), then behaves
/// as [`by_activity_tree`] or [`by_activity`] depending on the flag.
pub async fn by_activity_name(
    db: &DatabaseConnection,
    name: &str,
    include_children: bool,
) -> DirectoryResult<Vec<OrganizationDetails>> {
    let activity_ids = taxonomy::ids_for_name(db, name, include_children).await?;
    by_activity_ids(db, activity_ids).await
}

/// Case-insensitive substring search on organization name. Uses
/// `lower(name) LIKE lower(pattern)` so it behaves the same on Postgres
/// and SQLite.
pub async fn search_by_name(
    db: &DatabaseConnection,
    name: &str,
) -> DirectoryResult<Vec<OrganizationDetails>> {
    let pattern = format!("%{}%", name.to_lowercase());
    let organizations = organization::Entity::find()
        .filter(Expr::expr(Func::lower(Expr::col(organization::Column::Name))).like(pattern.as_str()))
        .order_by_asc(organization::Column::Id)
        .all(db)
        .await?;
    with_details(db, organizations).await
}

/// Organizations within `radius_km` of the given point. Phase one asks the
/// store for buildings inside the bounding-box superset; phase two
/// recomputes the exact great-circle distance on the candidates.
pub async fn near(
    db: &DatabaseConnection,
    lat: f64,
    lon: f64,
    radius_km: f64,
) -> DirectoryResult<Vec<OrganizationDetails>> {
    if !radius_km.is_finite() || radius_km <= 0.0 {
        return Err(DirectoryError::InvalidInput(
            "radius_km must be positive".into(),
        ));
    }
    let bbox = geo::bounding_box(lat, lon, radius_km);
    tracing::debug!(?bbox, radius_km, "bounding-box prefilter");
    let candidates = organization::Entity::find()
        .join(JoinType::InnerJoin, organization::Relation::Building.def())
        .filter(building::Column::Latitude.between(bbox.lat_min, bbox.lat_max))
        .filter(building::Column::Longitude.between(bbox.lon_min, bbox.lon_max))
        .order_by_asc(organization::Column::Id)
        .all(db)
        .await?;
    let candidates = with_details(db, candidates).await?;
    Ok(candidates
        .into_iter()
        .filter(|org| {
            geo::within_radius(
                lat,
                lon,
                org.building.latitude,
                org.building.longitude,
                radius_km,
            )
        })
        .collect())
}

/// Organizations whose building falls inside the rectangle (inclusive
/// bounds, literal lat/lon space).
pub async fn within_rect(
    db: &DatabaseConnection,
    min_lat: f64,
    max_lat: f64,
    min_lon: f64,
    max_lon: f64,
) -> DirectoryResult<Vec<OrganizationDetails>> {
    let organizations = organization::Entity::find()
        .join(JoinType::InnerJoin, organization::Relation::Building.def())
        .filter(building::Column::Latitude.between(min_lat, max_lat))
        .filter(building::Column::Longitude.between(min_lon, max_lon))
        .order_by_asc(organization::Column::Id)
        .all(db)
        .await?;
    with_details(db, organizations).await
}

/// Single organization card by id.
pub async fn get_by_id(
    db: &DatabaseConnection,
    organization_id: i32,
) -> DirectoryResult<OrganizationDetails> {
    let organization = organization::Entity::find_by_id(organization_id)
        .one(db)
        .await?
        .ok_or(DirectoryError::NotFound("Organization"))?;
    let mut details = with_details(db, vec![organization]).await?;
    details.pop().ok_or(DirectoryError::NotFound("Organization"))
}

/// All buildings, ordered by id.
pub async fn list_buildings(db: &DatabaseConnection) -> DirectoryResult<Vec<BuildingRecord>> {
    let buildings = building::Entity::find()
        .order_by_asc(building::Column::Id)
        .all(db)
        .await?;
    Ok(buildings.into_iter().map(Into::into).collect())
}
