//! Activity hierarchy: creation with depth validation and transitive
//! descendant resolution.

use std::collections::BTreeSet;

use entity::activity;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use crate::error::{DirectoryError, DirectoryResult};

/// Maximum nesting depth of the activity tree.
pub const MAX_DEPTH: i32 = 3;

/// Depth rule for a new activity: roots start at 1, children sit one level
/// below their parent, and nothing may go past [`MAX_DEPTH`].
pub fn child_depth(parent_depth: Option<i32>) -> DirectoryResult<i32> {
    let depth = match parent_depth {
        None => 1,
        Some(parent) => parent + 1,
    };
    if depth > MAX_DEPTH {
        return Err(DirectoryError::InvalidHierarchy);
    }
    Ok(depth)
}

/// Single mutation entry point for activities. Depth is derived from the
/// parent here, never supplied by the caller.
pub async fn create_activity(
    db: &DatabaseConnection,
    name: &str,
    parent_id: Option<i32>,
) -> DirectoryResult<activity::Model> {
    let parent_depth = match parent_id {
        None => None,
        Some(id) => {
            let parent = activity::Entity::find_by_id(id)
                .one(db)
                .await?
                .ok_or(DirectoryError::NotFound("Activity"))?;
            Some(parent.depth)
        }
    };
    let depth = child_depth(parent_depth)?;
    let created = activity::ActiveModel {
        name: Set(name.to_owned()),
        parent_id: Set(parent_id),
        depth: Set(depth),
        ..Default::default()
    }
    .insert(db)
    .await?;
    Ok(created)
}

/// The activity itself plus everything transitively reachable through
/// parent links. Returns an empty set for an unknown id; callers that need
/// existence to be an error check separately.
///
/// Runs a fixpoint loop over the parent-pointer relation: one query per
/// level of the frontier until no new ids appear. The depth cap bounds the
/// loop at three rounds in practice, but correctness does not rely on it.
pub async fn descendant_ids(db: &DatabaseConnection, activity_id: i32) -> DirectoryResult<Vec<i32>> {
    let Some(root) = activity::Entity::find_by_id(activity_id).one(db).await? else {
        return Ok(Vec::new());
    };
    let mut seen: BTreeSet<i32> = BTreeSet::new();
    seen.insert(root.id);
    let mut frontier = vec![root.id];
    while !frontier.is_empty() {
        let children = activity::Entity::find()
            .filter(activity::Column::ParentId.is_in(frontier))
            .all(db)
            .await?;
        frontier = children
            .into_iter()
            .map(|child| child.id)
            .filter(|id| seen.insert(*id))
            .collect();
    }
    Ok(seen.into_iter().collect())
}

/// Exact-name lookup; `NotFound` if nothing matches.
pub async fn find_by_name(db: &DatabaseConnection, name: &str) -> DirectoryResult<activity::Model> {
    activity::Entity::find()
        .filter(activity::Column::Name.eq(name))
        .one(db)
        .await?
        .ok_or(DirectoryError::NotFound("Activity"))
}

/// Resolves an activity by exact name, then widens to its descendant set
/// when `include_children` is set.
pub async fn ids_for_name(
    db: &DatabaseConnection,
    name: &str,
    include_children: bool,
) -> DirectoryResult<Vec<i32>> {
    let activity = find_by_name(db, name).await?;
    if include_children {
        descendant_ids(db, activity.id).await
    } else {
        Ok(vec![activity.id])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roots_start_at_depth_one() {
        assert_eq!(child_depth(None).unwrap(), 1);
    }

    #[test]
    fn children_sit_one_below_their_parent() {
        assert_eq!(child_depth(Some(1)).unwrap(), 2);
        assert_eq!(child_depth(Some(2)).unwrap(), 3);
    }

    #[test]
    fn depth_three_parents_reject_children() {
        assert!(matches!(
            child_depth(Some(3)),
            Err(DirectoryError::InvalidHierarchy)
        ));
    }
}
