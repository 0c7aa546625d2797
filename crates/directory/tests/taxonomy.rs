mod common;

use std::collections::HashMap;

use directory::taxonomy::{create_activity, descendant_ids, find_by_name, ids_for_name};
use directory::DirectoryError;
use entity::activity;
use sea_orm::EntityTrait;

#[tokio::test]
async fn every_child_sits_one_level_below_its_parent() {
    let ctx = common::setup().await;
    let all = activity::Entity::find().all(&ctx.db).await.unwrap();
    let depths: HashMap<i32, i32> = all.iter().map(|a| (a.id, a.depth)).collect();
    for node in &all {
        match node.parent_id {
            None => assert_eq!(node.depth, 1, "root {} must have depth 1", node.name),
            Some(parent_id) => {
                assert_eq!(node.depth, depths[&parent_id] + 1, "child {}", node.name)
            }
        }
        assert!(node.depth <= 3);
    }
}

#[tokio::test]
async fn attaching_below_a_depth_three_parent_fails() {
    let ctx = common::setup().await;
    let parts = ctx.seeded.activity("parts").unwrap();
    let result = create_activity(&ctx.db, "Brake Pads", Some(parts)).await;
    assert!(matches!(result, Err(DirectoryError::InvalidHierarchy)));
}

#[tokio::test]
async fn creating_under_an_unknown_parent_fails() {
    let ctx = common::setup().await;
    let result = create_activity(&ctx.db, "Orphan", Some(999_999)).await;
    assert!(matches!(result, Err(DirectoryError::NotFound(_))));
}

#[tokio::test]
async fn descendants_include_the_activity_itself() {
    let ctx = common::setup().await;
    let food = ctx.seeded.activity("food").unwrap();
    let set = descendant_ids(&ctx.db, food).await.unwrap();
    assert!(set.contains(&food));
    assert!(set.contains(&ctx.seeded.activity("meat").unwrap()));
    assert!(set.contains(&ctx.seeded.activity("dairy").unwrap()));
    assert_eq!(set.len(), 3);
}

#[tokio::test]
async fn descendants_of_a_leaf_are_just_the_leaf() {
    let ctx = common::setup().await;
    let meat = ctx.seeded.activity("meat").unwrap();
    assert_eq!(descendant_ids(&ctx.db, meat).await.unwrap(), vec![meat]);
}

#[tokio::test]
async fn descendants_reach_the_third_level() {
    let ctx = common::setup().await;
    let cars = ctx.seeded.activity("cars").unwrap();
    let set = descendant_ids(&ctx.db, cars).await.unwrap();
    assert!(set.contains(&ctx.seeded.activity("parts").unwrap()));
    assert!(set.contains(&ctx.seeded.activity("accessories").unwrap()));
    assert_eq!(set.len(), 5);
}

#[tokio::test]
async fn descendants_of_an_unknown_id_are_empty() {
    let ctx = common::setup().await;
    assert!(descendant_ids(&ctx.db, 999_999).await.unwrap().is_empty());
}

#[tokio::test]
async fn find_by_name_is_exact() {
    let ctx = common::setup().await;
    let food = find_by_name(&ctx.db, "Food").await.unwrap();
    assert_eq!(Some(food.id), ctx.seeded.activity("food"));
    let missing = find_by_name(&ctx.db, "Foo").await;
    assert!(matches!(missing, Err(DirectoryError::NotFound(_))));
}

#[tokio::test]
async fn ids_for_name_honours_the_include_children_flag() {
    let ctx = common::setup().await;
    let food = ctx.seeded.activity("food").unwrap();
    let exact = ids_for_name(&ctx.db, "Food", false).await.unwrap();
    assert_eq!(exact, vec![food]);
    let widened = ids_for_name(&ctx.db, "Food", true).await.unwrap();
    assert_eq!(widened.len(), 3);
    assert!(widened.contains(&food));
}
