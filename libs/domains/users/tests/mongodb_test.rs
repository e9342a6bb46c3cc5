//! MongoUserRepository against a real MongoDB
//!
//! Requires Docker. Run with `cargo test -p domain_users -- --ignored`.

use domain_users::*;
use std::time::Duration;
use test_utils::{TestDataBuilder, TestMongo};

fn input(builder: &TestDataBuilder, first_name: &str, country: &str) -> UserCreateData {
    UserCreateData {
        first_name: first_name.to_string(),
        last_name: "doe".to_string(),
        nickname: "jd".to_string(),
        email: builder.email(first_name),
        password: password::hash_password("secret").unwrap(),
        country: country.to_string(),
    }
}

async fn repository(mongo: &TestMongo, test_name: &str) -> (MongoUserRepository, TestDataBuilder) {
    let builder = TestDataBuilder::from_test_name(test_name);
    let repo = MongoUserRepository::new(mongo.database(&builder.database_name()));
    repo.init_indexes().await.unwrap();
    (repo, builder)
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_create_list_update_delete() {
    let mongo = TestMongo::new().await;
    let (repo, builder) = repository(&mongo, "mongo_crud").await;

    let id = repo.create(input(&builder, "john", "UK")).await.unwrap();
    assert_eq!(id.len(), 24);

    let users = repo.list(ListQuery::default()).await.unwrap();
    assert_eq!(users.len(), 1);
    let before = users[0].clone();
    assert_eq!(before.id, id);
    assert_eq!(before.first_name, "john");
    assert_eq!(before.created_at, before.updated_at);

    let updated = repo
        .update(
            &id,
            UserUpdateData {
                first_name: Some("jane".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.first_name, "jane");
    assert_eq!(updated.last_name, "doe");
    assert_eq!(updated.created_at, before.created_at);
    assert!(updated.updated_at > before.updated_at);

    // Back-to-back updates land in the same millisecond.
    let mut last = updated.updated_at;
    for _ in 0..20 {
        let next = repo.update(&id, UserUpdateData::default()).await.unwrap();
        assert!(next.updated_at > last);
        last = next.updated_at;
    }

    let hashed = repo
        .update(
            &id,
            UserUpdateData {
                password: Some(password::hash_password("changed").unwrap()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(hashed.first_name, "jane");

    repo.delete(&id).await.unwrap();

    assert!(matches!(
        repo.update(&id, UserUpdateData::default()).await,
        Err(UserError::NotFound(_))
    ));
    assert!(matches!(repo.delete(&id).await, Err(UserError::NotFound(_))));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_list_pagination_and_filters() {
    let mongo = TestMongo::new().await;
    let (repo, builder) = repository(&mongo, "mongo_list").await;

    for (n, country) in ["UK", "UK", "FR", "UK", "FR"].iter().enumerate() {
        repo.create(input(&builder, &format!("user{}", n), country))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let first = repo
        .list(ListQuery {
            page: 0,
            limit: 2,
            ..Default::default()
        })
        .await
        .unwrap();
    let second = repo
        .list(ListQuery {
            page: 2,
            limit: 2,
            ..Default::default()
        })
        .await
        .unwrap();
    let names: Vec<_> = first
        .iter()
        .chain(second.iter())
        .map(|u| u.first_name.as_str())
        .collect();
    assert_eq!(names, ["user4", "user3", "user2", "user1"]);

    let french = repo
        .list(ListQuery {
            country: Some("FR".into()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(french.len(), 2);

    let one = repo
        .list(ListQuery {
            country: Some("UK".into()),
            email: Some(builder.email("user3")),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(one.len(), 1);
    assert_eq!(one[0].first_name, "user3");
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_malformed_id_is_not_found() {
    let mongo = TestMongo::new().await;
    let (repo, _) = repository(&mongo, "mongo_malformed").await;

    assert!(matches!(
        repo.update("xyz", UserUpdateData::default()).await,
        Err(UserError::NotFound(_))
    ));
    assert!(matches!(repo.delete("xyz").await, Err(UserError::NotFound(_))));
}
