//! In-memory implementation of UserRepository, for development and tests.

use async_trait::async_trait;
use chrono::{DateTime, Duration, DurationRound, Utc};
use mongodb::bson::oid::ObjectId;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{UserError, UserResult};
use crate::models::{ListQuery, User, UserCreateData, UserUpdateData};
use crate::repository::UserRepository;

#[derive(Debug, Clone)]
struct StoredUser {
    user: User,
    password: String,
}

/// Keeps users in insertion order, so iterating in reverse is newest first.
///
/// Identifiers are ObjectId hex strings and timestamps have millisecond
/// precision, matching what the MongoDB repository hands out.
#[derive(Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<Vec<StoredUser>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored password digest for `id`, if the user exists.
    pub async fn password_hash(&self, id: &str) -> Option<String> {
        let users = self.users.read().await;
        users
            .iter()
            .find(|stored| stored.user.id == id)
            .map(|stored| stored.password.clone())
    }

    fn now() -> DateTime<Utc> {
        let now = Utc::now();
        now.duration_trunc(Duration::milliseconds(1)).unwrap_or(now)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn list(&self, query: ListQuery) -> UserResult<Vec<User>> {
        let users = self.users.read().await;

        let limit = usize::try_from(query.limit).unwrap_or(0);
        let skip = usize::try_from(query.page).unwrap_or(usize::MAX);

        let result = users
            .iter()
            .rev()
            .filter(|stored| {
                query
                    .country
                    .as_ref()
                    .is_none_or(|country| &stored.user.country == country)
                    && query
                        .email
                        .as_ref()
                        .is_none_or(|email| &stored.user.email == email)
            })
            .skip(skip)
            .take(limit)
            .map(|stored| stored.user.clone())
            .collect();

        Ok(result)
    }

    async fn create(&self, data: UserCreateData) -> UserResult<String> {
        let now = Self::now();
        let id = ObjectId::new().to_hex();

        let stored = StoredUser {
            user: User {
                id: id.clone(),
                first_name: data.first_name,
                last_name: data.last_name,
                nickname: data.nickname,
                email: data.email,
                country: data.country,
                created_at: now,
                updated_at: now,
            },
            password: data.password,
        };

        self.users.write().await.push(stored);

        tracing::info!(user_id = %id, "User created");
        Ok(id)
    }

    async fn update(&self, id: &str, patch: UserUpdateData) -> UserResult<User> {
        let mut users = self.users.write().await;

        let stored = users
            .iter_mut()
            .find(|stored| stored.user.id == id)
            .ok_or_else(|| UserError::NotFound(format!("failed to update user with id '{}'", id)))?;

        let user = &mut stored.user;
        if let Some(first_name) = patch.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = patch.last_name {
            user.last_name = last_name;
        }
        if let Some(nickname) = patch.nickname {
            user.nickname = nickname;
        }
        if let Some(email) = patch.email {
            user.email = email;
        }
        if let Some(country) = patch.country {
            user.country = country;
        }
        if let Some(password) = patch.password {
            stored.password = password;
        }

        // Millisecond clock: never hand out the same updated_at twice.
        let now = Self::now();
        let previous = stored.user.updated_at;
        stored.user.updated_at = if now > previous {
            now
        } else {
            previous + Duration::milliseconds(1)
        };

        tracing::info!(user_id = %id, "User updated");
        Ok(stored.user.clone())
    }

    async fn delete(&self, id: &str) -> UserResult<()> {
        let mut users = self.users.write().await;

        let position = users
            .iter()
            .position(|stored| stored.user.id == id)
            .ok_or_else(|| UserError::NotFound(format!("failed to delete user with id '{}'", id)))?;
        users.remove(position);

        tracing::info!(user_id = %id, "User deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(first_name: &str, country: &str) -> UserCreateData {
        UserCreateData {
            first_name: first_name.to_string(),
            last_name: "doe".to_string(),
            nickname: "jd".to_string(),
            email: format!("{}@x.com", first_name),
            password: "hashed".to_string(),
            country: country.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_list() {
        let repo = InMemoryUserRepository::new();

        let id = repo.create(input("john", "UK")).await.unwrap();
        assert_eq!(id.len(), 24);

        let users = repo.list(ListQuery::default()).await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].id, id);
        assert_eq!(users[0].created_at, users[0].updated_at);
        assert_eq!(repo.password_hash(&id).await.as_deref(), Some("hashed"));
    }

    #[tokio::test]
    async fn test_list_is_newest_first_and_paginates() {
        let repo = InMemoryUserRepository::new();
        for name in ["a", "b", "c", "d", "e"] {
            repo.create(input(name, "UK")).await.unwrap();
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
        assert_eq!(names, ["e", "d", "c", "b"]);
    }

    #[tokio::test]
    async fn test_list_filters_country_and_email() {
        let repo = InMemoryUserRepository::new();
        repo.create(input("john", "UK")).await.unwrap();
        repo.create(input("jane", "UK")).await.unwrap();
        repo.create(input("jean", "FR")).await.unwrap();

        let uk = repo
            .list(ListQuery {
                country: Some("UK".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(uk.len(), 2);

        let both = repo
            .list(ListQuery {
                country: Some("UK".into()),
                email: Some("jean@x.com".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(both.is_empty());
    }

    #[tokio::test]
    async fn test_update_applies_present_fields_only() {
        let repo = InMemoryUserRepository::new();
        let id = repo.create(input("john", "UK")).await.unwrap();
        let before = repo.list(ListQuery::default()).await.unwrap().remove(0);

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
        assert_eq!(updated.last_name, before.last_name);
        assert_eq!(updated.created_at, before.created_at);
        assert!(updated.updated_at > before.updated_at);
    }

    #[tokio::test]
    async fn test_delete_then_update_is_not_found() {
        let repo = InMemoryUserRepository::new();
        let id = repo.create(input("john", "UK")).await.unwrap();

        repo.delete(&id).await.unwrap();

        assert!(matches!(
            repo.update(&id, UserUpdateData::default()).await,
            Err(UserError::NotFound(_))
        ));
        assert!(matches!(repo.delete(&id).await, Err(UserError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_malformed_id_is_not_found() {
        let repo = InMemoryUserRepository::new();
        assert!(matches!(
            repo.delete("nope").await,
            Err(UserError::NotFound(_))
        ));
    }
}
