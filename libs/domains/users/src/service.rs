//! User Service - hashes credentials and delegates to the repository

use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

use crate::error::{UserError, UserResult};
use crate::models::{ListQuery, User, UserCreateData, UserUpdateData};
use crate::password::hash_password;
use crate::repository::UserRepository;

/// Holds no per-request state; clones share the repository.
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    #[instrument(skip(self))]
    pub async fn list_users(&self, query: ListQuery) -> UserResult<Vec<User>> {
        query
            .validate()
            .map_err(|e| UserError::Validation(e.to_string()))?;

        self.repository.list(query).await
    }

    /// Replaces the plaintext password with its digest, then stores the user.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn create_user(&self, mut input: UserCreateData) -> UserResult<String> {
        input
            .validate()
            .map_err(|e| UserError::Validation(e.to_string()))?;

        input.password = hash_password(&input.password)?;
        self.repository.create(input).await
    }

    /// A non-empty password is re-hashed; an empty one is ignored.
    #[instrument(skip(self, patch))]
    pub async fn update_user(&self, id: &str, mut patch: UserUpdateData) -> UserResult<User> {
        patch.normalize_password();
        if let Some(password) = patch.password.take() {
            patch.password = Some(hash_password(&password)?);
        }
        self.repository.update(id, patch).await
    }

    #[instrument(skip(self))]
    pub async fn delete_user(&self, id: &str) -> UserResult<()> {
        self.repository.delete(id).await
    }
}

impl<R: UserRepository> Clone for UserService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::password::verify_password;
    use crate::repository::MockUserRepository;
    use chrono::Utc;
    use mockall::predicate::eq;

    fn create_input() -> UserCreateData {
        UserCreateData {
            first_name: "john".into(),
            last_name: "doe".into(),
            nickname: "jd".into(),
            email: "jd@x.com".into(),
            password: "secret".into(),
            country: "UK".into(),
        }
    }

    fn user(id: &str) -> User {
        let now = Utc::now();
        User {
            id: id.into(),
            first_name: "jane".into(),
            last_name: "doe".into(),
            nickname: "jd".into(),
            email: "jd@x.com".into(),
            country: "UK".into(),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_create_user_hashes_password() {
        let mut mock = MockUserRepository::new();
        mock.expect_create()
            .withf(|data| {
                data.password != "secret" && verify_password("secret", &data.password).unwrap()
            })
            .times(1)
            .returning(|_| Ok("65a1f0c2e4b0a1b2c3d4e5f6".to_string()));

        let service = UserService::new(mock);
        let id = service.create_user(create_input()).await.unwrap();
        assert_eq!(id, "65a1f0c2e4b0a1b2c3d4e5f6");
    }

    #[tokio::test]
    async fn test_create_user_propagates_repository_error() {
        let mut mock = MockUserRepository::new();
        mock.expect_create()
            .returning(|_| Err(UserError::Persistence("failed to insert data into mongo".into())));

        let service = UserService::new(mock);
        let result = service.create_user(create_input()).await;
        assert!(matches!(result, Err(UserError::Persistence(_))));
    }

    #[tokio::test]
    async fn test_create_user_rejects_empty_field_before_storing() {
        let mut mock = MockUserRepository::new();
        mock.expect_create().never();

        let service = UserService::new(mock);
        let input = UserCreateData {
            email: String::new(),
            ..create_input()
        };
        assert!(matches!(
            service.create_user(input).await,
            Err(UserError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_list_users_rejects_non_positive_limit() {
        let mut mock = MockUserRepository::new();
        mock.expect_list().never();

        let service = UserService::new(mock);
        let query = ListQuery {
            limit: 0,
            ..Default::default()
        };
        assert!(matches!(
            service.list_users(query).await,
            Err(UserError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_update_user_rehashes_non_empty_password() {
        let mut mock = MockUserRepository::new();
        mock.expect_update()
            .withf(|id, patch| {
                id == "abc"
                    && patch
                        .password
                        .as_deref()
                        .is_some_and(|hash| verify_password("new-secret", hash).unwrap())
            })
            .times(1)
            .returning(|id, _| Ok(user(id)));

        let service = UserService::new(mock);
        let patch = UserUpdateData {
            password: Some("new-secret".into()),
            ..Default::default()
        };
        service.update_user("abc", patch).await.unwrap();
    }

    #[tokio::test]
    async fn test_update_user_ignores_empty_password() {
        let mut mock = MockUserRepository::new();
        mock.expect_update()
            .withf(|_, patch| patch.password.is_none() && patch.first_name.as_deref() == Some("jane"))
            .times(1)
            .returning(|id, _| Ok(user(id)));

        let service = UserService::new(mock);
        let patch = UserUpdateData {
            first_name: Some("jane".into()),
            password: Some(String::new()),
            ..Default::default()
        };
        let updated = service.update_user("abc", patch).await.unwrap();
        assert_eq!(updated.first_name, "jane");
    }

    #[tokio::test]
    async fn test_list_users_passes_query_through() {
        let query = ListQuery {
            page: 10,
            limit: 5,
            country: Some("UK".into()),
            email: None,
        };

        let mut mock = MockUserRepository::new();
        mock.expect_list()
            .with(eq(query.clone()))
            .times(1)
            .returning(|_| Ok(vec![]));

        let service = UserService::new(mock);
        assert!(service.list_users(query).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_user_not_found() {
        let mut mock = MockUserRepository::new();
        mock.expect_delete()
            .returning(|id| Err(UserError::NotFound(format!("failed to delete user with id '{}'", id))));

        let service = UserService::new(mock);
        assert!(matches!(
            service.delete_user("abc").await,
            Err(UserError::NotFound(_))
        ));
    }
}
