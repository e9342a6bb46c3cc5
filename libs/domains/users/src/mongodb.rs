//! MongoDB implementation of UserRepository

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::{
    Collection, Database, IndexModel,
    bson::{DateTime, Document, doc, oid::ObjectId},
    options::{FindOptions, ReturnDocument},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{UserError, UserResult};
use crate::models::{ListQuery, User, UserCreateData, UserUpdateData};
use crate::repository::UserRepository;

const COLLECTION_USERS: &str = "users";

const ERR_RETRIEVE_FAILED: &str = "failed to retrieve data from mongo";
const ERR_CURSOR_ALL_FAILED: &str = "failed to use cursor to retrieve all data from mongo";
const ERR_INSERT_FAILED: &str = "failed to insert data into mongo";
const ERR_CONVERT_INSERTED_ID: &str = "failed to convert inserted id to object id";
const ERR_CONVERT_TO_OBJECT_ID: &str = "failed to convert id string to object id";
const ERR_UPDATE_FAILED: &str = "failed to update user";
const ERR_DELETE_FAILED: &str = "failed to delete user";

/// Stored shape of a user. Field names are snake_case in the collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct UserDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,
    first_name: String,
    last_name: String,
    nickname: String,
    email: String,
    country: String,
    password: String,
    created_at: DateTime,
    updated_at: DateTime,
}

impl From<UserDocument> for User {
    fn from(doc: UserDocument) -> Self {
        Self {
            id: doc.id.map(|oid| oid.to_hex()).unwrap_or_default(),
            first_name: doc.first_name,
            last_name: doc.last_name,
            nickname: doc.nickname,
            email: doc.email,
            country: doc.country,
            created_at: doc.created_at.to_system_time().into(),
            updated_at: doc.updated_at.to_system_time().into(),
        }
    }
}

/// MongoDB implementation of the UserRepository
#[derive(Clone)]
pub struct MongoUserRepository {
    collection: Collection<UserDocument>,
}

impl MongoUserRepository {
    /// # Example
    /// ```ignore
    /// let client = Client::with_uri_str("mongodb://localhost:27017").await?;
    /// let repo = MongoUserRepository::new(client.database("users"));
    /// ```
    pub fn new(db: Database) -> Self {
        Self::with_collection(db, COLLECTION_USERS)
    }

    pub fn with_collection(db: Database, collection_name: &str) -> Self {
        let collection = db.collection::<UserDocument>(collection_name);
        Self { collection }
    }

    /// Creates the indexes backing the list query: `created_at` descending
    /// for ordering, `email` and `country` for the equality filters.
    ///
    /// Idempotent; run once at startup.
    #[instrument(skip(self))]
    pub async fn init_indexes(&self) -> UserResult<()> {
        let indexes = vec![
            IndexModel::builder().keys(doc! { "created_at": -1 }).build(),
            IndexModel::builder().keys(doc! { "email": 1 }).build(),
            IndexModel::builder().keys(doc! { "country": 1 }).build(),
        ];

        self.collection
            .create_indexes(indexes)
            .await
            .map_err(|e| UserError::Persistence(format!("failed to create indexes: {}", e)))?;

        tracing::info!(collection = %self.collection.name(), "User indexes ready");
        Ok(())
    }

    fn parse_id(id: &str) -> UserResult<ObjectId> {
        ObjectId::parse_str(id)
            .map_err(|e| UserError::NotFound(format!("{}: {}", ERR_CONVERT_TO_OBJECT_ID, e)))
    }

    fn build_filter(query: &ListQuery) -> Document {
        let mut filter = doc! {};

        if let Some(ref country) = query.country {
            filter.insert("country", country.as_str());
        }

        if let Some(ref email) = query.email {
            filter.insert("email", email.as_str());
        }

        filter
    }

    /// Single-stage update pipeline setting exactly the present fields of
    /// `patch`. `updated_at` becomes `now`, or the stored value plus one
    /// millisecond when `now` does not exceed it, so it strictly increases.
    ///
    /// Values go through `$literal`: inside a pipeline a string such as an
    /// argon2 digest (`$argon2id$...`) would otherwise read as a field path.
    fn build_update(patch: &UserUpdateData, now: DateTime) -> Vec<Document> {
        let mut set = doc! {};

        let fields = [
            ("first_name", &patch.first_name),
            ("last_name", &patch.last_name),
            ("nickname", &patch.nickname),
            ("email", &patch.email),
            ("password", &patch.password),
            ("country", &patch.country),
        ];
        for (name, value) in fields {
            if let Some(value) = value {
                set.insert(name, doc! { "$literal": value.as_str() });
            }
        }
        set.insert("updated_at", doc! { "$max": [now, { "$add": ["$updated_at", 1] }] });

        vec![doc! { "$set": set }]
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    #[instrument(skip(self))]
    async fn list(&self, query: ListQuery) -> UserResult<Vec<User>> {
        let filter = Self::build_filter(&query);

        let options = FindOptions::builder()
            .sort(doc! { "created_at": -1 })
            .skip(query.page)
            .limit(query.limit)
            .build();

        let cursor = self
            .collection
            .find(filter)
            .with_options(options)
            .await
            .map_err(|e| UserError::Persistence(format!("{}: {}", ERR_RETRIEVE_FAILED, e)))?;

        let documents: Vec<UserDocument> = cursor
            .try_collect()
            .await
            .map_err(|e| UserError::Persistence(format!("{}: {}", ERR_CURSOR_ALL_FAILED, e)))?;

        Ok(documents.into_iter().map(User::from).collect())
    }

    #[instrument(skip(self, data), fields(email = %data.email))]
    async fn create(&self, data: UserCreateData) -> UserResult<String> {
        let now = DateTime::now();

        let document = UserDocument {
            id: None,
            first_name: data.first_name,
            last_name: data.last_name,
            nickname: data.nickname,
            email: data.email,
            country: data.country,
            password: data.password,
            created_at: now,
            updated_at: now,
        };

        let result = self
            .collection
            .insert_one(&document)
            .await
            .map_err(|e| UserError::Persistence(format!("{}: {}", ERR_INSERT_FAILED, e)))?;

        let id = result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| {
                UserError::Persistence(format!("{}: {}", ERR_CONVERT_INSERTED_ID, result.inserted_id))
            })?
            .to_hex();

        tracing::info!(user_id = %id, "User created");
        Ok(id)
    }

    #[instrument(skip(self, patch))]
    async fn update(&self, id: &str, patch: UserUpdateData) -> UserResult<User> {
        let oid = Self::parse_id(id)?;
        let update = Self::build_update(&patch, DateTime::now());

        let updated = self
            .collection
            .find_one_and_update(doc! { "_id": oid }, update)
            .return_document(ReturnDocument::After)
            .await
            .map_err(|e| {
                UserError::Persistence(format!("{} with id '{}': {}", ERR_UPDATE_FAILED, id, e))
            })?
            .ok_or_else(|| UserError::NotFound(format!("{} with id '{}'", ERR_UPDATE_FAILED, id)))?;

        tracing::info!(user_id = %id, "User updated");
        Ok(updated.into())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &str) -> UserResult<()> {
        let oid = Self::parse_id(id)?;

        self.collection
            .find_one_and_delete(doc! { "_id": oid })
            .await
            .map_err(|e| {
                UserError::Persistence(format!("{} with id '{}': {}", ERR_DELETE_FAILED, id, e))
            })?
            .ok_or_else(|| UserError::NotFound(format!("{} with id '{}'", ERR_DELETE_FAILED, id)))?;

        tracing::info!(user_id = %id, "User deleted");
        Ok(())
    }
}
