//! Generic REST resource client.
//!
//! Every backend collection follows the same shape: `GET {path}` lists,
//! `GET {path}{id}/` fetches one, `POST` creates, `PUT` updates, `DELETE`
//! removes and `?search=` filters. [`ResourceClient`] implements that once
//! for anything that is an [`Entity`].

use std::fmt;
use std::marker::PhantomData;

use pos_data::{ApiClient, ApiError, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A server-owned record exposed under a REST collection.
pub trait Entity: Clone + fmt::Debug + DeserializeOwned + Send + Sync + 'static {
    /// Identifier type.
    type Id: Copy + Eq + fmt::Display + fmt::Debug + Send + Sync + 'static;
    /// Body sent to create a record.
    type Create: Serialize + fmt::Debug + Send + Sync;
    /// Body sent to update a record. Unset fields are omitted.
    type Update: Serialize + fmt::Debug + Default + Send + Sync;

    /// Collection path with leading and trailing slash, e.g. `/products/`.
    const PATH: &'static str;
    /// Plural noun used in messages, e.g. `products`.
    const PLURAL: &'static str;

    /// The record's id.
    fn id(&self) -> Self::Id;
}

/// A foreign key that the server sends either as a bare id or as the
/// embedded record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Related<I, T> {
    /// Only the id was sent.
    Reference(I),
    /// The full record was sent.
    Embedded(Box<T>),
}

impl<T: Entity> Related<T::Id, T> {
    /// The referenced id, whichever form arrived.
    pub fn id(&self) -> T::Id {
        match self {
            Related::Reference(id) => *id,
            Related::Embedded(record) => record.id(),
        }
    }

    /// The embedded record, if the server sent one.
    pub fn embedded(&self) -> Option<&T> {
        match self {
            Related::Reference(_) => None,
            Related::Embedded(record) => Some(record),
        }
    }
}

/// Unwrap a list payload that is either a bare array or a paginated
/// `{"results": [...]}` envelope.
pub fn unwrap_listing<T: DeserializeOwned>(value: Value) -> Result<Vec<T>, serde_json::Error> {
    match value {
        Value::Object(mut map) if map.contains_key("results") => {
            let results = map.remove("results").unwrap_or(Value::Array(Vec::new()));
            serde_json::from_value(results)
        }
        other => serde_json::from_value(other),
    }
}

fn decode<T: DeserializeOwned>(response: &Response) -> Result<T, ApiError> {
    response.json()
}

fn decode_listing<T: DeserializeOwned>(response: &Response) -> Result<Vec<T>, ApiError> {
    let value: Value = response.json()?;
    unwrap_listing(value).map_err(|e| {
        ApiError::http(response.status, format!("Failed to parse response: {}", e))
    })
}

/// Typed CRUD client for one collection.
pub struct ResourceClient<E> {
    client: ApiClient,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for ResourceClient<E> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> fmt::Debug for ResourceClient<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceClient")
            .field("path", &E::PATH)
            .field("base_url", &self.client.base_url())
            .finish()
    }
}

impl<E: Entity> ResourceClient<E> {
    /// Bind a collection to a client.
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            _entity: PhantomData,
        }
    }

    /// The underlying HTTP client.
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Path of a single record, e.g. `/products/3/`.
    pub fn item_path(id: E::Id) -> String {
        format!("{}{}/", E::PATH, id)
    }

    /// Fetch the whole collection in server order.
    #[tracing::instrument(level = "debug", skip(self), fields(path = E::PATH))]
    pub async fn list_all(&self) -> Result<Vec<E>, ApiError> {
        let response = self.client.get(E::PATH).send().await?;
        decode_listing(&response)
    }

    /// Fetch one record.
    #[tracing::instrument(level = "debug", skip(self), fields(path = E::PATH))]
    pub async fn get_by_id(&self, id: E::Id) -> Result<E, ApiError> {
        let response = self.client.get(Self::item_path(id)).send().await?;
        decode(&response)
    }

    /// Create a record and return the server's copy.
    #[tracing::instrument(level = "debug", skip(self, payload), fields(path = E::PATH))]
    pub async fn create(&self, payload: &E::Create) -> Result<E, ApiError> {
        let response = self.client.post(E::PATH).json(payload)?.send().await?;
        decode(&response)
    }

    /// Update a record with `PUT` and return the server's copy.
    #[tracing::instrument(level = "debug", skip(self, changes), fields(path = E::PATH))]
    pub async fn update(&self, id: E::Id, changes: &E::Update) -> Result<E, ApiError> {
        let response = self
            .client
            .put(Self::item_path(id))
            .json(changes)?
            .send()
            .await?;
        decode(&response)
    }

    /// Delete a record. Any 2xx counts as success.
    #[tracing::instrument(level = "debug", skip(self), fields(path = E::PATH))]
    pub async fn delete(&self, id: E::Id) -> Result<(), ApiError> {
        self.client.delete(Self::item_path(id)).send().await?;
        Ok(())
    }

    /// Server-side search over the collection's searchable fields.
    #[tracing::instrument(level = "debug", skip(self), fields(path = E::PATH))]
    pub async fn search(&self, query: &str) -> Result<Vec<E>, ApiError> {
        let response = self
            .client
            .get(E::PATH)
            .query("search", query)
            .send()
            .await?;
        decode_listing(&response)
    }
}
