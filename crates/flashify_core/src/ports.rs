//! crates/flashify_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the
//! screen controllers to be independent of the HTTP client and the storage
//! backend behind them.

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::domain::{
    AuthGrant, Flashcard, FlashcardChanges, Folder, FolderChanges, GeneratedFlashcard,
    GenerationSource, LoginDetails, NewFlashcard, NewFolder, Session, SignupDetails,
};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
///
/// The HTTP ports do not tell "not found" apart from "unauthorized": every
/// non-2xx answer is a `Rejected` carrying the status and the server's message.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Network error: {0}")]
    Transport(String),
    #[error("Request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("Unexpected response shape: {0}")]
    Schema(String),
    #[error("Credential storage error: {0}")]
    Storage(String),
    #[error("Request cancelled")]
    Cancelled,
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Remote Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait UserService: Send + Sync {
    /// `POST /user/signup`. Unauthenticated.
    async fn signup(&self, details: &SignupDetails) -> PortResult<AuthGrant>;

    /// `POST /user/login`. Unauthenticated.
    async fn login(&self, details: &LoginDetails) -> PortResult<AuthGrant>;
}

#[async_trait]
pub trait FolderService: Send + Sync {
    async fn list_folders(&self, user_id: &str, session: &Session) -> PortResult<Vec<Folder>>;

    async fn create_folder(
        &self,
        user_id: &str,
        folder: &NewFolder,
        session: &Session,
    ) -> PortResult<Folder>;

    async fn update_folder(
        &self,
        folder_id: &str,
        changes: &FolderChanges,
        session: &Session,
    ) -> PortResult<Folder>;

    /// Deletes carry no request body.
    async fn delete_folder(&self, folder_id: &str, session: &Session) -> PortResult<()>;
}

#[async_trait]
pub trait FlashcardService: Send + Sync {
    async fn list_flashcards(
        &self,
        folder_id: &str,
        session: &Session,
    ) -> PortResult<Vec<Flashcard>>;

    async fn create_flashcard(
        &self,
        folder_id: &str,
        card: &NewFlashcard,
        session: &Session,
    ) -> PortResult<Flashcard>;

    async fn update_flashcard(
        &self,
        flashcard_id: &str,
        changes: &FlashcardChanges,
        session: &Session,
    ) -> PortResult<Flashcard>;

    async fn delete_flashcard(&self, flashcard_id: &str, session: &Session) -> PortResult<()>;
}

#[async_trait]
pub trait AiService: Send + Sync {
    /// Builds a flashcard set from a topic or a passage of text.
    async fn generate_flashcards(
        &self,
        source: &GenerationSource,
        session: &Session,
    ) -> PortResult<Vec<GeneratedFlashcard>>;

    /// Sends one chat turn scoped to a folder and returns the assistant's reply.
    async fn interact(&self, folder_id: &str, prompt: &str, session: &Session)
        -> PortResult<String>;
}

//=========================================================================================
// Credential Store Port
//=========================================================================================

/// The keys the session credentials are stored under.
pub mod keys {
    pub const TOKEN: &str = "token";
    pub const USER_ID: &str = "user_id";
    pub const USERNAME: &str = "username";
    pub const EMAIL: &str = "email";

    pub const ALL: [&str; 4] = [TOKEN, USER_ID, USERNAME, EMAIL];
}

/// Key/value persistence holding serialized text per key.
///
/// A missing key is `Ok(None)`. Backend faults are `PortError::Storage`.
/// There are no guarantees across keys; concurrent writers to one key are
/// last-write-wins.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn set_raw(&self, key: &str, value: String) -> PortResult<()>;

    async fn get_raw(&self, key: &str) -> PortResult<Option<String>>;

    /// Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> PortResult<()>;
}

/// JSON helpers available on every `CredentialStore`.
#[async_trait]
pub trait CredentialStoreExt: CredentialStore {
    /// Serializes `value` to JSON text and stores it under `key`.
    async fn set<T>(&self, key: &str, value: &T) -> PortResult<()>
    where
        T: Serialize + ?Sized + Sync,
    {
        let text = serde_json::to_string(value)
            .map_err(|e| PortError::Schema(format!("cannot serialize value for '{key}': {e}")))?;
        self.set_raw(key, text).await
    }

    /// Reads and parses the value under `key`.
    async fn get<T>(&self, key: &str) -> PortResult<Option<T>>
    where
        T: DeserializeOwned + Send,
    {
        match self.get_raw(key).await? {
            Some(text) => serde_json::from_str(&text).map(Some).map_err(|e| {
                PortError::Schema(format!("stored value for '{key}' does not parse: {e}"))
            }),
            None => Ok(None),
        }
    }

    /// Like `get`, but any failure is logged and reported as absence.
    async fn get_or_none<T>(&self, key: &str) -> Option<T>
    where
        T: DeserializeOwned + Send,
    {
        match self.get(key).await {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "Credential read failed, treating as absent");
                None
            }
        }
    }

    /// Shallow-merges a JSON object into the object stored under `key`.
    /// Anything that is not an object on either side is simply replaced.
    async fn merge(&self, key: &str, patch: Value) -> PortResult<()> {
        let current: Option<Value> = self.get(key).await?;
        let merged = match (current, patch) {
            (Some(Value::Object(mut base)), Value::Object(patch)) => {
                base.extend(patch);
                Value::Object(base)
            }
            (_, patch) => patch,
        };
        self.set(key, &merged).await
    }
}

impl<S: CredentialStore + ?Sized> CredentialStoreExt for S {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MapStore(Mutex<HashMap<String, String>>);

    #[async_trait]
    impl CredentialStore for MapStore {
        async fn set_raw(&self, key: &str, value: String) -> PortResult<()> {
            self.0.lock().unwrap().insert(key.to_string(), value);
            Ok(())
        }
        async fn get_raw(&self, key: &str) -> PortResult<Option<String>> {
            Ok(self.0.lock().unwrap().get(key).cloned())
        }
        async fn remove(&self, key: &str) -> PortResult<()> {
            self.0.lock().unwrap().remove(key);
            Ok(())
        }
    }

    struct BrokenStore;

    #[async_trait]
    impl CredentialStore for BrokenStore {
        async fn set_raw(&self, _key: &str, _value: String) -> PortResult<()> {
            Err(PortError::Storage("disk full".into()))
        }
        async fn get_raw(&self, _key: &str) -> PortResult<Option<String>> {
            Err(PortError::Storage("device locked".into()))
        }
        async fn remove(&self, _key: &str) -> PortResult<()> {
            Err(PortError::Storage("device locked".into()))
        }
    }

    #[tokio::test]
    async fn values_are_stored_as_json_text() {
        let store = MapStore::default();
        store.set(keys::TOKEN, "abc").await.unwrap();

        assert_eq!(store.get_raw(keys::TOKEN).await.unwrap().as_deref(), Some("\"abc\""));
        let token: Option<String> = store.get(keys::TOKEN).await.unwrap();
        assert_eq!(token.as_deref(), Some("abc"));
    }

    #[tokio::test]
    async fn nested_values_round_trip() {
        let store = MapStore::default();
        let value = json!({"deck": [1, 2, {"front": "q", "back": null}], "ok": true});
        store.set("prefs", &value).await.unwrap();

        let back: Value = store.get("prefs").await.unwrap().unwrap();
        assert_eq!(back, value);
    }

    #[tokio::test]
    async fn type_mismatch_is_a_schema_error() {
        let store = MapStore::default();
        store.set("count", &3).await.unwrap();

        let result: PortResult<Option<String>> = store.get("count").await;
        let err = result.unwrap_err();
        assert!(matches!(err, PortError::Schema(_)));
    }

    #[tokio::test]
    async fn absent_and_unavailable_are_distinct() {
        let absent: PortResult<Option<String>> = MapStore::default().get("nothing").await;
        assert!(matches!(absent, Ok(None)));

        let unavailable: PortResult<Option<String>> = BrokenStore.get("nothing").await;
        assert!(matches!(unavailable, Err(PortError::Storage(_))));

        let lenient: Option<String> = BrokenStore.get_or_none("nothing").await;
        assert_eq!(lenient, None);
    }

    #[tokio::test]
    async fn merge_extends_objects_and_replaces_scalars() {
        let store = MapStore::default();
        store.set("profile", &json!({"a": 1, "b": 2})).await.unwrap();
        store.merge("profile", json!({"b": 3, "c": 4})).await.unwrap();
        let merged: Value = store.get("profile").await.unwrap().unwrap();
        assert_eq!(merged, json!({"a": 1, "b": 3, "c": 4}));

        store.set("flag", &true).await.unwrap();
        store.merge("flag", json!({"on": true})).await.unwrap();
        let replaced: Value = store.get("flag").await.unwrap().unwrap();
        assert_eq!(replaced, json!({"on": true}));

        store.merge("fresh", json!({"x": 1})).await.unwrap();
        let fresh: Value = store.get("fresh").await.unwrap().unwrap();
        assert_eq!(fresh, json!({"x": 1}));
    }
}
