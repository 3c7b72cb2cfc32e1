//! crates/flashify_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of the HTTP wire format; the adapters map
//! their own records onto them.

use chrono::{DateTime, Utc};

/// The credentials of a signed-in user, passed explicitly to every
/// authenticated call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user_id: String,
    pub username: String,
    pub email: String,
}

impl Session {
    /// The value of the `Authorization` header for this session.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }

    /// Whether the session names its user. A session restored from a partial
    /// write may hold a token alone.
    pub fn has_user(&self) -> bool {
        !self.user_id.is_empty()
    }
}

/// A folder of flashcards, owned by one user on the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Folder {
    pub id: String,
    pub name: String,
    pub description: String,
}

/// A single flashcard inside a folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flashcard {
    pub id: String,
    pub question: String,
    pub answer: String,
}

/// A flashcard produced by the AI service that has not been saved yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFlashcard {
    pub question: String,
    pub answer: String,
}

/// One prompt/response turn of an AI chat. Lives only as long as the chat screen.
#[derive(Debug, Clone)]
pub struct ChatExchange {
    pub prompt: String,
    pub response: String,
    pub asked_at: DateTime<Utc>,
}

//=========================================================================================
// Inputs to the service ports
//=========================================================================================

#[derive(Debug, Clone)]
pub struct SignupDetails {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct LoginDetails {
    pub email: String,
    pub password: String,
}

/// What the user service hands back after signup or login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthGrant {
    pub token: String,
    pub user_id: String,
    pub username: String,
    pub email: String,
}

impl From<AuthGrant> for Session {
    fn from(grant: AuthGrant) -> Self {
        Self {
            token: grant.token,
            user_id: grant.user_id,
            username: grant.username,
            email: grant.email,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewFolder {
    pub name: String,
    pub description: String,
}

/// Partial update of a folder. `None` fields are left untouched on the server.
#[derive(Debug, Clone, Default)]
pub struct FolderChanges {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewFlashcard {
    pub question: String,
    pub answer: String,
}

/// Partial update of a flashcard.
#[derive(Debug, Clone, Default)]
pub struct FlashcardChanges {
    pub question: Option<String>,
    pub answer: Option<String>,
}

/// The source the AI generator builds a flashcard set from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationSource {
    /// A short subject such as "Cell Biology".
    Topic(String),
    /// A passage of study material.
    Text(String),
}
