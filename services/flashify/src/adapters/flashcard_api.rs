//! services/flashify/src/adapters/flashcard_api.rs
//!
//! The flashcard client. Cards are listed and created under their parent
//! folder's id, and updated or deleted under their own id.

use async_trait::async_trait;
use flashify_core::{
    Flashcard, FlashcardChanges, FlashcardService, NewFlashcard, PortResult, Session,
};
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::adapters::http::{first_id, null_as_default, optional_id, HttpTransport};

//=========================================================================================
// Wire Records
//=========================================================================================

#[derive(Serialize)]
struct FlashcardPayload<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    question: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    answer: Option<&'a str>,
}

#[derive(Deserialize)]
struct FlashcardRecord {
    #[serde(default, deserialize_with = "optional_id")]
    id: Option<String>,
    #[serde(default, rename = "_id", deserialize_with = "optional_id")]
    object_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    question: String,
    #[serde(default, deserialize_with = "null_as_default")]
    answer: String,
}

impl FlashcardRecord {
    fn to_domain(self) -> PortResult<Flashcard> {
        Ok(Flashcard {
            id: first_id([self.id, self.object_id], "flashcard")?,
            question: self.question,
            answer: self.answer,
        })
    }
}

#[derive(Deserialize)]
struct FlashcardListResponse {
    flashcards: Vec<FlashcardRecord>,
}

#[derive(Deserialize)]
struct FlashcardResponse {
    flashcard: FlashcardRecord,
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

#[derive(Clone)]
pub struct FlashcardApi {
    http: HttpTransport,
}

impl FlashcardApi {
    pub fn new(http: HttpTransport) -> Self {
        Self { http }
    }
}

#[async_trait]
impl FlashcardService for FlashcardApi {
    async fn list_flashcards(
        &self,
        folder_id: &str,
        session: &Session,
    ) -> PortResult<Vec<Flashcard>> {
        let path = format!("/flashcard/{folder_id}");
        let response = self
            .http
            .execute(self.http.authed(Method::GET, &path, session))
            .await?;
        let list: FlashcardListResponse = response.json()?;
        list.flashcards
            .into_iter()
            .map(FlashcardRecord::to_domain)
            .collect()
    }

    async fn create_flashcard(
        &self,
        folder_id: &str,
        card: &NewFlashcard,
        session: &Session,
    ) -> PortResult<Flashcard> {
        let path = format!("/flashcard/{folder_id}");
        let payload = FlashcardPayload {
            question: Some(&card.question),
            answer: Some(&card.answer),
        };
        let response = self
            .http
            .execute(self.http.authed(Method::POST, &path, session).json(&payload))
            .await?;
        response.json::<FlashcardResponse>()?.flashcard.to_domain()
    }

    async fn update_flashcard(
        &self,
        flashcard_id: &str,
        changes: &FlashcardChanges,
        session: &Session,
    ) -> PortResult<Flashcard> {
        let path = format!("/flashcard/{flashcard_id}");
        let payload = FlashcardPayload {
            question: changes.question.as_deref(),
            answer: changes.answer.as_deref(),
        };
        let response = self
            .http
            .execute(self.http.authed(Method::PUT, &path, session).json(&payload))
            .await?;
        response.json::<FlashcardResponse>()?.flashcard.to_domain()
    }

    async fn delete_flashcard(&self, flashcard_id: &str, session: &Session) -> PortResult<()> {
        let path = format!("/flashcard/{flashcard_id}");
        self.http
            .execute(self.http.authed(Method::DELETE, &path, session))
            .await?;
        Ok(())
    }
}
