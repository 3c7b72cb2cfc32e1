//! services/flashify/src/adapters/ai_api.rs
//!
//! This module contains the client for the AI endpoints: flashcard generation
//! from a topic or a passage, and folder-scoped chat turns.

use async_trait::async_trait;
use flashify_core::{AiService, GeneratedFlashcard, GenerationSource, PortResult, Session};
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::adapters::http::HttpTransport;

//=========================================================================================
// Wire Records
//=========================================================================================

#[derive(Serialize)]
#[serde(rename_all = "lowercase")]
enum GeneratePayload<'a> {
    Topic(&'a str),
    Text(&'a str),
}

impl<'a> From<&'a GenerationSource> for GeneratePayload<'a> {
    fn from(source: &'a GenerationSource) -> Self {
        match source {
            GenerationSource::Topic(topic) => GeneratePayload::Topic(topic),
            GenerationSource::Text(text) => GeneratePayload::Text(text),
        }
    }
}

#[derive(Deserialize)]
struct GeneratedRecord {
    question: String,
    answer: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    flashcards: Vec<GeneratedRecord>,
}

#[derive(Serialize)]
struct InteractPayload<'a> {
    prompt: &'a str,
}

#[derive(Deserialize)]
struct InteractResponse {
    response: String,
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

#[derive(Clone)]
pub struct AiApi {
    http: HttpTransport,
}

impl AiApi {
    pub fn new(http: HttpTransport) -> Self {
        Self { http }
    }
}

#[async_trait]
impl AiService for AiApi {
    async fn generate_flashcards(
        &self,
        source: &GenerationSource,
        session: &Session,
    ) -> PortResult<Vec<GeneratedFlashcard>> {
        let payload = GeneratePayload::from(source);
        let response = self
            .http
            .execute(self.http.authed(Method::POST, "/ai", session).json(&payload))
            .await?;
        let generated: GenerateResponse = response.json()?;
        Ok(generated
            .flashcards
            .into_iter()
            .map(|record| GeneratedFlashcard {
                question: record.question,
                answer: record.answer,
            })
            .collect())
    }

    async fn interact(
        &self,
        folder_id: &str,
        prompt: &str,
        session: &Session,
    ) -> PortResult<String> {
        let path = format!("/ai/{folder_id}");
        let response = self
            .http
            .execute(
                self.http
                    .authed(Method::POST, &path, session)
                    .json(&InteractPayload { prompt }),
            )
            .await?;
        Ok(response.json::<InteractResponse>()?.response)
    }
}
