//! services/flashify/src/app/chat.rs
//!
//! A folder-scoped AI chat. The transcript lives only as long as the screen.

use chrono::Utc;
use flashify_core::{AiService, ChatExchange, PortError, Session};
use std::sync::Arc;
use tracing::error;

use crate::app::{alert::AlertBridge, screen::ScreenScope};

pub struct AiChat {
    ai_service: Arc<dyn AiService>,
    session: Session,
    alerts: AlertBridge,
    scope: ScreenScope,
    folder_id: String,
    exchanges: Vec<ChatExchange>,
}

impl AiChat {
    pub fn new(
        ai_service: Arc<dyn AiService>,
        session: Session,
        alerts: AlertBridge,
        folder_id: impl Into<String>,
    ) -> Self {
        Self {
            ai_service,
            session,
            alerts,
            scope: ScreenScope::new(),
            folder_id: folder_id.into(),
            exchanges: Vec::new(),
        }
    }

    pub fn scope(&self) -> &ScreenScope {
        &self.scope
    }

    pub fn exchanges(&self) -> &[ChatExchange] {
        &self.exchanges
    }

    /// Sends one turn. Returns the reply when one was appended to the transcript.
    pub async fn send(&mut self, prompt: &str) -> Option<&ChatExchange> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return None;
        }

        let asked_at = Utc::now();
        let result = self
            .scope
            .run(
                self.ai_service
                    .interact(&self.folder_id, prompt, &self.session),
            )
            .await;

        match result {
            Ok(response) => {
                self.exchanges.push(ChatExchange {
                    prompt: prompt.to_string(),
                    response,
                    asked_at,
                });
                self.exchanges.last()
            }
            Err(PortError::Cancelled) => None,
            Err(e) => {
                error!(folder_id = %self.folder_id, "Chat turn failed: {e}");
                self.alerts.notify("Error", e.to_string(), None);
                None
            }
        }
    }
}
