//! services/flashify/src/app/home.rs
//!
//! The home screen: the user's folders, a search filter, the "create folder"
//! dialog, and the topic/text box that feeds the AI generator.

use flashify_core::{
    AiService, Folder, FolderService, GeneratedFlashcard, GenerationSource, NewFolder,
    PortError, Session,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{error, warn};

use crate::app::{alert::AlertBridge, screen::ScreenScope};

/// How the generator box interprets its input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    Topic,
    #[default]
    Text,
}

impl InputMode {
    fn toggled(self) -> Self {
        match self {
            InputMode::Topic => InputMode::Text,
            InputMode::Text => InputMode::Topic,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FolderDraft {
    pub name: String,
    pub description: String,
}

pub struct HomeScreen {
    folder_service: Arc<dyn FolderService>,
    ai_service: Arc<dyn AiService>,
    session: Session,
    alerts: AlertBridge,
    scope: ScreenScope,
    folders: Vec<Folder>,
    pub search_query: String,
    pub draft: FolderDraft,
    // Shared with alert callbacks, which re-open the dialog on dismissal.
    create_dialog_open: Arc<AtomicBool>,
    input_mode: InputMode,
    generated: Vec<GeneratedFlashcard>,
}

impl HomeScreen {
    pub fn new(
        folder_service: Arc<dyn FolderService>,
        ai_service: Arc<dyn AiService>,
        session: Session,
        alerts: AlertBridge,
    ) -> Self {
        Self {
            folder_service,
            ai_service,
            session,
            alerts,
            scope: ScreenScope::new(),
            folders: Vec::new(),
            search_query: String::new(),
            draft: FolderDraft::default(),
            create_dialog_open: Arc::new(AtomicBool::new(false)),
            input_mode: InputMode::default(),
            generated: Vec::new(),
        }
    }

    pub fn scope(&self) -> &ScreenScope {
        &self.scope
    }

    pub fn folders(&self) -> &[Folder] {
        &self.folders
    }

    /// Folders whose name contains the search query, ignoring case.
    pub fn visible_folders(&self) -> Vec<&Folder> {
        let query = self.search_query.to_lowercase();
        self.folders
            .iter()
            .filter(|folder| folder.name.to_lowercase().contains(&query))
            .collect()
    }

    /// Folders live under the user's id, so a session without one cannot
    /// address them. That case raises an alert and sends nothing.
    fn require_user(&self) -> bool {
        if self.session.has_user() {
            return true;
        }
        warn!("Session has no user id; folder request skipped");
        self.alerts.notify(
            "Error",
            "You are not signed in. Please log in again.",
            None,
        );
        false
    }

    /// Fetches the folder list. Runs on every screen load.
    pub async fn load(&mut self) {
        if !self.require_user() {
            return;
        }

        let result = self
            .scope
            .run(
                self.folder_service
                    .list_folders(&self.session.user_id, &self.session),
            )
            .await;

        match result {
            Ok(folders) => self.folders = folders,
            Err(PortError::Cancelled) => {}
            Err(e) => {
                error!("Failed to load folders: {e}");
                self.alerts.notify("Error", e.to_string(), None);
            }
        }
    }

    pub fn open_create_dialog(&self) {
        self.create_dialog_open.store(true, Ordering::SeqCst);
    }

    pub fn close_create_dialog(&self) {
        self.create_dialog_open.store(false, Ordering::SeqCst);
    }

    pub fn is_create_dialog_open(&self) -> bool {
        self.create_dialog_open.load(Ordering::SeqCst)
    }

    /// Creates a folder from the draft and appends it locally on success.
    ///
    /// A blank name does nothing. On failure the dialog closes behind an
    /// "Unsuccessful" alert and re-opens once the alert is dismissed.
    pub async fn add_folder(&mut self) {
        if self.draft.name.trim().is_empty() || !self.require_user() {
            return;
        }

        let new_folder = NewFolder {
            name: self.draft.name.clone(),
            description: self.draft.description.clone(),
        };
        let result = self
            .scope
            .run(self.folder_service.create_folder(
                &self.session.user_id,
                &new_folder,
                &self.session,
            ))
            .await;

        match result {
            Ok(folder) => {
                self.folders.push(folder);
                self.draft = FolderDraft::default();
                self.close_create_dialog();
            }
            Err(PortError::Cancelled) => {}
            Err(e) => {
                error!("Failed to create folder: {e}");
                self.close_create_dialog();
                let dialog = self.create_dialog_open.clone();
                self.alerts.notify(
                    "Unsuccessful",
                    e.to_string(),
                    Some(Box::new(move || dialog.store(true, Ordering::SeqCst))),
                );
            }
        }
    }

    pub fn input_mode(&self) -> InputMode {
        self.input_mode
    }

    pub fn toggle_input_mode(&mut self) {
        self.input_mode = self.input_mode.toggled();
    }

    pub fn generated(&self) -> &[GeneratedFlashcard] {
        &self.generated
    }

    /// Sends the generator input as a topic or a text, per the current mode.
    pub async fn generate(&mut self, input: &str) {
        let input = input.trim();
        if input.is_empty() {
            return;
        }

        let source = match self.input_mode {
            InputMode::Topic => GenerationSource::Topic(input.to_string()),
            InputMode::Text => GenerationSource::Text(input.to_string()),
        };
        let result = self
            .scope
            .run(self.ai_service.generate_flashcards(&source, &self.session))
            .await;

        match result {
            Ok(cards) => self.generated = cards,
            Err(PortError::Cancelled) => {}
            Err(e) => {
                error!("Failed to generate flashcards: {e}");
                self.alerts.notify("Error", e.to_string(), None);
            }
        }
    }
}
