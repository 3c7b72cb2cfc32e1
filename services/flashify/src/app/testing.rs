//! In-memory fakes of the service ports for controller tests.

use async_trait::async_trait;
use flashify_core::{
    AiService, Flashcard, FlashcardChanges, FlashcardService, Folder, FolderChanges,
    FolderService, GeneratedFlashcard, GenerationSource, NewFlashcard, NewFolder, PortError,
    PortResult, Session,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub fn session() -> Session {
    Session {
        token: "abc".into(),
        user_id: "u1".into(),
        username: "ada".into(),
        email: "ada@example.com".into(),
    }
}

fn server_down() -> PortError {
    PortError::Rejected {
        status: 500,
        message: "Internal Server Error".into(),
    }
}

#[derive(Default)]
pub struct FakeFolders {
    folders: Mutex<Vec<Folder>>,
    failing: bool,
    lists: AtomicUsize,
    creates: AtomicUsize,
}

impl FakeFolders {
    pub fn with(folders: Vec<Folder>) -> Self {
        Self {
            folders: Mutex::new(folders),
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn list_calls(&self) -> usize {
        self.lists.load(Ordering::SeqCst)
    }

    pub fn create_calls(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FolderService for FakeFolders {
    async fn list_folders(&self, _user_id: &str, _session: &Session) -> PortResult<Vec<Folder>> {
        self.lists.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            return Err(server_down());
        }
        Ok(self.folders.lock().unwrap().clone())
    }

    async fn create_folder(
        &self,
        _user_id: &str,
        folder: &NewFolder,
        _session: &Session,
    ) -> PortResult<Folder> {
        let n = self.creates.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            return Err(server_down());
        }
        let created = Folder {
            id: format!("f{n}"),
            name: folder.name.clone(),
            description: folder.description.clone(),
        };
        self.folders.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn update_folder(
        &self,
        _folder_id: &str,
        _changes: &FolderChanges,
        _session: &Session,
    ) -> PortResult<Folder> {
        Err(PortError::Unexpected("not used".into()))
    }

    async fn delete_folder(&self, _folder_id: &str, _session: &Session) -> PortResult<()> {
        Err(PortError::Unexpected("not used".into()))
    }
}

#[derive(Default)]
pub struct FakeFlashcards {
    cards: Mutex<Vec<Flashcard>>,
    failing: bool,
}

impl FakeFlashcards {
    pub fn with(cards: Vec<Flashcard>) -> Self {
        Self {
            cards: Mutex::new(cards),
            failing: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn stored(&self) -> Vec<Flashcard> {
        self.cards.lock().unwrap().clone()
    }
}

#[async_trait]
impl FlashcardService for FakeFlashcards {
    async fn list_flashcards(
        &self,
        _folder_id: &str,
        _session: &Session,
    ) -> PortResult<Vec<Flashcard>> {
        if self.failing {
            return Err(server_down());
        }
        Ok(self.cards.lock().unwrap().clone())
    }

    async fn create_flashcard(
        &self,
        _folder_id: &str,
        card: &NewFlashcard,
        _session: &Session,
    ) -> PortResult<Flashcard> {
        if self.failing {
            return Err(server_down());
        }
        let mut cards = self.cards.lock().unwrap();
        let created = Flashcard {
            id: format!("c{}", cards.len()),
            question: card.question.clone(),
            answer: card.answer.clone(),
        };
        cards.push(created.clone());
        Ok(created)
    }

    async fn update_flashcard(
        &self,
        _flashcard_id: &str,
        _changes: &FlashcardChanges,
        _session: &Session,
    ) -> PortResult<Flashcard> {
        Err(PortError::Unexpected("not used".into()))
    }

    async fn delete_flashcard(&self, flashcard_id: &str, _session: &Session) -> PortResult<()> {
        if self.failing {
            return Err(server_down());
        }
        self.cards.lock().unwrap().retain(|card| card.id != flashcard_id);
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeAi {
    last_source: Mutex<Option<GenerationSource>>,
    failing: bool,
}

impl FakeAi {
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn last_source(&self) -> Option<GenerationSource> {
        self.last_source.lock().unwrap().clone()
    }
}

#[async_trait]
impl AiService for FakeAi {
    async fn generate_flashcards(
        &self,
        source: &GenerationSource,
        _session: &Session,
    ) -> PortResult<Vec<GeneratedFlashcard>> {
        *self.last_source.lock().unwrap() = Some(source.clone());
        if self.failing {
            return Err(server_down());
        }
        Ok(vec![GeneratedFlashcard {
            question: "What is the powerhouse of the cell?".into(),
            answer: "Mitochondria".into(),
        }])
    }

    async fn interact(
        &self,
        folder_id: &str,
        prompt: &str,
        _session: &Session,
    ) -> PortResult<String> {
        if self.failing {
            return Err(server_down());
        }
        Ok(format!("[{folder_id}] {prompt}?"))
    }
}
