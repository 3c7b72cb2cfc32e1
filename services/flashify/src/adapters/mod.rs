pub mod ai_api;
pub mod credential_store;
pub mod flashcard_api;
pub mod folder_api;
pub mod http;
pub mod user_api;

pub use ai_api::AiApi;
pub use credential_store::{FileCredentialStore, MemoryCredentialStore};
pub use flashcard_api::FlashcardApi;
pub use folder_api::FolderApi;
pub use http::{ApiResponse, HttpTransport};
pub use user_api::UserApi;
