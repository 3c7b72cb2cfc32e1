pub mod domain;
pub mod ports;

pub use domain::{
    AuthGrant, ChatExchange, Flashcard, FlashcardChanges, Folder, FolderChanges,
    GeneratedFlashcard, GenerationSource, LoginDetails, NewFlashcard, NewFolder, Session,
    SignupDetails,
};
pub use ports::{
    keys, AiService, CredentialStore, CredentialStoreExt, FlashcardService, FolderService,
    PortError, PortResult, UserService,
};
