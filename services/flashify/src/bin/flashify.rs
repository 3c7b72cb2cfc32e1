//! services/flashify/src/bin/flashify.rs

use clap::{Args, Parser, Subcommand};
use flashify_core::{
    AiService, FlashcardChanges, FlashcardService, FolderChanges, FolderService,
    GenerationSource, LoginDetails, NewFlashcard, NewFolder, Session, SignupDetails,
};
use flashify_lib::{
    adapters::{AiApi, FileCredentialStore, FlashcardApi, FolderApi, HttpTransport, UserApi},
    app::{alert_channel, AiChat, AlertQueue, SessionManager},
    config::Config,
    error::AppError,
};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "flashify", about = "Flashcards from the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create an account and sign in.
    Signup {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "FLASHIFY_PASSWORD")]
        password: String,
    },
    /// Sign in to an existing account.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "FLASHIFY_PASSWORD")]
        password: String,
    },
    /// Forget the stored session.
    Logout,
    /// Show the signed-in user.
    Whoami,
    /// Manage folders.
    #[command(subcommand)]
    Folders(FolderCommand),
    /// Manage the flashcards of a folder.
    #[command(subcommand)]
    Cards(CardCommand),
    /// Ask the AI to write flashcards.
    Generate(GenerateArgs),
    /// Chat with the AI about a folder, one prompt per line.
    Chat { folder_id: String },
}

#[derive(Subcommand)]
enum FolderCommand {
    List,
    Create {
        name: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    Update {
        folder_id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    Delete { folder_id: String },
}

#[derive(Subcommand)]
enum CardCommand {
    List { folder_id: String },
    Create {
        folder_id: String,
        #[arg(long)]
        question: String,
        #[arg(long)]
        answer: String,
    },
    Update {
        flashcard_id: String,
        #[arg(long)]
        question: Option<String>,
        #[arg(long)]
        answer: Option<String>,
    },
    Delete { flashcard_id: String },
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct GenerateArgs {
    #[arg(long)]
    topic: Option<String>,
    #[arg(long)]
    text: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Config::from_env()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
    let cli = Cli::parse();

    // --- 2. Wire the Adapters ---
    let http = HttpTransport::new(&config.api_base_url)?;
    let store = Arc::new(FileCredentialStore::new(config.store_path.clone()));
    let sessions = SessionManager::new(store);
    info!("Using API at {}", http.base_url());

    let users = UserApi::new(http.clone());
    let folders = FolderApi::new(http.clone());
    let cards = FlashcardApi::new(http.clone());
    let ai = Arc::new(AiApi::new(http));

    // --- 3. Run the Command ---
    match cli.command {
        Command::Signup {
            username,
            email,
            password,
        } => {
            let session = sessions
                .sign_up(
                    &users,
                    &SignupDetails {
                        username,
                        email,
                        password,
                    },
                )
                .await?;
            println!("Signed up as {} <{}>", session.username, session.email);
        }
        Command::Login { email, password } => {
            let session = sessions
                .sign_in(&users, &LoginDetails { email, password })
                .await?;
            println!("Signed in as {} <{}>", session.username, session.email);
        }
        Command::Logout => {
            sessions.end().await?;
            println!("Signed out");
        }
        Command::Whoami => {
            let session = require_session(&sessions).await?;
            println!("{} <{}> ({})", session.username, session.email, session.user_id);
        }
        Command::Folders(command) => {
            let session = require_session(&sessions).await?;
            // Folder paths are keyed by the user id, which a partial session lacks.
            if !session.has_user() {
                return Err(AppError::NotSignedIn);
            }
            run_folder_command(&folders, command, &session).await?;
        }
        Command::Cards(command) => {
            let session = require_session(&sessions).await?;
            run_card_command(&cards, command, &session).await?;
        }
        Command::Generate(args) => {
            let session = require_session(&sessions).await?;
            let source = match (args.topic, args.text) {
                (Some(topic), _) => GenerationSource::Topic(topic),
                (None, Some(text)) => GenerationSource::Text(text),
                (None, None) => {
                    return Err(AppError::Internal("either --topic or --text is required".into()))
                }
            };
            for card in ai.generate_flashcards(&source, &session).await? {
                println!("Q: {}\nA: {}\n", card.question, card.answer);
            }
        }
        Command::Chat { folder_id } => {
            let session = require_session(&sessions).await?;
            run_chat(ai, session, folder_id).await?;
        }
    }

    Ok(())
}

async fn require_session(sessions: &SessionManager) -> Result<Session, AppError> {
    sessions.restore().await?.ok_or(AppError::NotSignedIn)
}

async fn run_folder_command(
    folders: &FolderApi,
    command: FolderCommand,
    session: &Session,
) -> Result<(), AppError> {
    match command {
        FolderCommand::List => {
            for folder in folders.list_folders(&session.user_id, session).await? {
                println!("{}\t{}\t{}", folder.id, folder.name, folder.description);
            }
        }
        FolderCommand::Create { name, description } => {
            let folder = folders
                .create_folder(&session.user_id, &NewFolder { name, description }, session)
                .await?;
            println!("Created folder {} ({})", folder.name, folder.id);
        }
        FolderCommand::Update {
            folder_id,
            name,
            description,
        } => {
            let folder = folders
                .update_folder(&folder_id, &FolderChanges { name, description }, session)
                .await?;
            println!("Updated folder {} ({})", folder.name, folder.id);
        }
        FolderCommand::Delete { folder_id } => {
            folders.delete_folder(&folder_id, session).await?;
            println!("Deleted folder {folder_id}");
        }
    }
    Ok(())
}

async fn run_card_command(
    cards: &FlashcardApi,
    command: CardCommand,
    session: &Session,
) -> Result<(), AppError> {
    match command {
        CardCommand::List { folder_id } => {
            for card in cards.list_flashcards(&folder_id, session).await? {
                println!("{}\t{}\t{}", card.id, card.question, card.answer);
            }
        }
        CardCommand::Create {
            folder_id,
            question,
            answer,
        } => {
            let card = cards
                .create_flashcard(&folder_id, &NewFlashcard { question, answer }, session)
                .await?;
            println!("Created flashcard {}", card.id);
        }
        CardCommand::Update {
            flashcard_id,
            question,
            answer,
        } => {
            let card = cards
                .update_flashcard(&flashcard_id, &FlashcardChanges { question, answer }, session)
                .await?;
            println!("Updated flashcard {}", card.id);
        }
        CardCommand::Delete { flashcard_id } => {
            cards.delete_flashcard(&flashcard_id, session).await?;
            println!("Deleted flashcard {flashcard_id}");
        }
    }
    Ok(())
}

/// Reads prompts from stdin until EOF. Alerts are printed and acknowledged
/// straight away, since a terminal has no modal to dismiss.
async fn run_chat(ai: Arc<dyn AiService>, session: Session, folder_id: String) -> Result<(), AppError> {
    let (alerts, mut queue) = alert_channel();
    let mut chat = AiChat::new(ai, session, alerts, folder_id);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        if let Some(exchange) = chat.send(&line).await {
            println!("{}", exchange.response);
        }
        present_alerts(&mut queue);
    }
    Ok(())
}

fn present_alerts(queue: &mut AlertQueue) {
    while let Some(alert) = queue.try_next() {
        eprintln!("{}: {}", alert.title, alert.message);
        alert.acknowledge();
    }
}
