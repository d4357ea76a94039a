use std::fmt;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use env_logger::Env;
use log::debug;
use serde::Serialize;
use services::{AppServices, Clock, StoreBackend, StudyConfig};
use study_core::model::{Level, MistakeInput, MistakeScope, SessionId};
use study_core::progression::Submission;

#[derive(Debug)]
enum ArgsError {
    InvalidStore { raw: String },
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::InvalidStore { raw } => {
                write!(f, "invalid --store value: {raw} (expected json or a sqlite: URL)")
            }
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid sqlite URL: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

#[derive(Parser)]
#[command(name = "study")]
#[command(about = "Chapter-by-chapter study progression", long_about = None)]
struct Cli {
    /// Directory holding `<session>/` upload folders
    #[arg(long, global = true, env = "STUDY_UPLOAD_ROOT")]
    upload_root: Option<PathBuf>,

    /// Directory for the JSON store
    #[arg(long, global = true, env = "STUDY_DATA_ROOT")]
    data_root: Option<PathBuf>,

    /// `json` or a sqlite URL such as `sqlite:study.db`
    #[arg(long, global = true, env = "STUDY_STORE")]
    store: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a session's progression, chapter and cooldown
    Progress { session: SessionId },

    /// Grade a finished assessment
    Submit {
        session: SessionId,

        #[arg(long)]
        level: u8,

        #[arg(long)]
        score: u32,

        #[arg(long)]
        max_score: u32,

        /// JSON file with an array of `{question, user_answer, correct_answer, explanation}`
        #[arg(long)]
        mistakes: Option<PathBuf>,
    },

    /// Generate (or fetch the cached) assessment for the current chapter
    Assessment {
        session: SessionId,

        /// Level 1-3
        #[arg(long, value_parser = parse_level)]
        level: Level,
    },

    /// List mistakes of a session, or of every session with `all`
    Mistakes { scope: MistakeScope },

    /// Attach a note to a recorded mistake
    Comment {
        session: SessionId,

        #[arg(long)]
        question: String,

        #[arg(long)]
        comment: String,
    },

    /// Spend XP
    Spend { session: SessionId, amount: u32 },

    /// List a session's chapters in order
    Chapters { session: SessionId },

    /// Every chapter with its generated quests
    Preview { session: SessionId },

    /// Class-wide summary across sessions
    Analytics,
}

#[derive(Serialize)]
struct ChapterLine {
    index: usize,
    name: String,
    created_at: String,
    deadline: String,
}

fn parse_level(raw: &str) -> Result<Level, String> {
    raw.parse::<u8>()
        .map_err(|e| e.to_string())
        .and_then(|n| Level::from_u8(n).map_err(|e| e.to_string()))
}

fn normalize_sqlite_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed == "sqlite::memory:" || trimmed.starts_with("sqlite://") {
        return trimmed.to_string();
    }

    let path_str = trimmed.strip_prefix("sqlite:").unwrap_or(trimmed);
    let path = std::path::Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }
    Ok(())
}

fn config_from(cli: &Cli) -> Result<StudyConfig, ArgsError> {
    let mut config = StudyConfig::from_env();
    if let Some(root) = &cli.upload_root {
        config.upload_root.clone_from(root);
    }
    if let Some(root) = &cli.data_root {
        config.data_root.clone_from(root);
    }
    if let Some(raw) = &cli.store {
        config.store = StoreBackend::parse(raw).ok_or_else(|| ArgsError::InvalidStore {
            raw: raw.clone(),
        })?;
    }
    if let StoreBackend::Sqlite(url) = &config.store {
        config.store = StoreBackend::Sqlite(normalize_sqlite_url(url));
    }
    Ok(config)
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn read_mistakes(path: &std::path::Path) -> Result<Vec<MistakeInput>, Box<dyn std::error::Error>> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = config_from(&cli)?;
    if let StoreBackend::Sqlite(url) = &config.store {
        prepare_sqlite_file(url)?;
    }
    debug!("config: {config:?}");

    let app = AppServices::from_config(&config, Clock::default()).await?;

    match cli.command {
        Commands::Progress { session } => {
            print_json(&app.progression().get_progress(&session).await?)
        }
        Commands::Submit {
            session,
            level,
            score,
            max_score,
            mistakes,
        } => {
            let mistakes = match mistakes {
                Some(path) => read_mistakes(&path)?,
                None => Vec::new(),
            };
            let submission = Submission::new(level, score, max_score).with_mistakes(mistakes);
            let result = app
                .progression()
                .submit_assessment_result(&session, submission)
                .await?;
            print_json(&result)
        }
        Commands::Assessment { session, level } => {
            print_json(&app.assessments().generate_assessment(&session, level).await?)
        }
        Commands::Mistakes { scope } => print_json(&app.mistakes().get_mistakes(scope).await?),
        Commands::Comment {
            session,
            question,
            comment,
        } => {
            let updated = app
                .mistakes()
                .update_mistake_comment(&session, &question, &comment)
                .await?;
            print_json(&serde_json::json!({ "success": updated }))
        }
        Commands::Spend { session, amount } => {
            let spent = app.progression().spend_xp(&session, amount).await?;
            print_json(&serde_json::json!({ "success": spent }))
        }
        Commands::Chapters { session } => {
            let chapters: Vec<ChapterLine> = app
                .catalog()
                .list_chapters(&session)
                .await
                .iter()
                .enumerate()
                .map(|(index, chapter)| ChapterLine {
                    index,
                    name: chapter.name().to_string(),
                    created_at: chapter.created_at().to_rfc3339(),
                    deadline: chapter.deadline().format("%Y-%m-%d").to_string(),
                })
                .collect();
            print_json(&chapters)
        }
        Commands::Preview { session } => {
            print_json(&app.assessments().preview_all(&session).await?)
        }
        Commands::Analytics => print_json(&app.analytics().class_overview().await?),
    }
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        println!("{}", serde_json::json!({ "error": err.to_string() }));
        std::process::exit(2);
    }
}
