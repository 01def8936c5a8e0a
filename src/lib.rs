pub mod ai;
pub mod ai_worker;
pub mod app;
pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod logger;
pub mod models;
pub mod notes;
pub mod quiz;
pub mod results;
pub mod setup;
pub mod stats;
pub mod ui;
pub mod utils;


pub use app::App;
pub use config::AppConfig;
pub use error::{GenerationError, SessionError, StorageError};
pub use models::{AppState, ConfidenceLevel, DifficultyLevel, Question, QuizSession};
