pub mod ai;
pub mod chat_window;
pub mod config;
pub mod controller;
pub mod error;
pub mod input;
pub mod persona;
pub mod reply;
pub mod splash;
pub mod state;

// Re-export main types for convenience
pub use ai::{ChatBackend, WorkerClient};
pub use chat_window::{Bubble, BubbleKind, ChatWindow, TurnId, PLACEHOLDER_TEXT};
pub use config::Config;
pub use controller::{run_turn, PendingTurn, Resolution, SubmissionController};
pub use error::{ChatError, APOLOGY};
pub use input::InputLine;
pub use reply::NO_RESPONSE;
pub use splash::{SplashGate, SplashOutcome, SplashPhase};
pub use state::{ChatMessage, ChatRole, Conversation};
