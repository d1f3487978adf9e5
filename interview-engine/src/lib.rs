pub mod client;
pub mod controller;
pub mod error;
pub mod evaluator;
pub mod reasoning;
pub mod selector;
pub mod session;
pub mod traits;

pub use client::{ClientStats, GenerationClient, RetryPolicy};
pub use controller::{InterviewController, TurnKind, TurnOutcome, TurnTag};
pub use error::InterviewError;
pub use evaluator::Evaluator;
pub use session::{Session, SessionStatus};
pub use traits::{OutputMode, TextGenerator};
