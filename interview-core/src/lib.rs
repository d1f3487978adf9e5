pub mod assessment;
pub mod config;
pub mod persona;
pub mod plan;
pub mod prompts;
pub mod record;
pub mod repetition;
pub mod report;
pub mod roles;
pub mod text;
pub mod types;
pub mod validator;

// Keep the public surface small and intentional.
pub use assessment::*;
pub use config::*;
pub use persona::*;
pub use plan::*;
pub use prompts::*;
pub use record::*;
pub use repetition::*;
pub use report::*;
pub use roles::*;
pub use text::*;
pub use types::*;
pub use validator::*;
