pub mod config_store;
pub mod defaults;
pub mod files;
pub mod llm;
pub mod resume;
pub mod runtime_engine;
pub mod secrets;
pub mod transcript_store;
