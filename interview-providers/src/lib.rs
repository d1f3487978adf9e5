pub mod error;
pub mod openai_compatible;
pub mod parse;
pub mod request;
pub mod runtime;

pub use error::HttpStatusError;
