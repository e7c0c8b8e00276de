pub mod extract;
pub mod prompt;
pub mod relay;
pub mod sanitize;

pub use crate::domain::model::{GenerateRequest, GenerateResponse, Verdict};
pub use crate::domain::ports::TextGenerator;
pub use crate::utils::error::Result;
