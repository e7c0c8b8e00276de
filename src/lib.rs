pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliArgs;

pub use adapters::GeminiClient;
pub use app::{route, HttpEvent, HttpResponse};
pub use config::RelayConfig;
pub use crate::core::relay::QueryRelay;
pub use domain::model::{EvidenceLevel, FallbackReason, GenerateRequest, GenerateResponse, Verdict};
pub use domain::ports::TextGenerator;
pub use utils::error::{RelayError, Result};
