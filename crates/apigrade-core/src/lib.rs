pub mod analyzer;
pub mod config;
pub mod error;
pub mod scanner;
pub mod scoring;
pub mod types;

pub use analyzer::SignalExtractor;
pub use config::Config;
pub use error::GradeError;
pub use scanner::Scanner;
pub use scoring::Scorer;
pub use types::*;
