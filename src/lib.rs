pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod generator;
pub mod llm;
pub mod logging;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::GenerationError;
pub use generator::context::GeneratorContext;
pub use generator::workflow::{launch_idea_generation, launch_plan_generation};
