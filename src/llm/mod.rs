pub mod client;
pub mod cost_monitor;

pub use client::{LLMClient, LanguageModel, RetryPolicy};
pub use cost_monitor::CostMonitor;
