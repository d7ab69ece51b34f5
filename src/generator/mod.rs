pub mod context;
pub mod generation;
pub mod idea;
pub mod parser;
pub mod plan;
pub mod prompt;
pub mod sampler;
pub mod workflow;
