pub mod idea;
pub mod paper;
pub mod plan;

pub use idea::{Idea, IdeaCache, IdeaLibrary};
pub use paper::{LiteratureReview, Paper};
pub use plan::{ExperimentPlan, ExperimentPlanRecord};
