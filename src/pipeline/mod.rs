pub mod budget;
pub mod normalize;
pub mod orchestrator;
pub mod stages;
