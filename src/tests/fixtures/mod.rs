pub mod app;
pub mod planner;
