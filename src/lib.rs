pub mod config;
pub mod contact;
pub mod draft;
pub mod planner;
