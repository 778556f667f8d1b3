pub mod catalog;
pub mod config;
pub mod draft;
pub mod estimate;
pub mod plan;
pub mod quote;
