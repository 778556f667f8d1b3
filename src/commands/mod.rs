pub mod catalog;
pub mod draft;
pub mod estimate;
pub mod plan;
pub mod quote;
pub mod render;
pub mod services;
pub mod settings;
