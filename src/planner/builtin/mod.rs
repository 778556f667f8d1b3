//! Catalogs shipped with the planner

mod commerce;
mod directory;
mod interaction;

pub use commerce::commerce;
pub use directory::directory;
pub use interaction::interaction;
