pub mod catalog;
pub mod completeness;
pub mod core;
pub mod events;
pub mod records;
