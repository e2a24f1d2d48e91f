pub mod job;
pub mod progress;
pub mod repository;
pub mod step;
