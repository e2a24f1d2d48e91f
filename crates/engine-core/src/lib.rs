pub mod error;
pub mod event_bus;
pub mod execution;
pub mod metrics;
pub mod query;
pub mod reader;
pub mod store;
pub mod validation;
