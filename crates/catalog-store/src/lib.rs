pub mod memory;
pub mod query;
pub mod reader;
pub mod sled_store;
pub mod transaction;
pub mod versioning;
