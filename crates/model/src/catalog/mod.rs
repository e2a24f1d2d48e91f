pub mod attribute;
pub mod channel;
pub mod family;
pub mod product;
pub mod record;
