use std::fmt::Debug;

pub mod job;

/// A trait for events that can be published on the event bus.
pub trait Event: Send + Sync + Debug + 'static {
    /// Returns a unique identifier for this event type.
    fn event_type(&self) -> &'static str;
}
