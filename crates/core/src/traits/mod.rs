pub mod device_store;
pub mod queue_publisher;

pub use device_store::*;
pub use queue_publisher::*;
