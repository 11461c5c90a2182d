//! Streaming call bodies
//!
//! Kept apart from the tonic service so they run over any message stream,
//! which is how the unit tests drive them.

pub mod rating;
pub mod upload;

pub use rating::rate_laptops;
pub use upload::receive_image;
