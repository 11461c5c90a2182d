//! Catalog storage
//!
//! Three independent stores share no locks: laptop records, uploaded image
//! blobs, and per-laptop rating aggregates. Each is a trait so the service
//! can be wired against other backends.

pub mod error;
pub mod image_store;
pub mod laptop_store;
pub mod rating_store;

pub use error::{Result, StoreError};
pub use image_store::{is_valid_image_type, DiskImageStore, ImageStore, StoredImage};
pub use laptop_store::{is_qualified, to_bits, InMemoryLaptopStore, LaptopStore};
pub use rating_store::{InMemoryRatingStore, Rating, RatingStore};
