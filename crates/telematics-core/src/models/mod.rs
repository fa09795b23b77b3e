//! Normalized models handed to callers

mod status;
mod vehicle;

pub use status::*;
pub use vehicle::*;
