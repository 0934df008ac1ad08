//! console-core: Shared infrastructure for the moderation console.
pub mod error;
pub mod middleware;
pub mod observability;

pub use error::ConsoleError;
