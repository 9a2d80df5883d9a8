// Public modules
pub mod case;
pub mod constants;
pub mod error;
pub mod version;

// Internal modules - not part of public API
pub(crate) mod git;

// Re-export common types for convenience
pub use error::{Error, Result};
