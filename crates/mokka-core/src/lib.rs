pub mod constants;
pub mod error;
pub mod types;
pub mod validate;

pub use error::{Error, Result};
pub use types::*;
pub use validate::{is_percent_value, validate_percent};

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
