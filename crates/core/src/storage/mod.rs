mod error;
mod traits;
mod types;

pub use error::{RepositoryError, Result};
pub use traits::{CircleRepository, UserRepository};
pub use types::{CircleIdentifier, UserIdentifier};
