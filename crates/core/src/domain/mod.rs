mod circle;
mod error;
mod user;
mod values;

pub use circle::Circle;
pub use error::DomainError;
pub use user::User;
pub use values::{CircleId, CircleName, MailAddress, UserId, UserName, KEY_SEPARATOR};
