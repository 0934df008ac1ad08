pub mod article;
pub mod role;
pub mod user;

pub use article::ModeratorArticle;
pub use role::{UnknownRole, UserRole};
pub use user::{User, UserJson, UserParseError};
