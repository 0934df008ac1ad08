pub mod admin_client;
pub mod error;
pub mod http;
pub mod moderator_client;

pub use admin_client::{AdminApi, AdminClient};
pub use error::ClientError;
pub use http::BackendHttp;
pub use moderator_client::{ModeratorApi, ModeratorClient};
