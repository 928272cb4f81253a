pub mod errors;
pub mod id;

pub use errors::{ConfigError, OmegaError, StoreError};
pub use id::{new_id, AccountId, ConnectionId};

pub type Result<T> = std::result::Result<T, OmegaError>;
