//! OAuth device-code login, credential storage and bearer-token resolution.

pub mod clock;
pub mod credential;
pub mod device_code;
pub mod error;
pub mod resolver;
pub mod store;

pub use clock::{PollClock, SystemClock};
pub use credential::Credential;
pub use device_code::{DeviceAuthorization, DeviceFlow, GrantError};
pub use error::AuthError;
pub use resolver::TokenResolver;
pub use store::{FileTokenStore, TokenStore, TokenStoreConfig};
