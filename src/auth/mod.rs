pub mod extractors;
pub mod password;
pub mod tokens;

pub use extractors::{AdminUser, CurrentUser, ProviderUser};
pub use tokens::JwtKeys;
