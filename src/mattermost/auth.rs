//! Helpers around Mattermost's use of Bearer Authentication with personal
//! access tokens.

use serde::Deserialize;
use std::fmt;

/// A newtype wrapper around Mattermost access tokens.
#[derive(PartialEq, Eq, Clone, Default, Deserialize)]
pub struct AccessToken(pub String);

// Tokens end up in `Options`, which gets logged at debug level.
impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            write!(f, "AccessToken(<unset>)")
        } else {
            write!(f, "AccessToken(<redacted>)")
        }
    }
}

/// Convert an access token to a `Bearer` `Authorization` header value.
///
/// ```
/// let token = AccessToken("2bff151e935e4017a5222076c6f77311".into());
/// assert_eq!(to_auth_header_val(&token), "Bearer 2bff151e935e4017a5222076c6f77311");
/// ```
pub fn to_auth_header_val(t: &AccessToken) -> String {
    format!("Bearer {}", t.0)
}
