//! Protocol constants shared by the post, OAuth, and flow layers.

/// Post type URI for app registrations.
pub const POST_TYPE_APP: &str = "https://tent.io/types/app/v0#";
/// Post type URI for the server's record of what an app was granted.
pub const POST_TYPE_APP_AUTH: &str = "https://tent.io/types/app-auth/v0#";
/// Post type URI for Hawk credentials.
pub const POST_TYPE_CREDENTIALS: &str = "https://tent.io/types/credentials/v0#";

/// Token type requested from (and echoed by) the OAuth token endpoint.
///
/// Compliant servers reject exchanges whose `token_type` differs from this value.
pub const TOKEN_TYPE_HAWK: &str = "https://tent.io/oauth/hawk-token";

/// Media type used for both the token request body and the expected response.
pub const JSON_MEDIA_TYPE: &str = "application/json";

/// Length of the random `state` value attached to authorization redirects.
pub const AUTHORIZATION_STATE_LEN: usize = 32;
