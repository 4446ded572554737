use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT payload issued at signup/login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,   // user ID
    pub iat: usize,  // issued at (unix timestamp)
    pub exp: usize,  // expires at (unix timestamp)
    pub iss: String, // issuer
    pub aud: String, // audience
    pub jti: Uuid,   // token ID, unique per issue
}

/// Payload as decoded during verification. `sub` stays loose so a token
/// with a valid signature but no usable identity can be told apart from a
/// malformed one.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct DecodedClaims {
    #[serde(default)]
    pub sub: Option<serde_json::Value>,
}

impl DecodedClaims {
    pub fn user_id(&self) -> Option<Uuid> {
        self.sub
            .as_ref()
            .and_then(|v| v.as_str())
            .and_then(|s| Uuid::parse_str(s).ok())
    }
}
