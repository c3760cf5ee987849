//! Validation of hosted-auth access tokens.
//!
//! Access tokens are HS256-signed JWTs whose `sub` is the user's UUID and
//! whose audience is `authenticated`.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use kittie_core::types::UserId;
use serde::{Deserialize, Serialize};

/// Audience the hosted auth service puts on signed-in user tokens.
pub const AUTHENTICATED_AUDIENCE: &str = "authenticated";

/// Claims carried by a hosted-auth access token. Unknown claims are ignored.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject: the user's UUID.
    pub sub: UserId,
    /// The user's email, when the sign-in method provides one.
    #[serde(default)]
    pub email: Option<String>,
    /// Audience; `authenticated` for signed-in users.
    pub aud: String,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
}

/// Validate and decode an access token, returning the embedded [`Claims`].
///
/// Validates the signature, expiration, and audience.
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::default(); // HS256, validates exp
    validation.set_audience(&[AUTHENTICATED_AUDIENCE]);

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )?;
    Ok(token_data.claims)
}

/// Sign an access token the way the hosted auth service does.
///
/// Used by local tooling and tests; production tokens come from the hosted
/// service.
pub fn issue_token(
    user_id: UserId,
    email: Option<&str>,
    secret: &str,
    ttl_secs: i64,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user_id,
        email: email.map(str::to_string),
        aud: AUTHENTICATED_AUDIENCE.to_string(),
        exp: now + ttl_secs,
        iat: now,
    };

    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}
