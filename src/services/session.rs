//! Admin session codec
//!
//! Issues and verifies the compact signed credential that proves the
//! bearer is the single administrative identity. Tokens are HS256
//! (HMAC-SHA256) signed, base64url encoded, and time-bounded:
//! `header.claims.signature`.
//!
//! There is no server-side revocation list: logout only clears the
//! client cookie, so an issued token stays verifiable until its embedded
//! expiry elapses. Verification failures of every kind (malformed token,
//! bad signature, expiry, wrong role, missing email) collapse to `None`;
//! callers only learn success or failure.

use data_encoding::BASE64URL_NOPAD;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Name of the admin session cookie.
pub const SESSION_COOKIE: &str = "studysprint_admin";

/// Session lifetime when the admin checks "remember me": 7 days.
pub const REMEMBERED_SESSION_SECS: i64 = 7 * 24 * 60 * 60;

/// Session lifetime without "remember me": 8 hours.
pub const SHORT_SESSION_SECS: i64 = 8 * 60 * 60;

/// A verified admin session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminSession {
    /// Admin email the token was issued to
    pub email: String,
    /// Always "admin"
    pub role: String,
}

#[derive(Serialize)]
struct Header {
    alg: &'static str,
    typ: &'static str,
}

#[derive(Serialize, Deserialize)]
struct Claims {
    sub: String,
    role: String,
    iat: i64,
    exp: i64,
}

fn sign(secret: &str, signing_input: &str) -> Vec<u8> {
    // Hmac::new_from_slice accepts keys of any length
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key size");
    mac.update(signing_input.as_bytes());
    mac.finalize().into_bytes().to_vec()
}

/// Create a signed session token for the given admin email.
///
/// The expiry is `now + max_age_secs`.
pub fn create_session(email: &str, max_age_secs: i64, secret: &str) -> String {
    let now = chrono::Utc::now().timestamp();
    let header = Header {
        alg: "HS256",
        typ: "JWT",
    };
    let claims = Claims {
        sub: email.to_string(),
        role: "admin".to_string(),
        iat: now,
        exp: now + max_age_secs,
    };

    let header_b64 =
        BASE64URL_NOPAD.encode(serde_json::to_vec(&header).expect("header serializes").as_slice());
    let claims_b64 =
        BASE64URL_NOPAD.encode(serde_json::to_vec(&claims).expect("claims serialize").as_slice());
    let signing_input = format!("{}.{}", header_b64, claims_b64);
    let signature = BASE64URL_NOPAD.encode(&sign(secret, &signing_input));

    format!("{}.{}", signing_input, signature)
}

/// Verify a session token. Returns the session on success, `None` on any
/// failure. The signature check runs in constant time.
pub fn verify_session(token: &str, secret: &str) -> Option<AdminSession> {
    let mut parts = token.split('.');
    let header_b64 = parts.next()?;
    let claims_b64 = parts.next()?;
    let signature_b64 = parts.next()?;
    if parts.next().is_some() {
        return None;
    }

    let signing_input = format!("{}.{}", header_b64, claims_b64);
    let signature = BASE64URL_NOPAD.decode(signature_b64.as_bytes()).ok()?;

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(signing_input.as_bytes());
    mac.verify_slice(&signature).ok()?;

    let claims: Claims =
        serde_json::from_slice(&BASE64URL_NOPAD.decode(claims_b64.as_bytes()).ok()?).ok()?;

    if claims.exp <= chrono::Utc::now().timestamp() {
        return None;
    }
    if claims.role != "admin" || claims.sub.is_empty() {
        return None;
    }

    Some(AdminSession {
        email: claims.sub,
        role: claims.role,
    })
}
