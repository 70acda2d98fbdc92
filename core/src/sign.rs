//! Signing of the canonical string.

use crate::credential::Credential;
use crate::hash::base64_encode;
use crate::hash::hex_hmac_sha512;

/// Hex HMAC-SHA512 of the canonical string keyed with the secret key.
pub fn sign_canonical_string(secret_key: &str, canonical: &str) -> String {
    hex_hmac_sha512(secret_key.as_bytes(), canonical.as_bytes())
}

/// Build the `Authorization` header value for the canonical string.
///
/// ```text
/// "Basic " + base64(integration_key + ":" + hex(hmac_sha512(secret_key, canonical)))
/// ```
pub fn authorization_header(cred: &Credential, canonical: &str) -> String {
    let signature = sign_canonical_string(&cred.secret_key, canonical);
    let auth = format!("{}:{signature}", cred.integration_key);

    format!("Basic {}", base64_encode(auth.as_bytes()))
}
