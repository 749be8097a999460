//! One-shot status messages carried across the post/redirect/get cycle.
//!
//! A [`Flash`] is serialized to JSON, base64url encoded and signed with
//! HMAC-SHA256 under the configured secret. The list page reads it back,
//! shows it once, and clears the cookie.

use axum::http::{header, HeaderMap, HeaderValue};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

pub const COOKIE_NAME: &str = "flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Error,
}

impl FlashLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlashLevel::Success => "success",
            FlashLevel::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Error,
            message: message.into(),
        }
    }
}

/// Signs and verifies flash cookies.
#[derive(Clone)]
pub struct FlashSigner {
    secret: Vec<u8>,
}

impl std::fmt::Debug for FlashSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlashSigner").finish_non_exhaustive()
    }
}

impl FlashSigner {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self {
            secret: secret.as_ref().to_vec(),
        }
    }

    fn mac(&self) -> HmacSha256 {
        HmacSha256::new_from_slice(&self.secret).expect("HMAC can take key of any size")
    }

    /// Encode a flash as `<payload>.<signature>`.
    pub fn sign(&self, flash: &Flash) -> String {
        // Serializing a struct of a unit enum and a string cannot fail
        let json = serde_json::to_vec(flash).unwrap_or_default();
        let payload = URL_SAFE_NO_PAD.encode(json);

        let mut mac = self.mac();
        mac.update(payload.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        format!("{}.{}", payload, signature)
    }

    /// Decode a cookie value, returning `None` if it is malformed or was not
    /// signed with this secret.
    pub fn verify(&self, value: &str) -> Option<Flash> {
        let (payload, signature) = value.split_once('.')?;
        let signature = URL_SAFE_NO_PAD.decode(signature).ok()?;

        let mut mac = self.mac();
        mac.update(payload.as_bytes());
        if mac.verify_slice(&signature).is_err() {
            tracing::warn!("Ignoring flash cookie with bad signature");
            return None;
        }

        let json = URL_SAFE_NO_PAD.decode(payload).ok()?;
        serde_json::from_slice(&json).ok()
    }

    /// `Set-Cookie` value carrying `flash`.
    pub fn set_cookie(&self, flash: &Flash) -> HeaderValue {
        let cookie = format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax",
            COOKIE_NAME,
            self.sign(flash)
        );
        // base64url and the fixed attributes are all visible ASCII
        HeaderValue::from_str(&cookie).unwrap_or_else(|_| clear_cookie())
    }

    /// Read and verify the flash cookie from request headers, if present.
    pub fn read_cookie(&self, headers: &HeaderMap) -> Option<Flash> {
        cookie_value(headers, COOKIE_NAME)
            .filter(|v| !v.is_empty())
            .and_then(|v| self.verify(v))
    }
}

/// Whether the request carries a non-empty flash cookie, valid or not.
pub fn cookie_present(headers: &HeaderMap) -> bool {
    cookie_value(headers, COOKIE_NAME).is_some_and(|v| !v.is_empty())
}

/// `Set-Cookie` value that removes the flash cookie.
pub fn clear_cookie() -> HeaderValue {
    HeaderValue::from_static("flash=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax")
}

fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .flat_map(|h| h.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_flash_round_trips() {
        let signer = FlashSigner::new("dev-secret");
        let flash = Flash::error("Title and note body are required.");

        let value = signer.sign(&flash);
        assert_eq!(signer.verify(&value), Some(flash));
    }

    #[test]
    fn rejects_value_signed_with_other_secret() {
        let value = FlashSigner::new("one").sign(&Flash::success("Note added!"));
        assert!(FlashSigner::new("two").verify(&value).is_none());
    }

    #[test]
    fn rejects_tampered_payload() {
        let signer = FlashSigner::new("dev-secret");
        let value = signer.sign(&Flash::success("Note added!"));
        let (_, signature) = value.split_once('.').unwrap();

        let forged = URL_SAFE_NO_PAD.encode(br#"{"level":"success","message":"pwned"}"#);
        assert!(signer.verify(&format!("{}.{}", forged, signature)).is_none());
        assert!(signer.verify("no-dot-here").is_none());
    }

    #[test]
    fn reads_flash_among_other_cookies() {
        let signer = FlashSigner::new("dev-secret");
        let value = signer.sign(&Flash::success("Note deleted."));

        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("theme=dark; flash={}; lang=en", value)).unwrap(),
        );

        let flash = signer.read_cookie(&headers).unwrap();
        assert_eq!(flash.level, FlashLevel::Success);
        assert_eq!(flash.message, "Note deleted.");
    }

    #[test]
    fn empty_cookie_means_no_flash() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("flash="));
        assert!(FlashSigner::new("dev-secret").read_cookie(&headers).is_none());
        assert!(!cookie_present(&headers));
    }

    #[test]
    fn unverifiable_cookie_is_still_present() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("flash=garbage"));

        assert!(FlashSigner::new("dev-secret").read_cookie(&headers).is_none());
        assert!(cookie_present(&headers));
    }
}
