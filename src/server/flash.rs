//! One-shot notices carried across redirects in a signed cookie.
//!
//! The cookie value is `urlencode("kind:message") + "." + hex(mac)`, where the
//! MAC is a keyed BLAKE3 hash under a key derived from the secret.

use axum::http::{header, HeaderMap};

/// Name of the flash cookie.
pub const FLASH_COOKIE: &str = "flash";

/// `Set-Cookie` value that deletes the flash cookie.
pub const CLEAR_FLASH_COOKIE: &str = "flash=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax";

const KEY_CONTEXT: &str = "page-analyzer flash cookie v1";

/// Notice severity; selects the banner style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashKind {
    Success,
    Info,
    Error,
}

impl FlashKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Info => "info",
            Self::Error => "error",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "success" => Some(Self::Success),
            "info" => Some(Self::Info),
            "error" => Some(Self::Error),
            _ => None,
        }
    }
}

/// A notice to show on the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

impl Flash {
    pub fn new(kind: FlashKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(FlashKind::Success, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(FlashKind::Info, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(FlashKind::Error, message)
    }
}

/// Signs and verifies flash cookies.
#[derive(Clone)]
pub struct FlashKey {
    key: [u8; 32],
}

impl FlashKey {
    pub fn from_secret(secret: &str) -> Self {
        Self {
            key: blake3::derive_key(KEY_CONTEXT, secret.as_bytes()),
        }
    }

    fn mac(&self, payload: &str) -> blake3::Hash {
        blake3::keyed_hash(&self.key, payload.as_bytes())
    }

    /// Serialize and sign a notice as a cookie value.
    pub fn encode(&self, flash: &Flash) -> String {
        let payload =
            urlencoding::encode(&format!("{}:{}", flash.kind.as_str(), flash.message)).into_owned();
        let mac = self.mac(&payload);
        format!("{}.{}", payload, mac.to_hex())
    }

    /// Verify and parse a cookie value. Tampered or malformed input yields `None`.
    pub fn decode(&self, value: &str) -> Option<Flash> {
        let (payload, mac) = value.rsplit_once('.')?;
        let mac = blake3::Hash::from_hex(mac).ok()?;
        // Hash equality is constant-time.
        if self.mac(payload) != mac {
            return None;
        }

        let decoded = urlencoding::decode(payload).ok()?;
        let (kind, message) = decoded.split_once(':')?;
        Some(Flash::new(FlashKind::parse(kind)?, message))
    }

    /// `Set-Cookie` header value carrying `flash`.
    pub fn set_cookie(&self, flash: &Flash) -> String {
        format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax",
            FLASH_COOKIE,
            self.encode(flash)
        )
    }

    /// Read the notice from request headers, if a valid one is present.
    pub fn read(&self, headers: &HeaderMap) -> Option<Flash> {
        cookie_value(headers, FLASH_COOKIE).and_then(|value| self.decode(value))
    }
}

/// Find a cookie by name across all `Cookie` headers.
pub fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}
