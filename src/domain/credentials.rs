//! HTTP Basic credentials: header parsing and the `/metrics` check.
//!
//! The check is plain string equality on both fields, so it is not
//! constant-time. An endpoint whose expected username or password is
//! unset rejects every request.

use base64::Engine;

use crate::config::CredentialConfig;

/// Username/password pair supplied by a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    /// Supplied username (may be empty).
    pub name: String,
    /// Supplied password (may be empty).
    pub pass: String,
}

impl BasicCredentials {
    /// Parse an `Authorization` header value of the form
    /// `Basic <base64(name:pass)>`.
    ///
    /// The scheme is matched case-insensitively. Returns `None` for any
    /// other scheme, invalid base64, non-UTF-8 payloads, or payloads
    /// without a `:` separator.
    pub fn from_header(value: &str) -> Option<Self> {
        let (scheme, encoded) = value.trim().split_once(' ')?;
        if !scheme.eq_ignore_ascii_case("basic") {
            return None;
        }

        let decoded = base64::engine::general_purpose::STANDARD
            .decode(encoded.trim())
            .ok()?;
        let decoded = String::from_utf8(decoded).ok()?;
        let (name, pass) = decoded.split_once(':')?;

        Some(Self {
            name: name.to_string(),
            pass: pass.to_string(),
        })
    }

    /// Encode as an `Authorization` header value.
    pub fn to_header(&self) -> String {
        let raw = format!("{}:{}", self.name, self.pass);
        format!(
            "Basic {}",
            base64::engine::general_purpose::STANDARD.encode(raw)
        )
    }
}

/// Expected credentials for the pull endpoint.
#[derive(Debug, Clone, Default)]
pub struct CredentialCheck {
    username: Option<String>,
    password: Option<String>,
}

impl CredentialCheck {
    /// Build a check from configured credentials.
    pub fn new(config: &CredentialConfig) -> Self {
        Self {
            username: config.username.clone(),
            password: config.password.clone(),
        }
    }

    /// Whether both expected fields are configured.
    pub fn is_configured(&self) -> bool {
        self.username.is_some() && self.password.is_some()
    }

    /// Decide whether the supplied credentials grant access.
    pub fn permits(&self, supplied: Option<&BasicCredentials>) -> bool {
        let (Some(creds), Some(user), Some(pass)) =
            (supplied, self.username.as_deref(), self.password.as_deref())
        else {
            return false;
        };

        creds.name == user && creds.pass == pass
    }
}
