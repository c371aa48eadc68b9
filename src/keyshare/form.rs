//! Form submissions for `POST /keys`
//!
//! Binary fields arrive as URL-safe base64 without padding. Format fields
//! carry the tag names of [`PublicKeyFormat`] and [`PrivateKeyFormat`].

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::Deserialize;

use super::types::{KeyShare, PrivateKeyFormat, PublicKeyFormat, UnknownFormat};
use crate::types::{KeyShareError, Result};

/// Raw URL-encoded form fields
#[derive(Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyShareForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub public_key: String,
    #[serde(default)]
    pub public_key_format: String,
    #[serde(default)]
    pub private_key: String,
    #[serde(default)]
    pub private_key_format: String,
    #[serde(default)]
    pub password: String,
}

impl KeyShareForm {
    /// Parse an `application/x-www-form-urlencoded` body
    pub fn from_body(body: &[u8]) -> Result<Self> {
        serde_urlencoded::from_bytes(body).map_err(|e| KeyShareError::malformed("body", e.to_string()))
    }

    /// Validate and decode the submission into a share.
    ///
    /// A format is required whenever its key is non-empty. A format given
    /// for an empty key is still validated.
    pub fn into_key_share(self) -> Result<KeyShare> {
        if self.name.is_empty() {
            return Err(KeyShareError::malformed("name", "required"));
        }

        let public_key = decode_field("publicKey", &self.public_key)?;
        let public_format = parse_format::<PublicKeyFormat>(
            "publicKeyFormat",
            &self.public_key_format,
            !public_key.is_empty(),
        )?
        .unwrap_or(PublicKeyFormat::UnknownPublicKeyFormat);

        let private_key = decode_field("privateKey", &self.private_key)?;
        let private_format = parse_format::<PrivateKeyFormat>(
            "privateKeyFormat",
            &self.private_key_format,
            !private_key.is_empty(),
        )?
        .unwrap_or(PrivateKeyFormat::UnknownPrivateKeyFormat);

        let password = decode_field("password", &self.password)?;

        Ok(KeyShare::new(
            self.name,
            public_key,
            public_format,
            private_key,
            private_format,
            password,
        ))
    }
}

fn decode_field(field: &'static str, value: &str) -> Result<Vec<u8>> {
    URL_SAFE_NO_PAD
        .decode(value)
        .map_err(|e| KeyShareError::malformed(field, e.to_string()))
}

fn parse_format<F>(field: &'static str, value: &str, required: bool) -> Result<Option<F>>
where
    F: std::str::FromStr<Err = UnknownFormat>,
{
    if value.is_empty() {
        if required {
            return Err(KeyShareError::malformed(field, "required"));
        }
        return Ok(None);
    }
    value
        .parse()
        .map(Some)
        .map_err(|e: UnknownFormat| KeyShareError::malformed(field, e.to_string()))
}
