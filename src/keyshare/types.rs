//! KeyShare record and key format tags
//!
//! Protobuf-encoded structures returned by `GET /keys`. Tags are stable:
//! clients decode responses against this exact layout.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use zeroize::Zeroize;

/// Encoding of a shared public key
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum PublicKeyFormat {
    UnknownPublicKeyFormat = 0,
    /// PKCS #1 RSAPublicKey
    Pkcs1Public = 1,
    /// X.509 SubjectPublicKeyInfo
    Pkix = 2,
}

/// Encoding of a shared private key
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum PrivateKeyFormat {
    UnknownPrivateKeyFormat = 0,
    /// PKCS #1 RSAPrivateKey
    Pkcs1Private = 1,
    /// PKCS #8 PrivateKeyInfo
    Pkcs8 = 2,
}

/// A format name that does not match any known tag
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown key format {0:?}")]
pub struct UnknownFormat(pub String);

impl PublicKeyFormat {
    /// Wire name of the tag, as accepted by `POST /keys`
    pub fn as_str_name(&self) -> &'static str {
        match self {
            Self::UnknownPublicKeyFormat => "UNKNOWN_PUBLIC_KEY_FORMAT",
            Self::Pkcs1Public => "PKCS1_PUBLIC",
            Self::Pkix => "PKIX",
        }
    }
}

impl FromStr for PublicKeyFormat {
    type Err = UnknownFormat;

    /// The unknown tag is never accepted by name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PKCS1_PUBLIC" => Ok(Self::Pkcs1Public),
            "PKIX" => Ok(Self::Pkix),
            other => Err(UnknownFormat(other.to_string())),
        }
    }
}

impl fmt::Display for PublicKeyFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str_name())
    }
}

impl PrivateKeyFormat {
    pub fn as_str_name(&self) -> &'static str {
        match self {
            Self::UnknownPrivateKeyFormat => "UNKNOWN_PRIVATE_KEY_FORMAT",
            Self::Pkcs1Private => "PKCS1_PRIVATE",
            Self::Pkcs8 => "PKCS8",
        }
    }
}

impl FromStr for PrivateKeyFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PKCS1_PRIVATE" => Ok(Self::Pkcs1Private),
            "PKCS8" => Ok(Self::Pkcs8),
            other => Err(UnknownFormat(other.to_string())),
        }
    }
}

impl fmt::Display for PrivateKeyFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str_name())
    }
}

/// A named bundle of key material
///
/// Key bytes and password are opaque to the service. Format tags are kept
/// as raw `i32` on the wire; use the generated `public_format()` and
/// `private_format()` accessors for the typed values.
#[derive(Clone, PartialEq, prost::Message)]
pub struct KeyShare {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(bytes = "vec", tag = "2")]
    pub public_key: Vec<u8>,
    #[prost(enumeration = "PublicKeyFormat", tag = "3")]
    pub public_format: i32,
    #[prost(bytes = "vec", tag = "4")]
    pub private_key: Vec<u8>,
    #[prost(enumeration = "PrivateKeyFormat", tag = "5")]
    pub private_format: i32,
    #[prost(bytes = "vec", tag = "6")]
    pub password: Vec<u8>,
}

impl KeyShare {
    pub fn new(
        name: impl Into<String>,
        public_key: Vec<u8>,
        public_format: PublicKeyFormat,
        private_key: Vec<u8>,
        private_format: PrivateKeyFormat,
        password: Vec<u8>,
    ) -> Self {
        Self {
            name: name.into(),
            public_key,
            public_format: public_format.into(),
            private_key,
            private_format: private_format.into(),
            password,
        }
    }
}

impl Zeroize for KeyShare {
    fn zeroize(&mut self) {
        self.public_key.zeroize();
        self.private_key.zeroize();
        self.password.zeroize();
    }
}
