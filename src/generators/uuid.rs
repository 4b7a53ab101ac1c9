use std::str::FromStr;

use rand::RngCore;
use serde::{Deserialize, Serialize};
use strum_macros::Display;
use ::uuid::Uuid;

use crate::constants::uuid::MAX_COUNT;
use crate::error::{invalid, Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UuidVersion {
    /// Time based with a random node id
    #[strum(serialize = "v1")]
    V1,
    /// Random
    #[strum(serialize = "v4")]
    V4,
    /// SHA-1 over a namespace and a name
    #[strum(serialize = "v5")]
    V5,
}

impl FromStr for UuidVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().trim_start_matches('v') {
            "1" => Ok(UuidVersion::V1),
            "4" => Ok(UuidVersion::V4),
            "5" => Ok(UuidVersion::V5),
            _ => Err(invalid(format!("unsupported UUID version \"{}\"", s))),
        }
    }
}

/// Rendering options for generated identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UuidFormat {
    pub hyphens: bool,
    pub uppercase: bool,
}

impl Default for UuidFormat {
    fn default() -> Self {
        Self {
            hyphens: true,
            uppercase: false,
        }
    }
}

impl UuidFormat {
    pub fn render(&self, uuid: &Uuid) -> String {
        let text = if self.hyphens {
            uuid.hyphenated().to_string()
        } else {
            uuid.simple().to_string()
        };
        if self.uppercase {
            text.to_uppercase()
        } else {
            text
        }
    }
}

/// Resolves a namespace given either as a UUID or as one of the well known
/// aliases `dns`, `url`, `oid` and `x500`
pub fn parse_namespace(namespace: &str) -> Result<Uuid> {
    match namespace.trim().to_lowercase().as_str() {
        "dns" => Ok(Uuid::NAMESPACE_DNS),
        "url" => Ok(Uuid::NAMESPACE_URL),
        "oid" => Ok(Uuid::NAMESPACE_OID),
        "x500" => Ok(Uuid::NAMESPACE_X500),
        other => Uuid::parse_str(other)
            .map_err(|e| invalid(format!("invalid namespace \"{}\": {}", namespace, e))),
    }
}

/// Generates a single UUID
///
/// # Arguments
/// * `version` - The UUID version
/// * `namespace` - Required for v5, a UUID or a well known alias
/// * `name` - Required for v5
///
/// # Errors
/// * `MissingNamespace` - v5 without a namespace or name
/// * `ValidationError` - the namespace cannot be parsed
///
/// # Examples
///
/// ```
/// use toolshed::generators::uuid::{generate_uuid, UuidVersion};
///
/// let id = generate_uuid(UuidVersion::V5, Some("dns"), Some("python.org")).unwrap();
/// assert_eq!(id.to_string(), "886313e1-3b8a-5372-9b90-0c9aee199e5d");
/// ```
pub fn generate_uuid(version: UuidVersion, namespace: Option<&str>, name: Option<&str>) -> Result<Uuid> {
    match version {
        UuidVersion::V4 => Ok(Uuid::new_v4()),
        UuidVersion::V1 => {
            let mut node_id = [0u8; 6];
            rand::thread_rng().fill_bytes(&mut node_id);
            // multicast bit marks the node id as random rather than a MAC address
            node_id[0] |= 0x01;
            Ok(Uuid::now_v1(&node_id))
        }
        UuidVersion::V5 => {
            let namespace = namespace.filter(|n| !n.trim().is_empty());
            let name = name.filter(|n| !n.is_empty());
            match (namespace, name) {
                (Some(namespace), Some(name)) => {
                    let namespace = parse_namespace(namespace)?;
                    Ok(Uuid::new_v5(&namespace, name.as_bytes()))
                }
                _ => Err(Error::MissingNamespace),
            }
        }
    }
}

/// Generates `count` identifiers (clamped to 1..=100) rendered with `format`.
///
/// A v5 batch always yields the same identifier since its inputs do not change.
pub fn generate_batch(
    version: UuidVersion,
    count: usize,
    namespace: Option<&str>,
    name: Option<&str>,
    format: UuidFormat,
) -> Result<Vec<String>> {
    let count = num::clamp(count, 1, MAX_COUNT);
    (0..count)
        .map(|_| generate_uuid(version, namespace, name).map(|uuid| format.render(&uuid)))
        .collect()
}
