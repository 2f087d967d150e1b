//! Loading institution profile documents.

use super::schema::InstitutionProfile;
use crate::error::ProfileError;
use serde::de::Error as _;
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::io::{self, Read};
use std::path::Path;
use tracing::info;

/// Reads and parses the profile at `path`.
///
/// A missing file, an unreadable file and malformed JSON are distinct errors.
pub fn load_profile(path: &Path) -> Result<InstitutionProfile, ProfileError> {
    let bytes = fs::read(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            ProfileError::NotFound(path.to_path_buf())
        } else {
            ProfileError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    let profile = parse_profile(&bytes)?;
    info!("Successfully loaded institution data from {}", path.display());
    Ok(profile)
}

/// Parses a profile from any byte stream.
pub fn read_profile<R: Read>(mut reader: R) -> Result<InstitutionProfile, ProfileError> {
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|source| ProfileError::Io {
            path: "<stream>".into(),
            source,
        })?;
    parse_profile(&bytes)
}

/// Parses a profile document. The top level must be a JSON object.
pub fn parse_profile(bytes: &[u8]) -> Result<InstitutionProfile, ProfileError> {
    let value: Value = serde_json::from_slice(bytes)?;
    if !value.is_object() {
        return Err(ProfileError::Parse(serde_json::Error::custom(
            "expected a JSON object at the top level",
        )));
    }
    Ok(InstitutionProfile::deserialize(value)?)
}
