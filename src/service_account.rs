use std::{fs::File, io::BufReader, path::Path};

use anyhow::Context;
use serde::Deserialize;

use crate::error::FirebaseError;

/// Service account information contained within the private key JSON file
/// that you can generate under *Project settings > Service accounts* in the
/// Firebase console.
///
/// `Serialize`, `Display`, and `Debug` are intentionally not implemented to
/// avoid accidentally leaking credentials.
#[derive(Deserialize, Clone)]
pub struct ServiceAccount {
    pub project_id: String,
    pub private_key: String,
    pub private_key_id: String,
    pub client_email: String,
    pub client_id: String,
}

impl ServiceAccount {
    /// Loads a `ServiceAccount` from a service account JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, FirebaseError> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to read service account file {}", path.display()))
            .map_err(FirebaseError::ServiceAccount)?;

        serde_json::from_reader(BufReader::new(file))
            .context("Could not extract service account details from file")
            .map_err(FirebaseError::ServiceAccount)
    }

    /// Parses a `ServiceAccount` from the contents of a service account JSON
    /// file.
    pub fn from_json(json: &str) -> Result<Self, FirebaseError> {
        serde_json::from_str(json)
            .context("Could not extract service account details from JSON")
            .map_err(FirebaseError::ServiceAccount)
    }
}
