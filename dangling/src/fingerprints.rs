use std::{fs, path::Path};

use serde::Deserialize;

use crate::Error;

/// A provider together with the text its "unclaimed resource" page contains.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Fingerprint {
    pub provider: String,
    pub marker: String,
}

const BUILTIN_FINGERPRINTS: &[(&str, &str)] = &[
    ("AWS S3", "NoSuchBucket"),
    ("GitHub Pages", "There isn't a GitHub Pages site here."),
    ("Heroku", "No such app"),
    ("Bitbucket", "Repository not found"),
    (
        "GitLab",
        "The page could not be found or you don't have permission to view it.",
    ),
    ("Tumblr", "There's nothing here."),
    ("Shopify", "Sorry, this shop is currently unavailable."),
];

/// Ordered, read-only set of fingerprints. Matching walks the entries in
/// order and the first hit wins.
#[derive(Debug, Clone)]
pub struct Registry {
    entries: Vec<Fingerprint>,
}

impl Registry {
    pub fn builtin() -> Self {
        let entries = BUILTIN_FINGERPRINTS
            .iter()
            .map(|(provider, marker)| Fingerprint {
                provider: provider.to_string(),
                marker: marker.to_string(),
            })
            .collect();

        Registry { entries }
    }

    /// Loads a JSON array of `{"provider": ..., "marker": ...}` objects.
    pub fn from_file(path: &Path) -> Result<Self, Error> {
        let invalid = |reason: String| Error::Fingerprints {
            path: path.to_path_buf(),
            reason,
        };

        let raw = fs::read_to_string(path).map_err(|err| invalid(err.to_string()))?;
        let entries: Vec<Fingerprint> =
            serde_json::from_str(&raw).map_err(|err| invalid(err.to_string()))?;

        Registry::from_entries(entries).map_err(invalid)
    }

    fn from_entries(entries: Vec<Fingerprint>) -> Result<Self, String> {
        if entries.is_empty() {
            return Err("no fingerprints defined".to_string());
        }

        for (index, entry) in entries.iter().enumerate() {
            if entry.provider.trim().is_empty() || entry.marker.is_empty() {
                return Err(format!("entry {} has an empty provider or marker", index));
            }
        }

        Ok(Registry { entries })
    }

    pub fn find_match(&self, body: &str) -> Option<&Fingerprint> {
        self.entries
            .iter()
            .find(|fingerprint| body.contains(fingerprint.marker.as_str()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Fingerprint> {
        self.entries.iter()
    }
}
