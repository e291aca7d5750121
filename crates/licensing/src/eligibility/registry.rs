use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::{Arc, RwLock};

use super::domain::{ActiveLicense, PersonId};
use super::resolver::{LicenseRegistry, RegistryError};

/// Error raised while loading a registry snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("failed to read registry snapshot: {0}")]
    Io(#[from] std::io::Error),
    #[error("registry snapshot is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Registry backed by a map of person id to records.
///
/// Snapshots are JSON objects keyed by person id, each holding an array of license records.
#[derive(Debug, Default, Clone)]
pub struct InMemoryLicenseRegistry {
    records: Arc<RwLock<HashMap<PersonId, Vec<ActiveLicense>>>>,
}

impl InMemoryLicenseRegistry {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, SnapshotError> {
        let raw: HashMap<String, Vec<ActiveLicense>> = serde_json::from_reader(reader)?;
        let records = raw
            .into_iter()
            .map(|(person, licenses)| (PersonId(person), licenses))
            .collect();
        Ok(Self {
            records: Arc::new(RwLock::new(records)),
        })
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, SnapshotError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn insert(&self, person: PersonId, license: ActiveLicense) {
        let mut guard = self.records.write().expect("registry lock poisoned");
        guard.entry(person).or_default().push(license);
    }

    pub fn people(&self) -> usize {
        self.records.read().expect("registry lock poisoned").len()
    }
}

impl LicenseRegistry for InMemoryLicenseRegistry {
    async fn licenses_for(&self, person: &PersonId) -> Result<Vec<ActiveLicense>, RegistryError> {
        let guard = self
            .records
            .read()
            .map_err(|_| RegistryError::Unavailable("registry lock poisoned".to_string()))?;
        Ok(guard.get(person).cloned().unwrap_or_default())
    }
}
