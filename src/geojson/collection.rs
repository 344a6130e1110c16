use serde::Serialize;
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use super::feature::{Feature, FeatureKey};
use crate::error::Error;

/// A GeoJSON feature collection that keeps one copy of each distinct feature,
/// in the order they were first pushed.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(tag = "type")]
pub struct FeatureCollection {
    features: Vec<Feature>,
    #[serde(skip)]
    seen: HashSet<FeatureKey>,
}

impl FeatureCollection {
    pub fn new() -> FeatureCollection {
        FeatureCollection::default()
    }

    /// Appends `feature` unless an equal one is already present.
    /// Returns whether it was appended.
    pub fn push(&mut self, feature: Feature) -> bool {
        if self.seen.insert(feature.key()) {
            self.features.push(feature);
            true
        } else {
            false
        }
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn to_json(&self, pretty: bool) -> Result<Vec<u8>, serde_json::Error> {
        if pretty {
            serde_json::to_vec_pretty(self)
        } else {
            serde_json::to_vec(self)
        }
    }

    /// Serializes the collection and writes it to `path`, creating the parent
    /// directory and truncating any previous file.
    pub fn write(&self, path: &Path, pretty: bool) -> Result<(), Error> {
        let display = format!("{}", path.display());
        let json = self.to_json(pretty).map_err(|source| Error::Serialize {
            path: display.clone(),
            source,
        })?;

        let write_err = |source: std::io::Error| Error::Write {
            path: display.clone(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        let mut writer = BufWriter::new(File::create(path).map_err(write_err)?);
        writer.write_all(&json).map_err(write_err)?;
        writer.flush().map_err(write_err)?;
        Ok(())
    }
}
