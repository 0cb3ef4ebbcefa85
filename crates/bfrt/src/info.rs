//! BfRt program metadata parsed from `bf-rt.json`.
//!
//! File format (abridged):
//! ```json
//! {
//!   "schema_version": "1.0.0",
//!   "tables": [
//!     {
//!       "name": "pipe.Ingress.fwd",
//!       "id": 49389765,
//!       "table_type": "MatchAction_Direct",
//!       "action_specs": [ { "name": "Ingress.set_port", "id": 22310000 } ]
//!     }
//!   ],
//!   "learn_filters": [ { "name": "pipe.IngressDeparser.learn", "id": 402184575 } ]
//! }
//! ```

use crate::error::{BfRtError, BfRtResult};
use crate::metadata::{BfRtObject, DriverMetadata};
use crate::types::{BfRtId, BfRtTableType};
use log::debug;
use p4rt_types::ObjectClass;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BfRtActionSpec {
    pub name: String,
    pub id: BfRtId,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BfRtTable {
    pub name: String,
    pub id: BfRtId,
    pub table_type: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub action_specs: Vec<BfRtActionSpec>,
}

impl BfRtTable {
    pub fn table_type(&self) -> BfRtTableType {
        BfRtTableType::from(self.table_type.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BfRtLearnFilter {
    pub name: String,
    pub id: BfRtId,
}

/// Driver metadata of one compiled program.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BfRtInfo {
    #[serde(default)]
    pub schema_version: Option<String>,
    #[serde(default)]
    pub tables: Vec<BfRtTable>,
    #[serde(default)]
    pub learn_filters: Vec<BfRtLearnFilter>,
}

impl BfRtInfo {
    /// Parses the contents of a `bf-rt.json` file.
    pub fn from_json(json: &str) -> BfRtResult<Self> {
        let info: BfRtInfo =
            serde_json::from_str(json).map_err(|e| BfRtError::invalid_metadata(e.to_string()))?;
        debug!(
            "Parsed BfRt info (schema {}): {} tables, {} learn filters",
            info.schema_version.as_deref().unwrap_or("unknown"),
            info.tables.len(),
            info.learn_filters.len()
        );
        Ok(info)
    }

    /// Reads and parses a `bf-rt.json` file.
    pub fn from_file(path: impl AsRef<Path>) -> BfRtResult<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| BfRtError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json(&json)
    }
}

impl DriverMetadata for BfRtInfo {
    fn objects(&self, class: ObjectClass) -> BfRtResult<Vec<BfRtObject>> {
        let objects = match class {
            ObjectClass::Action => {
                // Actions are listed per table; report each distinct
                // (name, id) pair once.
                let mut seen = HashSet::new();
                self.tables
                    .iter()
                    .flat_map(|t| t.action_specs.iter())
                    .filter(|spec| seen.insert((spec.name.as_str(), spec.id)))
                    .map(|spec| BfRtObject::new(spec.id, spec.name.as_str()))
                    .collect()
            }
            ObjectClass::Digest => self
                .learn_filters
                .iter()
                .map(|lf| BfRtObject::new(lf.id, lf.name.as_str()))
                .collect(),
            _ => self
                .tables
                .iter()
                .filter(|t| t.table_type().object_class() == Some(class))
                .map(|t| BfRtObject::new(t.id, t.name.as_str()))
                .collect(),
        };
        Ok(objects)
    }
}
