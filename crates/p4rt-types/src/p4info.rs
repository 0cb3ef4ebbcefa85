//! P4Info program description model.
//!
//! Mirrors the JSON encoding of `p4.config.v1.P4Info` as emitted by the
//! compiler (`--p4runtime-files program.p4info.json`). Only the parts the
//! control plane needs for ID translation are modelled; unknown fields are
//! ignored so newer compilers remain readable.

use crate::object::{ObjectClass, ObjectRef, P4InfoId};
use crate::ParseError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Name and ID shared by every P4Info object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preamble {
    pub id: P4InfoId,
    pub name: String,
    #[serde(default)]
    pub alias: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<String>,
}

impl Preamble {
    pub fn new(id: P4InfoId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PkgInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub arch: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub preamble: Preamble,
    /// ID of the action profile or selector implementing this table, 0 if
    /// the table is direct.
    #[serde(default)]
    pub implementation_id: P4InfoId,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    pub preamble: Preamble,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionProfile {
    pub preamble: Preamble,
    #[serde(default)]
    pub table_ids: Vec<P4InfoId>,
    /// Set when the profile is driven by a selector. Plain P4Info folds the
    /// selector into the profile instead of declaring it separately.
    #[serde(default)]
    pub with_selector: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Counter {
    pub preamble: Preamble,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meter {
    pub preamble: Preamble,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Register {
    pub preamble: Preamble,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Digest {
    pub preamble: Preamble,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternInstance {
    pub preamble: Preamble,
}

/// Architecture-specific extern block (e.g. TNA `ActionSelector`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Extern {
    #[serde(default)]
    pub extern_type_id: u32,
    #[serde(default)]
    pub extern_type_name: String,
    #[serde(default)]
    pub instances: Vec<ExternInstance>,
}

impl Extern {
    /// Object class for the extern types the mapper understands.
    pub fn object_class(&self) -> Option<ObjectClass> {
        match self.extern_type_name.as_str() {
            "ActionProfile" => Some(ObjectClass::ActionProfile),
            "ActionSelector" => Some(ObjectClass::ActionSelector),
            "Counter" => Some(ObjectClass::Counter),
            "Meter" => Some(ObjectClass::Meter),
            "Register" => Some(ObjectClass::Register),
            _ => None,
        }
    }
}

/// The P4Runtime program description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct P4Info {
    #[serde(default)]
    pub pkg_info: PkgInfo,
    #[serde(default)]
    pub tables: Vec<Table>,
    #[serde(default)]
    pub actions: Vec<Action>,
    #[serde(default)]
    pub action_profiles: Vec<ActionProfile>,
    #[serde(default)]
    pub counters: Vec<Counter>,
    #[serde(default)]
    pub meters: Vec<Meter>,
    #[serde(default)]
    pub registers: Vec<Register>,
    #[serde(default)]
    pub digests: Vec<Digest>,
    #[serde(default)]
    pub externs: Vec<Extern>,
}

impl P4Info {
    /// Parses the JSON encoding of a P4Info message.
    pub fn from_json(json: &str) -> Result<Self, ParseError> {
        serde_json::from_str(json).map_err(|e| ParseError::InvalidP4Info(e.to_string()))
    }

    /// Reads and parses a P4Info JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ParseError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| ParseError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json(&json)
    }

    /// Returns every declared object of `class`, including matching externs.
    pub fn objects(&self, class: ObjectClass) -> Vec<ObjectRef<'_>> {
        fn refs<'a, T>(items: &'a [T], preamble: fn(&T) -> &Preamble) -> Vec<ObjectRef<'a>> {
            items
                .iter()
                .map(|item| {
                    let p = preamble(item);
                    ObjectRef {
                        id: p.id,
                        name: &p.name,
                    }
                })
                .collect()
        }

        let mut objects = match class {
            ObjectClass::Table => refs(&self.tables, |t| &t.preamble),
            ObjectClass::Action => refs(&self.actions, |a| &a.preamble),
            ObjectClass::ActionProfile => refs(&self.action_profiles, |p| &p.preamble),
            ObjectClass::ActionSelector => Vec::new(),
            ObjectClass::Counter => refs(&self.counters, |c| &c.preamble),
            ObjectClass::Meter => refs(&self.meters, |m| &m.preamble),
            ObjectClass::Register => refs(&self.registers, |r| &r.preamble),
            ObjectClass::Digest => refs(&self.digests, |d| &d.preamble),
        };

        for ext in self
            .externs
            .iter()
            .filter(|e| e.object_class() == Some(class))
        {
            objects.extend(refs(&ext.instances, |i| &i.preamble));
        }

        objects
    }

    /// Total number of objects across all classes.
    pub fn object_count(&self) -> usize {
        ObjectClass::ALL
            .iter()
            .map(|class| self.objects(*class).len())
            .sum()
    }
}
