//! P4 object classes and protocol-side identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric ID assigned to an object by the P4Runtime compiler.
pub type P4InfoId = u32;

/// Class of a P4 object that is named by a numeric ID.
///
/// Both the P4Runtime program description and the driver metadata group
/// their objects by class; names are only compared within one class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectClass {
    /// Match-action table.
    Table,
    /// Action (shared across tables).
    Action,
    /// Action profile (action data shared between entries).
    ActionProfile,
    /// Action selector (load-balancing over profile members).
    ActionSelector,
    /// Indirect counter.
    Counter,
    /// Indirect meter.
    Meter,
    /// Register array.
    Register,
    /// Digest (learn filter on the driver side).
    Digest,
}

impl ObjectClass {
    /// All object classes, in the order the mapper processes them.
    pub const ALL: [ObjectClass; 8] = [
        ObjectClass::Table,
        ObjectClass::Action,
        ObjectClass::ActionProfile,
        ObjectClass::ActionSelector,
        ObjectClass::Counter,
        ObjectClass::Meter,
        ObjectClass::Register,
        ObjectClass::Digest,
    ];
}

impl fmt::Display for ObjectClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ObjectClass::Table => "table",
            ObjectClass::Action => "action",
            ObjectClass::ActionProfile => "action_profile",
            ObjectClass::ActionSelector => "action_selector",
            ObjectClass::Counter => "counter",
            ObjectClass::Meter => "meter",
            ObjectClass::Register => "register",
            ObjectClass::Digest => "digest",
        };
        write!(f, "{}", s)
    }
}

/// A borrowed `(id, name)` view of one declared object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectRef<'a> {
    pub id: P4InfoId,
    pub name: &'a str,
}
