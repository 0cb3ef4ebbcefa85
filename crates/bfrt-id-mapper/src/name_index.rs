//! Name to driver ID index for one object class.
//!
//! The index is built once per class and push, after which every protocol
//! object is resolved with hash lookups only.

use bfrt::{BfRtId, BfRtObject};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Unique(BfRtId),
    Ambiguous,
}

impl Slot {
    fn merge(self, id: BfRtId) -> Slot {
        match self {
            Slot::Unique(existing) if existing == id => self,
            _ => Slot::Ambiguous,
        }
    }
}

/// Outcome of resolving a protocol name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Exactly one driver object carries this name.
    Exact(BfRtId),
    /// Exactly one driver object carries this name after its pipeline
    /// prefix is dropped.
    Stripped(BfRtId),
    /// Several driver objects with different IDs carry this name.
    Ambiguous,
    /// No driver object carries this name.
    Missing,
}

/// Index over the driver objects of a single class.
#[derive(Debug, Clone, Default)]
pub struct NameIndex {
    exact: HashMap<String, Slot>,
    // Keyed by name without the leading pipeline component.
    stripped: Option<HashMap<String, Slot>>,
}

/// Drops the first dotted component of a driver name (`pipe.Ingress.t` ->
/// `Ingress.t`). Names without a dot have no prefix.
fn strip_pipeline_prefix(name: &str) -> Option<&str> {
    name.split_once('.').map(|(_, rest)| rest).filter(|rest| !rest.is_empty())
}

impl NameIndex {
    /// Builds an index over `objects`. With `match_pipeline_prefix` set,
    /// names are also indexed without their first dotted component.
    pub fn build(objects: &[BfRtObject], match_pipeline_prefix: bool) -> Self {
        let mut exact: HashMap<String, Slot> = HashMap::with_capacity(objects.len());
        let mut stripped: HashMap<String, Slot> = HashMap::new();

        for object in objects {
            exact
                .entry(object.name.clone())
                .and_modify(|slot| *slot = slot.merge(object.id))
                .or_insert(Slot::Unique(object.id));

            if match_pipeline_prefix {
                if let Some(short) = strip_pipeline_prefix(&object.name) {
                    stripped
                        .entry(short.to_string())
                        .and_modify(|slot| *slot = slot.merge(object.id))
                        .or_insert(Slot::Unique(object.id));
                }
            }
        }

        Self {
            exact,
            stripped: match_pipeline_prefix.then_some(stripped),
        }
    }

    /// Resolves a protocol-side name.
    ///
    /// Exact names win; the prefix-stripped index is only consulted when no
    /// driver object has exactly this name.
    pub fn resolve(&self, name: &str) -> Resolution {
        if let Some(slot) = self.exact.get(name) {
            return match slot {
                Slot::Unique(id) => Resolution::Exact(*id),
                Slot::Ambiguous => Resolution::Ambiguous,
            };
        }

        match self.stripped.as_ref().and_then(|s| s.get(name)) {
            Some(Slot::Unique(id)) => Resolution::Stripped(*id),
            Some(Slot::Ambiguous) => Resolution::Ambiguous,
            None => Resolution::Missing,
        }
    }
}
