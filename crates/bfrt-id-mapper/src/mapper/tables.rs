//! Mapping tables guarded by the mapper lock.

use crate::bimap::BiMap;
use bfrt::BfRtId;
use p4rt_types::P4InfoId;
use serde::Serialize;
use std::collections::BTreeMap;

/// All state of one mapper. Only ever accessed through the mapper's
/// `RwLock`.
#[derive(Debug, Default)]
pub(crate) struct MappingTables {
    /// P4Info ID <-> BfRt ID, all object classes.
    pub(crate) ids: BiMap<P4InfoId, BfRtId>,
    /// Action profile BfRt ID <-> action selector BfRt ID.
    pub(crate) profile_selector: BiMap<BfRtId, BfRtId>,
    /// Number of successful primary pushes.
    pub(crate) generation: u64,
    /// Set while a rebuild is in progress and left set if it fails.
    pub(crate) stale: bool,
}

impl MappingTables {
    /// Drops every mapping and marks the tables stale until
    /// [`commit`](Self::commit).
    pub(crate) fn begin_rebuild(&mut self) {
        self.ids.clear();
        self.profile_selector.clear();
        self.stale = true;
    }

    pub(crate) fn commit(&mut self) {
        self.stale = false;
        self.generation += 1;
    }

    pub(crate) fn snapshot(&self, device_id: i32) -> MappingSnapshot {
        MappingSnapshot {
            device_id,
            generation: self.generation,
            stale: self.stale,
            p4info_to_bfrt: self.ids.iter().collect(),
            action_profile_to_selector: self.profile_selector.iter().collect(),
        }
    }
}

/// Point-in-time copy of a mapper's tables, taken under one shared lock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MappingSnapshot {
    pub device_id: i32,
    pub generation: u64,
    pub stale: bool,
    pub p4info_to_bfrt: BTreeMap<P4InfoId, BfRtId>,
    pub action_profile_to_selector: BTreeMap<BfRtId, BfRtId>,
}

impl MappingSnapshot {
    /// Number of mapped P4Info objects.
    pub fn len(&self) -> usize {
        self.p4info_to_bfrt.len()
    }

    /// Returns true if no object is mapped.
    pub fn is_empty(&self) -> bool {
        self.p4info_to_bfrt.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_rebuild_lifecycle() {
        let mut tables = MappingTables::default();
        tables.ids.insert(10, 77).unwrap();
        tables.profile_selector.insert(500, 600).unwrap();
        tables.commit();
        assert_eq!(tables.generation, 1);

        tables.begin_rebuild();
        assert!(tables.stale);
        assert!(tables.ids.is_empty());
        assert!(tables.profile_selector.is_empty());
        assert_eq!(tables.generation, 1);

        tables.commit();
        assert!(!tables.stale);
        assert_eq!(tables.generation, 2);
    }

    #[test]
    fn test_snapshot() {
        let mut tables = MappingTables::default();
        tables.ids.insert(2, 20).unwrap();
        tables.ids.insert(1, 10).unwrap();
        tables.profile_selector.insert(500, 600).unwrap();

        let snapshot = tables.snapshot(3);
        assert_eq!(snapshot.device_id, 3);
        assert_eq!(snapshot.len(), 2);
        assert_eq!(
            snapshot.p4info_to_bfrt.into_iter().collect::<Vec<_>>(),
            vec![(1, 10), (2, 20)]
        );
        assert_eq!(snapshot.action_profile_to_selector.get(&500), Some(&600));
    }
}
