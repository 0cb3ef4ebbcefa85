//! Action profile <-> action selector association.

use super::translator::class_index;
use crate::bimap::BiMap;
use crate::config::IdMapperConfig;
use crate::descriptor::IndirectionRef;
use crate::error::IdMapperResult;
use crate::name_index::{NameIndex, Resolution};
use bfrt::{BfRtId, DriverMetadata};
use log::{debug, warn};
use p4rt_types::{ObjectClass, P4Info, P4InfoId};
use std::collections::HashMap;

/// Name lookups for the profiles and selectors named by a descriptor.
///
/// Built from caller-owned data before the mapper lock is taken, so the
/// exclusive section only does hash lookups.
#[derive(Debug, Default)]
pub(crate) struct IndirectionIndexes {
    p4info_profiles: HashMap<String, P4InfoId>,
    p4info_selectors: HashMap<String, P4InfoId>,
    profiles: NameIndex,
    selectors: NameIndex,
}

fn p4info_names(p4info: &P4Info, class: ObjectClass) -> HashMap<String, P4InfoId> {
    p4info
        .objects(class)
        .into_iter()
        .map(|object| (object.name.to_string(), object.id))
        .collect()
}

impl IndirectionIndexes {
    pub(crate) fn build(
        p4info: &P4Info,
        driver: &dyn DriverMetadata,
        config: &IdMapperConfig,
    ) -> IdMapperResult<Self> {
        Ok(Self {
            p4info_profiles: p4info_names(p4info, ObjectClass::ActionProfile),
            p4info_selectors: p4info_names(p4info, ObjectClass::ActionSelector),
            profiles: class_index(driver, ObjectClass::ActionProfile, config)?,
            selectors: class_index(driver, ObjectClass::ActionSelector, config)?,
        })
    }

    /// Resolves the BfRt ID of an action profile or selector named in the
    /// descriptor. The primary table is consulted first, then the driver
    /// names.
    fn resolve(
        &self,
        class: ObjectClass,
        name: &str,
        ids: &BiMap<P4InfoId, BfRtId>,
    ) -> Option<BfRtId> {
        let (declared, index) = match class {
            ObjectClass::ActionSelector => (&self.p4info_selectors, &self.selectors),
            _ => (&self.p4info_profiles, &self.profiles),
        };

        if let Some(bfrt_id) = declared.get(name).and_then(|p4info_id| ids.get_right(p4info_id)) {
            return Some(bfrt_id);
        }

        match index.resolve(name) {
            Resolution::Exact(bfrt_id) | Resolution::Stripped(bfrt_id) => Some(bfrt_id),
            Resolution::Ambiguous => {
                warn!("BfRt {} name {} is ambiguous", class, name);
                None
            }
            Resolution::Missing => None,
        }
    }
}

/// Records every resolvable profile/selector pair of `refs` into `out`.
///
/// Unresolvable or conflicting pairs are logged and skipped. Returns the
/// number of pairs recorded.
pub(crate) fn associate(
    refs: &[IndirectionRef],
    ids: &BiMap<P4InfoId, BfRtId>,
    indexes: &IndirectionIndexes,
    out: &mut BiMap<BfRtId, BfRtId>,
) -> usize {
    let mut recorded = 0;

    for r in refs {
        let profile = indexes.resolve(ObjectClass::ActionProfile, &r.action_profile, ids);
        let selector = indexes.resolve(ObjectClass::ActionSelector, &r.action_selector, ids);

        let (Some(profile), Some(selector)) = (profile, selector) else {
            warn!(
                "Table {}: cannot resolve action profile {} / selector {}",
                r.table, r.action_profile, r.action_selector
            );
            continue;
        };

        match out.insert(profile, selector) {
            Ok(()) => {
                debug!(
                    "Action profile {} ({}) <-> action selector {} ({})",
                    r.action_profile, profile, r.action_selector, selector
                );
                recorded += 1;
            }
            Err(e) => warn!("Table {}: skipping indirection: {}", r.table, e),
        }
    }

    recorded
}
