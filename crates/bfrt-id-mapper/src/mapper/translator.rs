//! Primary P4Info <-> BfRt ID join.

use crate::bimap::BiMap;
use crate::config::IdMapperConfig;
use crate::error::{IdMapperError, IdMapperResult};
use crate::name_index::{NameIndex, Resolution};
use bfrt::{has_pipeline_prefix, BfRtId, DriverMetadata};
use log::{debug, warn};
use p4rt_types::{ObjectClass, P4Info, P4InfoId};
use std::collections::HashSet;

/// A P4Info object matched to a driver object by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct JoinedObject {
    pub(crate) class: ObjectClass,
    pub(crate) name: String,
    pub(crate) p4info_id: P4InfoId,
    pub(crate) bfrt_id: BfRtId,
}

/// Result of joining one P4Info against one driver metadata handle.
#[derive(Debug, Default)]
pub(crate) struct PrimaryJoin {
    pub(crate) joined: Vec<JoinedObject>,
    /// P4Info objects with no driver counterpart.
    pub(crate) unmatched: usize,
    /// P4Info objects whose name matches several driver objects, or whose
    /// prefix-stripped match is already owned by an exact match.
    pub(crate) ambiguous: usize,
}

/// Builds the name index of `class`, stripping pipeline prefixes only for
/// classes whose driver names carry one.
pub(crate) fn class_index(
    driver: &dyn DriverMetadata,
    class: ObjectClass,
    config: &IdMapperConfig,
) -> IdMapperResult<NameIndex> {
    let strip = config.match_pipeline_prefix && has_pipeline_prefix(class);
    Ok(NameIndex::build(&driver.objects(class)?, strip))
}

/// Matches every P4Info object to a driver object of the same class and
/// name. Works on caller-owned data only; no mapper lock is held.
///
/// Exact name matches are taken first. A prefix-stripped match is dropped
/// when its driver object is already claimed by an exact match of the same
/// class.
pub(crate) fn join_objects(
    p4info: &P4Info,
    driver: &dyn DriverMetadata,
    config: &IdMapperConfig,
) -> IdMapperResult<PrimaryJoin> {
    let mut join = PrimaryJoin::default();

    for class in ObjectClass::ALL {
        let declared = p4info.objects(class);
        if declared.is_empty() {
            continue;
        }

        let index = class_index(driver, class, config)?;

        let mut resolved = Vec::with_capacity(declared.len());
        for object in declared {
            if object.id == 0 {
                return Err(IdMapperError::invalid_pipeline(format!(
                    "{} {} has P4Info ID 0",
                    class, object.name
                )));
            }
            resolved.push((object, index.resolve(object.name)));
        }

        let exact_owned: HashSet<BfRtId> = resolved
            .iter()
            .filter_map(|(_, resolution)| match resolution {
                Resolution::Exact(bfrt_id) => Some(*bfrt_id),
                _ => None,
            })
            .collect();

        for (object, resolution) in resolved {
            let bfrt_id = match resolution {
                Resolution::Exact(bfrt_id) => bfrt_id,
                Resolution::Stripped(bfrt_id) if exact_owned.contains(&bfrt_id) => {
                    warn!(
                        "Skipping {} {} (P4Info ID {}): BfRt ID {} belongs to an exact name match",
                        class, object.name, object.id, bfrt_id
                    );
                    join.ambiguous += 1;
                    continue;
                }
                Resolution::Stripped(bfrt_id) => bfrt_id,
                Resolution::Ambiguous => {
                    warn!(
                        "Skipping {} {} (P4Info ID {}): name matches several BfRt objects",
                        class, object.name, object.id
                    );
                    join.ambiguous += 1;
                    continue;
                }
                Resolution::Missing => {
                    debug!(
                        "No BfRt {} named {} (P4Info ID {})",
                        class, object.name, object.id
                    );
                    join.unmatched += 1;
                    continue;
                }
            };

            debug!(
                "Mapped {} {}: P4Info ID {} <-> BfRt ID {}",
                class, object.name, object.id, bfrt_id
            );
            join.joined.push(JoinedObject {
                class,
                name: object.name.to_string(),
                p4info_id: object.id,
                bfrt_id,
            });
        }
    }

    Ok(join)
}

/// Inserts joined pairs into `ids`, stopping at the first pair that would
/// break the one-to-one mapping. Pairs inserted before the failure stay.
pub(crate) fn fill_ids(
    ids: &mut BiMap<P4InfoId, BfRtId>,
    joined: &[JoinedObject],
) -> IdMapperResult<()> {
    for object in joined {
        ids.insert(object.p4info_id, object.bfrt_id).map_err(|e| {
            IdMapperError::invalid_pipeline(format!("{} {}: {}", object.class, object.name, e))
        })?;
    }
    Ok(())
}
