//! Driver metadata interface.
//!
//! The ID mapper treats driver metadata as an opaque, read-only handle that
//! can enumerate its named objects per [`ObjectClass`]. [`BfRtInfo`] is the
//! file-backed implementation; a live driver session can implement the same
//! trait.
//!
//! [`BfRtInfo`]: crate::BfRtInfo

use crate::error::BfRtResult;
use crate::types::BfRtId;
use p4rt_types::ObjectClass;

/// A named driver object.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BfRtObject {
    pub id: BfRtId,
    pub name: String,
}

impl BfRtObject {
    pub fn new(id: BfRtId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Read-only access to the objects a compiled program exposes to the driver.
pub trait DriverMetadata {
    /// Returns every object of `class` known to the driver.
    ///
    /// Names are returned exactly as the driver reports them, including any
    /// pipeline prefix. The same name may appear more than once if the
    /// driver reports it in several places.
    fn objects(&self, class: ObjectClass) -> BfRtResult<Vec<BfRtObject>>;
}
