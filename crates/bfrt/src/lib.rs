//! Safe Rust view of the BfRt driver runtime metadata.
//!
//! The BfRt runtime assigns its own numeric IDs to every table, action,
//! learn filter and extern of a compiled program. This crate exposes those
//! IDs without linking the driver:
//!
//! - [`types`]: Driver ID aliases, pipe constants and table types
//! - [`error`]: `bf_status_t` codes and the crate error type
//! - [`metadata`]: The [`DriverMetadata`] trait consumed by the ID mapper
//! - [`info`]: [`BfRtInfo`], parsed from the compiler's `bf-rt.json`
//!
//! # Example
//!
//! ```ignore
//! use bfrt::{BfRtInfo, DriverMetadata};
//! use p4rt_types::ObjectClass;
//!
//! let info = BfRtInfo::from_file("pipe/bf-rt.json")?;
//! for table in info.objects(ObjectClass::Table)? {
//!     println!("{} = {}", table.name, table.id);
//! }
//! ```

pub mod error;
pub mod info;
pub mod metadata;
pub mod types;

pub use error::{BfRtError, BfRtResult, BfStatus};
pub use info::{BfRtActionSpec, BfRtInfo, BfRtLearnFilter, BfRtTable};
pub use metadata::{BfRtObject, DriverMetadata};
pub use types::{dev_pipe_id, has_pipeline_prefix, BfRtId, BfRtTableType, BF_DEV_PIPE_ALL};
