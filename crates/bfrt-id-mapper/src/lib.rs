//! P4Runtime <-> BfRt object ID mapping.
//!
//! The P4Runtime compiler and the BfRt driver compiler number the same
//! tables, actions, profiles and externs independently. This crate joins
//! the two numberings by object class and name and serves lookups in both
//! directions while pipelines are pushed concurrently.
//!
//! # Key Components
//!
//! - [`BfrtIdMapper`]: Per-device mapping tables behind one reader-writer
//!   lock
//! - [`MapperRegistry`]: Device unit to mapper registry
//! - [`IndirectionParser`]: Pluggable parser for the descriptor that wires
//!   action profiles to action selectors ([`ContextJsonParser`] for
//!   `context.json`)
//! - [`BiMap`]: One-to-one map enforcing the bijection between ID spaces
//!
//! # Example
//!
//! ```ignore
//! use bfrt::BfRtInfo;
//! use bfrt_id_mapper::MapperRegistry;
//! use p4rt_types::P4Info;
//!
//! let registry = MapperRegistry::new();
//! let mapper = registry.attach(0)?;
//! mapper.push_pipeline_info(
//!     &P4Info::from_file("p4info.json")?,
//!     &BfRtInfo::from_file("bf-rt.json")?,
//! )?;
//! let table_id = mapper.get_bfrt_id(33_554_433)?;
//! ```

pub mod bimap;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod mapper;
pub mod name_index;
pub mod registry;

pub use bimap::{BiMap, BiMapError};
pub use config::IdMapperConfig;
pub use descriptor::{ContextJsonParser, IndirectionParser, IndirectionRef};
pub use error::{ErrorCode, IdMapperError, IdMapperResult};
pub use mapper::{BfrtIdMapper, MappingSnapshot};
pub use name_index::{NameIndex, Resolution};
pub use registry::MapperRegistry;
