//! Common P4Runtime types for switch pipeline management.
//!
//! This crate provides the protocol-side vocabulary shared by the BfRt
//! driver bindings and the ID mapper:
//!
//! - [`ObjectClass`]: The kinds of P4 objects that carry numeric IDs
//! - [`P4Info`]: The P4Runtime program description (JSON encoding)
//! - [`DeviceTarget`]: The device and pipe scope an object is bound to

mod object;
mod p4info;
mod target;

pub use object::{ObjectClass, ObjectRef, P4InfoId};
pub use p4info::{
    Action, ActionProfile, Counter, Digest, Extern, ExternInstance, Meter, P4Info, PkgInfo,
    Preamble, Register, Table,
};
pub use target::{DeviceTarget, PipeScope};

/// Common error type for parsing failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("invalid P4Info: {0}")]
    InvalidP4Info(String),

    #[error("failed to read {path}: {message}")]
    Io { path: String, message: String },
}
