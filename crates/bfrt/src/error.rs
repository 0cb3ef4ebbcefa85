//! BfRt error types and status handling.
//!
//! This module names the `bf_status_t` codes a driver call can fail with
//! and carries the errors raised while reading driver metadata.

use std::fmt;
use thiserror::Error;

/// Driver status codes matching `bf_status_t`.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BfStatus {
    Success = 0,
    NotReady = 1,
    NoSysResources = 2,
    InvalidArg = 3,
    AlreadyExists = 4,
    HwCommFail = 5,
    ObjectNotFound = 6,
    MaxSessionsExceeded = 7,
    SessionNotFound = 8,
    NoSpace = 9,
    Eagain = 10,
    InitError = 11,
    TxnNotSupported = 12,
    TableLocked = 13,
    Io = 14,
    Unexpected = 15,
    EntryReferencesExist = 16,
    NotSupported = 17,
    HwUpdateFailed = 18,
    NoLearnClients = 19,
    IdleUpdateInProgress = 20,
    DeviceLocked = 21,
    InternalError = 22,
    TableNotFound = 23,
    InUse = 24,
    NotImplemented = 25,
}

impl fmt::Display for BfStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BfStatus::Success => "BF_SUCCESS",
            BfStatus::NotReady => "BF_NOT_READY",
            BfStatus::NoSysResources => "BF_NO_SYS_RESOURCES",
            BfStatus::InvalidArg => "BF_INVALID_ARG",
            BfStatus::AlreadyExists => "BF_ALREADY_EXISTS",
            BfStatus::HwCommFail => "BF_HW_COMM_FAIL",
            BfStatus::ObjectNotFound => "BF_OBJECT_NOT_FOUND",
            BfStatus::MaxSessionsExceeded => "BF_MAX_SESSIONS_EXCEEDED",
            BfStatus::SessionNotFound => "BF_SESSION_NOT_FOUND",
            BfStatus::NoSpace => "BF_NO_SPACE",
            BfStatus::Eagain => "BF_EAGAIN",
            BfStatus::InitError => "BF_INIT_ERROR",
            BfStatus::TxnNotSupported => "BF_TXN_NOT_SUPPORTED",
            BfStatus::TableLocked => "BF_TABLE_LOCKED",
            BfStatus::Io => "BF_IO",
            BfStatus::Unexpected => "BF_UNEXPECTED",
            BfStatus::EntryReferencesExist => "BF_ENTRY_REFERENCES_EXIST",
            BfStatus::NotSupported => "BF_NOT_SUPPORTED",
            BfStatus::HwUpdateFailed => "BF_HW_UPDATE_FAILED",
            BfStatus::NoLearnClients => "BF_NO_LEARN_CLIENTS",
            BfStatus::IdleUpdateInProgress => "BF_IDLE_UPDATE_IN_PROGRESS",
            BfStatus::DeviceLocked => "BF_DEVICE_LOCKED",
            BfStatus::InternalError => "BF_INTERNAL_ERROR",
            BfStatus::TableNotFound => "BF_TABLE_NOT_FOUND",
            BfStatus::InUse => "BF_IN_USE",
            BfStatus::NotImplemented => "BF_NOT_IMPLEMENTED",
        };
        write!(f, "{}", s)
    }
}

/// Error type for BfRt operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BfRtError {
    /// The driver returned an error status.
    #[error("BfRt operation failed: {status}")]
    Status { status: BfStatus },

    /// The requested object was not found.
    #[error("Object not found: {item}")]
    NotFound { item: String },

    /// Invalid argument passed to the driver.
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// The driver metadata could not be decoded.
    #[error("Invalid BfRt metadata: {message}")]
    InvalidMetadata { message: String },

    /// A metadata file could not be read.
    #[error("Failed to read {path}: {message}")]
    Io { path: String, message: String },
}

impl BfRtError {
    /// Creates an error from a driver status code.
    pub fn from_status(status: BfStatus) -> Self {
        match status {
            BfStatus::ObjectNotFound | BfStatus::TableNotFound => BfRtError::NotFound {
                item: "unknown".to_string(),
            },
            BfStatus::InvalidArg => BfRtError::InvalidArgument {
                message: format!("driver returned {}", status),
            },
            _ => BfRtError::Status { status },
        }
    }

    /// Creates a not found error with an item description.
    pub fn not_found(item: impl Into<String>) -> Self {
        BfRtError::NotFound { item: item.into() }
    }

    /// Creates an invalid metadata error with a message.
    pub fn invalid_metadata(message: impl Into<String>) -> Self {
        BfRtError::InvalidMetadata {
            message: message.into(),
        }
    }

    /// Returns true if the driver may succeed when the call is repeated.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            BfRtError::Status {
                status: BfStatus::NotReady | BfStatus::Eagain | BfStatus::TableLocked
            }
        )
    }
}

/// Result type for BfRt operations.
pub type BfRtResult<T> = Result<T, BfRtError>;
