//! Device target definitions.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Pipe scope of a device target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipeScope {
    /// Every pipe of the device.
    #[default]
    All,
    /// An explicit set of pipes.
    Pipes(BTreeSet<u32>),
}

impl fmt::Display for PipeScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipeScope::All => write!(f, "all"),
            PipeScope::Pipes(pipes) => {
                let list: Vec<String> = pipes.iter().map(|p| p.to_string()).collect();
                write!(f, "{{{}}}", list.join(","))
            }
        }
    }
}

/// The physical device and pipe scope an object is bound to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeviceTarget {
    pub device_id: i32,
    pub pipe: PipeScope,
}

impl DeviceTarget {
    /// Target covering every pipe of `device_id`.
    pub fn all_pipes(device_id: i32) -> Self {
        Self {
            device_id,
            pipe: PipeScope::All,
        }
    }
}

impl fmt::Display for DeviceTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dev {} pipe {}", self.device_id, self.pipe)
    }
}
