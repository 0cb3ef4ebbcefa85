//! Mapper configuration.

use serde::{Deserialize, Serialize};

/// Configuration for a [`BfrtIdMapper`](crate::BfrtIdMapper).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdMapperConfig {
    /// Resolve P4Info names against driver names with the leading pipeline
    /// component stripped (`pipe.Ingress.fwd` matches `Ingress.fwd`) when no
    /// exact match exists.
    pub match_pipeline_prefix: bool,
}

impl Default for IdMapperConfig {
    fn default() -> Self {
        Self {
            match_pipeline_prefix: true,
        }
    }
}

impl IdMapperConfig {
    /// Configuration that only joins on exact names.
    pub fn exact_names() -> Self {
        Self {
            match_pipeline_prefix: false,
        }
    }
}
