//! Indirection descriptor parsing.
//!
//! The driver metadata does not say which action selector drives which
//! action profile. The compiler's `context.json` does, as references from
//! match tables to their action data table and selection table:
//!
//! ```json
//! {
//!   "tables": [
//!     {
//!       "name": "pipe.Ingress.ecmp",
//!       "table_type": "match",
//!       "action_data_table_refs": [{ "name": "Ingress.ecmp_ap" }],
//!       "selection_table_refs": [{ "name": "Ingress.ecmp_sel" }]
//!     }
//!   ]
//! }
//! ```
//!
//! Parsers are pluggable through [`IndirectionParser`]; the mapper only
//! needs profile and selector names.

use log::{debug, warn};
use serde_json::Value;

/// A match table wired to an action profile through an action selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndirectionRef {
    /// Name of the match table carrying the references.
    pub table: String,
    /// Name of the action profile (action data table).
    pub action_profile: String,
    /// Name of the action selector (selection table).
    pub action_selector: String,
}

/// Extracts profile/selector associations from descriptor text.
///
/// Parsing problems are not errors: a parser returns the associations it
/// could recover and logs the rest.
pub trait IndirectionParser: Send + Sync {
    fn parse(&self, descriptor: &str) -> Vec<IndirectionRef>;
}

/// Parser for the compiler's `context.json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContextJsonParser;

impl ContextJsonParser {
    pub fn new() -> Self {
        Self
    }
}

fn first_ref_name<'a>(table: &'a Value, field: &str) -> Option<&'a str> {
    table
        .get(field)?
        .as_array()?
        .first()?
        .get("name")?
        .as_str()
        .filter(|name| !name.is_empty())
}

impl IndirectionParser for ContextJsonParser {
    fn parse(&self, descriptor: &str) -> Vec<IndirectionRef> {
        let json: Value = match serde_json::from_str(descriptor) {
            Ok(json) => json,
            Err(e) => {
                warn!("Failed to parse indirection descriptor: {}", e);
                return Vec::new();
            }
        };

        let Some(tables) = json.get("tables").and_then(Value::as_array) else {
            warn!("Indirection descriptor has no tables array");
            return Vec::new();
        };

        let mut refs = Vec::new();
        for table in tables {
            if table.get("table_type").and_then(Value::as_str) != Some("match") {
                continue;
            }
            let name = table
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or_default();

            if let (Some(profile), Some(selector)) = (
                first_ref_name(table, "action_data_table_refs"),
                first_ref_name(table, "selection_table_refs"),
            ) {
                debug!(
                    "Table {} uses action profile {} with selector {}",
                    name, profile, selector
                );
                refs.push(IndirectionRef {
                    table: name.to_string(),
                    action_profile: profile.to_string(),
                    action_selector: selector.to_string(),
                });
            }
        }
        refs
    }
}
