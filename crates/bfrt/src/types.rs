//! BfRt identifier types and table classification.

use p4rt_types::{ObjectClass, PipeScope};
use std::fmt;

/// Raw BfRt object ID (matches `bf_rt_id_t` in C).
pub type BfRtId = u32;

/// Pipe ID addressing every pipe of a device (`BF_DEV_PIPE_ALL`).
pub const BF_DEV_PIPE_ALL: u32 = 0xFFFF;

/// Driver pipe ID for a pipe scope.
///
/// Returns `None` for a set of several pipes, which the driver cannot
/// address with one `bf_rt_target_t`.
pub fn dev_pipe_id(scope: &PipeScope) -> Option<u32> {
    match scope {
        PipeScope::All => Some(BF_DEV_PIPE_ALL),
        PipeScope::Pipes(pipes) if pipes.len() == 1 => pipes.iter().next().copied(),
        PipeScope::Pipes(_) => None,
    }
}

/// Returns true if BfRt names of `class` start with the pipeline name
/// (`pipe.Ingress.fwd`). Actions keep their program name
/// (`Ingress.set_port`).
pub fn has_pipeline_prefix(class: ObjectClass) -> bool {
    !matches!(class, ObjectClass::Action)
}

/// Table type as reported in the `table_type` field of `bf-rt.json`.
///
/// BfRt models nearly every P4 object as a table; the type tells which P4
/// construct a given table stands for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BfRtTableType {
    MatchActionDirect,
    MatchActionIndirect,
    MatchActionIndirectSelector,
    /// Action profile member table.
    Action,
    /// Action selector group table.
    Selector,
    SelectorGetMember,
    Counter,
    Meter,
    Register,
    Lpf,
    Wred,
    PortMetadata,
    /// Fixed-function or otherwise unclassified table.
    Other(String),
}

impl BfRtTableType {
    /// P4 object class represented by tables of this type, if any.
    pub fn object_class(&self) -> Option<ObjectClass> {
        match self {
            Self::MatchActionDirect
            | Self::MatchActionIndirect
            | Self::MatchActionIndirectSelector => Some(ObjectClass::Table),
            Self::Action => Some(ObjectClass::ActionProfile),
            Self::Selector => Some(ObjectClass::ActionSelector),
            Self::Counter => Some(ObjectClass::Counter),
            Self::Meter => Some(ObjectClass::Meter),
            Self::Register => Some(ObjectClass::Register),
            _ => None,
        }
    }
}

impl From<&str> for BfRtTableType {
    fn from(s: &str) -> Self {
        match s {
            "MatchAction_Direct" => Self::MatchActionDirect,
            "MatchAction_Indirect" => Self::MatchActionIndirect,
            "MatchAction_Indirect_Selector" => Self::MatchActionIndirectSelector,
            "Action" => Self::Action,
            "Selector" => Self::Selector,
            "SelectorGetMember" => Self::SelectorGetMember,
            "Counter" => Self::Counter,
            "Meter" => Self::Meter,
            "Register" => Self::Register,
            "Lpf" => Self::Lpf,
            "Wred" => Self::Wred,
            "PortMetadata" => Self::PortMetadata,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for BfRtTableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::MatchActionDirect => "MatchAction_Direct",
            Self::MatchActionIndirect => "MatchAction_Indirect",
            Self::MatchActionIndirectSelector => "MatchAction_Indirect_Selector",
            Self::Action => "Action",
            Self::Selector => "Selector",
            Self::SelectorGetMember => "SelectorGetMember",
            Self::Counter => "Counter",
            Self::Meter => "Meter",
            Self::Register => "Register",
            Self::Lpf => "Lpf",
            Self::Wred => "Wred",
            Self::PortMetadata => "PortMetadata",
            Self::Other(s) => s,
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_type_classes() {
        assert_eq!(
            BfRtTableType::from("MatchAction_Indirect_Selector").object_class(),
            Some(ObjectClass::Table)
        );
        assert_eq!(
            BfRtTableType::from("Action").object_class(),
            Some(ObjectClass::ActionProfile)
        );
        assert_eq!(
            BfRtTableType::from("Selector").object_class(),
            Some(ObjectClass::ActionSelector)
        );
        assert_eq!(BfRtTableType::from("SelectorGetMember").object_class(), None);
        assert_eq!(BfRtTableType::from("PktgenPortCfg").object_class(), None);
    }

    #[test]
    fn test_pipeline_prefix_classes() {
        assert!(has_pipeline_prefix(ObjectClass::Table));
        assert!(has_pipeline_prefix(ObjectClass::Digest));
        assert!(!has_pipeline_prefix(ObjectClass::Action));
    }

    #[test]
    fn test_table_type_display() {
        for s in ["MatchAction_Direct", "Selector", "Register", "TmPpgCfg"] {
            assert_eq!(BfRtTableType::from(s).to_string(), s);
        }
    }

    #[test]
    fn test_dev_pipe_id() {
        assert_eq!(dev_pipe_id(&PipeScope::All), Some(BF_DEV_PIPE_ALL));
        assert_eq!(dev_pipe_id(&PipeScope::Pipes([2].into())), Some(2));
        assert_eq!(dev_pipe_id(&PipeScope::Pipes([0, 1].into())), None);
    }
}
