//! Action icons for CLI output

use crate::infrastructure::aws::plan::ActionType;

/// Icons for planned actions
pub struct ActionIcon;

impl ActionIcon {
    pub const CREATE: &'static str = "+";

    pub const UPDATE: &'static str = "~";

    pub const DELETE: &'static str = "-";

    /// Read-only lookup of an existing resource
    pub const LOOKUP: &'static str = "?";

    pub const NO_OP: &'static str = "=";

    pub fn get_action_icon(action: ActionType) -> &'static str {
        match action {
            ActionType::Create => Self::CREATE,
            ActionType::Update => Self::UPDATE,
            ActionType::Delete => Self::DELETE,
            ActionType::Lookup => Self::LOOKUP,
            ActionType::NoOp => Self::NO_OP,
        }
    }
}
