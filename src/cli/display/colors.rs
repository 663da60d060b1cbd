//! Color theme for CLI output

use crate::infrastructure::aws::plan::ActionType;
use comfy_table::Color as TableColor;

/// Color theme for terminal output
#[derive(Debug, Clone)]
pub struct ColorTheme {
    pub create: TableColor,
    pub update: TableColor,
    pub delete: TableColor,
    pub lookup: TableColor,
    pub muted: TableColor,
}

impl Default for ColorTheme {
    fn default() -> Self {
        Self {
            create: TableColor::Green,
            update: TableColor::Yellow,
            delete: TableColor::Red,
            lookup: TableColor::Cyan,
            muted: TableColor::DarkGrey,
        }
    }
}

impl ColorTheme {
    /// Get color for a planned action
    pub fn get_action_color(&self, action: ActionType) -> TableColor {
        match action {
            ActionType::Create => self.create,
            ActionType::Update => self.update,
            ActionType::Delete => self.delete,
            ActionType::Lookup => self.lookup,
            ActionType::NoOp => self.muted,
        }
    }
}
