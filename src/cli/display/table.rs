//! Table rendering for CLI output

use super::{ActionIcon, ColorTheme};
use crate::infrastructure::aws::plan::{ActionType, Plan};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, ContentArrangement, Table};

/// Stack information for list display
#[derive(Debug, Clone)]
pub struct StackInfo {
    pub name: String,
    pub environment: String,
    pub resources: usize,
    pub outputs: Vec<String>,
}

/// Table renderer for formatted output
pub struct TableRenderer {
    theme: ColorTheme,
}

impl Default for TableRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TableRenderer {
    /// Create a new table renderer with default theme
    pub fn new() -> Self {
        Self {
            theme: ColorTheme::default(),
        }
    }

    /// Render a plan as one row per action, in execution order
    pub fn render_plan(&self, plan: &Plan) -> String {
        if plan.actions.is_empty() {
            return format!("Stack {} declares no resources", plan.stack_name);
        }

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                Cell::new("#").set_alignment(CellAlignment::Right),
                Cell::new("ACTION").set_alignment(CellAlignment::Left),
                Cell::new("LOGICAL ID").set_alignment(CellAlignment::Left),
                Cell::new("TYPE").set_alignment(CellAlignment::Left),
                Cell::new("DEPENDS ON").set_alignment(CellAlignment::Left),
                Cell::new("DESCRIPTION").set_alignment(CellAlignment::Left),
            ]);

        for action in &plan.actions {
            let color = self.theme.get_action_color(action.action_type);
            table.add_row(vec![
                Cell::new(action.order).set_alignment(CellAlignment::Right),
                Cell::new(format!(
                    "{} {}",
                    ActionIcon::get_action_icon(action.action_type),
                    action.action_type
                ))
                .fg(color),
                Cell::new(&action.logical_id),
                Cell::new(&action.resource_type),
                Cell::new(action.depends_on.join(", ")).fg(self.theme.muted),
                Cell::new(&action.description),
            ]);
        }

        let summary = plan.summary();
        let mut output = String::new();
        output.push_str(&format!(
            "╭─ Plan for {} {} ─╮\n",
            plan.stack_name,
            format!("[{} actions]", plan.actions.len()).bright_black()
        ));
        output.push_str(&table.to_string());
        output.push('\n');
        if plan.has_changes {
            output.push_str(&format!("{}\n", summary.to_string().bold()));
        } else {
            output.push_str(&format!("{}\n", "No changes.".green()));
        }
        output.push_str(&format!(
            "Legend: {} create  {} update  {} delete  {} lookup  {} unchanged\n",
            ActionIcon::CREATE.green(),
            ActionIcon::UPDATE.yellow(),
            ActionIcon::DELETE.red(),
            ActionIcon::LOOKUP.cyan(),
            ActionIcon::NO_OP.bright_black()
        ));

        output
    }

    /// Render defined stacks as a formatted table
    pub fn render_stack_list(&self, stacks: &[StackInfo]) -> String {
        if stacks.is_empty() {
            return "No stacks defined".to_string();
        }

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                Cell::new("STACK").set_alignment(CellAlignment::Left),
                Cell::new("ENVIRONMENT").set_alignment(CellAlignment::Left),
                Cell::new("RESOURCES").set_alignment(CellAlignment::Center),
                Cell::new("OUTPUTS").set_alignment(CellAlignment::Left),
            ]);

        for stack in stacks {
            table.add_row(vec![
                Cell::new(&stack.name),
                Cell::new(&stack.environment),
                Cell::new(stack.resources).set_alignment(CellAlignment::Center),
                Cell::new(stack.outputs.join(", ")),
            ]);
        }

        let mut output = String::new();
        output.push_str(&format!(
            "╭─ Stacks {} ─╮\n",
            format!("[{} stacks]", stacks.len()).bright_black()
        ));
        output.push_str(&table.to_string());
        output.push('\n');
        output
    }

    /// Count of actions that change something
    pub fn changed_actions(plan: &Plan) -> usize {
        plan.actions
            .iter()
            .filter(|a| !matches!(a.action_type, ActionType::NoOp | ActionType::Lookup))
            .count()
    }
}
