use crate::plan::PlannedAction;

/// Renders planned actions as bash command lines.
#[derive(Debug, Clone, Default)]
pub struct ShellRenderer;

impl ShellRenderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, action: &PlannedAction) -> String {
        match action {
            PlannedAction::CopyWithConfirmation {
                source,
                destination,
            } => {
                let prompt = format!("{}: are you sure? ", source);
                format!(
                    "read -p {} -n 1 -r; echo; if [[ $REPLY =~ ^[Yy]$ ]]; then {}; fi",
                    quote(&prompt),
                    copy_command(source, destination)
                )
            }
            PlannedAction::SkipLargerExists {
                source,
                destination,
                ..
            } => format!(
                "echo {} # {}",
                quote("source file smaller than dest file, skipping"),
                copy_command(source, destination)
            ),
        }
    }

    pub fn render_all(&self, actions: &[PlannedAction]) -> Vec<String> {
        actions.iter().map(|action| self.render(action)).collect()
    }
}

fn copy_command(source: &str, destination: &str) -> String {
    format!("cp -v -- {} {}", quote(source), quote(destination))
}

/// Single-quote `value` for a POSIX shell.
pub fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}
