//! Visual theme and styling.

use console::Style;

/// hostprep's visual theme.
#[derive(Debug, Clone)]
pub struct HostprepTheme {
    /// Style for success messages (green).
    pub success: Style,
    /// Style for warning messages (orange).
    pub warning: Style,
    /// Style for error messages (red bold).
    pub error: Style,
    /// Style for dim/secondary text.
    pub dim: Style,
    /// Style for headers (cyan bold).
    pub header: Style,
    /// Style for contextual hints (cyan dim).
    pub hint: Style,
    /// Style for key labels in key-value displays (bold).
    pub key: Style,
    /// Style for values in key-value displays (normal).
    pub value: Style,
}

impl Default for HostprepTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl HostprepTheme {
    /// Create the default theme.
    pub fn new() -> Self {
        Self {
            success: Style::new().green(),
            warning: Style::new().color256(208),
            error: Style::new().red().bold(),
            dim: Style::new().dim(),
            header: Style::new().bold().cyan(),
            hint: Style::new().cyan().dim(),
            key: Style::new().bold(),
            value: Style::new(),
        }
    }

    /// Create a theme without colors (for non-TTY or --no-color).
    pub fn plain() -> Self {
        Self {
            success: Style::new(),
            warning: Style::new(),
            error: Style::new(),
            dim: Style::new(),
            header: Style::new(),
            hint: Style::new(),
            key: Style::new(),
            value: Style::new(),
        }
    }

    /// Format a success message (icon + text in green).
    pub fn format_success(&self, msg: &str) -> String {
        format!("{}", self.success.apply_to(format!("✓ {}", msg)))
    }

    /// Format a warning message (icon + text in orange).
    pub fn format_warning(&self, msg: &str) -> String {
        format!("{}", self.warning.apply_to(format!("⚠ {}", msg)))
    }

    /// Format an error message (icon + text in red bold).
    pub fn format_error(&self, msg: &str) -> String {
        format!("{}", self.error.apply_to(format!("✗ {}", msg)))
    }

    /// Format a header banner framed by rules.
    pub fn format_header(&self, title: &str) -> String {
        let rule = "=".repeat(50);
        format!(
            "{}\n{}\n{}",
            self.dim.apply_to(&rule),
            self.header.apply_to(title),
            self.dim.apply_to(&rule)
        )
    }

    /// Format a key-value line.
    pub fn format_key_value(&self, key: &str, value: &str) -> String {
        format!(
            "{} {}",
            self.key.apply_to(format!("{}:", key)),
            self.value.apply_to(value)
        )
    }
}

/// Check if colors should be enabled.
pub fn should_use_colors() -> bool {
    // Check NO_COLOR env var (https://no-color.org/)
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    // Check if stdout is a TTY
    console::Term::stdout().is_term()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_formats_success() {
        let theme = HostprepTheme::plain();
        let msg = theme.format_success("Complete");
        assert_eq!(msg, "✓ Complete");
    }

    #[test]
    fn theme_formats_warning() {
        let theme = HostprepTheme::plain();
        let msg = theme.format_warning("Caution");
        assert_eq!(msg, "⚠ Caution");
    }

    #[test]
    fn theme_formats_error() {
        let theme = HostprepTheme::plain();
        let msg = theme.format_error("Failed");
        assert_eq!(msg, "✗ Failed");
    }

    #[test]
    fn theme_formats_header_with_rules() {
        let theme = HostprepTheme::plain();
        let msg = theme.format_header("OSX-KVM Setup Script");
        let lines: Vec<&str> = msg.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "=".repeat(50));
        assert_eq!(lines[1], "OSX-KVM Setup Script");
    }

    #[test]
    fn theme_formats_key_value() {
        let theme = HostprepTheme::plain();
        assert_eq!(
            theme.format_key_value("Repository", "/tmp/OSX-KVM"),
            "Repository: /tmp/OSX-KVM"
        );
    }
}
