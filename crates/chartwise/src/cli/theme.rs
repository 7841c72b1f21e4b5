//! Terminal styling for prompts and status lines.

use console::{style, Style};
use dialoguer::theme::ColorfulTheme;

/// Returns the `ColorfulTheme` used for interactive prompts.
///
/// Everything renders to stderr so stdout stays clean for piped results.
pub fn chartwise_theme() -> ColorfulTheme {
    ColorfulTheme {
        prompt_prefix: style("?".to_string()).for_stderr().yellow(),
        prompt_style: Style::new().for_stderr().bold(),
        prompt_suffix: style("›".to_string()).for_stderr().bright().black(),
        success_prefix: style("✓".to_string()).for_stderr().green(),
        success_suffix: style("·".to_string()).for_stderr().bright().black(),
        error_prefix: style("✗".to_string()).for_stderr().red(),
        error_style: Style::new().for_stderr().red(),
        values_style: Style::new().for_stderr().green(),
        ..ColorfulTheme::default()
    }
}

/// Style for the "configured" marker in `keys show`.
pub fn ok_style() -> Style {
    Style::new().green()
}

/// Style for the "not configured" marker in `keys show`.
pub fn missing_style() -> Style {
    Style::new().yellow()
}

/// Style for secondary text (help URLs, sources).
pub fn dim_style() -> Style {
    Style::new().dim()
}
