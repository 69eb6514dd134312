use ratatui::style::{Style, Stylize};

/// Bold when active, dimmed italic otherwise.
pub fn dim_unless_focused(is_focused: bool, style: Style) -> Style {
    if is_focused { style.bold() } else { style.dim().italic() }
}
