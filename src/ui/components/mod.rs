pub mod help;

/// Namespace for small reusable widgets.
pub struct UiComponent;
