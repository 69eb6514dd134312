pub mod app;
pub mod error;
pub mod modules;
pub mod ui;
pub mod util;

pub use error::{ChatError, Result};
pub use modules::chat::{ChatActor, ChatHandle, ChatState, ChatStateMachine};
pub use util::config::ChatConfig;
