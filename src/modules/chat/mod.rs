// src/modules/chat/mod.rs
//! Chat module - conversation state and the completion round trip.
//! Rendering lives in `ui::chat_view`.

pub mod actor;
pub mod client;
pub mod message;
pub mod state;
pub mod transcript;

pub use actor::{ChatActor, ChatHandle};
pub use client::{CompletionClient, CompletionRequest, GenerationParams, HttpCompletionClient};
pub use message::{Message, Role};
pub use state::{ChatEvent, ChatIntent, ChatState, ChatStateMachine, ChatStatus};
pub use transcript::Transcript;

use color_eyre::Result;
use tokio::sync::mpsc;
use tracing::info;

use crate::util::config::ChatConfig;

/// Start a chat session against the configured endpoint.
///
/// Spawns the actor and returns the handle plus the stream of events to render.
pub fn spawn_chat_session(
    config: &ChatConfig,
) -> Result<(ChatHandle, mpsc::UnboundedReceiver<ChatEvent>)> {
    let client = HttpCompletionClient::new(config.base_url.clone(), config.api_key()?);
    let state = ChatState::new(config.system_prompt.clone(), config.generation_params());
    info!(
        model = %config.model,
        base_url = %config.base_url,
        session = %state.session_id,
        "starting chat session"
    );

    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let (actor, handle) = ChatActor::new(state, client, event_tx);
    tokio::spawn(actor.run());

    Ok((handle, event_rx))
}
