use serde::Serialize;
use uuid::Uuid;

use super::client::{CompletionRequest, GenerationParams};
use super::message::Message;
use super::transcript::Transcript;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChatStatus {
    Idle,
    Sending,
}

/// One chat session. Owned by whoever drives the state machine; nothing global.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatState {
    pub session_id: String,
    pub transcript: Transcript,
    pub status: ChatStatus,
    pub params: GenerationParams,
}

impl ChatState {
    pub fn new(system_prompt: impl Into<String>, params: GenerationParams) -> Self {
        Self {
            session_id: Uuid::new_v4().to_string(),
            transcript: Transcript::new(system_prompt),
            status: ChatStatus::Idle,
            params,
        }
    }

    pub fn is_sending(&self) -> bool {
        self.status == ChatStatus::Sending
    }
}

// ----------------------------------------------------------------------------
// INTENT - what the user (or the network) wants to happen
// ----------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum ChatIntent {
    Submit(String),
    ReplyReceived(String),
    RequestFailed(String),
    /// Start over with a fresh transcript.
    Reset,
}

// ----------------------------------------------------------------------------
// EVENTS - things that happened (past tense)
// ----------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum ChatEvent {
    MessageAppended(Message),
    /// The outbound call to make. Carries the transcript as it stood after the
    /// user message was appended.
    RequestIssued(CompletionRequest),
    ErrorShown(String),
    StatusChanged(ChatStatus),
    Cleared,
}

// ----------------------------------------------------------------------------
// STATE MACHINE - Pure function: (State, Intent) -> (State, Vec<Event>)
// ----------------------------------------------------------------------------

pub struct ChatStateMachine;

impl ChatStateMachine {
    pub fn transition(state: ChatState, intent: ChatIntent) -> (ChatState, Vec<ChatEvent>) {
        use ChatIntent::*;

        match intent {
            Submit(text) => Self::handle_submit(state, text),
            ReplyReceived(reply) => Self::handle_reply(state, reply),
            RequestFailed(reason) => Self::handle_failure(state, reason),
            Reset => Self::handle_reset(state),
        }
    }

    fn handle_submit(mut state: ChatState, text: String) -> (ChatState, Vec<ChatEvent>) {
        let text = text.trim();
        // One request in flight at a time; blank input does nothing.
        if text.is_empty() || state.is_sending() {
            return (state, Vec::new());
        }

        state.transcript.push_user(text);
        state.status = ChatStatus::Sending;

        let request = CompletionRequest::from_transcript(&state.transcript, &state.params);
        let events = vec![
            ChatEvent::MessageAppended(Message::new_user(text)),
            ChatEvent::StatusChanged(ChatStatus::Sending),
            ChatEvent::RequestIssued(request),
        ];

        (state, events)
    }

    fn handle_reply(mut state: ChatState, reply: String) -> (ChatState, Vec<ChatEvent>) {
        if !state.is_sending() {
            return (state, Vec::new());
        }

        state.transcript.push_assistant(reply.clone());
        state.status = ChatStatus::Idle;

        let events = vec![
            ChatEvent::MessageAppended(Message::new_assistant(reply)),
            ChatEvent::StatusChanged(ChatStatus::Idle),
        ];

        (state, events)
    }

    fn handle_failure(mut state: ChatState, reason: String) -> (ChatState, Vec<ChatEvent>) {
        if !state.is_sending() {
            return (state, Vec::new());
        }

        state.status = ChatStatus::Idle;

        let events = vec![
            ChatEvent::ErrorShown(reason),
            ChatEvent::StatusChanged(ChatStatus::Idle),
        ];

        (state, events)
    }

    fn handle_reset(mut state: ChatState) -> (ChatState, Vec<ChatEvent>) {
        if state.is_sending() {
            return (state, Vec::new());
        }

        state.transcript = state.transcript.restarted();
        state.session_id = Uuid::new_v4().to_string();

        (state, vec![ChatEvent::Cleared])
    }
}
