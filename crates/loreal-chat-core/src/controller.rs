//! Submission controller: one user turn, one round trip
//!
//! A turn is split in two halves so the UI loop never blocks on the network:
//! [`SubmissionController::begin`] validates the input, records the user
//! message and shows a placeholder; the request then runs elsewhere with an
//! owned snapshot of the history, and [`SubmissionController::resolve`]
//! applies the outcome back on the UI side. Only one turn may be in flight.

use std::sync::Arc;

use crate::ai::ChatBackend;
use crate::chat_window::{BubbleKind, ChatWindow, TurnId};
use crate::error::ChatError;
use crate::input::InputLine;
use crate::state::{ChatMessage, Conversation};

/// A dispatched turn waiting for its reply.
#[derive(Debug, Clone)]
pub struct PendingTurn {
    pub id: TurnId,
    /// Full history at dispatch time, system message included.
    pub messages: Vec<ChatMessage>,
}

/// How a turn ended, as seen by the chat window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Replied(String),
    Failed,
    /// The outcome belonged to a turn that is no longer in flight.
    Stale,
}

pub struct SubmissionController<B> {
    conversation: Conversation,
    backend: Arc<B>,
    next_turn: u64,
    in_flight: Option<TurnId>,
}

impl<B: ChatBackend + 'static> SubmissionController<B> {
    pub fn new(conversation: Conversation, backend: B) -> Self {
        Self {
            conversation,
            backend: Arc::new(backend),
            next_turn: 1,
            in_flight: None,
        }
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn backend(&self) -> Arc<B> {
        Arc::clone(&self.backend)
    }

    pub fn in_flight(&self) -> Option<TurnId> {
        self.in_flight
    }

    pub fn is_pending(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Start a turn from the current input.
    ///
    /// Returns `None` without touching anything when the trimmed input is
    /// empty or another turn is still waiting for its reply.
    pub fn begin(&mut self, input: &mut InputLine, window: &mut ChatWindow) -> Option<PendingTurn> {
        let message = input.trimmed().to_string();
        if message.is_empty() || self.is_pending() {
            return None;
        }

        self.conversation.push_user(message.clone());
        window.append(BubbleKind::User, message);
        input.clear();

        let id = TurnId::new(self.next_turn);
        self.next_turn += 1;
        window.append_placeholder(id);
        self.in_flight = Some(id);

        tracing::info!(turn = %id, history = self.conversation.len(), "dispatching chat turn");

        Some(PendingTurn {
            id,
            messages: self.conversation.messages().to_vec(),
        })
    }

    /// Apply the outcome of a turn started by [`begin`](Self::begin).
    pub fn resolve(
        &mut self,
        turn: TurnId,
        outcome: Result<String, ChatError>,
        window: &mut ChatWindow,
    ) -> Resolution {
        if self.in_flight != Some(turn) {
            tracing::warn!(turn = %turn, "ignoring outcome for a turn that is not in flight");
            return Resolution::Stale;
        }
        self.in_flight = None;
        window.remove_placeholder(turn);

        match outcome {
            Ok(reply) => {
                tracing::info!(turn = %turn, chars = reply.chars().count(), "chat turn answered");
                self.conversation.push_assistant(reply.clone());
                window.append(BubbleKind::Ai, reply.clone());
                Resolution::Replied(reply)
            }
            Err(err) => {
                // Diagnostic detail stays in the log; the window gets the apology only.
                tracing::error!(turn = %turn, error = %err, "chat turn failed");
                window.append(BubbleKind::Ai, err.user_message());
                Resolution::Failed
            }
        }
    }

    /// Begin, run and resolve a turn in one go.
    pub async fn submit(&mut self, input: &mut InputLine, window: &mut ChatWindow) -> Option<Resolution> {
        let pending = self.begin(input, window)?;
        let id = pending.id;
        let outcome = run_turn(self.backend(), pending).await;
        Some(self.resolve(id, outcome, window))
    }
}

/// Ask the backend for a reply on a separate task.
///
/// A panicking backend surfaces as [`ChatError::Aborted`] instead of leaving
/// the turn in flight forever.
pub async fn run_turn<B: ChatBackend + 'static>(backend: Arc<B>, pending: PendingTurn) -> Result<String, ChatError> {
    let task = tokio::spawn(async move { backend.complete(&pending.messages).await });

    match task.await {
        Ok(outcome) => outcome,
        Err(join_err) => Err(ChatError::Aborted(join_err.to_string())),
    }
}
