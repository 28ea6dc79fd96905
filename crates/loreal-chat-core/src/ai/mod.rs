pub mod worker;

pub use worker::WorkerClient;

use async_trait::async_trait;

use crate::error::ChatError;
use crate::state::ChatMessage;

/// Something that can answer a full conversation with one reply.
///
/// The controller only talks to this trait so tests can swap in a scripted
/// backend instead of the network.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ChatError>;
}
