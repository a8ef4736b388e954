pub mod store;
pub mod types;

pub use store::{ConversationStore, conversation_key};
pub use types::{ConversationMessage, ConversationRecord, MessageRole};
