pub mod schema;

pub use schema::{
    Config, ConversationConfig, ProviderConfig, QuotaConfig, ReliabilityConfig, SafetyConfig,
    StorageBackend, StorageConfig,
};
