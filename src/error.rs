use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for the coach engine.
///
/// Every operation the engine exposes returns one of these. Callers match on
/// the variant (or on [`CoachError::code`]) to decide what the user sees;
/// adapter code continues to use `anyhow::Result` for ad-hoc context chains
/// and converts at the module seam.
#[derive(Debug, Error)]
pub enum CoachError {
    // ── Quota ───────────────────────────────────────────────────────────
    #[error("Daily message limit reached. You've used {used} of {limit} coach messages today.")]
    QuotaExceeded { used: u32, limit: u32 },

    // ── Upstream chat completion ────────────────────────────────────────
    #[error("external service {provider} failed: {message}")]
    ExternalService { provider: String, message: String },

    // ── Input validation ────────────────────────────────────────────────
    #[error("validation failed: {0}")]
    Validation(String),

    // ── Storage ─────────────────────────────────────────────────────────
    #[error("storage: {0}")]
    Storage(#[from] StorageError),

    // ── Config ──────────────────────────────────────────────────────────
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CoachError {
    /// Stable machine-readable code for the UI layer.
    pub fn code(&self) -> &'static str {
        match self {
            Self::QuotaExceeded { .. } => "QUOTA_EXCEEDED",
            Self::ExternalService { .. } => "EXTERNAL_SERVICE_ERROR",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Storage(_) => "STORAGE_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Other(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether retrying the same call later in the same period can succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ExternalService { .. } | Self::Storage(_))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn external(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ExternalService {
            provider: provider.into(),
            message: message.into(),
        }
    }
}

// ─── Storage errors ─────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("backend: {0}")]
    Backend(String),

    #[error("corrupt value at {key}: {message}")]
    Corrupt { key: String, message: String },

    #[error("schema migration failed: {0}")]
    Migration(String),

    #[error("sqlx: {0}")]
    Sqlx(#[from] sqlx::Error),
}

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

// ─── Convenience re-exports ─────────────────────────────────────────────────

/// Shorthand result type for the crate.
pub type Result<T> = std::result::Result<T, CoachError>;
