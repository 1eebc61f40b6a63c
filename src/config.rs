//! Delivery limits configuration.

use crate::error::ConfigError;

/// Hard per-message payload limit enforced by the Telegram Bot API.
pub const TELEGRAM_HARD_LIMIT: usize = 4096;

/// Default working limit: 4096 hard limit minus headroom for the
/// transport's own metadata/markup overhead.
pub const DEFAULT_MAX_LEN: usize = 4000;

/// Default suffix appended by [`crate::split::truncate_safe`].
pub const DEFAULT_TRUNCATION_SUFFIX: &str = "\n\n... (truncated)";

/// Limits applied when preparing outbound messages.
#[derive(Debug, Clone)]
pub struct DeliveryLimits {
    /// Working chunk length, kept below [`TELEGRAM_HARD_LIMIT`].
    pub max_len: usize,
    /// Suffix appended when truncating to a single bounded chunk.
    pub truncation_suffix: String,
}

impl Default for DeliveryLimits {
    fn default() -> Self {
        Self {
            max_len: DEFAULT_MAX_LEN,
            truncation_suffix: DEFAULT_TRUNCATION_SUFFIX.to_string(),
        }
    }
}

impl DeliveryLimits {
    /// Load limits from the environment, falling back to defaults.
    ///
    /// Recognized variables: `SAFEMARK_MAX_LEN`, `SAFEMARK_TRUNCATION_SUFFIX`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let max_len = match std::env::var("SAFEMARK_MAX_LEN") {
            Ok(raw) => raw
                .parse::<usize>()
                .map_err(|e| ConfigError::InvalidValue {
                    key: "SAFEMARK_MAX_LEN".to_string(),
                    message: e.to_string(),
                })?,
            Err(_) => DEFAULT_MAX_LEN,
        };

        if max_len == 0 || max_len > TELEGRAM_HARD_LIMIT {
            return Err(ConfigError::InvalidValue {
                key: "SAFEMARK_MAX_LEN".to_string(),
                message: format!("must be in 1..={TELEGRAM_HARD_LIMIT}, got {max_len}"),
            });
        }

        let truncation_suffix = std::env::var("SAFEMARK_TRUNCATION_SUFFIX")
            .unwrap_or_else(|_| DEFAULT_TRUNCATION_SUFFIX.to_string());

        Ok(Self {
            max_len,
            truncation_suffix,
        })
    }
}
