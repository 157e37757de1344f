//! Environment configuration.

/// Default size of the buffer host values are read into (16 KiB).
pub const DEFAULT_MAX_VALUE_SIZE: usize = 16 * 1024;

/// Configuration for an [`Env`](crate::Env).
#[derive(Debug, Clone)]
pub struct EnvConfig {
    /// Largest encoded value that may be read from or written to storage.
    pub max_value_size: usize,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            max_value_size: DEFAULT_MAX_VALUE_SIZE,
        }
    }
}
