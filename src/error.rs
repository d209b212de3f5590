use thiserror::Error;

/// Application-level error carrying the process exit code.
///
/// Exit codes:
/// - `2` input/config problems (missing files, bad columns, bad flags)
/// - `3` no usable data (empty tables, unknown channel)
/// - `4` terminal/runtime failures
#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

/// Errors raised by curve probing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    /// The curve table has no samples for the requested channel.
    #[error("no curve samples for channel `{channel}`")]
    EmptyChannel { channel: String },
}

impl From<ProbeError> for AppError {
    fn from(err: ProbeError) -> Self {
        AppError::new(3, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_channel_maps_to_exit_code_three() {
        let err: AppError = ProbeError::EmptyChannel {
            channel: "tiktok".to_string(),
        }
        .into();
        assert_eq!(err.exit_code(), 3);
        assert_eq!(err.to_string(), "no curve samples for channel `tiktok`");
    }
}
