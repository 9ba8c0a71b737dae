use thiserror::Error;

/// Errors from the messaging platform (Send API, attachment upload,
/// profile lookup).
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("messenger request failed: {0}")]
    Transport(String),

    #[error("messenger returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unexpected messenger response: {0}")]
    InvalidResponse(String),
}

/// Errors from the text-to-speech collaborator.
#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("text-to-speech is not configured")]
    NotConfigured,

    #[error("text-to-speech request failed: {0}")]
    Transport(String),

    #[error("text-to-speech returned HTTP {status}")]
    Status { status: u16 },

    #[error("text-to-speech returned no audio")]
    EmptyAudio,

    #[error("audio upload failed: {0}")]
    Upload(#[from] DeliveryError),
}

/// Errors while assembling runtime configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required secret: {0}")]
    MissingSecret(&'static str),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delivery_error_display() {
        let err = DeliveryError::Status {
            status: 400,
            body: "bad".into(),
        };
        assert_eq!(err.to_string(), "messenger returned HTTP 400: bad");
    }

    #[test]
    fn test_speech_error_wraps_delivery() {
        let err: SpeechError = DeliveryError::Transport("timeout".into()).into();
        assert!(err.to_string().contains("timeout"));
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::MissingSecret("VERIFY_TOKEN");
        assert_eq!(err.to_string(), "missing required secret: VERIFY_TOKEN");
    }
}
