/// Result alias that carries the custom [`FreqVizError`] type.
pub type Result<T> = std::result::Result<T, FreqVizError>;

/// Common error type for the core crate.
#[derive(Debug, thiserror::Error)]
pub enum FreqVizError {
    /// A theme name outside the built-in palette set was requested.
    #[error("unknown colour theme `{0}`")]
    UnknownTheme(String),
    /// A track key that is not part of the catalog was requested.
    #[error("unknown track `{0}`")]
    UnknownTrack(String),
    /// Configuration values that cannot drive the pipeline.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// The playback state machine rejected an event.
    #[error("cannot apply `{event}` while playback is {from}")]
    InvalidTransition { from: String, event: String },
    /// Free-form message, mostly used by the application crate.
    #[error("{0}")]
    Message(String),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// Wrapper around JSON (de)serialisation failures.
    #[error("{0}")]
    Json(#[from] serde_json::Error),
    /// The FFT backend rejected its buffers.
    #[error("fft failure: {0}")]
    Fft(#[from] realfft::FftError),
}

impl FreqVizError {
    /// Creates a new error that simply wraps the provided message.
    pub fn msg<T: Into<String>>(msg: T) -> Self {
        Self::Message(msg.into())
    }
}

impl From<&str> for FreqVizError {
    fn from(value: &str) -> Self {
        Self::msg(value)
    }
}

impl From<String> for FreqVizError {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}
