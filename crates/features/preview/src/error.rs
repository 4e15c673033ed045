use std::borrow::Cow;

/// Errors raised inside the preview frame.
///
/// Option-level problems (unknown colors, categories the model lacks) are
/// warnings, never errors; only loading and transport fail.
#[haven_derive::haven_error]
pub enum PreviewError {
    /// The scene manifest could not be read.
    #[error("Asset I/O failed{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    /// The scene manifest is not valid JSON or does not describe a scene.
    #[error("Malformed scene manifest{}: {source}", format_context(.context))]
    Manifest { source: serde_json::Error, context: Option<Cow<'static, str>> },

    /// No asset exists for the requested model.
    #[error("Asset not found{}: {message}", format_context(.context))]
    AssetNotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A color string is not `#RRGGBB`.
    #[error("Invalid color{}: {message}", format_context(.context))]
    InvalidColor { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The host window went away.
    #[error("Bridge failure{}: {source}", format_context(.context))]
    Bridge { source: haven_bridge::BridgeError, context: Option<Cow<'static, str>> },
}
