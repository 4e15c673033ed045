use std::borrow::Cow;

/// Errors raised by the frame bridge itself.
///
/// Message-level problems (unknown `type`, malformed payloads) are logged and
/// dropped by listeners; they never surface here.
#[haven_derive::haven_error]
pub enum BridgeError {
    /// The outgoing message could not be encoded as JSON.
    #[error("Message encoding failed{}: {source}", format_context(.context))]
    Encode { source: serde_json::Error, context: Option<Cow<'static, str>> },

    /// The target window was never opened or has been closed.
    #[error("Window not found{}: {message}", format_context(.context))]
    WindowNotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A window with this name is already open.
    #[error("Window already open{}: {message}", format_context(.context))]
    WindowExists { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Inbox capacity must be greater than zero.
    #[error("Invalid capacity{}: {message}", format_context(.context))]
    InvalidCapacity { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
