use haven_bridge::BridgeError;
use haven_kernel::location::LocationError;
use std::borrow::Cow;

/// Errors raised on the host page.
#[haven_derive::haven_error]
pub enum HostError {
    /// A page address could not be parsed or resolved.
    #[error("Location error{}: {source}", format_context(.context))]
    Location { source: LocationError, context: Option<Cow<'static, str>> },

    /// The preview frame is gone.
    #[error("Bridge failure{}: {source}", format_context(.context))]
    Bridge { source: BridgeError, context: Option<Cow<'static, str>> },

    /// The clipboard refused the write.
    #[error("Clipboard write failed{}: {message}", format_context(.context))]
    Clipboard { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
