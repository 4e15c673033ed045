use std::borrow::Cow;

/// Errors raised while running a configurator session.
#[haven_derive::haven_error]
pub enum SessionError {
    #[error("Bridge failure{}: {source}", format_context(.context))]
    Bridge { source: haven_bridge::BridgeError, context: Option<Cow<'static, str>> },

    #[error("Host page failed{}: {source}", format_context(.context))]
    Host { source: haven_host::HostError, context: Option<Cow<'static, str>> },

    #[error("Preview frame failed{}: {source}", format_context(.context))]
    Preview { source: haven_preview::PreviewError, context: Option<Cow<'static, str>> },

    /// A context's task panicked or was cancelled.
    #[error("Context task aborted{}: {source}", format_context(.context))]
    Join { source: tokio::task::JoinError, context: Option<Cow<'static, str>> },
}
