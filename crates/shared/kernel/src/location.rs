use haven_domain::{ModelId, Selection};
use std::borrow::Cow;
use std::fmt;
use url::Url;

/// Errors raised while parsing page addresses.
#[haven_derive::haven_error]
pub enum LocationError {
    #[error("Invalid page URL{}: {source}", format_context(.context))]
    Parse { source: url::ParseError, context: Option<Cow<'static, str>> },
}

/// The host page address: origin, model path and the selection query.
///
/// Query handling follows `URLSearchParams`: `set` replaces the first
/// occurrence of a key and drops later duplicates, new keys are appended,
/// and serialization uses form encoding (`Space+Black`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    url: Url,
}

impl Location {
    /// Parses an absolute page URL.
    ///
    /// # Errors
    /// Returns [`LocationError::Parse`] for anything that is not an absolute URL.
    pub fn parse(input: &str) -> Result<Self, LocationError> {
        let url = Url::parse(input).context(format!("'{input}'"))?;
        Ok(Self { url })
    }

    /// Resolves a path (with optional query) against an origin.
    ///
    /// # Errors
    /// Returns [`LocationError::Parse`] if either part is malformed.
    pub fn from_origin(origin: &str, path_and_query: &str) -> Result<Self, LocationError> {
        let base = Url::parse(origin).context(format!("origin '{origin}'"))?;
        let url = base.join(path_and_query).context(format!("path '{path_and_query}'"))?;
        Ok(Self { url })
    }

    /// Parses `input` as an absolute URL, falling back to a path under `origin`.
    ///
    /// # Errors
    /// Returns [`LocationError::Parse`] if neither interpretation works.
    pub fn parse_with_origin(input: &str, origin: &str) -> Result<Self, LocationError> {
        match Url::parse(input) {
            Ok(url) => Ok(Self { url }),
            Err(url::ParseError::RelativeUrlWithoutBase) => Self::from_origin(origin, input),
            Err(source) => Err(LocationError::Parse { source, context: Some(input.to_owned().into()) }),
        }
    }

    /// Model named by the last path segment.
    #[must_use]
    pub fn model_id(&self) -> ModelId {
        ModelId::from_path(self.url.path())
    }

    #[must_use]
    pub fn origin(&self) -> String {
        self.url.origin().ascii_serialization()
    }

    #[must_use]
    pub fn path(&self) -> &str {
        self.url.path()
    }

    /// The serialized query without the leading `?`, empty when absent.
    #[must_use]
    pub fn query(&self) -> &str {
        self.url.query().unwrap_or_default()
    }

    /// `path?query`, the argument `history.replaceState` receives.
    #[must_use]
    pub fn path_and_query(&self) -> String {
        format!("{}?{}", self.path(), self.query())
    }

    /// `origin + path + ?query`, the link shown to and copied by the shopper.
    #[must_use]
    pub fn shareable_link(&self) -> String {
        format!("{}{}", self.origin(), self.path_and_query())
    }

    #[must_use]
    pub fn href(&self) -> &str {
        self.url.as_str()
    }

    /// Query parameters flattened into a selection; a repeated key keeps its
    /// last value.
    #[must_use]
    pub fn query_selection(&self) -> Selection {
        self.url.query_pairs().map(|(key, value)| (key.into_owned(), value.into_owned())).collect()
    }

    #[must_use]
    pub fn query_value(&self, key: &str) -> Option<String> {
        self.url.query_pairs().find(|(name, _)| name == key).map(|(_, value)| value.into_owned())
    }

    #[must_use]
    pub fn has_query_key(&self, key: &str) -> bool {
        self.url.query_pairs().any(|(name, _)| name == key)
    }

    /// Sets one query parameter the way `URLSearchParams::set` does.
    pub fn set_query_value(&mut self, key: &str, value: &str) {
        let mut pairs: Vec<(String, String)> = Vec::new();
        let mut replaced = false;
        for (name, current) in self.url.query_pairs() {
            if name == key {
                if !replaced {
                    pairs.push((name.into_owned(), value.to_owned()));
                    replaced = true;
                }
            } else {
                pairs.push((name.into_owned(), current.into_owned()));
            }
        }
        if !replaced {
            pairs.push((key.to_owned(), value.to_owned()));
        }
        self.url.query_pairs_mut().clear().extend_pairs(pairs);
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}
