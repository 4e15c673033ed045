use crate::constants::SIDE_PREFIX;
use crate::model::WallPosition;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            #[must_use]
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id! {
    /// Product model slug, e.g. `solo-haven`.
    ModelId
}

string_id! {
    /// Option category key; doubles as the URL query key.
    OptionCategory
}

string_id! {
    /// Chosen value within a category. Only the applier decides what is valid.
    OptionValue
}

impl ModelId {
    /// Model named by the last segment of a page path (`/models/solo-haven`).
    ///
    /// Trailing slashes are ignored; a path without segments yields an empty id,
    /// which the registry treats as an unknown model.
    #[must_use]
    pub fn from_path(path: &str) -> Self {
        Self::from(path.trim_end_matches('/').rsplit('/').next().unwrap_or_default())
    }
}

impl OptionCategory {
    /// The numbered wall category `side-<n>`.
    #[must_use]
    pub fn side(index: u32) -> Self {
        Self(format!("{SIDE_PREFIX}{index}"))
    }

    /// `n` for a `side-<n>` category with `n >= 1`.
    #[must_use]
    pub fn side_index(&self) -> Option<u32> {
        let digits = self.0.strip_prefix(SIDE_PREFIX)?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok().filter(|index| *index >= 1)
    }

    /// Container and wall addressed by a `side-<n>` category.
    #[must_use]
    pub fn wall_position(&self) -> Option<WallPosition> {
        self.side_index().and_then(WallPosition::from_side_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_from_path_takes_last_segment() {
        assert_eq!(ModelId::from_path("/models/solo-haven"), "solo-haven");
        assert_eq!(ModelId::from_path("/models/duo-oasis/"), "duo-oasis");
        assert_eq!(ModelId::from_path("skyline-loft"), "skyline-loft");
        assert!(ModelId::from_path("/").is_empty());
    }

    #[test]
    fn test_side_index_parsing() {
        assert_eq!(OptionCategory::from("side-1").side_index(), Some(1));
        assert_eq!(OptionCategory::from("side-12").side_index(), Some(12));
        assert_eq!(OptionCategory::from("side-0").side_index(), None);
        assert_eq!(OptionCategory::from("side-").side_index(), None);
        assert_eq!(OptionCategory::from("side-+3").side_index(), None);
        assert_eq!(OptionCategory::from("siding-color").side_index(), None);
        assert_eq!(OptionCategory::side(7), "side-7");
    }
}
