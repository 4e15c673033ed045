use crate::ids::{OptionCategory, OptionValue};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// The chosen value per category, in first-insertion order.
///
/// Serialized as a flat JSON object, which is also the `options` payload of
/// `initializeModel`. A category appears at most once; setting it again
/// replaces the value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    entries: Vec<(OptionCategory, OptionValue)>,
}

impl Selection {
    #[must_use]
    pub const fn new() -> Self {
        Self { entries: Vec::new() }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn get(&self, category: &str) -> Option<&OptionValue> {
        self.entries.iter().find(|(key, _)| key.as_str() == category).map(|(_, value)| value)
    }

    /// Sets a category, returning the value it replaced.
    pub fn set(
        &mut self,
        category: impl Into<OptionCategory>,
        value: impl Into<OptionValue>,
    ) -> Option<OptionValue> {
        let category = category.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(key, _)| *key == category) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((category, value));
                None
            },
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&OptionCategory, &OptionValue)> {
        self.entries.iter().map(|(category, value)| (category, value))
    }

    pub fn categories(&self) -> impl Iterator<Item = &OptionCategory> {
        self.entries.iter().map(|(category, _)| category)
    }
}

impl<C: Into<OptionCategory>, V: Into<OptionValue>> FromIterator<(C, V)> for Selection {
    fn from_iter<I: IntoIterator<Item = (C, V)>>(iter: I) -> Self {
        let mut selection = Self::new();
        for (category, value) in iter {
            selection.set(category, value);
        }
        selection
    }
}

impl<'a> IntoIterator for &'a Selection {
    type Item = (&'a OptionCategory, &'a OptionValue);
    type IntoIter = std::iter::Map<
        std::slice::Iter<'a, (OptionCategory, OptionValue)>,
        fn(&'a (OptionCategory, OptionValue)) -> (&'a OptionCategory, &'a OptionValue),
    >;

    fn into_iter(self) -> Self::IntoIter {
        let split: fn(&'a (OptionCategory, OptionValue)) -> (&'a OptionCategory, &'a OptionValue) =
            |(category, value)| (category, value);
        self.entries.iter().map(split)
    }
}

impl IntoIterator for Selection {
    type Item = (OptionCategory, OptionValue);
    type IntoIter = std::vec::IntoIter<(OptionCategory, OptionValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Serialize for Selection {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (category, value) in &self.entries {
            map.serialize_entry(category, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Selection {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct SelectionVisitor;

        impl<'de> Visitor<'de> for SelectionVisitor {
            type Value = Selection;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a map of option category to option value")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut selection = Selection::new();
                while let Some((category, value)) =
                    access.next_entry::<OptionCategory, OptionValue>()?
                {
                    selection.set(category, value);
                }
                Ok(selection)
            }
        }

        deserializer.deserialize_map(SelectionVisitor)
    }
}
