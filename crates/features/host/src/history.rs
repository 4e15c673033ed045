use haven_kernel::location::Location;
use tracing::trace;

/// Session history of the host page.
///
/// Option clicks rewrite the current entry in place; only external
/// navigation adds entries. Moving back or forward is what fires `popstate`.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<Location>,
    index: usize,
}

impl History {
    #[must_use]
    pub fn new(location: Location) -> Self {
        Self { entries: vec![location], index: 0 }
    }

    #[must_use]
    pub fn location(&self) -> &Location {
        &self.entries[self.index]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `history.replaceState`: swaps the current entry.
    pub fn replace(&mut self, location: Location) {
        trace!(href = location.href(), "History entry replaced");
        self.entries[self.index] = location;
    }

    /// `history.pushState`: drops forward entries and appends `location`.
    pub fn push(&mut self, location: Location) {
        self.entries.truncate(self.index + 1);
        self.entries.push(location);
        self.index = self.entries.len() - 1;
    }

    /// Steps back; `false` at the oldest entry.
    pub fn back(&mut self) -> bool {
        if self.index == 0 {
            return false;
        }
        self.index -= 1;
        true
    }

    /// Steps forward; `false` at the newest entry.
    pub fn forward(&mut self) -> bool {
        if self.index + 1 >= self.entries.len() {
            return false;
        }
        self.index += 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(query: &str) -> Location {
        Location::parse(&format!("https://shop.example/models/solo-haven?{query}")).expect("url")
    }

    #[test]
    fn test_replace_keeps_length() {
        let mut history = History::new(at("a=1"));
        history.replace(at("a=2"));
        assert_eq!(history.len(), 1);
        assert_eq!(history.location().query(), "a=2");
        assert!(!history.back());
    }

    #[test]
    fn test_push_truncates_forward_entries() {
        let mut history = History::new(at("a=1"));
        history.push(at("a=2"));
        history.push(at("a=3"));
        assert!(history.back());
        assert!(history.back());
        assert_eq!(history.location().query(), "a=1");

        history.push(at("b=1"));
        assert_eq!(history.len(), 2);
        assert!(!history.forward());
        assert!(history.back());
        assert!(history.forward());
        assert_eq!(history.location().query(), "b=1");
    }
}
