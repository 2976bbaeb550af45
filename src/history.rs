//! Session history — ordered ids of the poses shown in the active session.
//!
//! DESIGN
//! ======
//! Owned by the session and passed by reference to the selector, which only
//! reads it. Each session starts with a fresh history and clears it when
//! abandoned, so nothing leaks between sessions. Every displayed pose is
//! appended, repeats included, so `len()` counts poses shown and sequence
//! cycling can index by it.

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SessionHistory {
    ids: Vec<String>,
}

impl SessionHistory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, id: impl Into<String>) {
        self.ids.push(id.into());
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|shown| shown == id)
    }

    /// Owned copy of the ids in display order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<String> {
        self.ids.clone()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.ids
    }

    #[must_use]
    pub fn last(&self) -> Option<&str> {
        self.ids.last().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn pop_last(&mut self) -> Option<String> {
        self.ids.pop()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Step back one pose: drop the current entry and return the previous
    /// one, which stays recorded as current. No-op below two entries.
    pub fn go_back(&mut self) -> Option<String> {
        if self.ids.len() < 2 {
            return None;
        }
        self.pop_last();
        let previous = self.pop_last()?;
        self.append(previous.clone());
        Some(previous)
    }
}

#[cfg(test)]
#[path = "history_test.rs"]
mod tests;
