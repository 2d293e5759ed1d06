use std::collections::HashSet;

/// Insertion-ordered string set: a sequence plus a membership index.
#[derive(Debug, Default, Clone)]
pub struct OrderedSet {
    items: Vec<String>,
    seen: HashSet<String>,
}

impl OrderedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `item` unless already present. Returns whether it was added.
    pub fn insert(&mut self, item: impl Into<String>) -> bool {
        let item = item.into();
        if self.seen.contains(&item) {
            return false;
        }
        self.seen.insert(item.clone());
        self.items.push(item);
        true
    }

    pub fn contains(&self, item: &str) -> bool {
        self.seen.contains(item)
    }

    pub fn into_vec(self) -> Vec<String> {
        self.items
    }
}
