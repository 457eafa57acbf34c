use std::collections::BTreeSet;

/// Categories offered to the user. A UI affordance only: labels outside this
/// list are accepted by [`TargetSelection`].
pub const CATEGORY_UNIVERSE: [&str; 4] = ["face", "flag", "landmark", "sign"];

/// The set of content categories the user wants redacted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetSelection {
    labels: BTreeSet<String>,
}

impl Default for TargetSelection {
    fn default() -> Self {
        Self::all()
    }
}

impl TargetSelection {
    pub fn empty() -> Self {
        Self {
            labels: BTreeSet::new(),
        }
    }

    /// Every label in [`CATEGORY_UNIVERSE`].
    pub fn all() -> Self {
        CATEGORY_UNIVERSE.iter().copied().collect()
    }

    /// Returns the selection with `label` added if absent, removed if present.
    pub fn toggled(&self, label: &str) -> Self {
        let mut next = self.clone();
        next.toggle(label);
        next
    }

    pub fn toggle(&mut self, label: &str) {
        if !self.labels.remove(label) {
            self.labels.insert(label.to_string());
        }
    }

    pub fn contains(&self, label: &str) -> bool {
        self.labels.contains(label)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Labels in ascending order.
    pub fn labels(&self) -> impl Iterator<Item = &str> + '_ {
        self.labels.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for TargetSelection {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            labels: iter.into_iter().map(Into::into).collect(),
        }
    }
}
