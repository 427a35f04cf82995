// Fri Oct 16 2026 - Alex

use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Change {
    pub name: &'static str,
    pub old: Option<u32>,
    pub new: u32,
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.old {
            Some(old) => write!(f, "{}: {} -> {}", self.name, old, self.new),
            None => write!(f, "{}: {}", self.name, self.new),
        }
    }
}

/// Item values in catalog order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Snapshot {
    values: IndexMap<&'static str, u32>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: &'static str, value: u32) {
        self.values.insert(name, value);
    }

    pub fn get(&self, name: &str) -> Option<u32> {
        self.values.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, u32)> + '_ {
        self.values.iter().map(|(name, value)| (*name, *value))
    }

    /// Entries of `self` that are new or differ from `previous`, in catalog order.
    pub fn changes_since(&self, previous: &Snapshot) -> Vec<Change> {
        self.iter()
            .filter_map(|(name, new)| {
                let old = previous.get(name);
                (old != Some(new)).then_some(Change { name, old, new })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_changes_keep_catalog_order() {
        let mut before = Snapshot::new();
        before.set("Slam", 1);
        before.set("Crowns", 2);
        before.set("Bean", 0);

        let mut after = before.clone();
        after.set("Bean", 1);
        after.set("Slam", 2);

        let changes = after.changes_since(&before);
        assert_eq!(
            changes,
            vec![
                Change { name: "Slam", old: Some(1), new: 2 },
                Change { name: "Bean", old: Some(0), new: 1 },
            ]
        );
        assert_eq!(changes[0].to_string(), "Slam: 1 -> 2");
    }

    #[test]
    fn test_first_snapshot_reports_everything() {
        let mut snapshot = Snapshot::new();
        snapshot.set("Key 1", 0);
        snapshot.set("Medals", 12);
        let changes = snapshot.changes_since(&Snapshot::new());
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[1].to_string(), "Medals: 12");
    }

    #[test]
    fn test_serializes_as_ordered_object() {
        let mut snapshot = Snapshot::new();
        snapshot.set("Medals", 3);
        snapshot.set("Crowns", 1);
        assert_eq!(serde_json::to_string(&snapshot).unwrap(), r#"{"Medals":3,"Crowns":1}"#);
    }
}
