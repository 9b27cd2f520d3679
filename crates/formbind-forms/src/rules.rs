//! Rule specifications and ordered rule sets.
//!
//! A [`RuleSpec`] is one named validation predicate; a [`RuleSet`] is an
//! ordered mapping from rule name to spec. Sets merge by union: later entries
//! overwrite same-named earlier ones in place, keeping the original
//! position, so a field's rules always evaluate in first-declaration
//! order and rule names stay unique within the active set.

use regex::Regex;

/// One validation predicate.
#[derive(Debug, Clone)]
pub enum RuleSpec {
    /// The normalized value must match the pattern.
    Pattern(Regex),
    /// The trimmed value must equal the named sibling field's stored
    /// value. Resolved through the owning binder at validation time,
    /// never at construction time.
    FieldReference(String),
    /// Presence: a non-empty trimmed value for free text, the "on"
    /// state for a toggle.
    Presence,
}

/// An ordered mapping from rule name to [`RuleSpec`].
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    entries: Vec<(String, RuleSpec)>,
}

impl RuleSet {
    /// Creates an empty rule set.
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Creates a set holding a single named rule.
    pub fn single(name: impl Into<String>, spec: RuleSpec) -> Self {
        Self {
            entries: vec![(name.into(), spec)],
        }
    }

    /// Inserts a rule. An existing rule with the same name is replaced
    /// in place; otherwise the rule is appended.
    pub fn insert(&mut self, name: impl Into<String>, spec: RuleSpec) {
        let name = name.into();
        if let Some(entry) = self.entries.iter_mut().find(|(n, _)| *n == name) {
            entry.1 = spec;
        } else {
            self.entries.push((name, spec));
        }
    }

    /// Removes the rule with the given name.
    ///
    /// Returns `false` (a no-op) when the name is absent.
    pub fn remove(&mut self, name: &str) -> bool {
        let len_before = self.entries.len();
        self.entries.retain(|(n, _)| n != name);
        self.entries.len() < len_before
    }

    /// Merges another set into this one, later entries overwriting
    /// same-named earlier ones.
    pub fn merge(&mut self, other: Self) {
        for (name, spec) in other.entries {
            self.insert(name, spec);
        }
    }

    /// Unions an ordered list of sets, left to right.
    pub fn union(sets: impl IntoIterator<Item = Self>) -> Self {
        let mut merged = Self::new();
        for set in sets {
            merged.merge(set);
        }
        merged
    }

    /// Looks up a rule by name.
    pub fn get(&self, name: &str) -> Option<&RuleSpec> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, spec)| spec)
    }

    /// Returns `true` if a rule with the given name is present.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterates rules in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RuleSpec)> {
        self.entries.iter().map(|(name, spec)| (name.as_str(), spec))
    }

    /// Iterates rule names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// The number of rules in the set.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the set holds no rules.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(source: &str) -> RuleSpec {
        RuleSpec::Pattern(Regex::new(source).expect("valid pattern"))
    }

    #[test]
    fn test_insert_preserves_order() {
        let mut rules = RuleSet::new();
        rules.insert("first", pattern("a"));
        rules.insert("second", pattern("b"));
        rules.insert("third", pattern("c"));
        let names: Vec<&str> = rules.names().collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_insert_overwrites_in_place() {
        let mut rules = RuleSet::new();
        rules.insert("keep", pattern("a"));
        rules.insert("replace", pattern("b"));
        rules.insert("tail", pattern("c"));
        rules.insert("replace", pattern("^z$"));

        let names: Vec<&str> = rules.names().collect();
        assert_eq!(names, vec!["keep", "replace", "tail"]);
        match rules.get("replace") {
            Some(RuleSpec::Pattern(re)) => assert!(re.is_match("z")),
            other => panic!("unexpected spec: {other:?}"),
        }
    }

    #[test]
    fn test_remove_is_noop_when_absent() {
        let mut rules = RuleSet::single("only", RuleSpec::Presence);
        assert!(!rules.remove("missing"));
        assert_eq!(rules.len(), 1);
        assert!(rules.remove("only"));
        assert!(rules.is_empty());
    }

    #[test]
    fn test_union_merges_left_to_right() {
        let merged = RuleSet::union([
            RuleSet::single("a", RuleSpec::Presence),
            RuleSet::single("b", pattern("x")),
            RuleSet::single("a", RuleSpec::FieldReference("other".into())),
        ]);

        assert_eq!(merged.len(), 2);
        assert!(matches!(
            merged.get("a"),
            Some(RuleSpec::FieldReference(name)) if name == "other"
        ));
        let names: Vec<&str> = merged.names().collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_contains() {
        let rules = RuleSet::single("required", RuleSpec::Presence);
        assert!(rules.contains("required"));
        assert!(!rules.contains("email"));
    }
}
