use std::collections::HashSet;

/// Strip path qualifier from a symbol name: `github.com/a/b.F` -> `b.F`.
pub fn strip_path(name: &str) -> &str {
    match name.rfind('/') {
        Some(idx) => &name[idx + 1..],
        None => name,
    }
}

/// Set of known names (type names or function names) of a debugee program.
///
/// Names are stored as is and, when they are path qualified, without a path qualifier too,
/// so both `github.com/a/b.T` and `b.T` are known after inserting the first one.
#[derive(Debug, Clone, Default)]
pub struct NameRegistry(HashSet<String>);

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>) {
        let name = name.into();
        let stripped = strip_path(&name);
        if stripped.len() != name.len() {
            self.0.insert(stripped.to_string());
        }
        self.0.insert(name);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for NameRegistry {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        let mut registry = NameRegistry::new();
        registry.extend(iter);
        registry
    }
}

impl<S: Into<String>> Extend<S> for NameRegistry {
    fn extend<T: IntoIterator<Item = S>>(&mut self, iter: T) {
        iter.into_iter().for_each(|name| self.insert(name));
    }
}
