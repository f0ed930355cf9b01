use std::collections::BTreeMap;

use crate::error::{EntCertError, Result};
use crate::oid::{Oid, OidPattern};

/// A sparse tree of certificate extension values keyed by [`Oid`].
///
/// The tree is built once from the `(dotted identifier, value)` pairs of a
/// certificate and never changes afterwards. [`ltrim`](Self::ltrim) and
/// [`branch`](Self::branch) return new, independent trees, which is how the
/// certificate builders walk into nested structures and then address fields
/// with short relative paths.
///
/// Entries keep the order they were supplied in; [`find`](Self::find) and
/// [`iter`](Self::iter) follow it.
///
/// # Example
/// ```
/// use entcert::extensions::ExtensionTree;
///
/// let tree = ExtensionTree::new([("1.100.1", "Awesome OS"), ("1.100.2", "3.11")]).unwrap();
/// let product = tree.branch(&"1.100".parse().unwrap());
/// assert_eq!(product.get("1").unwrap(), "Awesome OS");
/// assert_eq!(product.get("2").unwrap(), "3.11");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionTree {
    entries: Vec<(Oid, String)>,
    index: BTreeMap<Oid, usize>,
}

impl ExtensionTree {
    /// Builds a tree from raw `(dotted identifier, value)` pairs.
    ///
    /// # Errors
    /// Fails without exposing a partial tree if any key is not a valid dotted
    /// identifier (`MalformedIdentifier`) or appears twice (`DuplicateIdentifier`).
    pub fn new<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut tree = Self::default();
        for (key, value) in pairs {
            let oid: Oid = key.as_ref().parse()?;
            if tree.index.contains_key(&oid) {
                return Err(EntCertError::DuplicateIdentifier(oid.to_string()));
            }
            tree.push(oid, value.into());
        }
        Ok(tree)
    }

    // First writer wins on a key collision.
    fn from_entries(entries: impl IntoIterator<Item = (Oid, String)>) -> Self {
        let mut tree = Self::default();
        for (oid, value) in entries {
            if !tree.index.contains_key(&oid) {
                tree.push(oid, value);
            }
        }
        tree
    }

    fn push(&mut self, oid: Oid, value: String) {
        self.index.insert(oid.clone(), self.entries.len());
        self.entries.push((oid, value));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, oid: &Oid) -> bool {
        self.index.contains_key(oid)
    }

    /// Like [`contains`](Self::contains) but takes a dotted string. A malformed
    /// string is never contained.
    pub fn contains_str(&self, dotted: &str) -> bool {
        dotted
            .parse::<Oid>()
            .is_ok_and(|oid| self.contains(&oid))
    }

    /// Looks up a value by identifier.
    pub fn value(&self, oid: &Oid) -> Option<&str> {
        self.index
            .get(oid)
            .map(|&position| self.entries[position].1.as_str())
    }

    /// Looks up a value by dotted identifier.
    ///
    /// # Errors
    /// `MalformedIdentifier` if `dotted` does not parse, `NotFound` if no entry
    /// exists at that identifier.
    pub fn get(&self, dotted: &str) -> Result<&str> {
        let oid: Oid = dotted.parse()?;
        self.value(&oid)
            .ok_or_else(|| EntCertError::NotFound(dotted.to_string()))
    }

    /// Iterates over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Oid, &str)> {
        self.entries.iter().map(|(oid, value)| (oid, value.as_str()))
    }

    /// Re-roots every entry by dropping its first `n` segments.
    ///
    /// Entries with `n` or fewer segments have nothing left and are dropped.
    pub fn ltrim(&self, n: usize) -> Self {
        Self::from_entries(self.entries.iter().filter_map(|(oid, value)| {
            oid.ltrim(n).ok().map(|trimmed| (trimmed, value.clone()))
        }))
    }

    /// Returns the subtree strictly below `prefix`, re-keyed relative to it.
    ///
    /// This is a prefix filter followed by [`ltrim`](Self::ltrim) of the prefix
    /// length. An entry sitting exactly at `prefix` has no relative key and is
    /// not part of the branch.
    pub fn branch(&self, prefix: &Oid) -> Self {
        let under_prefix = Self::from_entries(
            self.entries
                .iter()
                .filter(|(oid, _)| oid.starts_with(prefix))
                .cloned(),
        );
        under_prefix.ltrim(prefix.len())
    }

    /// Returns every entry whose identifier matches `pattern`, in insertion order.
    pub fn find(&self, pattern: &OidPattern) -> Vec<(&Oid, &str)> {
        self.iter().filter(|(oid, _)| pattern.matches(oid)).collect()
    }
}
