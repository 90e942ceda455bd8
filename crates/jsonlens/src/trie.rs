//! A prefix tree keyed by JSON path components.
use alloc::collections::BTreeMap;

use crate::path::PathComponent;

/// One node of a [`PathTrie`].
#[derive(Debug, Clone)]
pub struct TrieNode<T> {
    value: Option<T>,
    children: BTreeMap<PathComponent, TrieNode<T>>,
}

impl<T> Default for TrieNode<T> {
    fn default() -> Self {
        Self {
            value: None,
            children: BTreeMap::new(),
        }
    }
}

impl<T> TrieNode<T> {
    /// The payload stored at this node, if any.
    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Mutable access to the payload slot.
    pub fn value_mut(&mut self) -> &mut Option<T> {
        &mut self.value
    }

    /// The child for `component`, if present.
    pub fn child(&self, component: &PathComponent) -> Option<&TrieNode<T>> {
        self.children.get(component)
    }
}

/// A trie mapping JSON paths to payloads.
///
/// Interior nodes exist for every recorded path prefix, so walking toward a
/// deep path visits (and can create) each ancestor exactly once.
#[derive(Debug, Clone)]
pub struct PathTrie<T> {
    root: TrieNode<T>,
}

impl<T> Default for PathTrie<T> {
    fn default() -> Self {
        Self {
            root: TrieNode::default(),
        }
    }
}

impl<T> PathTrie<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Walks to `path`, creating missing nodes, and returns the final node.
    pub fn insert(&mut self, path: &[PathComponent]) -> &mut TrieNode<T> {
        let mut node = &mut self.root;
        for component in path {
            node = node.children.entry(component.clone()).or_default();
        }
        node
    }

    /// Walks as far along `path` as existing nodes allow.
    ///
    /// Returns the deepest node reached and the unmatched remainder of the
    /// path (empty when the full path exists).
    pub fn seek<'p>(
        &self,
        path: &'p [PathComponent],
    ) -> (&TrieNode<T>, &'p [PathComponent]) {
        let mut node = &self.root;
        for (i, component) in path.iter().enumerate() {
            match node.children.get(component) {
                Some(child) => node = child,
                None => return (node, &path[i..]),
            }
        }
        (node, &[])
    }

    /// Pre-order traversal over all nodes, the root first. Children are
    /// visited in component order.
    pub fn traverse(&self) -> Traverse<'_, T> {
        Traverse {
            stack: alloc::vec![&self.root],
        }
    }
}

/// Iterator returned by [`PathTrie::traverse`].
pub struct Traverse<'a, T> {
    stack: alloc::vec::Vec<&'a TrieNode<T>>,
}

impl<'a, T> Iterator for Traverse<'a, T> {
    type Item = &'a TrieNode<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.values().rev());
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use alloc::{string::ToString, vec::Vec};

    use super::PathTrie;
    use crate::{PathComponent, path};

    #[test]
    fn insert_then_seek_round_trip() {
        let mut trie: PathTrie<u32> = PathTrie::new();
        *trie.insert(&path!["a", "b", 0]).value_mut() = Some(7);

        let full = path!["a", "b", 0];
        let (node, rest) = trie.seek(&full);
        assert!(rest.is_empty());
        assert_eq!(node.value(), Some(&7));

        // Ancestors exist but hold no payload.
        let prefix = path!["a", "b"];
        let (node, rest) = trie.seek(&prefix);
        assert!(rest.is_empty());
        assert_eq!(node.value(), None);
    }

    #[test]
    fn seek_reports_unmatched_remainder() {
        let mut trie: PathTrie<u32> = PathTrie::new();
        trie.insert(&path!["a"]);
        let deep = path!["a", "x", 3];
        let (_, rest) = trie.seek(&deep);
        assert_eq!(rest, &path!["x", 3][..]);
    }

    #[test]
    fn child_walks_one_component_at_a_time() {
        let mut trie: PathTrie<u32> = PathTrie::new();
        *trie.insert(&path!["a", 0]).value_mut() = Some(1);

        let root_path = path![];
        let (root, _) = trie.seek(&root_path);
        let a = root.child(&PathComponent::Key("a".to_string())).unwrap();
        assert_eq!(a.child(&PathComponent::Index(0)).and_then(|n| n.value()), Some(&1));
        assert!(root.child(&PathComponent::Index(9)).is_none());
    }

    #[test]
    fn traverse_visits_every_node_once() {
        let mut trie: PathTrie<u32> = PathTrie::new();
        *trie.insert(&path!["a", 0]).value_mut() = Some(1);
        *trie.insert(&path!["a", 1]).value_mut() = Some(2);
        *trie.insert(&path!["b"]).value_mut() = Some(3);

        // root, a, a.0, a.1, b
        let nodes: Vec<_> = trie.traverse().collect();
        assert_eq!(nodes.len(), 5);
        let payloads: Vec<_> = nodes.iter().filter_map(|n| n.value()).copied().collect();
        assert_eq!(payloads, alloc::vec![1, 2, 3]);
    }
}
