use super::handle::Link;
use super::height::Height;

/// A single AVL node. Each child link is owned exclusively by this node.
#[derive(Clone)]
pub(crate) struct Node<K, V> {
    key: K,
    value: V,
    left: Link,
    right: Link,
    // Height of the subtree rooted here, leaves are 1.
    height: Height,
}

impl<K, V> Node<K, V> {
    /// Creates a detached leaf.
    pub(crate) const fn new(key: K, value: V) -> Self {
        Self {
            key,
            value,
            left: None,
            right: None,
            height: Height::LEAF,
        }
    }

    #[inline]
    pub(crate) const fn key(&self) -> &K {
        &self.key
    }

    #[inline]
    pub(crate) const fn value(&self) -> &V {
        &self.value
    }

    #[inline]
    pub(crate) const fn value_mut(&mut self) -> &mut V {
        &mut self.value
    }

    #[inline]
    pub(crate) const fn left(&self) -> Link {
        self.left
    }

    #[inline]
    pub(crate) const fn right(&self) -> Link {
        self.right
    }

    #[inline]
    pub(crate) const fn set_left(&mut self, left: Link) {
        self.left = left;
    }

    #[inline]
    pub(crate) const fn set_right(&mut self, right: Link) {
        self.right = right;
    }

    #[inline]
    pub(crate) const fn height(&self) -> Height {
        self.height
    }

    #[inline]
    pub(crate) const fn set_height(&mut self, height: Height) {
        self.height = height;
    }

    /// Swaps in a new key/value pair, keeping this node's links and height.
    /// Returns the pair that was stored before.
    pub(crate) fn replace_entry(&mut self, (key, value): (K, V)) -> (K, V) {
        (core::mem::replace(&mut self.key, key), core::mem::replace(&mut self.value, value))
    }

    pub(crate) fn into_entry(self) -> (K, V) {
        (self.key, self.value)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::raw::Handle;

    #[test]
    fn new_node_is_a_leaf() {
        let node = Node::new(7, "seven");
        assert_eq!(node.height(), Height::LEAF);
        assert_eq!(node.left(), None);
        assert_eq!(node.right(), None);
        assert_eq!((*node.key(), *node.value()), (7, "seven"));
    }

    #[test]
    fn replace_entry_keeps_links() {
        let mut node = Node::new(1, 'a');
        node.set_left(Some(Handle::from_index(3)));
        node.set_right(Some(Handle::from_index(4)));
        node.set_height(Height::above(Height::LEAF, Height::LEAF));

        assert_eq!(node.replace_entry((2, 'b')), (1, 'a'));
        assert_eq!(node.left(), Some(Handle::from_index(3)));
        assert_eq!(node.right(), Some(Handle::from_index(4)));
        assert_eq!(node.height().to_usize(), 2);
        assert_eq!(node.into_entry(), (2, 'b'));
    }
}
