use core::borrow::Borrow;
use core::cmp::Ordering;

use smallvec::SmallVec;

use super::arena::Arena;
use super::handle::{Handle, Link};
use super::height::Height;
use super::node::Node;

/// Inline depth of traversal stacks. An AVL tree holding `Handle::MAX` nodes is
/// at most ~1.44 * 32 levels deep, so traversals never spill to the heap.
const STACK_DEPTH: usize = 48;

/// Stack of handles used for in-order traversal.
pub(crate) type HandleStack = SmallVec<[Handle; STACK_DEPTH]>;

/// The core AVL tree backing `AvlMap`.
#[derive(Clone)]
pub(crate) struct RawAvlMap<K, V> {
    /// Arena owning every node; a node is reachable only through its parent's link.
    nodes: Arena<Node<K, V>>,
    /// Link to the root node, `None` for an empty tree.
    root: Link,
    /// Number of key-value pairs, maintained on every link and unlink.
    len: usize,
    /// Single rotations performed since creation.
    #[cfg(test)]
    rotations: usize,
}

/// Outcome of inserting into a subtree.
enum Insertion<V> {
    /// A new node was linked below. Carries how the new key compared against
    /// the key of the subtree root the descent passed through.
    Linked(Ordering),
    /// The key was present; carries the value it held before.
    Replaced(V),
}

impl<K, V> RawAvlMap<K, V> {
    /// Creates a new, empty tree.
    pub(crate) const fn new() -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
            len: 0,
            #[cfg(test)]
            rotations: 0,
        }
    }

    /// Creates a new tree with room for `capacity` nodes.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            root: None,
            len: 0,
            #[cfg(test)]
            rotations: 0,
        }
    }

    /// Returns the number of key-value pairs in the tree.
    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the tree contains no elements.
    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of nodes the tree can hold without reallocating.
    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    pub(crate) const fn root(&self) -> Link {
        self.root
    }

    /// Height of the whole tree, zero when empty.
    pub(crate) fn height(&self) -> usize {
        self.height_of(self.root).to_usize()
    }

    #[inline]
    pub(crate) fn left(&self, handle: Handle) -> Link {
        self.nodes.get(handle).left()
    }

    #[inline]
    pub(crate) fn right(&self, handle: Handle) -> Link {
        self.nodes.get(handle).right()
    }

    #[inline]
    pub(crate) fn key(&self, handle: Handle) -> &K {
        self.nodes.get(handle).key()
    }

    #[inline]
    pub(crate) fn value(&self, handle: Handle) -> &V {
        self.nodes.get(handle).value()
    }

    #[inline]
    pub(crate) fn entry(&self, handle: Handle) -> (&K, &V) {
        let node = self.nodes.get(handle);
        (node.key(), node.value())
    }

    /// Returns the leftmost node of the subtree at `link`.
    pub(crate) fn leftmost(&self, link: Link) -> Link {
        let mut current = link?;
        while let Some(left) = self.left(current) {
            current = left;
        }
        Some(current)
    }

    /// Returns the rightmost node of the subtree at `link`.
    pub(crate) fn rightmost(&self, link: Link) -> Link {
        let mut current = link?;
        while let Some(right) = self.right(current) {
            current = right;
        }
        Some(current)
    }

    /// Pushes `link` and its chain of left children, for forward traversal.
    pub(crate) fn push_left_spine(&self, mut link: Link, stack: &mut HandleStack) {
        while let Some(handle) = link {
            stack.push(handle);
            link = self.left(handle);
        }
    }

    /// Pushes `link` and its chain of right children, for backward traversal.
    pub(crate) fn push_right_spine(&self, mut link: Link, stack: &mut HandleStack) {
        while let Some(handle) = link {
            stack.push(handle);
            link = self.right(handle);
        }
    }

    /// Destroys every node, children before parents.
    pub(crate) fn clear(&mut self) {
        #[cfg(feature = "tracing")]
        if self.len > 0 {
            tracing::debug!(len = self.len, height = self.height(), "tearing down tree");
        }

        let root = self.root.take();
        self.destroy(root);
        debug_assert!(self.nodes.is_empty(), "`RawAvlMap::clear()` - nodes left behind after teardown!");
        self.nodes.clear();
        self.len = 0;
    }

    fn destroy(&mut self, link: Link) {
        if let Some(handle) = link {
            let node = self.nodes.get(handle);
            let (left, right) = (node.left(), node.right());
            self.destroy(left);
            self.destroy(right);
            self.nodes.free(handle);
        }
    }

    /// Moves every key-value pair out of the tree in key order, leaving it empty.
    pub(crate) fn drain_to_vec(&mut self) -> alloc::vec::Vec<(K, V)> {
        let mut result = alloc::vec::Vec::with_capacity(self.len);
        let mut stack = HandleStack::new();
        let mut current = self.root.take();

        loop {
            self.push_left_spine(current, &mut stack);
            let Some(handle) = stack.pop() else {
                break;
            };
            // The left subtree is already drained, so the node can go now.
            let node = self.nodes.take(handle);
            current = node.right();
            result.push(node.into_entry());
        }

        self.nodes.clear();
        self.len = 0;
        result
    }

    #[inline]
    fn height_of(&self, link: Link) -> Height {
        link.map_or(Height::ZERO, |handle| self.nodes.get(handle).height())
    }

    #[inline]
    fn balance_of(&self, handle: Handle) -> i16 {
        let node = self.nodes.get(handle);
        Height::balance(self.height_of(node.left()), self.height_of(node.right()))
    }

    fn update_height(&mut self, handle: Handle) {
        let node = self.nodes.get(handle);
        let height = Height::above(self.height_of(node.left()), self.height_of(node.right()));
        self.nodes.get_mut(handle).set_height(height);
    }

    /// Rotates the subtree at `y` to the right and returns its new root.
    ///
    /// ```text
    ///       y            x
    ///      / \          / \
    ///     x   T3  =>  T1   y
    ///    / \              / \
    ///   T1  T2           T2  T3
    /// ```
    fn rotate_right(&mut self, y: Handle) -> Handle {
        let x = self.left(y).expect("`RawAvlMap::rotate_right()` - pivot has no left child!");
        let t2 = self.right(x);

        self.nodes.get_mut(y).set_left(t2);
        self.nodes.get_mut(x).set_right(Some(y));
        self.update_height(y);
        self.update_height(x);

        #[cfg(test)]
        {
            self.rotations += 1;
        }
        #[cfg(feature = "tracing")]
        tracing::trace!(height = self.height_of(Some(x)).to_usize(), "rotate right");

        x
    }

    /// Mirror image of [`rotate_right`](Self::rotate_right).
    fn rotate_left(&mut self, x: Handle) -> Handle {
        let y = self.right(x).expect("`RawAvlMap::rotate_left()` - pivot has no right child!");
        let t2 = self.left(y);

        self.nodes.get_mut(x).set_right(t2);
        self.nodes.get_mut(y).set_left(Some(x));
        self.update_height(x);
        self.update_height(y);

        #[cfg(test)]
        {
            self.rotations += 1;
        }
        #[cfg(feature = "tracing")]
        tracing::trace!(height = self.height_of(Some(y)).to_usize(), "rotate left");

        y
    }

    /// Restores balance at `handle` after an insertion below it. `turn` is how
    /// the inserted key compared against the key of the taller child.
    fn rebalance_after_insert(&mut self, handle: Handle, turn: Ordering) -> Handle {
        self.update_height(handle);
        let balance = self.balance_of(handle);

        let root = if balance > 1 {
            if turn == Ordering::Greater {
                // Left-Right
                let left = self.left(handle).expect("`RawAvlMap::rebalance_after_insert()` - missing left child!");
                let left = self.rotate_left(left);
                self.nodes.get_mut(handle).set_left(Some(left));
            }
            self.rotate_right(handle)
        } else if balance < -1 {
            if turn == Ordering::Less {
                // Right-Left
                let right = self.right(handle).expect("`RawAvlMap::rebalance_after_insert()` - missing right child!");
                let right = self.rotate_right(right);
                self.nodes.get_mut(handle).set_right(Some(right));
            }
            self.rotate_left(handle)
        } else {
            handle
        };
        debug_assert!(
            self.balance_of(root).abs() <= 1,
            "`RawAvlMap::rebalance_after_insert()` - subtree left unbalanced!"
        );
        root
    }

    /// Restores balance at `handle` after a removal below it. The rotation
    /// shape follows the taller child's own balance factor.
    fn rebalance_after_remove(&mut self, handle: Handle) -> Handle {
        self.update_height(handle);
        let balance = self.balance_of(handle);

        let root = if balance > 1 {
            let left = self.left(handle).expect("`RawAvlMap::rebalance_after_remove()` - missing left child!");
            if self.balance_of(left) < 0 {
                let left = self.rotate_left(left);
                self.nodes.get_mut(handle).set_left(Some(left));
            }
            self.rotate_right(handle)
        } else if balance < -1 {
            let right = self.right(handle).expect("`RawAvlMap::rebalance_after_remove()` - missing right child!");
            if self.balance_of(right) > 0 {
                let right = self.rotate_right(right);
                self.nodes.get_mut(handle).set_right(Some(right));
            }
            self.rotate_left(handle)
        } else {
            handle
        };
        debug_assert!(
            self.balance_of(root).abs() <= 1,
            "`RawAvlMap::rebalance_after_remove()` - subtree left unbalanced!"
        );
        root
    }

    /// Detaches the leftmost node of the subtree at `handle`, rebalancing on
    /// the way back up. Returns the new subtree root and the detached entry.
    fn remove_min(&mut self, handle: Handle) -> (Link, (K, V)) {
        match self.left(handle) {
            Some(left) => {
                let (left, entry) = self.remove_min(left);
                self.nodes.get_mut(handle).set_left(left);
                (Some(self.rebalance_after_remove(handle)), entry)
            }
            None => {
                let node = self.nodes.take(handle);
                self.len -= 1;
                (node.right(), node.into_entry())
            }
        }
    }

    /// Removes the node at `handle` itself. Returns the link that replaces it
    /// in its parent and the removed entry.
    fn unlink(&mut self, handle: Handle) -> (Link, (K, V)) {
        let node = self.nodes.get(handle);
        match (node.left(), node.right()) {
            (Some(_), Some(right)) => {
                // Two children: the in-order successor leaves the right
                // subtree and its entry takes over this node.
                let (right, successor) = self.remove_min(right);
                let node = self.nodes.get_mut(handle);
                node.set_right(right);
                let removed = node.replace_entry(successor);
                (Some(self.rebalance_after_remove(handle)), removed)
            }
            (child, None) | (None, child) => {
                let node = self.nodes.take(handle);
                self.len -= 1;
                (child, node.into_entry())
            }
        }
    }
}

impl<K: Ord, V> RawAvlMap<K, V> {
    /// Searches for a key and returns the handle of its node.
    pub(crate) fn search<Q>(&self, key: &Q) -> Link
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut current = self.root;
        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            current = match key.cmp(node.key().borrow()) {
                Ordering::Less => node.left(),
                Ordering::Greater => node.right(),
                Ordering::Equal => return Some(handle),
            };
        }
        None
    }

    pub(crate) fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.search(key).map(|handle| self.value(handle))
    }

    pub(crate) fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let handle = self.search(key)?;
        Some(self.nodes.get_mut(handle).value_mut())
    }

    pub(crate) fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.search(key).map(|handle| self.entry(handle))
    }

    /// Inserts a key-value pair into the tree.
    /// Returns the old value if the key was already present.
    pub(crate) fn insert(&mut self, key: K, value: V) -> Option<V> {
        let (root, insertion) = self.insert_at(self.root, key, value);
        self.root = Some(root);
        match insertion {
            Insertion::Linked(_) => None,
            Insertion::Replaced(old) => Some(old),
        }
    }

    fn insert_at(&mut self, link: Link, key: K, value: V) -> (Handle, Insertion<V>) {
        let Some(handle) = link else {
            let handle = self.nodes.alloc(Node::new(key, value));
            self.len += 1;
            return (handle, Insertion::Linked(Ordering::Equal));
        };

        let ordering = key.cmp(self.key(handle));
        let turn = match ordering {
            Ordering::Equal => {
                // Overwrite in place: no node is added, so no height changes.
                let old = core::mem::replace(self.nodes.get_mut(handle).value_mut(), value);
                return (handle, Insertion::Replaced(old));
            }
            Ordering::Less => {
                let (left, insertion) = self.insert_at(self.left(handle), key, value);
                match insertion {
                    Insertion::Replaced(old) => return (handle, Insertion::Replaced(old)),
                    Insertion::Linked(turn) => {
                        self.nodes.get_mut(handle).set_left(Some(left));
                        turn
                    }
                }
            }
            Ordering::Greater => {
                let (right, insertion) = self.insert_at(self.right(handle), key, value);
                match insertion {
                    Insertion::Replaced(old) => return (handle, Insertion::Replaced(old)),
                    Insertion::Linked(turn) => {
                        self.nodes.get_mut(handle).set_right(Some(right));
                        turn
                    }
                }
            }
        };

        (self.rebalance_after_insert(handle, turn), Insertion::Linked(ordering))
    }

    /// Removes a key from the tree and returns the key-value pair.
    pub(crate) fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let root = self.root?;
        let (root, removed) = self.remove_at(root, key);
        self.root = root;
        removed
    }

    fn remove_at<Q>(&mut self, handle: Handle, key: &Q) -> (Link, Option<(K, V)>)
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let removed = match key.cmp(self.key(handle).borrow()) {
            Ordering::Equal => {
                let (replacement, removed) = self.unlink(handle);
                return (replacement, Some(removed));
            }
            Ordering::Less => {
                let Some(left) = self.left(handle) else {
                    return (Some(handle), None);
                };
                let (left, removed) = self.remove_at(left, key);
                if removed.is_none() {
                    return (Some(handle), None);
                }
                self.nodes.get_mut(handle).set_left(left);
                removed
            }
            Ordering::Greater => {
                let Some(right) = self.right(handle) else {
                    return (Some(handle), None);
                };
                let (right, removed) = self.remove_at(right, key);
                if removed.is_none() {
                    return (Some(handle), None);
                }
                self.nodes.get_mut(handle).set_right(right);
                removed
            }
        };

        (Some(self.rebalance_after_remove(handle)), removed)
    }
}

impl<K, V> Drop for RawAvlMap<K, V> {
    fn drop(&mut self) {
        self.clear();
    }
}
