use core::fmt;
use core::ops::Deref;

use crate::CursorError;
use crate::raw::{Link, RawAvlMap};

/// A read-only handle to a single entry of an [`AvlMap`], or to no entry at all.
///
/// This `struct` is created by the [`find`] and [`end`] methods on [`AvlMap`].
/// A cursor that found nothing is equal to [`end`]; comparing cursors
/// compares positions, not keys or values.
///
/// The cursor borrows the map, so the map cannot be modified while a cursor
/// into it is alive.
///
/// # Examples
///
/// ```
/// use avl_map::AvlMap;
///
/// let mut map = AvlMap::new();
/// map.insert(10, "ten");
///
/// let cursor = map.find(&10);
/// assert_ne!(cursor, map.end());
/// assert_eq!(*cursor.key(), 10);
/// assert_eq!(*cursor, "ten");
///
/// assert_eq!(map.find(&11), map.end());
/// ```
///
/// [`AvlMap`]: super::AvlMap
/// [`find`]: super::AvlMap::find
/// [`end`]: super::AvlMap::end
pub struct Cursor<'a, K, V> {
    map: &'a RawAvlMap<K, V>,
    node: Link,
}

impl<'a, K, V> Cursor<'a, K, V> {
    pub(crate) const fn new(map: &'a RawAvlMap<K, V>, node: Link) -> Self {
        Self { map, node }
    }

    /// Returns true if this is the end cursor.
    #[must_use]
    pub const fn is_end(&self) -> bool {
        self.node.is_none()
    }

    /// Returns the key and value, or `None` for the end cursor.
    #[must_use]
    pub fn get(&self) -> Option<(&'a K, &'a V)> {
        let map = self.map;
        self.node.map(|handle| map.entry(handle))
    }

    /// Returns the key, or [`CursorError::NotFound`] for the end cursor.
    ///
    /// # Errors
    ///
    /// Fails if the cursor does not point at an entry.
    pub fn try_key(&self) -> Result<&'a K, CursorError> {
        let handle = self.node.ok_or(CursorError::NotFound)?;
        Ok(self.map.key(handle))
    }

    /// Returns the value, or [`CursorError::NotFound`] for the end cursor.
    ///
    /// # Errors
    ///
    /// Fails if the cursor does not point at an entry.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_map::{AvlMap, CursorError};
    ///
    /// let map = AvlMap::from([(1, 'a')]);
    /// assert_eq!(map.find(&1).try_value(), Ok(&'a'));
    /// assert_eq!(map.find(&2).try_value(), Err(CursorError::NotFound));
    /// ```
    pub fn try_value(&self) -> Result<&'a V, CursorError> {
        let handle = self.node.ok_or(CursorError::NotFound)?;
        Ok(self.map.value(handle))
    }

    /// Returns the key this cursor points at.
    ///
    /// # Panics
    ///
    /// Panics if this is the end cursor.
    #[must_use]
    pub fn key(&self) -> &'a K {
        match self.try_key() {
            Ok(key) => key,
            Err(err) => panic!("{err}"),
        }
    }

    /// Returns the value this cursor points at.
    ///
    /// # Panics
    ///
    /// Panics if this is the end cursor.
    ///
    /// ```should_panic
    /// use avl_map::AvlMap;
    ///
    /// let map: AvlMap<i32, i32> = AvlMap::new();
    /// let _ = map.end().value(); // dereference of not-found cursor
    /// ```
    #[must_use]
    pub fn value(&self) -> &'a V {
        match self.try_value() {
            Ok(value) => value,
            Err(err) => panic!("{err}"),
        }
    }
}

impl<K, V> Deref for Cursor<'_, K, V> {
    type Target = V;

    /// Dereferences to the value, panicking on the end cursor.
    fn deref(&self) -> &V {
        self.value()
    }
}

impl<K, V> Clone for Cursor<'_, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for Cursor<'_, K, V> {}

impl<K, V> PartialEq for Cursor<'_, K, V> {
    fn eq(&self, other: &Self) -> bool {
        core::ptr::eq(self.map, other.map) && self.node == other.node
    }
}

impl<K, V> Eq for Cursor<'_, K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Cursor<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get() {
            Some((key, value)) => f.debug_tuple("Cursor").field(key).field(value).finish(),
            None => f.write_str("Cursor(end)"),
        }
    }
}
