/// Error returned by the fallible [`Cursor`](crate::avl_map::Cursor) accessors.
///
/// # Examples
///
/// ```
/// use avl_map::{AvlMap, CursorError};
///
/// let map: AvlMap<i32, &str> = AvlMap::new();
/// assert_eq!(map.find(&1).try_value(), Err(CursorError::NotFound));
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum CursorError {
    /// The cursor is the end cursor: the key it was created from is not in the map.
    #[error("dereference of not-found cursor")]
    NotFound,
}
