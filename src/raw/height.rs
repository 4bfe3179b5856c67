/// Cached height of an AVL subtree. An absent subtree has height zero and a
/// leaf has height one.
///
/// A `u8` is ample: an AVL tree of height 255 would need more nodes than any
/// address space can hold.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Ord, PartialOrd)]
#[repr(transparent)]
pub(crate) struct Height(u8);

impl Height {
    pub(crate) const ZERO: Self = Self(0);
    pub(crate) const LEAF: Self = Self(1);

    /// Height of a node whose children have the given heights.
    #[inline]
    pub(crate) const fn above(left: Self, right: Self) -> Self {
        let tallest = if left.0 >= right.0 { left.0 } else { right.0 };
        assert!(tallest < u8::MAX, "`Height::above()` - height overflow!");
        Self(tallest + 1)
    }

    /// Signed balance factor `left - right`; positive means left-heavy.
    #[inline]
    pub(crate) fn balance(left: Self, right: Self) -> i16 {
        i16::from(left.0) - i16::from(right.0)
    }

    #[inline]
    pub(crate) const fn to_usize(self) -> usize {
        self.0 as usize
    }
}
