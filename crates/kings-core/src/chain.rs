//! Boundary to the external block index.

use crate::types::BlockSnapshot;

/// Read-only access to the ancestors of a block.
///
/// Implementations must present a stable view for the duration of one call:
/// consensus code copies the ancestors it needs up front and never holds on
/// to the view afterwards.
pub trait ChainView {
    /// Return the parent of `block`, or `None` at the chain root.
    fn previous(&self, block: &BlockSnapshot) -> Option<BlockSnapshot>;
}

/// A contiguous run of blocks ordered oldest to newest.
///
/// The parent of a block is the entry one height below it. Heights outside
/// the slice, or entries whose height does not line up, have no parent.
impl ChainView for [BlockSnapshot] {
    fn previous(&self, block: &BlockSnapshot) -> Option<BlockSnapshot> {
        let base = self.first()?.height;
        let height = block.height.checked_sub(1)?;
        let idx = height.checked_sub(base)? as usize;
        self.get(idx).filter(|prev| prev.height == height).copied()
    }
}

impl ChainView for Vec<BlockSnapshot> {
    fn previous(&self, block: &BlockSnapshot) -> Option<BlockSnapshot> {
        self.as_slice().previous(block)
    }
}

impl<V: ChainView + ?Sized> ChainView for &V {
    fn previous(&self, block: &BlockSnapshot) -> Option<BlockSnapshot> {
        (**self).previous(block)
    }
}
