//! Read-only copies of a tip and its ancestors.
//!
//! Retarget algorithms never follow chain links while they compute. The
//! blocks they need are copied out of the [`ChainView`] first, newest first,
//! and the algorithms index that copy by distance from the tip.

use kings_core::{BlockSnapshot, ChainView};

/// A tip followed by up to `depth - 1` of its ancestors.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AncestorWindow {
    blocks: Vec<BlockSnapshot>,
}

impl AncestorWindow {
    /// Copy `tip` and its ancestors out of `view`, at most `depth` blocks.
    ///
    /// Capture stops early at the chain root, or if the view hands back a
    /// parent whose height is not exactly one below its child.
    pub fn capture<V: ChainView + ?Sized>(view: &V, tip: &BlockSnapshot, depth: usize) -> Self {
        let mut blocks = Vec::with_capacity(depth);
        if depth == 0 {
            return Self { blocks };
        }
        blocks.push(*tip);

        let mut current = *tip;
        while blocks.len() < depth {
            let Some(prev) = view.previous(&current) else {
                break;
            };
            if current.height.checked_sub(1) != Some(prev.height) {
                log::warn!(
                    "chain view returned height {} as parent of {}; truncating ancestry",
                    prev.height,
                    current.height
                );
                break;
            }
            blocks.push(prev);
            current = prev;
        }

        Self { blocks }
    }

    /// Build a window from blocks already ordered newest first.
    pub fn from_newest_first(blocks: Vec<BlockSnapshot>) -> Self {
        Self { blocks }
    }

    /// The tip, if any.
    pub fn tip(&self) -> Option<&BlockSnapshot> {
        self.blocks.first()
    }

    /// The block `distance` steps behind the tip (0 is the tip).
    pub fn get(&self, distance: usize) -> Option<&BlockSnapshot> {
        self.blocks.get(distance)
    }

    /// Number of blocks captured.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// True when no tip was captured.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Blocks from the tip backwards.
    pub fn iter(&self) -> impl Iterator<Item = &BlockSnapshot> + '_ {
        self.blocks.iter()
    }
}
