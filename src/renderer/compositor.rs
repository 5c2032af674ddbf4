//! Painter's-algorithm draw queue.
//!
//! One frame's primitives — wall columns and billboards — are collected
//! unordered, sorted by descending depth and dispatched far-to-near, so
//! nearer calls overdraw farther ones. The ordering *is* the occlusion
//! mechanism; there is no per-pixel depth test. Ties may dispatch in any
//! relative order: equal-depth primitives never meaningfully overlap.
//!
//! The queue keeps no cross-frame state; dispatch clears it.

use crate::renderer::{DrawCall, Renderer};
use crate::world::TextureBank;

#[derive(Default)]
pub struct DrawQueue {
    calls: Vec<DrawCall>,
}

impl DrawQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one primitive for this frame.
    pub fn push(&mut self, call: DrawCall) {
        debug_assert!(call.depth() >= 0.0, "queued primitive with negative depth");
        self.calls.push(call);
    }

    pub fn extend<I: IntoIterator<Item = DrawCall>>(&mut self, calls: I) {
        for c in calls {
            self.push(c);
        }
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    /// Sort far-to-near and dispatch every call to its type-specific draw
    /// routine, then clear. Depths are NaN-free by construction, so
    /// `total_cmp` is a plain descending order.
    pub fn composite<R: Renderer + ?Sized>(&mut self, renderer: &mut R, bank: &TextureBank) {
        self.calls
            .sort_by(|a, b| b.depth().total_cmp(&a.depth()));

        for call in &self.calls {
            match call {
                DrawCall::WallColumn(blit) => renderer.draw_column(blit, bank),
                DrawCall::StaticBillboard(blit) | DrawCall::AnimatedBillboard(blit) => {
                    renderer.draw_billboard(blit, bank)
                }
            }
        }
        self.calls.clear();
    }
}

/*====================================================================*/
/*                                Tests                               */
/*====================================================================*/
