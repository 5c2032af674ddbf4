//! Sprite entities consumed by the billboard projector.
//!
//! Sprites are owned by whoever spawned them (the level loader, item or
//! enemy managers); the renderer only reads position and texture metadata
//! for one frame and writes the `depth` field back after measuring the
//! distance to the viewpoint.

use glam::Vec2;
use smallvec::SmallVec;

use crate::world::camera::Viewpoint;
use crate::world::texture::TextureId;

/// One animation strip: a sheet texture laid out as `frames` equal-width
/// cells side by side, plus a cursor into them.
#[derive(Clone, Debug)]
pub struct Animation {
    pub sheet: TextureId,
    pub frames: usize,
    pub cursor: usize,
}

impl Animation {
    pub fn new(sheet: TextureId, frames: usize) -> Self {
        debug_assert!(frames >= 1);
        Self {
            sheet,
            frames,
            cursor: 0,
        }
    }

    /// Step to the next frame, wrapping at the end of the strip.
    pub fn advance(&mut self) {
        self.cursor = (self.cursor + 1) % self.frames.max(1);
    }
}

/// Flat one-image billboard or a multi-strip animated one.
///
/// An animated sprite keeps every strip it owns (idle, walk, attack, …);
/// most sprites have only a few, hence the inline `SmallVec`.
#[derive(Clone, Debug)]
pub enum SpriteKind {
    Static,
    Animated {
        strips: SmallVec<[Animation; 4]>,
        active: usize,
    },
}

/// What the projector samples from: a sheet, its frame count and the
/// current frame. Static sprites are a one-frame sheet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameRef {
    pub sheet: TextureId,
    pub frames: usize,
    pub cursor: usize,
}

#[derive(Clone, Debug)]
pub struct Sprite {
    pub pos: Vec2,
    /// Distance to the viewpoint, refreshed each frame before compositing.
    pub depth: f32,
    pub scale: f32,
    /// Fraction of the projected height the sprite is pushed down, so
    /// floor-standing props sit on the floor instead of hovering mid-wall.
    pub v_shift: f32,
    tex: TextureId,
    kind: SpriteKind,
}

impl Sprite {
    pub fn flat(pos: Vec2, tex: TextureId, scale: f32, v_shift: f32) -> Self {
        Self {
            pos,
            depth: 0.0,
            scale,
            v_shift,
            tex,
            kind: SpriteKind::Static,
        }
    }

    pub fn animated(
        pos: Vec2,
        strips: SmallVec<[Animation; 4]>,
        scale: f32,
        v_shift: f32,
    ) -> Self {
        debug_assert!(!strips.is_empty());
        let tex = strips[0].sheet;
        Self {
            pos,
            depth: 0.0,
            scale,
            v_shift,
            tex,
            kind: SpriteKind::Animated { strips, active: 0 },
        }
    }

    pub fn is_animated(&self) -> bool {
        matches!(self.kind, SpriteKind::Animated { .. })
    }

    /// Euclidean distance to the viewpoint; stored so the compositor can
    /// sort without recomputing it.
    pub fn update_depth(&mut self, view: &Viewpoint) {
        self.depth = (self.pos - view.pos()).length();
    }

    /// Sheet/frame data for the projector.
    pub fn frame(&self) -> FrameRef {
        match &self.kind {
            SpriteKind::Static => FrameRef {
                sheet: self.tex,
                frames: 1,
                cursor: 0,
            },
            SpriteKind::Animated { strips, active } => {
                let strip = &strips[*active];
                FrameRef {
                    sheet: strip.sheet,
                    frames: strip.frames,
                    cursor: strip.cursor,
                }
            }
        }
    }

    /// Advance the active strip by one tick. No-op for flat sprites.
    pub fn advance_frame(&mut self) {
        if let SpriteKind::Animated { strips, active } = &mut self.kind {
            strips[*active].advance();
        }
    }

    /// Switch the active strip (e.g. idle → attack). Out-of-range indices
    /// are ignored rather than trusted.
    pub fn set_strip(&mut self, idx: usize) {
        if let SpriteKind::Animated { strips, active } = &mut self.kind {
            if idx < strips.len() && idx != *active {
                *active = idx;
                strips[idx].cursor = 0;
            }
        }
    }
}

/*====================================================================*/
/*                                Tests                               */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use glam::vec2;
    use smallvec::smallvec;

    #[test]
    fn depth_is_distance_to_viewpoint() {
        let view = Viewpoint::new(vec2(1.0, 1.0), 0.0);
        let mut s = Sprite::flat(vec2(4.0, 5.0), 1, 1.0, 0.0);
        s.update_depth(&view);
        assert!((s.depth - 5.0).abs() < 1e-6);
    }

    #[test]
    fn flat_sprite_is_one_frame() {
        let s = Sprite::flat(Vec2::ZERO, 3, 1.0, 0.0);
        assert_eq!(
            s.frame(),
            FrameRef {
                sheet: 3,
                frames: 1,
                cursor: 0
            }
        );
    }

    #[test]
    fn animation_advances_and_wraps() {
        let mut s = Sprite::animated(Vec2::ZERO, smallvec![Animation::new(7, 3)], 1.0, 0.0);
        assert_eq!(s.frame().cursor, 0);
        s.advance_frame();
        s.advance_frame();
        assert_eq!(s.frame().cursor, 2);
        s.advance_frame();
        assert_eq!(s.frame().cursor, 0); // wrapped
    }

    #[test]
    fn strip_switch_resets_cursor() {
        let mut s = Sprite::animated(
            Vec2::ZERO,
            smallvec![Animation::new(7, 4), Animation::new(8, 2)],
            1.0,
            0.0,
        );
        s.advance_frame();
        s.set_strip(1);
        let f = s.frame();
        assert_eq!((f.sheet, f.frames, f.cursor), (8, 2, 0));

        s.set_strip(9); // ignored
        assert_eq!(s.frame().sheet, 8);
    }
}
