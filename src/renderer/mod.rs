//! Rendering abstraction layer.
//!
//! *The rest of the engine never touches a pixel buffer directly.*
//! It produces a depth-sorted list of [`DrawCall`]s (far-to-near) and
//! hands them to a type that implements [`Renderer`].
//!
//! * You can plug multiple back-ends (`renderer::software`, a GPU one, …)
//!   without changing game logic.
//! * A helper blanket-impl [`RendererExt`] adds `draw_frame` so call-sites
//!   stay short.
//!
//! Occlusion is the painter's algorithm: the [`compositor`] orders calls
//! by descending depth and nearer calls simply overdraw farther ones.
//! There is no depth buffer.

use crate::world::{TextureBank, TextureId};

pub mod compositor;
pub mod projection;
pub mod raycast;
pub mod software;

pub use compositor::DrawQueue;
pub use projection::Projector;
pub use raycast::{HitAxis, RayCaster, RayHit};
pub use software::Software;

/// Pixel format of the software frame-buffer (0xAARRGGBB).
pub type Rgba = u32;

/// Axis-aligned rectangle in texture or screen space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }
}

/// Per-call colour modulation; the back-end multiplies every sampled texel
/// by `channel / 255`. Depth shading produces equal channels, but the
/// three are kept separate so a back-end may tint (damage flash, pickup
/// glow) without a new call type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tint {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Tint {
    pub const WHITE: Tint = Tint {
        r: 255,
        g: 255,
        b: 255,
    };

    pub const fn grey(v: u8) -> Self {
        Tint { r: v, g: v, b: v }
    }
}

/// Everything a back-end needs to rasterise one textured rectangle:
/// source region in texels, destination in screen pixels, tint, and the
/// depth it was queued at (retained for the sort).
#[derive(Clone, Copy, Debug)]
pub struct Blit {
    pub tex: TextureId,
    pub src: Rect,
    pub dst: Rect,
    pub tint: Tint,
    pub depth: f32,
}

/// One frame primitive. A closed set dispatched by `match` — the
/// compositor never probes types at runtime.
#[derive(Clone, Copy, Debug)]
pub enum DrawCall {
    /// One screen column of wall, produced from a ray hit.
    WallColumn(Blit),
    /// Camera-facing one-image sprite.
    StaticBillboard(Blit),
    /// Camera-facing sprite sampling one cell of an animation sheet.
    AnimatedBillboard(Blit),
}

impl DrawCall {
    #[inline]
    pub fn blit(&self) -> &Blit {
        match self {
            DrawCall::WallColumn(b) => b,
            DrawCall::StaticBillboard(b) => b,
            DrawCall::AnimatedBillboard(b) => b,
        }
    }

    /// Sort key for the painter's algorithm.
    #[inline]
    pub fn depth(&self) -> f32 {
        self.blit().depth
    }
}

/// A renderer that owns an internal scratch buffer for the whole frame.
///
/// `end_frame` hands the finished buffer to a user-supplied closure.
/// Software callers typically forward it to their window-manager;
/// GPU back-ends can ignore the slice because they never allocate it.
pub trait Renderer {
    /// (Re)allocate internal scratch for the requested resolution and clear it.
    fn begin_frame(&mut self, width: usize, height: usize);

    /// Rasterise one wall column into the internal buffer.
    fn draw_column(&mut self, blit: &Blit, bank: &TextureBank);

    /// Rasterise one billboard into the internal buffer.
    fn draw_billboard(&mut self, blit: &Blit, bank: &TextureBank);

    /// Finish the frame and **loan** the finished buffer to `submit`.
    ///
    /// * `submit(&[Rgba], w, h)` is run exactly once per frame.
    /// * Software caller passes `|fb, w, h| window.update_with_buffer(fb, w, h)`.
    /// * GPU back-end simply calls the closure with an empty slice:
    ///   `submit(&[], width, height)`.
    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize);
}

/// Convenience blanket-impl with a one-liner `draw_frame` adaptor.
pub trait RendererExt: Renderer {
    fn draw_frame<F>(
        &mut self,
        width: usize,
        height: usize,
        queue: &mut DrawQueue,
        bank: &TextureBank,
        submit: F,
    ) where
        F: FnOnce(&[Rgba], usize, usize),
    {
        self.begin_frame(width, height);
        queue.composite(self, bank);
        self.end_frame(submit);
    }
}
impl<T: Renderer + ?Sized> RendererExt for T {}
