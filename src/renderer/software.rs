//! Software back-end: rasterises [`Blit`]s into an internal `u32` buffer.
//!
//! Nearest-neighbour sampling, per-call tint modulation, alpha-0 texels
//! skipped (sprite transparency). The buffer is loaned to the caller at
//! `end_frame`, minifb-style.
//!
//! Wall columns and billboards rasterise identically here — both are
//! textured rectangles — but the trait keeps them separate so a smarter
//! back-end can batch per-column draws.

use crate::renderer::{Blit, Renderer, Rgba, Tint};
use crate::world::{TextureBank, TextureId};

#[derive(Default)]
pub struct Software {
    scratch: Vec<Rgba>,
    width: usize,
    height: usize,
}

impl Renderer for Software {
    fn begin_frame(&mut self, w: usize, h: usize) {
        if w != self.width || h != self.height {
            self.width = w;
            self.height = h;
            self.scratch.resize(w * h, 0);
        }
        self.scratch.fill(0xFF_000000);
    }

    fn draw_column(&mut self, blit: &Blit, bank: &TextureBank) {
        self.blit(blit, bank);
    }

    fn draw_billboard(&mut self, blit: &Blit, bank: &TextureBank) {
        self.blit(blit, bank);
    }

    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize),
    {
        submit(&self.scratch, self.width, self.height);
    }
}

impl Software {
    /// Scrolling sky across the top half, floor gradient below. Drawn
    /// before the queue is dispatched so every column and sprite lands on
    /// top of it.
    pub fn draw_background(&mut self, bank: &TextureBank, sky: TextureId, yaw: f32) {
        if self.width == 0 || self.height == 0 {
            return;
        }
        let tex = bank.texture_or_missing(sky);
        let half_h = self.height / 2;

        // one full turn scrolls one full sky width
        let offset = yaw / std::f32::consts::TAU * tex.w as f32;
        for y in 0..half_h {
            let v = y * tex.h / half_h.max(1);
            for x in 0..self.width {
                let u = (offset + (x * tex.w) as f32 / self.width as f32)
                    .rem_euclid(tex.w as f32) as usize;
                self.scratch[y * self.width + x] = tex.texel(u, v);
            }
        }

        // floor: black at the horizon fading up to a warm dark tone
        const FLOOR: (u32, u32, u32) = (30, 30, 20);
        for y in half_h..self.height {
            let t = (y - half_h) as u32 * 256 / (self.height - half_h).max(1) as u32;
            let col = 0xFF_000000
                | (FLOOR.0 * t / 256) << 16
                | (FLOOR.1 * t / 256) << 8
                | (FLOOR.2 * t / 256);
            let row = &mut self.scratch[y * self.width..(y + 1) * self.width];
            row.fill(col);
        }
    }

    fn blit(&mut self, b: &Blit, bank: &TextureBank) {
        if b.dst.w <= 0.0 || b.dst.h <= 0.0 {
            return;
        }
        let tex = bank.texture_or_missing(b.tex);

        let x0 = b.dst.x.floor().max(0.0) as usize;
        let x1 = ((b.dst.x + b.dst.w).ceil()).min(self.width as f32) as usize;
        let y0 = b.dst.y.floor().max(0.0) as usize;
        let y1 = ((b.dst.y + b.dst.h).ceil()).min(self.height as f32) as usize;

        for y in y0..y1 {
            let v = b.src.y + (y as f32 - b.dst.y) / b.dst.h * b.src.h;
            let v = (v.max(0.0) as usize).min(tex.h.saturating_sub(1));
            for x in x0..x1 {
                let u = b.src.x + (x as f32 - b.dst.x) / b.dst.w * b.src.w;
                let u = (u.max(0.0) as usize).min(tex.w.saturating_sub(1));

                let texel = tex.texel(u, v);
                if texel >> 24 == 0 {
                    continue; // transparent
                }
                self.scratch[y * self.width + x] = modulate(texel, b.tint);
            }
        }
    }
}

/// Multiply each colour channel by `tint / 255`, preserving alpha.
#[inline]
fn modulate(c: u32, tint: Tint) -> u32 {
    let r = ((c >> 16 & 0xFF) * tint.r as u32) / 255;
    let g = ((c >> 8 & 0xFF) * tint.g as u32) / 255;
    let b = ((c & 0xFF) * tint.b as u32) / 255;
    (c & 0xFF_000000) | r << 16 | g << 8 | b
}

/*====================================================================*/
/*                                Tests                               */
/*====================================================================*/
