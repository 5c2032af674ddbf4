//! Perspective projection and depth shading.
//!
//! Pure screen-space maths: a [`RayHit`] becomes one wall-column blit, a
//! [`Sprite`] becomes one billboard blit. All screen constants are fixed
//! at construction — field of view, ray count, the virtual screen
//! distance — so projection itself is just divisions by depth.

use glam::Vec2;

use crate::renderer::raycast::{RayCaster, RayHit};
use crate::renderer::{Blit, DrawCall, Rect, Tint};
use crate::world::{NO_TEXTURE, Sprite, TextureBank, TextureId, Viewpoint, WallType};

/// Horizontal field of view, split evenly across the ray fan.
pub const FOV: f32 = std::f32::consts::FRAC_PI_3;

/// Scales the depth⁵ falloff of the shading curve. Kept identical for
/// walls and sprites so relative depth cues stay consistent.
pub const DARKNESS: f32 = 9e-6;

/// Sprites closer than this are skipped; a sprite at the viewpoint would
/// project to an unbounded rectangle.
const NEAR_DEPTH: f32 = 0.5;

/// Floors the divisor in the height projection so a grazing hit at depth
/// ~0 cannot blow up.
const DEPTH_FLOOR: f32 = 1e-4;

/// Wall type → texture name.
const WALL_TEXTURE: &[(WallType, &str)] = &[
    (WallType::Brick, "walls/brick"),
    (WallType::Stone, "walls/stone"),
    (WallType::MossyStone, "walls/mossy_stone"),
    (WallType::ClosedDoor, "walls/door"),
];

fn wall_texture(wall: WallType, bank: &TextureBank) -> TextureId {
    WALL_TEXTURE
        .iter()
        .find(|(w, _)| *w == wall)
        .map(|(_, name)| bank.id_or_missing(name))
        .unwrap_or(NO_TEXTURE)
}

/// Minimal signed angular difference, mapped into (-π, π].
///
/// `atan2(sin, cos)` handles the 0/2π seam in every quadrant, unlike the
/// usual pile of sign heuristics.
#[inline]
pub fn wrap_angle(a: f32) -> f32 {
    a.sin().atan2(a.cos())
}

/// Screen-space projection constants derived from the window size.
pub struct Projector {
    window_w: f32,
    half_h: f32,
    /// halfWindowWidth / tan(FOV/2): the distance at which one world unit
    /// spans one half-window.
    screen_dist: f32,
    ray_count: usize,
    delta_angle: f32,
    /// Width of one ray's screen column in pixels.
    column_scale: f32,
}

impl Projector {
    /// One ray per two pixels of window width, the classic density.
    pub fn new(window_w: usize, window_h: usize) -> Self {
        let ray_count = (window_w / 2).max(1);
        let window_w = window_w as f32;
        Self {
            window_w,
            half_h: window_h as f32 * 0.5,
            screen_dist: window_w * 0.5 / (FOV * 0.5).tan(),
            ray_count,
            delta_angle: FOV / ray_count as f32,
            column_scale: window_w / ray_count as f32,
        }
    }

    /// A caster matched to this projector's column space.
    pub fn ray_caster(&self) -> RayCaster {
        RayCaster::new(self.ray_count, self.delta_angle)
    }

    #[inline]
    pub fn ray_count(&self) -> usize {
        self.ray_count
    }

    #[inline]
    pub fn screen_dist(&self) -> f32 {
        self.screen_dist
    }

    /// Depth-attenuated tint: 225 / (1 + depth⁵·darkness). Much steeper
    /// than inverse-square on purpose — nearby surfaces stay bright,
    /// distant ones drop off fast.
    pub fn shade(&self, depth: f32) -> Tint {
        let v = 225.0 / (1.0 + depth.max(0.0).powi(5) * DARKNESS);
        Tint::grey(v.clamp(0.0, 255.0) as u8)
    }

    /// Wall-column blit for one ray hit. `None` for misses — the
    /// background stays visible in that column.
    pub fn project_column(&self, hit: &RayHit, bank: &TextureBank) -> Option<DrawCall> {
        if hit.is_miss() {
            return None;
        }

        let depth = hit.depth.max(0.0);
        let height = self.screen_dist / (depth + DEPTH_FLOOR);

        let tex_id = wall_texture(hit.wall, bank);
        let tex = bank.texture_or_missing(tex_id);

        // one column-wide strip of the wall texture
        let src_x = (hit.tex_u * (tex.w as f32 - self.column_scale)).max(0.0);
        let src = Rect::new(src_x, 0.0, self.column_scale, tex.h as f32);
        let dst = Rect::new(
            hit.column as f32 * self.column_scale,
            self.half_h - height * 0.5,
            self.column_scale,
            height,
        );

        Some(DrawCall::WallColumn(Blit {
            tex: tex_id,
            src,
            dst,
            tint: self.shade(depth),
            depth,
        }))
    }

    /// Billboard blit for one sprite, or `None` when the sprite is behind
    /// the near floor or entirely outside the window.
    ///
    /// The sprite's screen column comes from the minimal signed angle
    /// between the facing direction and the sprite bearing, expressed in
    /// ray units — the same column space the wall fan uses.
    pub fn project_sprite(
        &self,
        sprite: &Sprite,
        view: &Viewpoint,
        bank: &TextureBank,
    ) -> Option<DrawCall> {
        let depth = sprite.depth;
        if depth <= NEAR_DEPTH {
            return None;
        }

        let d: Vec2 = sprite.pos - view.pos();
        let delta = wrap_angle(d.y.atan2(d.x) - view.yaw());
        let screen_x =
            (self.ray_count as f32 * 0.5 + delta / self.delta_angle) * self.column_scale;

        let frame = sprite.frame();
        let tex = bank.texture_or_missing(frame.sheet);
        let frame_w = tex.w as f32 / frame.frames as f32;

        let proj = self.screen_dist / depth * sprite.scale;
        let proj_w = proj * (frame_w / tex.h as f32); // keep the frame's aspect
        let proj_h = proj;
        let half_width = proj_w * 0.5;

        // partially-offscreen sprites still draw
        if screen_x + half_width < 0.0 || screen_x - half_width > self.window_w {
            return None;
        }

        let dst = Rect::new(
            screen_x - half_width,
            self.half_h - proj_h * 0.5 + proj_h * sprite.v_shift,
            proj_w,
            proj_h,
        );
        let src = Rect::new(frame.cursor as f32 * frame_w, 0.0, frame_w, tex.h as f32);

        let blit = Blit {
            tex: frame.sheet,
            src,
            dst,
            tint: self.shade(depth),
            depth,
        };
        Some(if sprite.is_animated() {
            DrawCall::AnimatedBillboard(blit)
        } else {
            DrawCall::StaticBillboard(blit)
        })
    }
}

/*====================================================================*/
/*                                Tests                               */
/*====================================================================*/
