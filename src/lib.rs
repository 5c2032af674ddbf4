//! Yet Another Raycaster in Rust.
//!
//! A Wolfenstein-style pseudo-3D renderer over a 2D wall grid:
//!
//! * [`world`] — the wall grid, the viewpoint, the texture bank and the
//!   sprite entities the renderer consumes.
//! * [`level`] — text level files (map grid + sprite list) → [`world`] types.
//! * [`renderer`] — the ray-casting / projection / depth-compositing core
//!   plus a software back-end that turns [`renderer::DrawCall`]s into pixels.
//!
//! The core never touches a pixel buffer: it produces a depth-sorted list
//! of draw calls and hands them to a type implementing
//! [`renderer::Renderer`].

pub mod level;
pub mod renderer;
pub mod world;
