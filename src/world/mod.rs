mod camera;
mod grid;
mod sprite;
mod texture;

pub use camera::Viewpoint;
pub use grid::{CellFlags, Grid, WallType};
pub use sprite::{Animation, FrameRef, Sprite, SpriteKind};
pub use texture::{NO_TEXTURE, Texture, TextureBank, TextureError, TextureId};
