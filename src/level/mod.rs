//! Text level files.
//!
//! Two formats, both line-oriented:
//!
//! * **Map grid** — one row per line, comma-separated cell codes
//!   (see [`WallType::from_code`]). The matrix must be square.
//! * **Sprite list** — one sprite per line:
//!   `name, x, y[, scale[, v_shift]]`, where `name` picks a row of the
//!   built-in sprite catalogue. Blank lines and `#` comments are skipped
//!   in both formats.
//!
//! Loading is the only place a bad file can surface; once a [`Grid`] and
//! sprite list exist the renderer cannot fail on them.

use std::fs;
use std::path::Path;

use glam::vec2;
use once_cell::sync::Lazy;
use regex::Regex;
use smallvec::SmallVec;
use thiserror::Error;

use crate::world::{Animation, Grid, Sprite, TextureBank, WallType};

/*──────────────────────────── Error type ───────────────────────────*/

#[derive(Error, Debug)]
pub enum LevelError {
    #[error("cannot read level file: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: `{token}` is not a cell code")]
    BadCell { line: usize, token: String },

    #[error("line {line}: row has {got} cells, expected {expected}")]
    RaggedRow {
        line: usize,
        expected: usize,
        got: usize,
    },

    #[error("map is not square: {rows} rows of {cols} cells")]
    NotSquare { rows: usize, cols: usize },

    #[error("map file contains no rows")]
    EmptyMap,

    #[error("line {line}: malformed sprite entry `{entry}`")]
    BadSprite { line: usize, entry: String },

    #[error("line {line}: unknown sprite kind `{name}`")]
    UnknownSprite { line: usize, name: String },
}

/*──────────────────────────── Map grid ─────────────────────────────*/

/// Parse a map grid from text. Every row must have the same length and
/// the matrix must be square.
pub fn parse_grid(text: &str) -> Result<Grid, LevelError> {
    let mut cells = Vec::new();
    let mut rows = 0usize;
    let mut width = None;

    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut cols = 0usize;
        for token in line.split(',') {
            let token = token.trim();
            let code: u8 = token.parse().map_err(|_| LevelError::BadCell {
                line: idx + 1,
                token: token.into(),
            })?;
            let cell = WallType::from_code(code).ok_or_else(|| LevelError::BadCell {
                line: idx + 1,
                token: token.into(),
            })?;
            cells.push(cell);
            cols += 1;
        }

        match width {
            None => width = Some(cols),
            Some(w) if w != cols => {
                return Err(LevelError::RaggedRow {
                    line: idx + 1,
                    expected: w,
                    got: cols,
                });
            }
            _ => {}
        }
        rows += 1;
    }

    let width = width.ok_or(LevelError::EmptyMap)?;
    if rows != width {
        return Err(LevelError::NotSquare { rows, cols: width });
    }

    log::info!("loaded {rows}×{width} map grid");
    Ok(Grid::from_cells(width, cells))
}

pub fn load_grid<P: AsRef<Path>>(path: P) -> Result<Grid, LevelError> {
    parse_grid(&fs::read_to_string(path)?)
}

/*─────────────────────────── Sprite list ───────────────────────────*/

/// What the loader knows how to spawn. `strips` is empty for flat props;
/// each entry is (sheet texture name, frame count).
struct SpriteDef {
    name: &'static str,
    texture: &'static str,
    strips: &'static [(&'static str, usize)],
    scale: f32,
    v_shift: f32,
}

/// Built-in catalogue. Textures are resolved
/// through the bank at load time; unknown names fall back to the
/// checkerboard rather than failing the load.
const SPRITE_DEFS: &[SpriteDef] = &[
    SpriteDef {
        name: "imp",
        texture: "sprites/imp",
        strips: &[],
        scale: 0.8,
        v_shift: 0.27,
    },
    SpriteDef {
        name: "lamp",
        texture: "sprites/lamp",
        strips: &[("sprites/lamp", 4)],
        scale: 0.6,
        v_shift: 0.2,
    },
    SpriteDef {
        name: "health",
        texture: "sprites/health_box",
        strips: &[],
        scale: 0.4,
        v_shift: 0.6,
    },
    SpriteDef {
        name: "ammo",
        texture: "sprites/ammo_box",
        strips: &[],
        scale: 0.4,
        v_shift: 0.6,
    },
];

static SPRITE_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([a-z_]+)\s*,\s*([0-9.+-]+)\s*,\s*([0-9.+-]+)(?:\s*,\s*([0-9.+-]+))?(?:\s*,\s*([0-9.+-]+))?$")
        .unwrap()
});

/// Parse a sprite list. `bank` resolves texture names; missing textures
/// degrade to the checkerboard id.
pub fn parse_sprites(text: &str, bank: &TextureBank) -> Result<Vec<Sprite>, LevelError> {
    let mut sprites = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let entry = parse_sprite_line(line, idx)?;
        let def = SPRITE_DEFS
            .iter()
            .find(|d| d.name == entry.name)
            .ok_or_else(|| LevelError::UnknownSprite {
                line: idx + 1,
                name: entry.name.to_string(),
            })?;

        let pos = vec2(entry.x, entry.y);
        let scale = entry.scale.unwrap_or(def.scale);
        let v_shift = entry.v_shift.unwrap_or(def.v_shift);

        let sprite = if def.strips.is_empty() {
            Sprite::flat(pos, bank.id_or_missing(def.texture), scale, v_shift)
        } else {
            let strips: SmallVec<[Animation; 4]> = def
                .strips
                .iter()
                .map(|(tex, frames)| Animation::new(bank.id_or_missing(tex), *frames))
                .collect();
            Sprite::animated(pos, strips, scale, v_shift)
        };
        sprites.push(sprite);
    }

    log::info!("loaded {} sprites", sprites.len());
    Ok(sprites)
}

pub fn load_sprites<P: AsRef<Path>>(
    path: P,
    bank: &TextureBank,
) -> Result<Vec<Sprite>, LevelError> {
    parse_sprites(&fs::read_to_string(path)?, bank)
}

/*──────────────────────── capture plumbing ─────────────────────────*/

struct SpriteEntry {
    name: String,
    x: f32,
    y: f32,
    scale: Option<f32>,
    v_shift: Option<f32>,
}

fn parse_sprite_line(line: &str, idx: usize) -> Result<SpriteEntry, LevelError> {
    let bad = || LevelError::BadSprite {
        line: idx + 1,
        entry: line.to_string(),
    };
    let caps = SPRITE_LINE.captures(line).ok_or_else(bad)?;
    let num = |i: usize| -> Result<Option<f32>, LevelError> {
        caps.get(i)
            .map(|m| m.as_str().parse::<f32>().map_err(|_| bad()))
            .transpose()
    };
    Ok(SpriteEntry {
        name: caps[1].to_string(),
        x: num(2)?.ok_or_else(bad)?,
        y: num(3)?.ok_or_else(bad)?,
        scale: num(4)?,
        v_shift: num(5)?,
    })
}

/*====================================================================*/
/*                                Tests                               */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const MAP_3X3: &str = "1,1,1\n1,0,1\n1,1,1\n";

    #[test]
    fn parses_square_map() {
        let g = parse_grid(MAP_3X3).unwrap();
        assert_eq!(g.size(), 3);
        assert_eq!(g.cell_at(0, 0), WallType::Brick);
        assert_eq!(g.cell_at(1, 1), WallType::Empty);
    }

    #[test]
    fn comments_and_blanks_are_skipped() {
        let g = parse_grid("# demo map\n\n1,1\n\n1,6\n").unwrap();
        assert_eq!(g.size(), 2);
        assert_eq!(g.cell_at(1, 1), WallType::OpenDoor);
    }

    #[test]
    fn rejects_bad_cell_codes() {
        let err = parse_grid("1,5\n1,1\n").unwrap_err();
        assert!(matches!(err, LevelError::BadCell { line: 1, .. }), "{err}");

        let err = parse_grid("1,x\n1,1\n").unwrap_err();
        assert!(matches!(err, LevelError::BadCell { .. }), "{err}");
    }

    #[test]
    fn rejects_non_square_maps() {
        assert!(matches!(
            parse_grid("1,1,1\n1,1\n1,1,1\n").unwrap_err(),
            LevelError::RaggedRow { line: 2, .. }
        ));
        assert!(matches!(
            parse_grid("1,1,1\n1,1,1\n").unwrap_err(),
            LevelError::NotSquare { .. }
        ));
        assert!(matches!(parse_grid("# only comments\n").unwrap_err(), LevelError::EmptyMap));
    }

    #[test]
    fn loads_map_from_disk() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(MAP_3X3.as_bytes()).unwrap();
        let g = load_grid(f.path()).unwrap();
        assert_eq!(g.size(), 3);
    }

    #[test]
    fn parses_sprite_lines() {
        let bank = TextureBank::default_with_checker();
        let sprites = parse_sprites(
            "# props\nimp, 3.5, 4.5\nlamp, 2.0, 2.0, 0.9, 0.1\n",
            &bank,
        )
        .unwrap();

        assert_eq!(sprites.len(), 2);
        assert_eq!(sprites[0].pos, vec2(3.5, 4.5));
        assert!(!sprites[0].is_animated());
        assert!((sprites[0].scale - 0.8).abs() < 1e-6); // catalogue default

        assert!(sprites[1].is_animated());
        assert!((sprites[1].scale - 0.9).abs() < 1e-6); // explicit override
        assert!((sprites[1].v_shift - 0.1).abs() < 1e-6);
    }

    #[test]
    fn rejects_malformed_sprite_lines() {
        let bank = TextureBank::default_with_checker();
        assert!(matches!(
            parse_sprites("imp 3.5 4.5\n", &bank).unwrap_err(),
            LevelError::BadSprite { line: 1, .. }
        ));
        assert!(matches!(
            parse_sprites("dragon, 1.0, 1.0\n", &bank).unwrap_err(),
            LevelError::UnknownSprite { line: 1, .. }
        ));
    }
}
