//! Interactive viewer for the software raycaster.
//!
//! ```bash
//! cargo run --release -- maps/demo.txt --sprites maps/demo_sprites.txt
//! ```
//!
//! WASD / arrows move, Left/Right turn, Space uses the door ahead,
//! Escape quits. Textures are generated procedurally so the demo needs
//! no asset files.

use clap::Parser;
use minifb::{Key, KeyRepeat, Window, WindowOptions};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use glam::vec2;
use yaray_rs::level;
use yaray_rs::renderer::{DrawQueue, Projector, Renderer, Software};
use yaray_rs::world::{Grid, Sprite, Texture, TextureBank, TextureId, Viewpoint};

/// Walk a grid map with the software raycaster.
#[derive(Parser)]
struct Args {
    /// Map grid file (comma-separated cell codes, square)
    map: PathBuf,

    /// Sprite list file (`name, x, y[, scale[, v_shift]]` per line)
    #[arg(long)]
    sprites: Option<PathBuf>,

    #[arg(long, default_value_t = 1024)]
    width: usize,

    #[arg(long, default_value_t = 768)]
    height: usize,
}

const MOVE_SPEED: f32 = 3.0; // cells per second
const TURN_SPEED: f32 = 2.2; // radians per second
const ANIM_PERIOD: Duration = Duration::from_millis(180);

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut grid = level::load_grid(&args.map)?;

    let mut bank = TextureBank::default_with_checker();
    let sky = install_textures(&mut bank);

    let mut sprites: Vec<Sprite> = match &args.sprites {
        Some(path) => level::load_sprites(path, &bank)?,
        None => Vec::new(),
    };

    let mut view = Viewpoint::new(spawn_point(&grid), 0.0);

    let projector = Projector::new(args.width, args.height);
    let caster = projector.ray_caster();
    let mut queue = DrawQueue::new();
    let mut renderer = Software::default();

    let mut win = Window::new("yaray-rs", args.width, args.height, WindowOptions::default())?;
    win.set_target_fps(60);

    // ────────────────── benchmarking state ──────────────────────────────
    let mut acc_time = Duration::ZERO; // cumulated render time
    let mut acc_frames = 0usize; // frames in the current window
    let mut last_print = Instant::now(); // when we printed last

    let mut last_tick = Instant::now();
    let mut last_anim = Instant::now();

    while win.is_open() && !win.is_key_down(Key::Escape) {
        let t0 = Instant::now(); // ┌─ frame timer start
        let dt = last_tick.elapsed().as_secs_f32();
        last_tick = Instant::now();

        /* --------------- input ------------------------------------------- */
        let mut forward = 0.0;
        let mut strafe = 0.0;
        let mut turn = 0.0;
        if win.is_key_down(Key::Up) || win.is_key_down(Key::W) {
            forward += 1.0;
        }
        if win.is_key_down(Key::Down) || win.is_key_down(Key::S) {
            forward -= 1.0;
        }
        if win.is_key_down(Key::A) {
            strafe -= 1.0;
        }
        if win.is_key_down(Key::D) {
            strafe += 1.0;
        }
        if win.is_key_down(Key::Left) {
            turn -= 1.0;
        }
        if win.is_key_down(Key::Right) {
            turn += 1.0;
        }

        view.turn(turn * TURN_SPEED * dt);
        view.step(forward * MOVE_SPEED * dt, strafe * MOVE_SPEED * dt, &grid);

        // door use is an edge trigger and a between-frames mutation: the
        // grid never changes while a fan is mid-cast
        if win.is_key_pressed(Key::Space, KeyRepeat::No) {
            if let Some((row, col)) = view.facing_door(&grid) {
                grid.toggle_door(row, col);
                log::debug!("toggled door at ({row}, {col})");
            }
        }

        if last_anim.elapsed() >= ANIM_PERIOD {
            for s in &mut sprites {
                s.advance_frame();
            }
            last_anim = Instant::now();
        }

        /* --------------- cast, project, queue ---------------------------- */
        for hit in caster.cast_fan(&view, &grid) {
            if let Some(call) = projector.project_column(&hit, &bank) {
                queue.push(call);
            }
        }
        for s in &mut sprites {
            s.update_depth(&view);
            if let Some(call) = projector.project_sprite(s, &view, &bank) {
                queue.push(call);
            }
        }

        /* --------------- draw -------------------------------------------- */
        renderer.begin_frame(args.width, args.height);
        renderer.draw_background(&bank, sky, view.yaw());
        queue.composite(&mut renderer, &bank);
        renderer.end_frame(|fb, w, h| {
            acc_time += t0.elapsed();
            acc_frames += 1;
            win.update_with_buffer(fb, w, h).unwrap()
        });

        if last_print.elapsed() >= Duration::from_secs(3) {
            let avg_ms = acc_time.as_secs_f64() * 1000.0 / acc_frames as f64;
            println!("avg render: {:.2} ms  ({:.1} FPS)", avg_ms, 1000.0 / avg_ms);
            acc_time = Duration::ZERO;
            acc_frames = 0;
            last_print = Instant::now();
        }
    }
    Ok(())
}

/// Center of the first walkable cell, falling back to the map center.
fn spawn_point(grid: &Grid) -> glam::Vec2 {
    let n = grid.size() as i32;
    for row in 0..n {
        for col in 0..n {
            if grid.is_walkable(row, col) {
                return vec2(col as f32 + 0.5, row as f32 + 0.5);
            }
        }
    }
    vec2(n as f32 * 0.5, n as f32 * 0.5)
}

/*──────────────────── procedural demo textures ─────────────────────*/

fn paint(name: &str, w: usize, h: usize, f: impl Fn(usize, usize) -> u32) -> Texture {
    let mut pixels = Vec::with_capacity(w * h);
    for y in 0..h {
        for x in 0..w {
            pixels.push(f(x, y));
        }
    }
    Texture {
        name: name.into(),
        w,
        h,
        pixels,
    }
}

/// Cheap deterministic speckle in [0, 32).
fn speckle(x: usize, y: usize) -> u32 {
    ((x.wrapping_mul(31) ^ y.wrapping_mul(17)).wrapping_mul(2654435761) >> 27) as u32 & 0x1F
}

fn grey(v: u32) -> u32 {
    0xFF_000000 | v << 16 | v << 8 | v
}

/// Fill the bank with the demo wall/sprite set; returns the sky id.
fn install_textures(bank: &mut TextureBank) -> TextureId {
    let walls: [(&str, Box<dyn Fn(usize, usize) -> u32>); 4] = [
        (
            "walls/brick",
            Box::new(|x, y| {
                let course = y / 16;
                let shifted = x + course * 16; // half-brick offset per course
                let mortar = y % 16 < 2 || shifted % 32 < 2;
                if mortar {
                    grey(0x60)
                } else {
                    0xFF_000000 | (0x90 + speckle(x, y)) << 16 | 0x30 << 8 | 0x28
                }
            }),
        ),
        (
            "walls/stone",
            Box::new(|x, y| grey(0x70 + speckle(x, y))),
        ),
        (
            "walls/mossy_stone",
            Box::new(|x, y| {
                let base = 0x58 + speckle(x, y);
                let moss = speckle(x / 3, y / 3) > 0x17;
                if moss {
                    0xFF_000000 | 0x28 << 16 | (0x60 + speckle(y, x)) << 8 | 0x20
                } else {
                    grey(base)
                }
            }),
        ),
        (
            "walls/door",
            Box::new(|x, y| {
                let panel = (8..56).contains(&x) && (8..56).contains(&y);
                let v = if panel { 0x50 } else { 0x38 };
                0xFF_000000 | (v + speckle(x, y)) << 16 | (v + 0x18) << 8 | 0x20
            }),
        ),
    ];
    for (name, f) in walls {
        bank.insert(name, paint(name, 64, 64, f)).expect("fresh bank");
    }

    // sprites: alpha-0 background, simple silhouettes
    bank.insert(
        "sprites/imp",
        paint("sprites/imp", 32, 32, |x, y| {
            let dx = x as i32 - 16;
            let dy = y as i32 - 14;
            if dx * dx + dy * dy * 2 < 140 {
                0xFF_000000 | (0x70 + speckle(x, y)) << 16 | 0x20 << 8 | 0x18
            } else {
                0
            }
        }),
    )
    .expect("fresh bank");

    // 4-frame lamp sheet: a flame that grows per frame
    bank.insert(
        "sprites/lamp",
        paint("sprites/lamp", 64, 16, |x, y| {
            let frame = x / 16;
            let fx = (x % 16) as i32 - 8;
            let fy = y as i32 - 6;
            let r = 8 + frame as i32;
            if fx * fx * 3 + fy * fy * 2 < r * r {
                0xFF_000000 | 0xE8 << 16 | (0xB0 + 0x10 * frame as u32) << 8 | 0x40
            } else if y > 11 && fx.abs() < 2 {
                grey(0x50) // post
            } else {
                0
            }
        }),
    )
    .expect("fresh bank");

    for (name, body) in [("sprites/health_box", 0xFF_B02020), ("sprites/ammo_box", 0xFF_806020)] {
        bank.insert(
            name,
            paint(name, 16, 16, move |x, y| {
                if (2..14).contains(&x) && (4..14).contains(&y) {
                    body
                } else {
                    0
                }
            }),
        )
        .expect("fresh bank");
    }

    bank.insert(
        "backgrounds/sky",
        paint("backgrounds/sky", 256, 64, |x, y| {
            let t = y as u32 * 255 / 63;
            let star = speckle(x, y) == 0x1F && y < 40;
            if star {
                grey(0xE0)
            } else {
                0xFF_000000 | (0x18 + t / 8) << 16 | (0x10 + t / 6) << 8 | (0x30 + t / 3)
            }
        }),
    )
    .expect("fresh bank")
}
