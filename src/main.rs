//! Terminal scrolling-map demo (default binary).
//!
//! Walk a hero around a procedural map with the arrow keys or WASD; the
//! camera follows. Frames are drawn with the buffered renderer and shown
//! with half-block terminal cells.
//!
//! Environment:
//! - `SCROLLMAP_CONFIG`: path to a TOML renderer config (otherwise the
//!   `SCROLLMAP_*` renderer variables are read)
//! - `SCROLLMAP_LOG`: write tracing output to this file
//! - `SCROLLMAP_LOG_LEVEL`: trace/debug/info/warn/error (default info)

mod world;

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use tracing::info;

use scrollmap::core::{
    BufferedRenderer, GridMapData, RendererConfig, ScrollGroup, Sprite, Surface,
};
use scrollmap::term::{
    scene_fingerprint, CellStyle, FrameBuffer, RedrawThrottle, Rgb, TerminalPresenter,
};
use scrollmap::types::{Point, Size};

const TICK_MS: u64 = 16;
const IDLE_REFRESH_MS: u64 = 500;
const HERO_STEP: i32 = 2;

fn main() -> Result<()> {
    init_logging()?;
    let config = load_config()?;
    let map = world::build_map()?;

    let mut term = TerminalPresenter::new();
    term.enter()?;

    let result = run(&mut term, &map, config);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn init_logging() -> Result<()> {
    let Some(path) = std::env::var_os("SCROLLMAP_LOG") else {
        return Ok(());
    };
    let level = std::env::var("SCROLLMAP_LOG_LEVEL")
        .ok()
        .and_then(|s| s.parse::<tracing::Level>().ok())
        .unwrap_or(tracing::Level::INFO);
    let file = std::fs::File::create(&path)
        .with_context(|| format!("creating log file {}", path.to_string_lossy()))?;
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_ansi(false)
        .with_writer(std::sync::Mutex::new(file))
        .init();
    Ok(())
}

fn load_config() -> Result<RendererConfig> {
    match std::env::var_os("SCROLLMAP_CONFIG") {
        Some(path) => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("reading config {}", path.to_string_lossy()))?;
            Ok(RendererConfig::from_toml_str(&text)?)
        }
        None => Ok(RendererConfig::from_env()),
    }
}

/// Pixel surface size for a terminal: one status row, two pixels per cell.
fn surface_size(cols: u16, rows: u16) -> Size {
    Size::new(cols.max(1) as u32, (rows.saturating_sub(1).max(1) as u32) * 2)
}

fn run(term: &mut TerminalPresenter, map: &GridMapData, config: RendererConfig) -> Result<()> {
    let (cols, rows) = crossterm::terminal::size().unwrap_or((80, 24));
    let size = surface_size(cols, rows);
    let renderer = BufferedRenderer::with_config(map, size, config)?;
    let mut group = ScrollGroup::new(renderer);

    let start = (world::MAP_W * world::TILE / 4) as i32;
    let hero = group.add_to_layer(world::hero(start, start), world::DECOR);
    info!(?size, "demo started");

    let mut frame = Surface::new(size.width, size.height);
    let mut fb = FrameBuffer::new(cols, rows);
    let mut throttle = RedrawThrottle::new(IDLE_REFRESH_MS);
    let started = Instant::now();
    let tick = Duration::from_millis(TICK_MS);
    let map_px = group.map_layer().map_rect();
    let status_style = CellStyle {
        fg: Rgb::new(230, 230, 230),
        bg: Rgb::new(20, 20, 30),
    };

    loop {
        let (cols, rows) = crossterm::terminal::size().unwrap_or((cols, rows));
        let size = surface_size(cols, rows);
        if frame.size() != size {
            frame = Surface::new(size.width, size.height);
            term.invalidate();
        }

        let hero_rect = group
            .get(hero)
            .map(|h| h.rect())
            .context("hero sprite missing")?;
        group.center(Point::new(
            (hero_rect.x + hero_rect.w / 2) as f32,
            (hero_rect.y + hero_rect.h / 2) as f32,
        ));

        let cam = group.map_layer().camera_offset();
        let fingerprint = scene_fingerprint([
            cam.x as i32,
            cam.y as i32,
            hero_rect.x,
            hero_rect.y,
            size.width as i32,
            size.height as i32,
        ]);
        let now_ms = started.elapsed().as_millis() as u64;
        if throttle.should_present(now_ms, fingerprint) {
            group.draw(&mut frame)?;
            fb.fill_from_surface(&frame);
            fb.resize(cols, rows);
            let stats = group.map_layer().stats();
            let status = format!(
                " hero {},{}  tiles drawn {}  full {}  partial {}  (arrows/wasd, q quits)",
                hero_rect.x,
                hero_rect.y,
                stats.tiles_drawn,
                stats.full_redraws,
                stats.partial_redraws
            );
            fb.put_str(0, rows.saturating_sub(1), &status, status_style);
            term.present_swap(&mut fb)?;
        }

        if !event::poll(tick)? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind != KeyEventKind::Release => {
                let (dx, dy) = match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                    KeyCode::Left | KeyCode::Char('a') => (-HERO_STEP, 0),
                    KeyCode::Right | KeyCode::Char('d') => (HERO_STEP, 0),
                    KeyCode::Up | KeyCode::Char('w') => (0, -HERO_STEP),
                    KeyCode::Down | KeyCode::Char('s') => (0, HERO_STEP),
                    _ => (0, 0),
                };
                if let Some(h) = group.get_mut(hero) {
                    h.x = (h.x + dx).clamp(0, map_px.w - h.image.width() as i32);
                    h.y = (h.y + dy).clamp(0, map_px.h - h.image.height() as i32);
                }
            }
            Event::Resize(..) => term.invalidate(),
            _ => {}
        }
    }
}
