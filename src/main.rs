//! Headless replay tool: loads a support-image document, replays a JSON-lines
//! script of host events against it and prints every notification as one
//! JSON line, followed by the final document.
//!
//! ```text
//! supportimages --document board.json --script steps.jsonl
//! {"op":"down","x":50,"y":25}
//! {"op":"move","x":70,"y":30,"modifiers":{"ctrl":true}}
//! {"op":"up","x":70,"y":30}
//! ```


use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;
use serde::Deserialize;
use supportimages::camera::Camera;
use supportimages::config::{Config, ConfigError};
use supportimages::document::DocumentError;
use supportimages::engine::SupportImages;
use supportimages::geom::Point;
use supportimages::input::{Button, Key, Modifiers};
use supportimages::overlay::{OverlayDescriptor, OverlayId};
use supportimages::viewport::Headless;

#[derive(Debug, thiserror::Error)]
enum ReplayError {
    #[error("cannot read {path}: {source}")]
    Read { path: String, source: io::Error },
    #[error("{path}:{line}: invalid step: {source}")]
    Step { path: String, line: usize, source: serde_json::Error },
    #[error(transparent)]
    Document(#[from] DocumentError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("failed to write output: {0}")]
    Write(#[from] io::Error),
}

#[derive(Parser, Debug)]
#[command(name = "supportimages", about = "Replay host events against support image overlays")]
struct Cli {
    /// Document to load before the script runs.
    #[arg(long)]
    document: Option<PathBuf>,

    /// JSON-lines script; `-` reads standard input.
    #[arg(long, default_value = "-")]
    script: String,

    #[arg(long, env = "SUPPORTIMAGES_VIEWPORT_WIDTH", default_value_t = 800.0)]
    width: f64,

    #[arg(long, env = "SUPPORTIMAGES_VIEWPORT_HEIGHT", default_value_t = 600.0)]
    height: f64,

    #[arg(long, env = "SUPPORTIMAGES_ZOOM", default_value_t = 1.0)]
    zoom: f64,

    #[arg(long, env = "SUPPORTIMAGES_PAN_X", default_value_t = 0.0, allow_negative_numbers = true)]
    pan_x: f64,

    #[arg(long, env = "SUPPORTIMAGES_PAN_Y", default_value_t = 0.0, allow_negative_numbers = true)]
    pan_y: f64,

    #[arg(long, env = "SUPPORTIMAGES_PIXEL_RATIO", default_value_t = 1.0)]
    pixel_ratio: f64,
}

/// One scripted host event. Times are milliseconds since the replay started.
#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum Step {
    Down {
        x: f64,
        y: f64,
        #[serde(default)]
        modifiers: Modifiers,
        #[serde(default)]
        button: Button,
    },
    Move {
        x: f64,
        y: f64,
        #[serde(default)]
        modifiers: Modifiers,
    },
    Up {
        x: f64,
        y: f64,
    },
    Key {
        key: String,
    },
    FocusLost,
    Cancel,
    Add {
        image: OverlayDescriptor,
        #[serde(default = "centered")]
        center: bool,
    },
    Remove {
        id: OverlayId,
    },
    Lock {
        id: OverlayId,
        locked: bool,
    },
    Show {
        id: OverlayId,
        visible: bool,
    },
    MoveUp {
        id: OverlayId,
    },
    MoveDown {
        id: OverlayId,
    },
    Select {
        id: OverlayId,
    },
    ClearSelection,
    Loaded {
        url: String,
        width: f64,
        height: f64,
    },
    Failed {
        url: String,
    },
    Pan {
        x: f64,
        y: f64,
    },
    Zoom {
        zoom: f64,
    },
    Render,
    Load,
    Resize {
        width: f64,
        height: f64,
        #[serde(default)]
        at_ms: u64,
    },
    Tick {
        at_ms: u64,
    },
    Destroy,
}

fn centered() -> bool {
    true
}

fn main() -> Result<(), ReplayError> {
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    let viewport = Headless::new(cli.width, cli.height).with_camera(Camera::new(cli.pan_x, cli.pan_y, cli.zoom));
    let mut engine = SupportImages::new(viewport, config);
    engine.set_pixel_ratio(cli.pixel_ratio);
    engine.on_viewport_load();

    if let Some(path) = &cli.document {
        let text = std::fs::read_to_string(path)
            .map_err(|source| ReplayError::Read { path: path.display().to_string(), source })?;
        engine.load_json(&text)?;
    }

    let reader: Box<dyn BufRead> = if cli.script == "-" {
        Box::new(io::stdin().lock())
    } else {
        let file = File::open(&cli.script)
            .map_err(|source| ReplayError::Read { path: cli.script.clone(), source })?;
        Box::new(BufReader::new(file))
    };

    let mut out = io::stdout().lock();
    replay(&mut engine, reader, &cli.script, &mut out, Instant::now())?;
    writeln!(out, "{}", engine.to_json()?)?;
    Ok(())
}

/// Apply each script line in order, writing notifications as they are drained.
fn replay<W: Write>(
    engine: &mut SupportImages<Headless>,
    reader: impl BufRead,
    path: &str,
    out: &mut W,
    start: Instant,
) -> Result<usize, ReplayError> {
    let mut applied = 0;
    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| ReplayError::Read { path: path.to_owned(), source })?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let step: Step = serde_json::from_str(trimmed).map_err(|source| ReplayError::Step {
            path: path.to_owned(),
            line: index + 1,
            source,
        })?;
        apply(engine, step, start);
        applied += 1;
        for notification in engine.take_notifications() {
            serde_json::to_writer(&mut *out, &notification)?;
            writeln!(out)?;
        }
    }
    tracing::info!(applied, "script replayed");
    Ok(applied)
}

fn apply(engine: &mut SupportImages<Headless>, step: Step, start: Instant) {
    let at = |ms: u64| start + Duration::from_millis(ms);
    let dispatch = match step {
        Step::Down { x, y, modifiers, button } => {
            let mut event = engine.pointer_event(Point::new(x, y)).with_modifiers(modifiers);
            event.button = button;
            Some(engine.on_pointer_down(&event))
        }
        Step::Move { x, y, modifiers } => {
            let event = engine.pointer_event(Point::new(x, y)).with_modifiers(modifiers);
            Some(engine.on_pointer_move(&event))
        }
        Step::Up { x, y } => {
            let event = engine.pointer_event(Point::new(x, y));
            Some(engine.on_pointer_up(&event))
        }
        Step::Key { key } => Some(engine.on_key_down(&Key(key))),
        Step::Cancel => Some(engine.cancel()),
        Step::FocusLost => {
            engine.on_focus_lost();
            None
        }
        Step::Add { image, center } => {
            let id = engine.add(image, center);
            tracing::debug!(%id, "scripted add");
            None
        }
        Step::Remove { id } => {
            engine.remove(&id);
            None
        }
        Step::Lock { id, locked } => {
            engine.set_locked(&id, locked);
            None
        }
        Step::Show { id, visible } => {
            engine.set_visible(&id, visible);
            None
        }
        Step::MoveUp { id } => {
            engine.move_up(&id);
            None
        }
        Step::MoveDown { id } => {
            engine.move_down(&id);
            None
        }
        Step::Select { id } => {
            engine.select(&id);
            None
        }
        Step::ClearSelection => {
            engine.clear_selection();
            None
        }
        Step::Loaded { url, width, height } => {
            engine.on_image_loaded(&url, width, height);
            None
        }
        Step::Failed { url } => {
            engine.on_image_failed(&url);
            None
        }
        Step::Pan { x, y } => {
            let camera = &mut engine.viewport_mut().camera;
            camera.pan_x = x;
            camera.pan_y = y;
            engine.on_pan();
            None
        }
        Step::Zoom { zoom } => {
            engine.viewport_mut().camera.zoom = zoom;
            engine.on_zoom();
            None
        }
        Step::Render => {
            engine.render();
            None
        }
        Step::Load => {
            engine.on_viewport_load();
            None
        }
        Step::Resize { width, height, at_ms } => {
            let container = &mut engine.viewport_mut().container;
            container.width = width;
            container.height = height;
            engine.on_window_resize(at(at_ms));
            None
        }
        Step::Tick { at_ms } => {
            engine.tick(at(at_ms));
            None
        }
        Step::Destroy => {
            engine.destroy();
            None
        }
    };
    if let Some(dispatch) = dispatch {
        tracing::debug!(?dispatch, "pointer step");
    }
}
