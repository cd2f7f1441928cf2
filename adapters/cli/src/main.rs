#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Campus Quest experience.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use campus_quest_rendering::{Color, Presentation, RenderingBackend, Scene};
use campus_quest_rendering_macroquad::MacroquadBackend;
use campus_quest_rendering_terminal::TerminalBackend;
use campus_quest_system_session::Session;
use campus_quest_world::Campus;
use clap::{ArgAction, Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Rendering adapter selectable from the command line.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
enum Renderer {
    /// Windowed renderer built on macroquad.
    Macroquad,
    /// Renderer drawing into the controlling terminal.
    Terminal,
}

impl Renderer {
    /// Default log filter. The terminal renderer shares its screen with stderr.
    const fn default_filter(self) -> &'static str {
        match self {
            Self::Macroquad => "info",
            Self::Terminal => "warn",
        }
    }
}

/// Explore the campus and finish every quest.
#[derive(Debug, Parser)]
#[command(name = "campus-quest", about = "Campus exploration game", version)]
struct Args {
    /// Rendering adapter driving the session
    #[arg(long, value_enum, default_value_t = Renderer::Macroquad)]
    renderer: Renderer,

    /// TOML campus configuration replacing the built-in campus
    #[arg(long, value_name = "PATH")]
    campus: Option<PathBuf>,

    /// Synchronise presentation with the display refresh rate (macroquad)
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    vsync: bool,

    /// Log the frame rate once per second (macroquad)
    #[arg(long)]
    show_fps: bool,
}

/// Entry point for the Campus Quest command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.renderer);

    let campus = load_campus(args.campus.as_deref())?;
    let mut session = Session::new(campus);
    let presentation = Presentation::new(
        "Campus Quest",
        Color::from_rgb_u8(24, 28, 36),
        session.scene(),
    );
    info!(renderer = ?args.renderer, "starting session");

    let update_scene = move |dt, input, scene: &mut Scene| session.advance(dt, input, scene);
    match args.renderer {
        Renderer::Macroquad => MacroquadBackend::new()
            .with_vsync(args.vsync)
            .with_show_fps(args.show_fps)
            .run(presentation, update_scene),
        Renderer::Terminal => TerminalBackend::new().run(presentation, update_scene),
    }
}

fn init_tracing(renderer: Renderer) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(renderer.default_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn load_campus(path: Option<&Path>) -> Result<Campus> {
    let Some(path) = path else {
        return Ok(Campus::default());
    };

    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read campus configuration {}", path.display()))?;
    let campus = Campus::from_toml_str(&source)
        .with_context(|| format!("invalid campus configuration {}", path.display()))?;
    info!(path = %path.display(), "loaded campus configuration");
    Ok(campus)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("campus-quest-{}-{name}", std::process::id()));
        fs::write(&path, contents).expect("write scratch file");
        path
    }

    #[test]
    fn defaults_select_macroquad_with_vsync() {
        let args = Args::try_parse_from(["campus-quest"]).expect("parse");
        assert_eq!(args.renderer, Renderer::Macroquad);
        assert!(args.vsync);
        assert!(!args.show_fps);
        assert!(args.campus.is_none());
    }

    #[test]
    fn flags_are_parsed() {
        let args = Args::try_parse_from([
            "campus-quest",
            "--renderer",
            "terminal",
            "--vsync",
            "false",
            "--show-fps",
            "--campus",
            "campus.toml",
        ])
        .expect("parse");
        assert_eq!(args.renderer, Renderer::Terminal);
        assert!(!args.vsync);
        assert!(args.show_fps);
        assert_eq!(args.campus, Some(PathBuf::from("campus.toml")));
        assert_eq!(args.renderer.default_filter(), "warn");
    }

    #[test]
    fn unknown_renderer_is_rejected() {
        assert!(Args::try_parse_from(["campus-quest", "--renderer", "vulkan"]).is_err());
    }

    #[test]
    fn missing_path_uses_the_built_in_campus() {
        let campus = load_campus(None).expect("default campus");
        assert_eq!(campus.locations().len(), 5);
    }

    #[test]
    fn campus_file_is_loaded() {
        let path = scratch_file("valid.toml", "version = 1\n\n[map]\nwidth = 1000.0\nheight = 700.0\n");
        let result = load_campus(Some(&path));
        let _ = fs::remove_file(&path);
        let campus = result.expect("valid campus");
        assert_eq!(campus.map().width, 1000.0);
        assert_eq!(campus.locations().len(), 5);
    }

    #[test]
    fn errors_name_the_offending_file() {
        let missing = std::env::temp_dir().join("campus-quest-does-not-exist.toml");
        let error = load_campus(Some(&missing)).expect_err("missing file");
        assert!(format!("{error:#}").contains("campus-quest-does-not-exist.toml"));

        let path = scratch_file("broken.toml", "version = 7\n");
        let result = load_campus(Some(&path));
        let _ = fs::remove_file(&path);
        let error = result.expect_err("unsupported version");
        assert!(format!("{error:#}").contains("invalid campus configuration"));
    }
}
