// SPDX-License-Identifier: MIT OR Apache-2.0
//! `stagehand` - headless playback tester for Stagehand projects.
//!
//! Loads a project, drives its active composition with a playback clock and
//! prints one JSON frame sample per line.

use clap::{Parser, Subcommand};
use stagehand_editor::{EditorSession, EditorSettings, PlaybackClock, ProjectFile, SETTINGS_FILE_NAME};
use stagehand_timeline::layer::{OPACITY, POSITION, ROTATION, SCALE, TEXT, VOLUME};
use stagehand_timeline::{LayerContent, ShapeKind, Vec2};
use std::path::{Path, PathBuf};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Stagehand project playback tester", long_about = None)]
struct Cli {
    /// Editor settings file (RON)
    #[arg(short, long, default_value = SETTINGS_FILE_NAME)]
    settings: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a small demo project.
    Demo {
        /// Output project path.
        output: PathBuf,
    },
    /// Print a summary of a project.
    Info {
        /// Project to inspect.
        project: PathBuf,
    },
    /// Play the active composition and print one JSON frame per line.
    Play {
        /// Project to play.
        project: PathBuf,
        /// Start time in seconds.
        #[arg(long, default_value_t = 0.0)]
        from: f64,
        /// Wrap around at the end.
        #[arg(long)]
        looping: bool,
        /// Maximum number of frames to print.
        #[arg(long, default_value_t = 10_000)]
        max_frames: usize,
    },
}

fn main() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("stagehand_editor=debug,stagehand_timeline=info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        tracing::error!("stagehand failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> stagehand_editor::Result<()> {
    let settings = EditorSettings::load_or_default(&cli.settings)?;

    match cli.command {
        Commands::Demo { output } => write_demo(&output, settings),
        Commands::Info { project } => print_info(&project, settings),
        Commands::Play {
            project,
            from,
            looping,
            max_frames,
        } => play(&project, settings, from, looping, max_frames),
    }
}

fn write_demo(output: &Path, settings: EditorSettings) -> stagehand_editor::Result<()> {
    let mut session = EditorSession::new(settings);

    let ball = session.add_layer(
        "Ball",
        LayerContent::Shape {
            shape: ShapeKind::Ellipse,
            fill: [230, 80, 40, 255],
        },
    )?;
    session.add_or_update_keyframe(ball, POSITION, 0.0, Vec2::new(40.0, 120.0))?;
    session.add_or_update_keyframe(ball, POSITION, 2.0, Vec2::new(280.0, 120.0))?;
    session.add_or_update_keyframe(ball, ROTATION, 0.0, 0.0)?;
    session.add_or_update_keyframe(ball, ROTATION, 2.0, 360.0)?;
    session.add_or_update_keyframe(ball, SCALE, 1.0, Vec2::new(150.0, 150.0))?;

    let title = session.add_layer(
        "Title",
        LayerContent::Text {
            text: "Ready".to_string(),
            font: "Sans".to_string(),
            font_size: 24.0,
        },
    )?;
    session.add_or_update_keyframe(title, TEXT, 0.0, "Ready")?;
    session.add_or_update_keyframe(title, TEXT, 1.0, "Set")?;
    session.add_or_update_keyframe(title, TEXT, 2.0, "Go")?;
    session.add_or_update_keyframe(title, OPACITY, 0.0, 0.0)?;
    session.add_or_update_keyframe(title, OPACITY, 0.5, 100.0)?;

    session.set_play_head(1.0);
    session.set_parent(title, Some(ball))?;

    let music = session.add_layer(
        "Music",
        LayerContent::Audio {
            asset: None,
            start_time: 0.0,
        },
    )?;
    session.add_or_update_keyframe(music, VOLUME, 0.0, 100.0)?;
    session.add_or_update_keyframe(music, VOLUME, 2.0, 0.0)?;
    session.set_play_head(0.0);

    session.to_project().save(output)
}

fn print_info(path: &Path, settings: EditorSettings) -> stagehand_editor::Result<()> {
    let session = EditorSession::from_project(ProjectFile::load(path)?, settings);
    let active = session.active_id();

    for comp in session.library().compositions() {
        let marker = if comp.id == active { "*" } else { " " };
        println!(
            "{marker} {} ({}x{}, {}s @ {} fps, {} layers)",
            comp.name,
            comp.width,
            comp.height,
            comp.duration,
            comp.frames_per_second,
            comp.layer_count()
        );
        for layer in comp.layers() {
            let parent = comp
                .parent_of(layer)
                .map(|p| format!(" -> {}", p.name))
                .unwrap_or_default();
            println!(
                "    [{}] {} [{}, {}]{}",
                layer.kind().name(),
                layer.name,
                layer.in_point,
                layer.out_point,
                parent
            );
        }
    }
    Ok(())
}

fn play(
    path: &Path,
    settings: EditorSettings,
    from: f64,
    looping: bool,
    max_frames: usize,
) -> stagehand_editor::Result<()> {
    let session = EditorSession::from_project(ProjectFile::load(path)?, settings);
    let comp = session.active_composition()?;
    tracing::info!("Playing {} from {}s", comp.name, from);

    let mut clock = PlaybackClock::new();
    clock.looping = looping;
    clock.seek(comp.snap_time(from.min(comp.duration)));
    clock.play();

    let step = comp.frame_duration();
    for _ in 0..max_frames {
        let frame = comp.evaluate_frame(clock.time, session.library());
        println!("{}", serde_json::to_string(&frame)?);

        if !clock.is_playing() {
            break;
        }
        clock.update(step, comp.duration);
    }
    Ok(())
}
