//! detlab command line.
//!
//! `replay` drives a [`Session`] headlessly from a JSON script of canvas
//! events, actions and key presses, printing the status line after each step.
//! `classes` lists a class catalog and `keys` the active keybindings.

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde::Deserialize;

use detlab::config::AppConfig;
use detlab::keybindings::KeyBindings;
use detlab::model::ClassCatalog;
use detlab::render::RasterSurface;
use detlab::{Action, CanvasEvent, Session};

#[derive(Parser, Debug)]
#[command(name = "detlab", about = "Detection label editor", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a scripted labeling session
    Replay {
        /// Directory containing input images
        #[arg(short = 'i', long = "images")]
        images: PathBuf,

        /// Directory receiving labels and image copies
        #[arg(short = 's', long = "save")]
        save: PathBuf,

        /// Class catalog file (`id,name` per line)
        #[arg(short = 'c', long = "classes")]
        classes: PathBuf,

        /// JSON array of script steps
        #[arg(long = "script")]
        script: PathBuf,

        /// Configuration file; defaults are used when omitted
        #[arg(long = "config")]
        config: Option<PathBuf>,

        /// Write the final frame to this PNG
        #[arg(long = "render")]
        render: Option<PathBuf>,
    },
    /// Print the classes in a catalog file
    Classes {
        file: PathBuf,
    },
    /// Print the active keybindings
    Keys {
        /// Configuration file; defaults are used when omitted
        #[arg(long = "config")]
        config: Option<PathBuf>,
    },
}

/// One scripted input.
///
/// ```json
/// [
///   {"event": {"type": "pointer_down", "x": 320, "y": 270}},
///   {"action": "save"},
///   {"key": "d"}
/// ]
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
enum ScriptStep {
    Event(CanvasEvent),
    Action(Action),
    Key(char),
}

fn load_script(path: &Path) -> Result<Vec<ScriptStep>, Box<dyn Error>> {
    let json = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

fn init_logging(config: &AppConfig) {
    // RUST_LOG wins over the configured level
    env_logger::Builder::new()
        .filter_level(config.preferences.log_level.to_level_filter())
        .parse_default_env()
        .init();
}

fn run_step(session: &mut Session, keys: &KeyBindings, step: &ScriptStep) {
    let action = match step {
        ScriptStep::Event(event) => {
            session.canvas(*event);
            return;
        }
        ScriptStep::Action(action) => Some(*action),
        ScriptStep::Key(key) => keys.action_for_key(*key),
    };

    match action {
        Some(action) => {
            if let Err(e) = session.handle(action) {
                log::error!("{} failed: {}", action.description(), e);
                eprintln!("Error: {e}");
            }
        }
        None => log::warn!("Unbound key in script: {:?}", step),
    }
}

fn replay(
    images: &Path,
    save: &Path,
    classes: &Path,
    script: &Path,
    config: &AppConfig,
    render: Option<&Path>,
) -> Result<(), Box<dyn Error>> {
    let catalog = ClassCatalog::load(classes)?;
    let steps = load_script(script)?;
    let mut session = Session::open(images, save, catalog, &config.preferences)?;
    println!("{}", session.status_line());

    for (i, step) in steps.iter().enumerate() {
        run_step(&mut session, &config.keybindings, step);
        println!("[{}] {}", i + 1, session.status_line());
    }

    if let Some(out) = render {
        let mut surface = RasterSurface::new(
            config.preferences.canvas_width,
            config.preferences.canvas_height,
        );
        session.render(&mut surface);
        surface.into_image().save(out)?;
        log::info!("Wrote frame to {}", out.display());
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<AppConfig, Box<dyn Error>> {
    Ok(match path {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    })
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Replay {
            images,
            save,
            classes,
            script,
            config,
            render,
        } => {
            let config = load_config(config.as_deref())?;
            init_logging(&config);
            replay(
                &images,
                &save,
                &classes,
                &script,
                &config,
                render.as_deref(),
            )
        }
        Command::Classes { file } => {
            let catalog = ClassCatalog::load(&file)?;
            if catalog.is_empty() {
                eprintln!("No classes in {}", file.display());
                return Ok(());
            }
            for category in catalog.iter() {
                let [r, g, b] = category.color;
                println!(
                    "{},{}  #{:02x}{:02x}{:02x}",
                    category.id, category.name, r, g, b
                );
            }
            Ok(())
        }
        Command::Keys { config } => {
            let config = load_config(config.as_deref())?;
            for (key, action) in config.keybindings.bindings() {
                println!("{:<3} {}", key, action.description());
            }
            Ok(())
        }
    }
}
