use anyhow::Context;
use clap::{Parser, Subcommand};
use pushbox_assets::JsonPackLoader;
use pushbox_common::Cell;
use pushbox_kernel::Board;
use pushbox_render::RenderConfig;
use pushbox_session::Session;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pushbox-cli", about = "CLI tool for pushbox level catalogs")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// List the catalog in play order
    Levels {
        /// External level pack, loaded before the bundled one. Repeatable.
        #[arg(short, long = "pack")]
        packs: Vec<String>,
    },
    /// Render a level's field to a PNG file
    Render {
        /// External level pack, loaded before the bundled one. Repeatable.
        #[arg(short, long = "pack")]
        packs: Vec<String>,
        /// Catalog index of the level to render
        #[arg(short, long, conflicts_with = "splash")]
        level: Option<usize>,
        /// Render the splash level
        #[arg(long)]
        splash: bool,
        /// Cell size in pixels
        #[arg(short = 'z', long, default_value = "32")]
        cell_size: u32,
        /// Output PNG path
        #[arg(short, long)]
        out: PathBuf,
    },
}

fn load_session(packs: &[String], config: RenderConfig) -> anyhow::Result<Session<Board>> {
    let mut session = Session::new(config);
    session
        .load(&JsonPackLoader::new(), packs)
        .context("loading level packs")?;
    Ok(session)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("pushbox-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", pushbox_common::crate_info());
            println!("kernel: {}", pushbox_kernel::crate_info());
            println!("assets: {}", pushbox_assets::crate_info());
            println!("render: {}", pushbox_render::crate_info());
            println!("session: {}", pushbox_session::crate_info());
        }
        Commands::Levels { packs } => {
            let session = load_session(&packs, RenderConfig::default())?;
            let catalog = session.catalog();
            for (i, level) in catalog.levels().iter().enumerate() {
                let containers = level.cells().iter().filter(|c| c.has_container()).count();
                let plates = level.cells().iter().filter(|c| c.has_plate()).count();
                println!(
                    "{i:>3}  {:<24} {}x{}  containers={containers} plates={plates}",
                    level.name(),
                    level.width(),
                    level.height()
                );
            }
            if let Some(splash) = catalog.splash() {
                println!("splash: {}", splash.name());
            }
        }
        Commands::Render {
            packs,
            level,
            splash,
            cell_size,
            out,
        } => {
            let mut session = load_session(&packs, RenderConfig::with_cell_size(cell_size))?;
            if splash {
                session.start_splash_level()?;
            } else {
                let index = level.unwrap_or(0);
                let level = session
                    .catalog()
                    .get(index)
                    .cloned()
                    .with_context(|| {
                        format!(
                            "no level {index}; catalog holds {}",
                            session.catalog().len()
                        )
                    })?;
                session.start(level)?;
            }

            let game = session.game().context("no active level")?;
            let canvas = game
                .renderer()
                .canvas()
                .context("renderer has no surface")?;
            let glyphs = game
                .level()
                .cells()
                .iter()
                .filter(|c| matches!(c, Cell::Glyph(_)))
                .count();
            tracing::debug!(glyphs, "rendering field");

            image::save_buffer(
                &out,
                canvas.as_bytes(),
                canvas.width(),
                canvas.height(),
                image::ColorType::Rgba8,
            )
            .with_context(|| format!("writing {}", out.display()))?;
            println!(
                "{} ({}x{}px) -> {}",
                game.level().name(),
                canvas.width(),
                canvas.height(),
                out.display()
            );
        }
    }

    Ok(())
}
