use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pushbox_assets::{BUNDLED_LEVELS, BUNDLED_MENU, JsonPackLoader, PackLoader};
use std::process::Command;

#[derive(Parser)]
#[command(name = "xtask", about = "Workspace automation for pushbox")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run fmt, clippy, tests, pack validation, and doc in sequence
    Check,
    /// Run cargo fmt --check on all crates
    Fmt,
    /// Run clippy on all targets with warnings denied
    Clippy,
    /// Run all tests
    Test,
    /// Run the field redraw benchmark in release mode
    Bench,
    /// Decode the bundled packs and any extra pack files given
    Packs {
        /// Extra pack files to validate
        files: Vec<String>,
    },
    /// Build rustdoc for the workspace
    Doc,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check => {
            fmt()?;
            clippy()?;
            test()?;
            packs(&[])?;
            doc()?;
        }
        Commands::Fmt => fmt()?,
        Commands::Clippy => clippy()?,
        Commands::Test => test()?,
        Commands::Bench => bench()?,
        Commands::Packs { files } => packs(&files)?,
        Commands::Doc => doc()?,
    }

    Ok(())
}

fn cargo(args: &[&str]) -> Result<()> {
    println!("==> cargo {}", args.join(" "));
    let status = Command::new("cargo")
        .args(args)
        .status()
        .context("spawning cargo")?;
    if !status.success() {
        anyhow::bail!("cargo {} failed ({status})", args[0]);
    }
    Ok(())
}

fn fmt() -> Result<()> {
    cargo(&["fmt", "--all", "--", "--check"])
}

fn clippy() -> Result<()> {
    cargo(&["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"])
}

fn test() -> Result<()> {
    cargo(&["test", "--workspace"])
}

fn bench() -> Result<()> {
    cargo(&["bench", "-p", "pushbox-render", "--bench", "bench_field_redraw"])
}

fn doc() -> Result<()> {
    cargo(&["doc", "--workspace", "--no-deps"])
}

fn packs(files: &[String]) -> Result<()> {
    println!("==> validating level packs");
    let loader = JsonPackLoader::new();

    for name in [BUNDLED_LEVELS, BUNDLED_MENU] {
        let mut reader = loader.open_bundled(name)?;
        let levels = loader
            .load_pack(&mut reader)
            .with_context(|| format!("bundled pack {name}"))?;
        println!("    {name}: {} level(s)", levels.len());
    }
    for file in files {
        let mut reader = loader.open_file(file)?;
        let levels = loader
            .load_pack(&mut reader)
            .with_context(|| format!("pack file {file}"))?;
        println!("    {file}: {} level(s)", levels.len());
    }
    Ok(())
}
