use crate::config::resolve_config_dir;
use crate::path_utils::program_location;
use crate::session::{self, SessionOptions};
use crate::toggle::toggle_one;
use anyhow::{Result, anyhow};
use clap::Parser;
use std::env;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Toggle this single file between active and .disabled, then exit
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Configuration directory (default: $ALLDISABLE_CONFIG_DIR, then the platform config dir)
    #[arg(short = 'C', long = "config-dir")]
    pub config_dir: Option<PathBuf>,

    /// Print the resolved configuration directory path and exit
    #[arg(long)]
    pub print_config_dir_path: bool,

    /// Directory to manage instead of the one holding this program
    #[arg(short = 'd', long = "dir", value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Do not watch the directory for changes
    #[arg(long)]
    pub no_watch: bool,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    run_with(cli)
}

pub fn run_with(cli: Cli) -> Result<()> {
    // single-file mode: no config, no scan, no watcher
    if let Some(file) = cli.file.as_deref() {
        return toggle_single(file);
    }

    let config_dir = resolve_config_dir(cli.config_dir.as_deref())?;
    if cli.print_config_dir_path {
        println!("{}", config_dir.display());
        return Ok(());
    }

    let (program_dir, program_name) = program_location()?;
    let directory = match cli.directory {
        Some(dir) => resolve_directory(&dir)?,
        None => program_dir,
    };

    session::run(SessionOptions {
        directory,
        program_name,
        config_dir,
        watch: !cli.no_watch,
    })
}

fn toggle_single(file: &Path) -> Result<()> {
    let target = toggle_one(file)?;
    tracing::info!(from = %file.display(), to = %target.display(), "toggled");
    Ok(())
}

fn resolve_directory(dir: &Path) -> Result<PathBuf> {
    if !dir.is_dir() {
        return Err(anyhow!(t!("errors.not_a_directory", path = dir.display())));
    }
    let dir = if dir.is_absolute() {
        dir.to_path_buf()
    } else {
        env::current_dir()?.join(dir)
    };
    Ok(dir)
}
