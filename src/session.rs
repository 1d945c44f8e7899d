//! Terminal front end: a menu loop over the toggle core.

use crate::config::{ExclusionConfig, config_file_path};
use crate::context::AppContext;
use crate::error::AppError;
use crate::file_set::FileSetChange;
use crate::monitor::Monitor;
use crate::path_utils::display_name;
use crate::settings::{ExtensionAdded, Settings};
use crate::toggle::{self, BatchReport};
use anyhow::{Context, Result, anyhow};
use inquire::error::InquireError;
use inquire::{MultiSelect, Select, Text};
use std::ffi::OsString;
use std::fmt;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::Receiver;

#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub directory: PathBuf,
    pub program_name: OsString,
    pub config_dir: PathBuf,
    pub watch: bool,
}

pub fn is_interactive() -> bool {
    std::io::stdin().is_terminal()
}

pub fn run(options: SessionOptions) -> Result<()> {
    if !is_interactive() {
        return Err(anyhow!(t!("session.non_interactive")));
    }

    let config_path = config_file_path(&options.config_dir);
    let loaded = ExclusionConfig::load_or_init(&config_path);
    if let Some(warning) = &loaded.warning {
        eprintln!(
            "{}",
            t!("session.config_warning", error = warning.display_localized())
        );
    }

    let settings = Settings::new(config_path, loaded.config);
    let ctx = Arc::new(AppContext::new(
        options.directory,
        options.program_name,
        settings,
    ));
    ctx.rescan()?;
    let changes = ctx.subscribe();

    let monitor = if options.watch {
        match Monitor::start(Arc::clone(&ctx)) {
            Ok(monitor) => Some(monitor),
            Err(err) => {
                eprintln!(
                    "{}",
                    t!("session.watch_unavailable", error = err.display_localized())
                );
                None
            }
        }
    } else {
        None
    };

    println!("{}", t!("session.title"));
    println!(
        "{}",
        t!("session.directory", dir = ctx.directory().display())
    );
    print_file_list(&ctx.tracked_paths());

    let result = menu_loop(&ctx, &changes, monitor.is_some());

    if let Some(monitor) = monitor {
        monitor.stop();
    }
    result
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuAction {
    DisableAll,
    EnableAll,
    List,
    Refresh,
    Settings,
    About,
    Quit,
}

impl MenuAction {
    const ALL: [MenuAction; 7] = [
        MenuAction::DisableAll,
        MenuAction::EnableAll,
        MenuAction::List,
        MenuAction::Refresh,
        MenuAction::Settings,
        MenuAction::About,
        MenuAction::Quit,
    ];
}

impl fmt::Display for MenuAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MenuAction::DisableAll => t!("session.menu.disable_all"),
            MenuAction::EnableAll => t!("session.menu.enable_all"),
            MenuAction::List => t!("session.menu.list"),
            MenuAction::Refresh => t!("session.menu.refresh"),
            MenuAction::Settings => t!("session.menu.settings"),
            MenuAction::About => t!("session.menu.about"),
            MenuAction::Quit => t!("session.menu.quit"),
        };
        f.write_str(&label)
    }
}

fn menu_loop(ctx: &AppContext, changes: &Receiver<FileSetChange>, watching: bool) -> Result<()> {
    loop {
        report_changes(changes, watching);

        let prompt = t!("session.menu.prompt", count = ctx.files().len());
        let action = match Select::new(&prompt, MenuAction::ALL.to_vec()).prompt() {
            Ok(action) => action,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                return Ok(());
            }
            Err(err) => return Err(err).context(t!("session.prompt_failed").to_string()),
        };

        match action {
            MenuAction::DisableAll => {
                let report = toggle::disable_all(ctx);
                print_failures(&report);
                println!(
                    "{}",
                    t!("session.disabled_summary", count = report.success_count())
                );
            }
            MenuAction::EnableAll => {
                let report = toggle::enable_all(ctx)?;
                print_failures(&report);
                println!(
                    "{}",
                    t!("session.enabled_summary", count = report.success_count())
                );
            }
            MenuAction::List => print_file_list(&ctx.tracked_paths()),
            MenuAction::Refresh => {
                let count = ctx.rescan()?;
                println!("{}", t!("session.refreshed", count = count));
            }
            MenuAction::Settings => settings_menu(ctx)?,
            MenuAction::About => print_about(),
            MenuAction::Quit => return Ok(()),
        }
        // the batch itself already re-rendered; don't echo its own changes
        changes.try_iter().for_each(drop);
    }
}

/// Summarises set changes that arrived from the watcher since the last prompt.
fn report_changes(changes: &Receiver<FileSetChange>, watching: bool) {
    if !watching {
        return;
    }
    let mut added = 0usize;
    let mut removed = 0usize;
    for change in changes.try_iter() {
        match change {
            FileSetChange::Added { .. } => added += 1,
            FileSetChange::Removed { .. } => removed += 1,
            FileSetChange::Reset { .. } => {}
        }
    }
    if added + removed > 0 {
        println!(
            "{}",
            t!("session.watch_changes", added = added, removed = removed)
        );
    }
}

fn print_file_list(paths: &[PathBuf]) {
    println!("{}", t!("session.file_list_header", count = paths.len()));
    for path in paths {
        println!("  {}", display_name(path));
    }
}

fn print_failures(report: &BatchReport) {
    for (path, err) in &report.failures {
        eprintln!(
            "{}",
            t!(
                "session.item_failed",
                name = display_name(path),
                error = err.display_localized()
            )
        );
    }
}

fn print_about() {
    println!(
        "{}",
        t!(
            "session.about",
            name = env!("CARGO_PKG_NAME"),
            version = env!("CARGO_PKG_VERSION"),
            authors = env!("CARGO_PKG_AUTHORS"),
            repository = env!("CARGO_PKG_REPOSITORY")
        )
    );
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SettingsAction {
    ToggleExtensions,
    AddExtension,
    RemoveExtension,
    ExcludeFile,
    IncludeFile,
    Back,
}

impl fmt::Display for SettingsAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SettingsAction::ToggleExtensions => t!("settings.menu.toggle_extensions"),
            SettingsAction::AddExtension => t!("settings.menu.add_extension"),
            SettingsAction::RemoveExtension => t!("settings.menu.remove_extension"),
            SettingsAction::ExcludeFile => t!("settings.menu.exclude_file"),
            SettingsAction::IncludeFile => t!("settings.menu.include_file"),
            SettingsAction::Back => t!("settings.menu.back"),
        };
        f.write_str(&label)
    }
}

fn settings_menu(ctx: &AppContext) -> Result<()> {
    let actions = vec![
        SettingsAction::ToggleExtensions,
        SettingsAction::AddExtension,
        SettingsAction::RemoveExtension,
        SettingsAction::ExcludeFile,
        SettingsAction::IncludeFile,
        SettingsAction::Back,
    ];

    loop {
        let prompt = t!("settings.menu.prompt");
        let Some(action) = cancellable(Select::new(&prompt, actions.clone()).prompt())? else {
            return Ok(());
        };

        let outcome = match action {
            SettingsAction::ToggleExtensions => toggle_extensions(ctx.settings()),
            SettingsAction::AddExtension => add_extension(ctx.settings()),
            SettingsAction::RemoveExtension => remove_extension(ctx.settings()),
            SettingsAction::ExcludeFile => exclude_file(ctx),
            SettingsAction::IncludeFile => include_file(ctx.settings()),
            SettingsAction::Back => return Ok(()),
        };

        match outcome {
            Ok(true) => {
                println!("{}", t!("settings.saved"));
                ctx.rescan()?;
            }
            Ok(false) => {}
            // a failed save leaves the change in memory; the list should match it
            Err(SettingsFailure::App(err @ AppError::ConfigSave { .. })) => {
                eprintln!("{}", err.display_localized());
                ctx.rescan()?;
            }
            Err(SettingsFailure::App(err)) => eprintln!("{}", err.display_localized()),
            Err(SettingsFailure::Prompt(err)) => {
                return Err(err).context(t!("session.prompt_failed").to_string());
            }
        }
    }
}

#[derive(Debug)]
enum SettingsFailure {
    App(AppError),
    Prompt(InquireError),
}

impl From<AppError> for SettingsFailure {
    fn from(err: AppError) -> Self {
        SettingsFailure::App(err)
    }
}

impl From<InquireError> for SettingsFailure {
    fn from(err: InquireError) -> Self {
        SettingsFailure::Prompt(err)
    }
}

/// `Ok(None)` when the user backs out of a prompt.
fn cancellable<T>(result: std::result::Result<T, InquireError>) -> Result<Option<T>, InquireError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(InquireError::OperationCanceled) => Ok(None),
        Err(err) => Err(err),
    }
}

type SettingsResult = std::result::Result<bool, SettingsFailure>;

fn toggle_extensions(settings: &Settings) -> SettingsResult {
    let snapshot = settings.snapshot();
    if snapshot.excluded_extensions.is_empty() {
        println!("{}", t!("settings.no_extensions"));
        return Ok(false);
    }
    let extensions: Vec<String> = snapshot.excluded_extensions.keys().cloned().collect();
    let defaults: Vec<usize> = snapshot
        .excluded_extensions
        .values()
        .enumerate()
        .filter_map(|(index, excluded)| excluded.then_some(index))
        .collect();

    let Some(chosen) = cancellable(
        MultiSelect::new(&t!("settings.toggle_prompt"), extensions.clone())
            .with_default(&defaults)
            .prompt(),
    )?
    else {
        return Ok(false);
    };

    let flags = extensions
        .iter()
        .map(|ext| (ext.as_str(), chosen.contains(ext)));
    settings.apply_extension_flags(flags)?;
    Ok(true)
}

fn add_extension(settings: &Settings) -> SettingsResult {
    let Some(raw) = cancellable(Text::new(&t!("settings.add_prompt")).prompt())? else {
        return Ok(false);
    };
    match settings.add_extension(&raw)? {
        ExtensionAdded::Added => Ok(true),
        ExtensionAdded::AlreadyPresent => {
            println!("{}", t!("settings.extension_exists", ext = raw.trim()));
            Ok(false)
        }
    }
}

fn remove_extension(settings: &Settings) -> SettingsResult {
    let extensions: Vec<String> = settings.read().excluded_extensions.keys().cloned().collect();
    if extensions.is_empty() {
        println!("{}", t!("settings.no_extensions"));
        return Ok(false);
    }
    let Some(ext) = cancellable(Select::new(&t!("settings.remove_prompt"), extensions).prompt())?
    else {
        return Ok(false);
    };
    Ok(settings.remove_extension(&ext)?)
}

fn exclude_file(ctx: &AppContext) -> SettingsResult {
    let tracked = ctx.tracked_paths();
    if tracked.is_empty() {
        println!("{}", t!("session.file_list_header", count = 0));
        return Ok(false);
    }
    let Some(choice) = cancellable(
        Select::new(&t!("settings.exclude_prompt"), labelled(&tracked)).prompt(),
    )?
    else {
        return Ok(false);
    };
    Ok(ctx.settings().exclude_file(&choice.path)?)
}

fn include_file(settings: &Settings) -> SettingsResult {
    let excluded: Vec<PathBuf> = settings.read().excluded_files.iter().cloned().collect();
    if excluded.is_empty() {
        println!("{}", t!("settings.no_excluded_files"));
        return Ok(false);
    }
    let Some(choice) = cancellable(
        Select::new(&t!("settings.include_prompt"), labelled(&excluded)).prompt(),
    )?
    else {
        return Ok(false);
    };
    Ok(settings.include_file(&choice.path)?)
}

/// A path shown by name in a picker.
#[derive(Debug, Clone)]
struct PathChoice {
    path: PathBuf,
}

impl fmt::Display for PathChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&display_name(&self.path))
    }
}

fn labelled(paths: &[PathBuf]) -> Vec<PathChoice> {
    paths
        .iter()
        .map(|path| PathChoice {
            path: path.to_path_buf(),
        })
        .collect()
}
