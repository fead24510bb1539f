//! Headless viztly host: replays key scripts against an outline file.

mod host;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use host::DiskFiles;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use viztly_core::constants::ITEMS_STORAGE_KEY;
use viztly_core::host::MemoryClipboard;
use viztly_core::persistence::{self, SnapshotStore};
use viztly_core::{Config, DispatchOutcome, Keymap, Mode, Outline, Outliner};

#[derive(Parser)]
#[command(name = "viztly", about = "Keyboard-driven outliner", version)]
struct Cli {
    /// Outline file to start from (can also be set via VIZTLY_FILE)
    #[arg(short, long, env = "VIZTLY_FILE")]
    file: Option<PathBuf>,

    /// Directory for keyed snapshots (can also be set via VIZTLY_STORAGE_DIR)
    #[arg(long, env = "VIZTLY_STORAGE_DIR")]
    storage_dir: Option<PathBuf>,

    /// Maximum number of undoable changes (can also be set via VIZTLY_HISTORY_LIMIT)
    #[arg(long, env = "VIZTLY_HISTORY_LIMIT")]
    history_limit: Option<usize>,

    /// Snapshot the outline to storage after the session (can also be set via VIZTLY_AUTOSAVE)
    #[arg(long, env = "VIZTLY_AUTOSAVE")]
    autosave: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a key script and print the resulting outline
    Run {
        /// Inline key script, e.g. 'o "Buy milk" Esc'
        #[arg(short, long, conflicts_with = "script")]
        keys: Option<String>,
        /// File holding the key script ('-' reads stdin)
        #[arg(short, long)]
        script: Option<PathBuf>,
        /// File handed out when the script loads (Meta+l)
        #[arg(long)]
        open_file: Option<PathBuf>,
        /// Directory receiving saves made by the script (Meta+s)
        #[arg(long)]
        save_dir: Option<PathBuf>,
        /// Write the result back to --file instead of printing it
        #[arg(short, long)]
        write: bool,
        /// Print the visible tree with selection instead of outline text
        #[arg(long)]
        show: bool,
    },
    /// Print the visible tree
    Show,
    /// List key bindings
    Bindings {
        #[arg(value_enum, default_value = "normal")]
        mode: ModeArg,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeArg {
    Normal,
    Insert,
}

impl From<ModeArg> for Mode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Normal => Mode::Normal,
            ModeArg::Insert => Mode::Insert,
        }
    }
}

/// Env configuration with command-line overrides applied.
fn resolve_config(cli: &Cli) -> Config {
    let mut config = Config::from_env();
    if let Some(file) = &cli.file {
        config.file_path = Some(file.clone());
    }
    if let Some(dir) = &cli.storage_dir {
        config.storage_dir = dir.clone();
    }
    if let Some(limit) = cli.history_limit.filter(|limit| *limit > 0) {
        config.history_limit = limit;
    }
    config.autosave |= cli.autosave;
    config
}

/// Outline named by the config, else the autosaved snapshot, else empty.
fn load_initial(config: &Config) -> anyhow::Result<Outline> {
    if let Some(path) = &config.file_path {
        if path.exists() {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading outline file {}", path.display()))?;
            let outline = persistence::parse(&text)
                .with_context(|| format!("parsing outline file {}", path.display()))?;
            tracing::info!(path = %path.display(), "loaded outline file");
            return Ok(outline);
        }
        tracing::info!(path = %path.display(), "outline file does not exist yet");
        return Ok(Outline::new());
    }
    if config.autosave {
        let store = SnapshotStore::new(&config.storage_dir);
        if let Some(outline) = store.load(ITEMS_STORAGE_KEY)? {
            return Ok(outline);
        }
    }
    Ok(Outline::new())
}

fn read_script(keys: Option<String>, script: Option<&Path>) -> anyhow::Result<String> {
    if let Some(keys) = keys {
        return Ok(keys);
    }
    match script {
        Some(path) if path == Path::new("-") => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("reading key script from stdin")?;
            Ok(text)
        }
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("reading key script {}", path.display())),
        None => Ok(String::new()),
    }
}

/// Counts of what a replayed script did.
#[derive(Debug, Default, PartialEq, Eq)]
struct ScriptSummary {
    handled: usize,
    typed: usize,
    unbound: usize,
    failed: usize,
}

impl ScriptSummary {
    fn from_outcomes(outcomes: &[DispatchOutcome]) -> Self {
        let mut summary = Self::default();
        for outcome in outcomes {
            match outcome {
                DispatchOutcome::Handled(_) => summary.handled += 1,
                DispatchOutcome::Inserted(_) => summary.typed += 1,
                DispatchOutcome::Unbound => summary.unbound += 1,
                DispatchOutcome::Failed(_) => summary.failed += 1,
            }
        }
        summary
    }
}

/// Visible items of the focused subtree, one per line, with the selection
/// marked.
fn render_visible<F: viztly_core::host::FileStore>(app: &Outliner<MemoryClipboard, F>) -> String {
    let outline = app.outline();
    let focused = app.focused();
    let rows = if outline.is_root(focused) {
        outline.visible_items()
    } else {
        let below = outline.visible_below(focused);
        std::iter::once((focused, 0))
            .chain(below.into_iter().map(|(id, depth)| (id, depth + 1)))
            .collect()
    };
    let mut out = String::new();
    for (id, depth) in rows {
        let item = &outline[id];
        let selected = id == app.selected();
        out.push_str(if selected { "> " } else { "  " });
        out.push_str(&"  ".repeat(depth));
        out.push_str(match (item.has_children(), item.is_open) {
            (false, _) => "  ",
            (true, true) => "- ",
            (true, false) => "+ ",
        });
        if selected && app.mode() == Mode::Insert {
            let (before, after) = item
                .title
                .char_indices()
                .nth(app.cursor().position())
                .map(|(byte, _)| item.title.split_at(byte))
                .unwrap_or((item.title.as_str(), ""));
            out.push_str(before);
            out.push('|');
            out.push_str(after);
        } else {
            out.push_str(&item.title);
        }
        out.push('\n');
    }
    out
}

fn format_bindings(keymap: &Keymap, mode: Mode) -> String {
    keymap
        .bindings(mode)
        .iter()
        .map(|binding| format!("{:<14} {}\n", binding.chord(), binding.action.describe()))
        .collect()
}

fn run_session(
    config: &Config,
    script: &str,
    files: DiskFiles,
) -> anyhow::Result<(Outliner<MemoryClipboard, DiskFiles>, ScriptSummary)> {
    let outline = load_initial(config)?;
    let mut app = Outliner::new(outline, MemoryClipboard::default(), files)
        .with_history_limit(config.history_limit);
    let outcomes = app.run_script(script).context("parsing key script")?;
    let summary = ScriptSummary::from_outcomes(&outcomes);
    tracing::info!(
        handled = summary.handled,
        typed = summary.typed,
        unbound = summary.unbound,
        failed = summary.failed,
        "script finished"
    );
    if config.autosave {
        SnapshotStore::new(&config.storage_dir).save(ITEMS_STORAGE_KEY, app.outline())?;
    }
    Ok((app, summary))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "viztly=info,viztly_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    let config = resolve_config(&cli);

    match cli.command {
        Commands::Run {
            keys,
            script,
            open_file,
            save_dir,
            write,
            show,
        } => {
            let script = read_script(keys, script.as_deref())?;
            let files = DiskFiles::new(open_file, save_dir);
            let (app, summary) = run_session(&config, &script, files)?;
            if write {
                let path = config
                    .file_path
                    .as_ref()
                    .context("--write needs --file or VIZTLY_FILE")?;
                fs::write(path, persistence::serialize(app.outline()))
                    .with_context(|| format!("writing outline file {}", path.display()))?;
                tracing::info!(path = %path.display(), "wrote outline file");
            } else if show {
                print!("{}", render_visible(&app));
                eprintln!("{}", app.status_line());
            } else {
                print!("{}", persistence::serialize(app.outline()));
            }
            if summary.failed > 0 {
                anyhow::bail!("{} key(s) failed; see log for details", summary.failed);
            }
        }
        Commands::Show => {
            let app = Outliner::new(
                load_initial(&config)?,
                MemoryClipboard::default(),
                DiskFiles::default(),
            );
            print!("{}", render_visible(&app));
        }
        Commands::Bindings { mode } => {
            print!("{}", format_bindings(&Keymap::standard(), mode.into()));
        }
    }
    Ok(())
}
