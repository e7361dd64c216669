mod config;
mod input;
mod output;
mod session;

use anyhow::{Context, Result};
use clap::Parser;
use songrank_core::{compare_rankings, RankingState, Ranker};
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::SongrankConfig;
use crate::output::SortSide;
use crate::session::{run_session, SessionOutcome, SidePicker, TerminalJudge};

pub fn bail(msg: impl std::fmt::Display) -> ! {
    eprintln!("Error: {msg}");
    std::process::exit(1);
}

#[derive(Parser)]
#[command(name = "songrank", version, about = "Rank songs with pairwise comparisons")]
struct Cli {
    /// Show debug logging on stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (default: ~/.config/songrank/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Start ranking a list of songs, optionally extending an existing ranking
    Rank(RankArgs),
    /// Continue a saved draft
    Resume(ResumeArgs),
    /// Compare two finished rankings
    Diff(DiffArgs),
    /// Create a default config file at ~/.config/songrank/config.toml
    Init,
}

/// Options shared by every command that runs an interactive session.
#[derive(clap::Args)]
struct SessionArgs {
    /// Where to save the draft if you quit early
    #[arg(long)]
    draft: Option<PathBuf>,

    /// Write the finished ranking (as JSON state) to this file
    #[arg(long)]
    output: Option<PathBuf>,

    /// Output JSON instead of a table
    #[arg(long)]
    json: bool,

    /// Always show the new song as option 1
    #[arg(long)]
    fixed_sides: bool,

    /// Seed for the side shuffle
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(clap::Args)]
struct RankArgs {
    /// File with songs: JSON array of song records, a saved ranking, or one "Title - Artist" per line.
    /// Songs cannot be piped in: stdin carries the answers.
    #[arg(long)]
    items: Option<PathBuf>,

    /// Inline song as "Title - Artist" (repeatable)
    #[arg(long = "item")]
    inline_items: Vec<String>,

    /// Existing ranking to extend; songs already in it are not re-compared
    #[arg(long)]
    existing: Option<PathBuf>,

    #[command(flatten)]
    session: SessionArgs,
}

#[derive(clap::Args)]
struct ResumeArgs {
    #[command(flatten)]
    session: SessionArgs,
}

#[derive(clap::Args)]
struct DiffArgs {
    /// Your ranking
    yours: PathBuf,

    /// Their ranking
    theirs: PathBuf,

    /// Order shared songs by your ranks or theirs
    #[arg(long, value_enum, default_value = "yours")]
    sort: SortSide,

    /// Output JSON instead of a table
    #[arg(long)]
    json: bool,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        bail(format!("{e:#}"));
    }
}

fn run(cli: Cli) -> Result<()> {
    let config_path = match cli.config {
        Some(path) => path,
        None => config::config_path()?,
    };

    match cli.command {
        Commands::Init => {
            config::create_default_config(&config_path)?;
            println!("Created config at {}", config_path.display());
            println!("Edit it to set your default draft path, side shuffling, etc.");
            Ok(())
        }
        Commands::Rank(args) => {
            let cfg = config::load_config(&config_path)?;
            run_rank(args, &cfg)
        }
        Commands::Resume(args) => {
            let cfg = config::load_config(&config_path)?;
            run_resume(args, &cfg)
        }
        Commands::Diff(args) => run_diff(args),
    }
}

/// Session settings after merging config file and CLI args (CLI wins).
struct SessionSettings {
    draft_path: PathBuf,
    output: Option<PathBuf>,
    json: bool,
    sides: SidePicker,
}

impl SessionSettings {
    fn resolve(args: SessionArgs, cfg: &SongrankConfig) -> Self {
        let draft_path = args
            .draft
            .or_else(|| cfg.draft_path.as_ref().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(config::DEFAULT_DRAFT_FILE));
        let randomize = !args.fixed_sides && cfg.randomize_sides.unwrap_or(true);
        let sides = if randomize {
            SidePicker::random(args.seed.or(cfg.seed))
        } else {
            SidePicker::Fixed
        };

        SessionSettings {
            draft_path,
            output: args.output,
            json: args.json || cfg.json.unwrap_or(false),
            sides,
        }
    }
}

fn run_rank(args: RankArgs, cfg: &SongrankConfig) -> Result<()> {
    let items = input::load_items(args.items.as_deref(), &args.inline_items)?;
    let existing = match args.existing.as_deref() {
        Some(path) => input::load_songs(path)?,
        None => Vec::new(),
    };

    info!(songs = items.len(), existing = existing.len(), "loaded songs");
    let ranker = Ranker::with_existing(items, existing);
    drive(ranker, SessionSettings::resolve(args.session, cfg), false)
}

fn run_resume(args: ResumeArgs, cfg: &SongrankConfig) -> Result<()> {
    // Pausing again saves back to the same file.
    let settings = SessionSettings::resolve(args.session, cfg);
    let draft = input::load_draft(&settings.draft_path)?;
    let ranker = Ranker::resume(draft)
        .with_context(|| format!("Cannot resume draft {}", settings.draft_path.display()))?;
    drive(ranker, settings, true)
}

/// Run the session. A resumed draft is deleted once the ranking completes,
/// so it cannot be replayed.
fn drive(ranker: Ranker, mut settings: SessionSettings, resumed: bool) -> Result<()> {
    let stdin = io::stdin();
    let mut judge = TerminalJudge::new(stdin.lock(), io::stderr());

    match run_session(ranker, &mut judge, &mut settings.sides)? {
        SessionOutcome::Completed(state) => {
            finish(&state, &settings)?;
            if resumed {
                input::remove_draft(&settings.draft_path)?;
                info!(path = %settings.draft_path.display(), "finished draft removed");
            }
            Ok(())
        }
        SessionOutcome::Paused(state) => {
            input::save_state(&settings.draft_path, &state)?;
            eprintln!(
                "\nDraft saved to {} ({} songs left). Continue with: songrank resume --draft {}",
                settings.draft_path.display(),
                state.remaining.len(),
                settings.draft_path.display(),
            );
            Ok(())
        }
    }
}

fn finish(state: &RankingState, settings: &SessionSettings) -> Result<()> {
    if let Some(path) = &settings.output {
        input::save_state(path, state)?;
        info!(path = %path.display(), "ranking written");
    }

    if settings.json {
        println!("{}", output::render_ranking_json(state)?);
    } else {
        print!("{}", output::render_ranking_table(state));
    }
    Ok(())
}

fn load_ordering(path: &Path) -> Result<Vec<songrank_core::Item>> {
    input::load_songs(path).with_context(|| format!("Failed to load ranking {}", path.display()))
}

fn run_diff(args: DiffArgs) -> Result<()> {
    let yours = load_ordering(&args.yours)?;
    let theirs = load_ordering(&args.theirs)?;
    let diff = compare_rankings(&yours, &theirs);

    if args.json {
        println!("{}", output::render_diff_json(&diff)?);
    } else {
        print!("{}", output::render_diff_table(&diff, args.sort));
    }
    Ok(())
}
