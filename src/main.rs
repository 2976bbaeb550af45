use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use deskyoga::runner::{self, SessionView};
use deskyoga::{
    Catalog, CatalogError, ConfigError, FocusArea, FreeTier, JsonFileStore, Mode, PoseSelector, PosturePreference,
    Preferences, PresetTable, Session, SessionConfig, SessionEvent, Speed, StoreError, TimerQueue, Visibility,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, warn};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("catalog: {0}")]
    Catalog(#[from] CatalogError),
    #[error("preferences: {0}")]
    Store(#[from] StoreError),
    #[error("session config: {0}")]
    Config(#[from] ConfigError),
    #[error("invalid JSON output: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "deskyoga", about = "Short desk stretch sessions in the terminal")]
struct Cli {
    /// Pose catalog JSON; the built-in catalog when unset.
    #[arg(long, env = "DESKYOGA_CATALOG")]
    catalog: Option<PathBuf>,

    /// Preferences file.
    #[arg(long, env = "DESKYOGA_STORE", default_value = "deskyoga.json")]
    store: PathBuf,

    /// Fixed RNG seed for reproducible pose order.
    #[arg(long, env = "DESKYOGA_SEED")]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List poses matching the given filters.
    Poses(PosesArgs),
    /// List built-in presets.
    Presets,
    /// Unlock full content with a promo code.
    Redeem { code: String },
    /// Show or change stored preferences.
    Prefs(PrefsArgs),
    /// Run a session. Commands on stdin: pause, resume, skip, back, redo,
    /// speed <still|slow|flow>, quit; a blank line toggles pause.
    Run(RunArgs),
}

#[derive(Args, Debug)]
struct FilterArgs {
    #[arg(long)]
    posture: Option<PosturePreference>,
    #[arg(long)]
    camera: Option<Visibility>,
    #[arg(long)]
    focus: Option<FocusArea>,
}

#[derive(Args, Debug)]
struct PosesArgs {
    #[command(flatten)]
    filters: FilterArgs,
    /// Print the matching poses as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct PrefsArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    sound: Option<bool>,
    /// Forget every stored preference, including unlocks.
    #[arg(long)]
    reset: bool,
}

#[derive(Args, Debug)]
struct RunArgs {
    #[command(flatten)]
    filters: FilterArgs,
    #[arg(long)]
    preset: Option<String>,
    #[arg(long)]
    mode: Option<Mode>,
    #[arg(long, conflicts_with = "pose_secs")]
    speed: Option<Speed>,
    #[arg(long)]
    pose_secs: Option<u32>,
    #[arg(long)]
    minutes: Option<u32>,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();
    let Cli { catalog, store, seed, command } = Cli::parse();

    match command {
        Command::Poses(args) => list_poses(&load_catalog(catalog.as_deref())?, &args),
        Command::Presets => {
            list_presets(&PresetTable::builtin());
            Ok(())
        }
        Command::Redeem { code } => redeem(&store, &code),
        Command::Prefs(args) => prefs(&store, args),
        Command::Run(args) => run_session(catalog.as_deref(), &store, seed, args).await,
    }
}

fn load_catalog(path: Option<&Path>) -> Result<Catalog, CliError> {
    match path {
        Some(path) => Ok(Catalog::load(path)?),
        None => Ok(Catalog::builtin()),
    }
}

fn apply_filters(mut config: SessionConfig, filters: &FilterArgs) -> SessionConfig {
    if let Some(posture) = filters.posture {
        config = config.with_posture(posture);
    }
    if let Some(camera) = filters.camera {
        config = config.with_camera(camera);
    }
    if let Some(area) = filters.focus {
        config = config.with_focus_area(area);
    }
    config
}

fn list_poses(catalog: &Catalog, args: &PosesArgs) -> Result<(), CliError> {
    let config = apply_filters(SessionConfig::default().with_posture(PosturePreference::Any), &args.filters);
    let poses = catalog.eligible(&config);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&poses)?);
        return Ok(());
    }
    for pose in poses {
        println!(
            "{:<24} {:<28} {:<9} {}",
            pose.id,
            pose.name,
            pose.tags.allowed_posture.to_string(),
            pose.tags.visibility
        );
    }
    Ok(())
}

fn list_presets(presets: &PresetTable) {
    for preset in presets.iter() {
        let poses = match preset.pose_sequence.len() {
            0 => "random".to_owned(),
            n => format!("{n} poses"),
        };
        println!("{:<20} {:<20} {:<10} {}", preset.id, preset.name, poses, preset.description);
    }
}

fn redeem(store: &Path, code: &str) -> Result<(), CliError> {
    let mut prefs = Preferences::new(JsonFileStore::open(store)?);
    if prefs.redeem_promo_code(code)? {
        println!("full access unlocked");
    } else {
        println!("code not recognised");
    }
    Ok(())
}

fn prefs(store: &Path, args: PrefsArgs) -> Result<(), CliError> {
    let mut prefs = Preferences::new(JsonFileStore::open(store)?);
    if args.reset {
        prefs.clear_all()?;
    }
    if let Some(name) = args.name {
        prefs.set_user_name(&name)?;
    }
    if let Some(sound) = args.sound {
        prefs.set_transition_sound_enabled(sound)?;
    }
    println!("name:  {}", prefs.user_name());
    println!("sound: {}", prefs.transition_sound_enabled());
    println!("paid:  {}", prefs.has_paid());
    Ok(())
}

// =============================================================================
// RUN
// =============================================================================

async fn run_session(
    catalog: Option<&Path>,
    store: &Path,
    seed: Option<u64>,
    args: RunArgs,
) -> Result<(), CliError> {
    let prefs = Preferences::new(JsonFileStore::open(store)?);
    let catalog = load_catalog(catalog)?;
    let presets = PresetTable::builtin();

    let mut config = match &args.preset {
        Some(id) => presets.config_for(id)?,
        None => SessionConfig::default(),
    };
    config = apply_filters(config, &args.filters);
    if let Some(mode) = args.mode {
        config.mode = mode;
    }
    if let Some(speed) = args.speed {
        config = config.with_speed(speed);
    }
    if let Some(secs) = args.pose_secs {
        config = config.with_pose_duration_secs(secs);
    }
    if let Some(mins) = args.minutes {
        config = config.with_duration_mins(mins);
    }

    let paid = prefs.has_paid();
    let selector = PoseSelector::new(
        Arc::new(catalog),
        Arc::new(presets),
        Arc::new(FreeTier::default()),
        Arc::new(paid),
    );
    let rng = seed.map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);
    info!(paid, seed = ?seed, "starting session");

    let mut queue = TimerQueue::new();
    let (session, opening) = Session::start(config, selector, rng, &mut queue)?;

    let (tx, rx) = mpsc::channel(16);
    tokio::spawn(read_commands(tx));

    let mut view = TerminalView { name: prefs.user_name(), sound: prefs.transition_sound_enabled() };
    let summary = runner::run(session, queue, opening, rx, &mut view).await;

    println!(
        "\n{} poses in {}m{:02}s",
        summary.poses_shown,
        summary.elapsed.as_secs() / 60,
        summary.elapsed.as_secs() % 60
    );
    Ok(())
}

async fn read_commands(tx: mpsc::Sender<runner::Command>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => match line.parse() {
                Ok(command) => {
                    if tx.send(command).await.is_err() {
                        break;
                    }
                }
                Err(error) => warn!(%error, "ignoring input"),
            },
            Ok(None) => break,
            Err(error) => {
                warn!(%error, "stdin read failed");
                break;
            }
        }
    }
}

struct TerminalView {
    name: String,
    sound: bool,
}

impl SessionView for TerminalView {
    fn on_event(&mut self, session: &Session, event: &SessionEvent, _now: Duration) {
        match event {
            SessionEvent::PoseShown { pose_id, .. } => {
                let bell = if self.sound { "\x07" } else { "" };
                match session.current_pose() {
                    Some(pose) => {
                        println!("{bell}\n== {} ==", pose.name);
                        if !pose.instructions.is_empty() {
                            println!("{}", pose.instructions);
                        }
                    }
                    None => println!("{bell}\n== {pose_id} =="),
                }
            }
            SessionEvent::Paused => println!("-- paused --"),
            SessionEvent::Resumed => println!("-- resumed --"),
            SessionEvent::Ended { reason } => {
                if self.name.is_empty() {
                    println!("\nsession over ({reason:?})");
                } else {
                    println!("\nnice work, {} ({reason:?})", self.name);
                }
            }
        }
    }

    fn on_tick(&mut self, session: &Session, now: Duration) {
        if session.is_paused() {
            return;
        }
        let left = session.pose_remaining_secs(now);
        if left % 10 == 0 || left <= 3 {
            println!("   {left}s");
        }
    }
}
