use booster_draft::agents::{AgentTable, BotProfile, PickStyle};
use booster_draft::cards::numbered_cards;
use booster_draft::draft::{Draft, DraftConfig, DEFAULT_CARDS_PER_PACK, PACKS_PER_PLAYER};
use booster_draft::pool::Pool;
use booster_draft::seating::{PlayerId, Seating};
use booster_draft::tui::{app::AppState, controller};
use clap::{Parser, ValueEnum};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use ratatui::prelude::*;
use std::fs::{self, File};
use std::io::{self, IsTerminal, Stdout};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "booster-draft", version)]
#[command(about = "Booster draft at the terminal, or an all-bot simulation")]
struct Args {
    /// Number of drafters
    #[arg(short, long, default_value_t = 8)]
    players: usize,

    /// Cards in each pack
    #[arg(short = 'k', long, default_value_t = DEFAULT_CARDS_PER_PACK)]
    cards_per_pack: usize,

    /// Seed for pack shuffling and bot picks
    #[arg(long)]
    seed: Option<u64>,

    /// Pool file: a JSON array of card names or of boosters, or a plain name list
    #[arg(long)]
    pool: Option<PathBuf>,

    /// Simulate an all-bot draft instead of starting the TUI
    #[arg(long)]
    headless: bool,

    /// How bots choose their picks
    #[arg(long, value_enum, default_value_t = BotStyle::Random)]
    bot_style: BotStyle,

    /// Print the finished draft as a JSON snapshot (headless only)
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum BotStyle {
    First,
    Random,
    Collector,
}

impl From<BotStyle> for PickStyle {
    fn from(style: BotStyle) -> Self {
        match style {
            BotStyle::First => PickStyle::First,
            BotStyle::Random => PickStyle::Random,
            BotStyle::Collector => PickStyle::Collector,
        }
    }
}

fn invalid_data(err: impl std::fmt::Display) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, err.to_string())
}

fn load_pool(path: &Path) -> io::Result<Pool> {
    let raw = fs::read_to_string(path)?;
    let pool = Pool::parse(&raw).map_err(invalid_data)?;
    info!(path = %path.display(), cards = pool.len(), boosters = pool.is_boosters(), "loaded pool");
    Ok(pool)
}

fn init_logging(writer: Option<File>) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match writer {
        Some(file) => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
        }
    }
}

fn run_headless(args: &Args) -> io::Result<()> {
    let n = args.players;
    let mut config = DraftConfig::default().with_cards_per_pack(args.cards_per_pack);
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    let pool = match &args.pool {
        Some(path) => load_pool(path)?,
        None => Pool::new(numbered_cards(config.cards_needed(n))),
    };
    let seating = Seating::try_new((0..n).map(|i| PlayerId::new(format!("@bot{}", i + 1))))
        .map_err(invalid_data)?;
    let mut draft = Draft::with_config(seating, pool, config);
    draft.distribute().map_err(invalid_data)?;

    let mut profile = BotProfile::for_style(args.bot_style.into());
    if let Some(seed) = args.seed {
        profile = profile.with_seed(seed);
    }
    let mut table = AgentTable::all_bots(n, &profile);
    // Every tick opens a round or makes at least one pick.
    let max_ticks = draft.cards_dealt() + PACKS_PER_PLAYER + 1;
    let complete = table.run_to_completion(&mut draft, max_ticks).map_err(invalid_data)?;
    if !complete {
        warn!(revision = draft.revision(), "draft stalled before completion");
        return Err(io::Error::other("draft did not complete"));
    }

    if args.json {
        let json = draft.snapshot().to_json().map_err(invalid_data)?;
        println!("{json}");
    } else {
        for (player, picks) in draft.player_picks() {
            let names: Vec<String> = picks.iter().map(|p| p.drafted.to_string()).collect();
            println!("{player}: {}", names.join(", "));
        }
    }
    Ok(())
}

fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    crossterm::execute!(
        stdout,
        crossterm::terminal::EnterAlternateScreen,
        crossterm::event::EnableMouseCapture
    )?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn restore_terminal(mut terminal: Terminal<CrosstermBackend<Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        crossterm::event::DisableMouseCapture,
        crossterm::terminal::LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;
    Ok(())
}

fn run_tui(args: &Args) -> io::Result<()> {
    if let Some(path) = std::env::var_os("BOOSTER_DRAFT_LOG") {
        init_logging(Some(File::create(path)?));
    }
    let cards = match &args.pool {
        // The table menu always drafts from a flat list; boosters are pooled together.
        Some(path) => load_pool(path)?.cards().cloned().collect(),
        None => numbered_cards(PACKS_PER_PLAYER * AppState::MAX_PLAYERS * DEFAULT_CARDS_PER_PACK),
    };
    let mut app = AppState::new(cards, args.seed);
    app.cfg_num_players = args.players;
    app.cfg_cards_per_pack = args.cards_per_pack;
    app.cfg_bot_style = args.bot_style.into();
    app.apply_menu();
    if app.menu_error().is_none() {
        app.open_menu();
    }

    let mut terminal = setup_terminal()?;
    let tick_rate = Duration::from_millis(250);
    let res = controller::run(&mut terminal, &mut app, tick_rate);

    // Always attempt to restore terminal
    restore_terminal(terminal)?;
    res
}

fn main() -> io::Result<()> {
    let args = Args::parse();
    if args.headless || !io::stdout().is_terminal() {
        init_logging(None);
        info!(version = booster_draft::VERSION, players = args.players, "headless draft");
        return run_headless(&args);
    }
    run_tui(&args)
}
