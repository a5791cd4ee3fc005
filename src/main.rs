use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::info;
use ratatui::prelude::*;
use std::{io, path::PathBuf, time::Instant};

use levelup_study::{
    aggregate::{self, format_hours_minutes},
    app::{App, TICK_RATE, handle_input},
    logging,
    store::{self, Store},
    subject::ALL_SUBJECTS,
    ui,
};

// ============================================================================
// Type Aliases & Constants
// ============================================================================

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
const DEFAULT_DATA_DIR: &str = "levelup";
const LOG_DIR: &str = "logs";

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Clone)]
#[command(author, version, about = "📈 levelup - Study tracker with levels, badges and progress charts")]
struct Args {
    /// Directory holding tasks.json, tests.json, config.json and logs/
    #[arg(short, long, default_value = DEFAULT_DATA_DIR)]
    data_dir: PathBuf,
    #[arg(long)]
    log_level: Option<String>,
    /// Chart window in days
    #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..=365))]
    range_days: Option<u64>,
    #[arg(short = 't', long)]
    theme: Option<String>,
    #[arg(long)]
    no_notify: bool,
    #[arg(long)]
    sound: bool,
    /// Browse without changing or saving anything
    #[arg(long)]
    read_only: bool,
    /// Print level, badges and progress, then exit
    #[arg(long)]
    summary: bool,
    /// Write history_export.csv into the data directory, then exit
    #[arg(long)]
    export_csv: bool,
    /// Write a {tasks, tests, updatedAt} snapshot to PATH, then exit
    #[arg(long, value_name = "PATH")]
    export_snapshot: Option<PathBuf>,
    /// Replace all local data with the snapshot at PATH, then exit
    #[arg(long, value_name = "PATH")]
    import_snapshot: Option<PathBuf>,
}

// ============================================================================
// Main
// ============================================================================

fn main() -> Result<()> {
    let args = Args::parse();
    let store = Store::open(&args.data_dir)?;
    let mut config = store.load_config();

    // CLI overrides
    if let Some(l) = &args.log_level { config.log_level = l.clone(); }
    if let Some(r) = args.range_days { config.range_days = r; }
    if let Some(t) = &args.theme { config.theme = t.clone(); }
    if args.no_notify { config.notifications_enabled = false; }
    if args.sound { config.sound_enabled = true; }

    if let Err(err) = logging::init_logging(&config.log_level, &args.data_dir.join(LOG_DIR)) {
        eprintln!("warning: file logging disabled: {}", err);
    }

    let (tasks, tests) = store.load();
    let today = chrono::Local::now().date_naive();

    if let Some(path) = &args.import_snapshot {
        if args.read_only {
            return Err("refusing to import in read-only mode".into());
        }
        let snapshot = store::read_snapshot(path)?;
        let mut app = App::new(tasks, tests, config, Some(store));
        app.import_snapshot(snapshot);
        app.save();
        println!("Imported {} tasks and {} tests from {}", app.tasks.len(), app.tests.len(), path.display());
        return Ok(());
    }

    if let Some(path) = &args.export_snapshot {
        store::write_snapshot(path, &tasks, &tests, chrono::Utc::now().timestamp_millis())?;
        println!("Exported {} tasks and {} tests to {}", tasks.len(), tests.len(), path.display());
        return Ok(());
    }

    if args.export_csv {
        let path = store.export_csv(&tasks, today)?;
        println!("Exported history to {}", path.display());
        return Ok(());
    }

    let mut app = App::new(tasks, tests, config, Some(store));
    app.read_only = args.read_only;

    if args.summary {
        print_summary(&app, today);
        return Ok(());
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    info!("event=app_exit status={}", if res.is_ok() { "ok" } else { "error" });
    res
}

fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    let mut last_tick = Instant::now();

    loop {
        let today = chrono::Local::now().date_naive();
        terminal.draw(|f| ui::render_ui(f, app, today))?;

        let timeout = TICK_RATE.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && handle_input(key, app, today) {
                    app.save_on_quit();
                    return Ok(());
                }
            }
        }

        if last_tick.elapsed() >= TICK_RATE {
            app.update();
            last_tick = Instant::now();
        }
    }
}

fn print_summary(app: &App, today: chrono::NaiveDate) {
    let state = app.level_state();
    let overall = aggregate::progress_stats(&app.tasks);
    println!("Level {}  ({} / {} XP)", state.level, state.display_xp(), state.next_level_xp);
    println!("Study time {}  •  {}% complete", format_hours_minutes(overall.total_seconds), overall.progress);

    for subject in ALL_SUBJECTS {
        let stats = aggregate::subject_progress(&app.tasks, subject);
        println!("  {:<9} {:>3}%  {}", subject.label(), stats.progress, format_hours_minutes(stats.total_seconds));
    }

    let badges = app.badges();
    if !badges.is_empty() {
        let names: Vec<String> = badges.iter().map(|b| format!("{} {}", b.icon, b.label)).collect();
        println!("Badges: {}", names.join(", "));
    }

    let projection = app.projection(today);
    print!("Last {} days: {} min", app.config.range_days, projection.total_minutes());
    match &projection.best_day {
        Some(best) => println!("  •  best day {} ({} min)", best.label, best.minutes),
        None => println!(),
    }
}
