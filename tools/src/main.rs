//! score-runner: headless front end for the daily score board.
//!
//! Usage:
//!   score-runner --db scores.db                       (print today's board)
//!   score-runner --db scores.db --ipc-mode            (JSON requests on stdin)
//!   score-runner --seed 12345 --players 40 --submissions 500
//!   score-runner --config scores.json

use anyhow::Result;
use daily_scores_core::{
    config::ScoreConfig,
    engine::ScoreEngine,
    leaderboard,
    record::Outcome,
    rng::SubmissionRng,
    store::ScoreStore,
    transport::{self, Request},
};
use std::env;
use std::io::{self, BufRead, Write};

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let mut config = match flag_value(&args, "--config") {
        Some(path) => ScoreConfig::load(path)?,
        None => ScoreConfig::default(),
    };
    if let Some(db) = flag_value(&args, "--db") {
        config.db_path = db.to_string();
    }

    let store = ScoreStore::open_configured(&config.db_path, config.busy_timeout_ms)?;
    store.migrate()?;
    log::info!(
        "Opened {} (board limit {})",
        config.db_path,
        config.effective_limit()
    );
    let engine = ScoreEngine::new(store, config);

    if ipc_mode {
        return run_ipc_loop(&engine);
    }

    if let Some(seed) = flag_value(&args, "--seed").and_then(|s| s.parse::<u64>().ok()) {
        let players = parse_arg(&args, "--players", 25u64);
        let submissions = parse_arg(&args, "--submissions", 200u64);
        simulate(&engine, seed, players, submissions)?;
    }

    print_board(&engine)
}

fn run_ipc_loop(engine: &ScoreEngine<ScoreStore>) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        if buffer.trim().is_empty() {
            continue;
        }

        let request: Request = match serde_json::from_str(&buffer) {
            Ok(r) => r,
            Err(e) => {
                let err_json = serde_json::json!({ "error": e.to_string() });
                writeln!(stdout, "{}", err_json)?;
                stdout.flush()?;
                continue;
            }
        };
        if request.method.eq_ignore_ascii_case("QUIT") {
            break;
        }

        let response = transport::handle(engine, &request);
        writeln!(stdout, "{}", serde_json::to_string(&response)?)?;
        stdout.flush()?;
    }
    Ok(())
}

fn simulate(
    engine: &ScoreEngine<ScoreStore>,
    seed: u64,
    players: u64,
    submissions: u64,
) -> Result<()> {
    let mut rng = SubmissionRng::new(seed);
    let (mut inserted, mut updated, mut unchanged) = (0u64, 0u64, 0u64);
    for _ in 0..submissions {
        match engine.submit(rng.submission(players, 10_000))? {
            Outcome::Inserted => inserted += 1,
            Outcome::Updated => updated += 1,
            Outcome::Unchanged => unchanged += 1,
        }
    }

    println!("=== SIMULATION ===");
    println!("  seed:        {seed}");
    println!("  players:     {players}");
    println!("  submissions: {submissions}");
    println!("  inserted:    {inserted}");
    println!("  updated:     {updated}");
    println!("  unchanged:   {unchanged}");
    println!();
    Ok(())
}

fn print_board(engine: &ScoreEngine<ScoreStore>) -> Result<()> {
    let entries = engine.query_today()?;
    let title = format!("TOP SCORES TODAY ({})", engine.today());
    print!("{}", leaderboard::render_table(&title, &entries));
    Ok(())
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    flag_value(args, flag)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
