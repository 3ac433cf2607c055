use clap::Parser;
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use sui_vanity::{
    estimate_time, format_difficulty, format_duration, format_number, format_running_time,
    format_speed, KeyPair, SearchConfig, SearchCoordinator, SearchCriteria,
    DEFAULT_PROGRESS_QUOTA, DEFAULT_RESTART_QUOTA,
};

/// How often the stats line is redrawn
const STATS_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Parser)]
#[command(name = "sui-vanity")]
#[command(about = "Sui vanity address generator", long_about = None)]
struct Cli {
    /// Hex digits the address must start with, after the 0x
    #[arg(short = 'p', long = "prefix", value_name = "PREFIX", default_value = "")]
    prefix: String,

    /// Hex digits the address must end with
    #[arg(short = 'e', long = "end", value_name = "SUFFIX", default_value = "")]
    suffix: String,

    /// Number of worker threads (0 = all CPU cores)
    #[arg(short = 't', long, value_name = "N", default_value_t = 1, env = "SUI_VANITY_THREADS")]
    threads: usize,

    /// Stop after finding N addresses
    #[arg(short = 'n', long = "count", value_name = "N")]
    count: Option<usize>,

    /// Keep only the newest N matches in memory
    #[arg(long, value_name = "N")]
    max_matches: Option<usize>,

    /// Attempts between progress reports of a worker
    #[arg(long, value_name = "N", default_value_t = DEFAULT_PROGRESS_QUOTA)]
    progress_quota: u64,

    /// Attempts after which a worker is replaced
    #[arg(long, value_name = "N", default_value_t = DEFAULT_RESTART_QUOTA)]
    restart_quota: u64,

    /// Show debug logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    if let Err(err) = run(&cli) {
        eprintln!("\nError: {}", err);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    // All Sui addresses start with 0x, accept it but don't require it
    let prefix = cli
        .prefix
        .strip_prefix("0x")
        .or_else(|| cli.prefix.strip_prefix("0X"))
        .unwrap_or(&cli.prefix);
    let criteria = SearchCriteria::new(prefix, &cli.suffix)?;

    let workers = if cli.threads == 0 { num_cpus::get() } else { cli.threads };
    let config = SearchConfig::new(workers)
        .with_quotas(cli.progress_quota, cli.restart_quota)
        .with_max_matches(cli.max_matches);

    let combinations = criteria.combinations();
    println!("\nSearching for addresses like: {}", criteria.pattern_description());
    println!("Combinations: {}", format_difficulty(&combinations));
    println!("Workers: {}", workers);
    println!("\nPress Ctrl+C to stop\n");

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })?;

    let mut coordinator = SearchCoordinator::new(config)?;
    coordinator.start(criteria.clone())?;

    let start_time = Instant::now();
    let mut last_draw = Instant::now();
    let mut found_count = 0usize;

    while running.load(Ordering::SeqCst) {
        let summary = coordinator.poll_timeout(STATS_INTERVAL)?;

        for pair in &summary.matches {
            print_match(&criteria, pair)?;
        }
        found_count += summary.matches.len();

        if cli.count.is_some_and(|limit| found_count >= limit) {
            break;
        }

        if last_draw.elapsed() >= STATS_INTERVAL {
            let stats = coordinator.stats();
            let expected = estimate_time(&combinations, stats.attempts_per_second)
                .map(format_duration)
                .unwrap_or_else(|| "-".to_string());

            print!(
                "\r[Stats] Found: {} | Scanned: {} | Speed: {}/s | Expected: {} | Running: {}   ",
                found_count,
                format_number(stats.total_attempts),
                format_speed(stats.attempts_per_second as u64),
                expected,
                format_running_time(start_time.elapsed())
            );
            std::io::stdout().flush()?;
            last_draw = Instant::now();
        }
    }

    coordinator.stop();

    let stats = coordinator.stats();
    let elapsed = start_time.elapsed();
    let avg_rate = if elapsed.as_secs_f64() > 0.0 {
        (stats.total_attempts as f64 / elapsed.as_secs_f64()) as u64
    } else {
        0
    };

    println!("\n\nFinal Stats:");
    println!("  Total found:    {}", found_count);
    println!("  Total scanned:  {}", format_number(stats.total_attempts));
    println!("  Worker restarts: {}", coordinator.restarts());
    println!("  Total time:     {}", format_duration(elapsed));
    println!("  Avg speed:      {}/s", format_speed(avg_rate));

    if found_count > 0 {
        println!("\nWARNING: Keep your private keys secure! Anyone with these keys can access your funds.");
    }

    Ok(())
}

fn print_match(criteria: &SearchCriteria, pair: &KeyPair) -> Result<(), Box<dyn std::error::Error>> {
    let secret = pair.encoded_secret()?;
    println!("\n{}", criteria.short_address(pair.address()));
    println!("  Address: {}", pair.address());
    println!("  Secret:  {}", secret.as_str());
    Ok(())
}
