//! Slot suggestion command.

use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use clap::Args;
use smartsched_core::{EngineConfig, ScoredSlot, SuggestRequest, SuggestionEngine};

use super::config_path;

const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

#[derive(Args)]
pub struct SuggestArgs {
    /// Request JSON file, or "-" for stdin
    #[arg(long, short)]
    input: PathBuf,
    /// Date to treat as today (YYYY-MM-DD); defaults to the local date
    #[arg(long)]
    today: Option<NaiveDate>,
    /// Number of suggestions to return
    #[arg(long)]
    top_k: Option<usize>,
    /// Days to look ahead
    #[arg(long)]
    horizon: Option<u32>,
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

fn read_request(input: &Path) -> Result<SuggestRequest, Box<dyn std::error::Error>> {
    let raw = if input == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(input)
            .map_err(|e| format!("cannot read {}: {e}", input.display()))?
    };
    Ok(serde_json::from_str(&raw)?)
}

pub fn run(args: SuggestArgs, config: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config = EngineConfig::load_from(&config_path(config)?)?;
    let engine = SuggestionEngine::with_config(config)?;

    let mut request = read_request(&args.input)?;
    if args.top_k.is_some() {
        request.top_k = args.top_k;
    }
    if args.horizon.is_some() {
        request.horizon_days = args.horizon;
    }
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());

    let suggestions = engine.suggest(&request, today)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&suggestions)?);
        return Ok(());
    }

    if suggestions.is_empty() {
        println!("No suggestion available.");
        return Ok(());
    }

    println!("=== Suggested Slots ===\n");
    for (i, suggestion) in suggestions.iter().enumerate() {
        print_suggestion(i + 1, suggestion);
    }
    Ok(())
}

fn print_suggestion(rank: usize, s: &ScoredSlot) {
    let day = WEEKDAYS
        .get(usize::from(s.slot.weekday))
        .copied()
        .unwrap_or("?");
    println!(
        "{}. {} ({}) {}-{} (Score: {:.2}, {})",
        rank,
        s.slot.date,
        day,
        s.slot.start.format("%H:%M"),
        s.slot.end.format("%H:%M"),
        s.score,
        s.confidence.as_str()
    );
    println!("   Available: {} min", s.slot.duration_minutes);
    if !s.reasons.is_empty() {
        let reasons: Vec<&str> = s.reasons.iter().map(|r| r.as_str()).collect();
        println!("   Reasons: {}", reasons.join(", "));
    }
    println!();
}
