// Squad preview entry point.
//
// Startup sequence:
// 1. Load config (copying defaults on first run)
// 2. Initialize tracing (stderr; stdout carries the preview)
// 3. Load the saved API payloads
// 4. Print the manager header and one block per window round

use squad_preview::config;
use squad_preview::engine::projection::{LineupEntry, LineupResult};
use squad_preview::feed;
use squad_preview::preview::SquadPreview;
use squad_preview::schedule::gameweek::Round;

use anyhow::Context;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load config
    let config = config::load_config().context("failed to load configuration")?;

    // 2. Initialize tracing
    init_tracing(&config.logging.filter)?;
    info!(
        "Config loaded: window of {} rounds",
        config.preview.window_size
    );

    // 3. Load snapshot
    let snapshot = feed::load_snapshot(&config.data)
        .await
        .context("failed to load API payloads")?;
    if snapshot.players.is_empty() {
        warn!("Bootstrap payload lists no players; every pick will be skipped");
    }
    let mut preview = SquadPreview::new(snapshot, config.preview.window_size);

    if preview.window().is_empty() {
        warn!("No rounds in the bootstrap payload; nothing to preview");
        return Ok(());
    }

    // 4. Render
    print_header(&preview);
    for index in 0..preview.window().len() {
        let round = preview.window()[index].clone();
        let actual = preview
            .actual(index)
            .with_context(|| format!("round {} missing from window", round.id))?;
        print_round(&round, &actual);

        match preview.best(index) {
            Some(best) => print_best(best),
            None => println!("  Best XI: unavailable (squad cannot field a legal eleven)"),
        }
        println!();
    }

    Ok(())
}

fn print_header(preview: &SquadPreview) {
    if let Some(manager) = preview.manager() {
        let rank = manager
            .summary_overall_rank
            .map(|r| r.to_string())
            .unwrap_or_else(|| "-".to_string());
        let points = manager
            .summary_overall_points
            .map(|p| p.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!("{} ({})", manager.name, manager.full_name());
        println!("Overall rank {rank}, {points} pts");
    }
    if let Some(round) = preview.picks_round() {
        println!("Squad as picked for GW{}", round.id);
    }
    println!("Starters EP next round: {:.1}", preview.starters_ep());
    println!();
}

fn print_round(round: &Round, actual: &LineupResult) {
    let deadline = round
        .deadline_time
        .map(|d| d.format("%a %d %b %H:%M UTC").to_string())
        .unwrap_or_else(|| "TBC".to_string());
    println!("GW{}  deadline {}", round.id, deadline);
    println!("  Your XI: {:.1} EP", actual.total_ep);
    print_lineup(actual);
}

fn print_best(best: &LineupResult) {
    let formation = best
        .formation
        .map(|f| f.to_string())
        .unwrap_or_else(|| "?".to_string());
    let captain = best
        .captain()
        .map(|e| e.player.web_name.as_str())
        .unwrap_or("-");
    println!(
        "  Best XI: {:.1} EP ({formation}, captain {captain})",
        best.total_ep
    );
    print_lineup(best);
}

fn print_lineup(lineup: &LineupResult) {
    for (position, entries) in &lineup.starters {
        if entries.is_empty() {
            continue;
        }
        let cards: Vec<String> = entries.iter().map(card).collect();
        println!("    {:<3} {}", position.display_str(), cards.join("  "));
    }
    let bench: Vec<String> = lineup.bench.iter().map(card).collect();
    println!("    SUB {}", bench.join("  "));
}

fn card(entry: &LineupEntry) -> String {
    let role = if entry.pick.is_captain {
        " (C)"
    } else if entry.pick.is_vice_captain {
        " (V)"
    } else {
        ""
    };
    let fixtures = if entry.fixtures.is_empty() {
        "-".to_string()
    } else {
        entry
            .fixtures
            .iter()
            .map(|f| f.to_string())
            .collect::<Vec<_>>()
            .join(",")
    };
    let marker = if entry.player.status.has_marker() {
        "!"
    } else {
        entry
            .player
            .form_band()
            .map(|b| b.label())
            .unwrap_or("")
    };
    format!(
        "{}{} {:.1} [{}] {}",
        entry.player.web_name, role, entry.ep, fixtures, marker
    )
}

/// Initialize tracing to stderr. `RUST_LOG` takes precedence over the
/// configured filter.
fn init_tracing(default_filter: &str) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
