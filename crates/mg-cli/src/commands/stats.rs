use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use mg_progress::{JsonFileStore, ProgressLedger};

pub fn run(catalog: Option<&Path>, store: &Path) -> Result<(), String> {
    let catalog = super::load_catalog(catalog)?;
    let ledger = ProgressLedger::new(JsonFileStore::new(store));
    let summary = ledger
        .stats()
        .map_err(|e| format!("cannot read progress: {e}"))?;

    println!("  {}", "Your Gaming Stats".bold().underline());
    println!();
    println!("  games played:  {}", summary.games_played);
    println!("  points earned: {}", summary.points_earned);
    println!();

    if summary.games.is_empty() {
        println!("  {}", "No games played yet.".dimmed());
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Game", "Plays", "Best", "Last", "Average", "Last played"]);

    for (id, stats) in &summary.games {
        let name = catalog
            .get(id)
            .map_or_else(|| id.to_string(), |def| def.name.clone());
        let last_played = stats
            .last_played
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![
            name,
            stats.plays.to_string(),
            stats.best_score.to_string(),
            stats.last_score.to_string(),
            format!("{:.1}", stats.average_score()),
            last_played,
        ]);
    }

    println!("{table}");

    Ok(())
}
