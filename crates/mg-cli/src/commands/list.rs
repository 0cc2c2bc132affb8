use std::path::Path;

use comfy_table::{ContentArrangement, Table};

pub fn run(catalog: Option<&Path>) -> Result<(), String> {
    let catalog = super::load_catalog(catalog)?;

    if catalog.is_empty() {
        println!("  No games found.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Id", "Name", "Category", "Difficulty", "Points", "Duration"]);

    for game in catalog.games() {
        table.add_row(vec![
            game.id.to_string(),
            game.name.clone(),
            game.category.to_string(),
            game.difficulty.to_string(),
            game.points.to_string(),
            format!("{}s", game.duration_secs),
        ]);
    }

    println!("{table}");
    println!();
    println!("  {} games", catalog.len());

    Ok(())
}
