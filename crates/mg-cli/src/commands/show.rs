use std::path::Path;

use colored::Colorize;
use mg_engine::GameId;

pub fn run(catalog: Option<&Path>, id: &str) -> Result<(), String> {
    let registry = super::load_registry(catalog)?;
    let game = registry
        .definition(&GameId::new(id))
        .map_err(|e| e.to_string())?;

    println!("  {} [{}]", game.name.bold(), game.id.to_string().dimmed());
    println!();
    if !game.description.is_empty() {
        println!("  {}", game.description);
        println!();
    }

    println!("  category:   {}", game.category);
    println!("  difficulty: {}", game.difficulty);
    println!("  points:     {}", game.points);
    println!("  award:      {} per success", game.award);
    println!("  duration:   {}s", game.duration_secs);
    println!();

    println!("  {}", "How to play".bold().underline());
    println!("  {}", game.instructions());

    Ok(())
}
