use std::path::{Path, PathBuf};

use colored::Colorize;
use mg_engine::{EngineConfig, GameId, SessionController, SessionSnapshot, SessionState};
use mg_progress::{JsonFileStore, ProgressLedger};

use crate::autoplay::Autopilot;
use crate::script::{self, ScriptedInput};

/// Virtual-time step between input checks.
const STEP_MS: u64 = 100;

pub struct PlayOptions {
    pub seed: u64,
    pub duration: Option<u32>,
    pub inputs: Vec<String>,
    pub autoplay: bool,
    pub verbose: bool,
    pub json: bool,
    pub store: Option<PathBuf>,
}

pub fn run(catalog: Option<&Path>, id: &str, opts: &PlayOptions) -> Result<(), String> {
    let registry = super::load_registry(catalog)?;
    let script = script::parse_all(&opts.inputs)?;

    let mut config = EngineConfig::default().with_seed(opts.seed);
    if let Some(secs) = opts.duration {
        config = config.with_duration(secs);
    }

    let mut controller = SessionController::new(registry, config);
    controller
        .start_game(GameId::new(id))
        .map_err(|e| e.to_string())?;
    let name = controller
        .definition()
        .map(|d| d.name.clone())
        .unwrap_or_else(|| id.to_string());

    if !opts.json {
        println!(
            "  {} '{}' {}",
            "Playing".bold(),
            name,
            format!(
                "({}s, seed={}{})",
                controller.remaining_secs(),
                opts.seed,
                if opts.autoplay { ", autoplay" } else { "" }
            )
            .dimmed()
        );
        println!();
    }

    let outcome = drive(&mut controller, &script, opts);

    let finished = controller.drain_finished();
    let snapshot = controller.snapshot();

    if let Some(path) = &opts.store {
        let mut ledger = ProgressLedger::new(JsonFileStore::new(path));
        ledger
            .record_all(&finished)
            .map_err(|e| format!("cannot record progress: {e}"))?;
    }

    if opts.json {
        let report = serde_json::json!({
            "game": name,
            "snapshot": snapshot,
            "finished": finished.first(),
            "inputs_accepted": outcome.accepted,
            "inputs_ignored": outcome.ignored,
        });
        let text = serde_json::to_string_pretty(&report)
            .map_err(|e| format!("cannot serialize result: {e}"))?;
        println!("{text}");
        return Ok(());
    }

    if opts.verbose {
        println!();
    }
    println!(
        "  {} {} {}",
        "Finished".green().bold(),
        name,
        format!(
            "({} inputs accepted, {} ignored)",
            outcome.accepted, outcome.ignored
        )
        .dimmed()
    );
    println!("  Final score: {}", snapshot.score);
    if let Some(path) = &opts.store {
        println!("  Recorded in {}", path.display());
    }

    Ok(())
}

#[derive(Debug, Default)]
struct Outcome {
    accepted: usize,
    ignored: usize,
}

/// Run the session to completion, feeding scripted and autopilot input.
fn drive(
    controller: &mut SessionController,
    script: &[ScriptedInput],
    opts: &PlayOptions,
) -> Outcome {
    let mut outcome = Outcome::default();
    let mut pilot = opts.autoplay.then(Autopilot::new);
    let mut pending = script.iter().peekable();
    let mut last_second = controller.remaining_secs();

    if opts.verbose {
        print_snapshot(&controller.snapshot());
    }

    while controller.state() == SessionState::Playing {
        let now = controller.now_ms();
        while let Some(entry) = pending.next_if(|entry| entry.at_ms <= now) {
            if controller.submit_input(&entry.input) {
                outcome.accepted += 1;
            } else {
                outcome.ignored += 1;
            }
            tracing::debug!(at_ms = now, input = %entry.input, "scripted input");
        }
        if let Some(pilot) = pilot.as_mut() {
            outcome.accepted += pilot.act(controller);
        }

        let next_step = (now / STEP_MS + 1) * STEP_MS;
        let until = pending
            .peek()
            .map_or(next_step, |entry| entry.at_ms.min(next_step));
        controller.advance(until - now);

        if opts.verbose && controller.remaining_secs() != last_second {
            last_second = controller.remaining_secs();
            print_snapshot(&controller.snapshot());
        }
    }

    // Anything scripted past the end of the session never lands.
    outcome.ignored += pending.count();
    outcome
}

fn print_snapshot(snapshot: &SessionSnapshot) {
    let clock = format!("[{:>3}s]", snapshot.remaining_secs).dimmed();
    let prompt = snapshot
        .variant
        .as_ref()
        .map(|v| v.prompt())
        .unwrap_or_default();
    println!(
        "  {clock} score {:>4}  {:>5.1}%  {}",
        snapshot.score, snapshot.progress_pct, prompt
    );
}
