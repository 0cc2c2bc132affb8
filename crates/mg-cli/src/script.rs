//! Scripted input for headless sessions.

use mg_engine::GameInput;

/// One input scheduled at a point in virtual time.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptedInput {
    pub at_ms: u64,
    pub input: GameInput,
}

impl ScriptedInput {
    /// Parse `SECONDS:EVENT`, e.g. `1.5:hit`, `4:2` or `3:Calm`.
    pub fn parse(text: &str) -> Result<Self, String> {
        let (time, event) = text
            .split_once(':')
            .ok_or_else(|| format!("input \"{text}\" is not of the form SECONDS:EVENT"))?;
        let secs: f64 = time
            .trim()
            .parse()
            .map_err(|_| format!("invalid time \"{time}\" in input \"{text}\""))?;
        if !secs.is_finite() || secs < 0.0 {
            return Err(format!("invalid time \"{time}\" in input \"{text}\""));
        }
        let input = GameInput::parse(event).map_err(|e| format!("{e} in input \"{text}\""))?;
        Ok(Self {
            at_ms: (secs * 1000.0).round() as u64,
            input,
        })
    }
}

/// Parse every script entry and order them by time, keeping the given
/// order for entries at the same instant.
pub fn parse_all(entries: &[String]) -> Result<Vec<ScriptedInput>, String> {
    let mut inputs = entries
        .iter()
        .map(|e| ScriptedInput::parse(e))
        .collect::<Result<Vec<_>, _>>()?;
    inputs.sort_by_key(|i| i.at_ms);
    Ok(inputs)
}

#[cfg(test)]
mod tests {
    use mg_engine::variant::Symbol;

    use super::*;

    #[test]
    fn parses_fractional_seconds() {
        let input = ScriptedInput::parse("1.5:hit").unwrap();
        assert_eq!(input.at_ms, 1_500);
        assert_eq!(input.input, GameInput::Hit);
    }

    #[test]
    fn parses_pads_and_labels() {
        assert_eq!(
            ScriptedInput::parse("4:2").unwrap().input,
            GameInput::Symbol(Symbol::new(2).unwrap())
        );
        assert_eq!(
            ScriptedInput::parse("3:Calm").unwrap().input,
            GameInput::Choice("Calm".into())
        );
    }

    #[test]
    fn rejects_malformed_entries() {
        assert!(ScriptedInput::parse("hit").is_err());
        assert!(ScriptedInput::parse("soon:hit").is_err());
        assert!(ScriptedInput::parse("-1:hit").is_err());
        assert!(ScriptedInput::parse("1:").is_err());
        assert!(ScriptedInput::parse("1:7").is_err());
    }

    #[test]
    fn parse_all_sorts_stably() {
        let entries = ["3:Sad", "1:hit", "3:Calm"].map(String::from);
        let inputs = parse_all(&entries).unwrap();
        assert_eq!(inputs[0].input, GameInput::Hit);
        assert_eq!(inputs[1].input, GameInput::Choice("Sad".into()));
        assert_eq!(inputs[2].input, GameInput::Choice("Calm".into()));
    }
}
