//! Static game catalog: the immutable definitions every session is built from.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{GameError, GameResult};

/// Default session length in seconds.
pub const DEFAULT_DURATION_SECS: u32 = 60;

/// Unique identifier of a catalog game.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(pub String);

impl GameId {
    /// Create an id from anything string-like.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for GameId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GameId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Which variant engine runs a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariantKind {
    /// Breathing oscillator.
    Breathing,
    /// Sequence memory.
    Memory,
    /// Moving target tracker.
    Target,
    /// Emotion classification quiz.
    Quiz,
}

impl std::fmt::Display for VariantKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Breathing => write!(f, "breathing"),
            Self::Memory => write!(f, "memory"),
            Self::Target => write!(f, "target"),
            Self::Quiz => write!(f, "quiz"),
        }
    }
}

/// Therapeutic skill a game practices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Calming and breath awareness.
    Mindfulness,
    /// Working memory.
    Cognitive,
    /// Sustained attention.
    Attention,
    /// Emotional literacy.
    Emotional,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mindfulness => write!(f, "Mindfulness"),
            Self::Cognitive => write!(f, "Cognitive"),
            Self::Attention => write!(f, "Attention"),
            Self::Emotional => write!(f, "Emotional"),
        }
    }
}

/// Advertised difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    /// Easy.
    Easy,
    /// Medium.
    Medium,
    /// Hard.
    Hard,
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Easy => write!(f, "Easy"),
            Self::Medium => write!(f, "Medium"),
            Self::Hard => write!(f, "Hard"),
        }
    }
}

fn default_duration() -> u32 {
    DEFAULT_DURATION_SECS
}

/// An immutable catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameDefinition {
    /// Unique id used to select the game.
    pub id: GameId,
    /// Display name.
    pub name: String,
    /// One-line description shown in the game list.
    pub description: String,
    /// Variant engine that runs the game.
    pub variant: VariantKind,
    /// Skill category.
    pub category: Category,
    /// Advertised difficulty.
    pub difficulty: Difficulty,
    /// Points advertised on the catalog card.
    pub points: u32,
    /// Points awarded per successful action inside a session.
    pub award: u32,
    /// Session length in seconds.
    #[serde(default = "default_duration")]
    pub duration_secs: u32,
}

impl GameDefinition {
    /// Short how-to-play text for the variant.
    pub fn instructions(&self) -> &'static str {
        match self.variant {
            VariantKind::Breathing => {
                "Follow the bubble: breathe in as it grows, hold, breathe out as it shrinks."
            }
            VariantKind::Memory => {
                "Watch the pads light up, then repeat the sequence. Each success adds one step."
            }
            VariantKind::Target => "Hit the target as often as you can. It moves every two seconds.",
            VariantKind::Quiz => "Name the emotion shown. A new face appears after each answer.",
        }
    }
}

/// The set of games available to sessions, keyed by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    games: Vec<GameDefinition>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate ids, empty names and zero durations.
    pub fn new(games: Vec<GameDefinition>) -> GameResult<Self> {
        let mut seen = HashSet::new();
        for game in &games {
            if game.id.as_str().trim().is_empty() {
                return Err(GameError::InvalidConfig("game id must not be empty".into()));
            }
            if game.name.trim().is_empty() {
                return Err(GameError::InvalidConfig(format!(
                    "game \"{}\" has an empty name",
                    game.id
                )));
            }
            if game.duration_secs == 0 {
                return Err(GameError::InvalidConfig(format!(
                    "game \"{}\" has a zero duration",
                    game.id
                )));
            }
            if !seen.insert(&game.id) {
                return Err(GameError::InvalidConfig(format!(
                    "duplicate game id \"{}\"",
                    game.id
                )));
            }
        }
        Ok(Self { games })
    }

    /// Parse and validate a catalog from a JSON array of definitions.
    pub fn from_json(json: &str) -> GameResult<Self> {
        let games: Vec<GameDefinition> = serde_json::from_str(json)?;
        Self::new(games)
    }

    /// The four built-in games.
    pub fn builtin() -> Self {
        let game = |id: &str,
                    name: &str,
                    description: &str,
                    variant,
                    category,
                    difficulty,
                    points,
                    award| GameDefinition {
            id: GameId::new(id),
            name: name.to_string(),
            description: description.to_string(),
            variant,
            category,
            difficulty,
            points,
            award,
            duration_secs: DEFAULT_DURATION_SECS,
        };
        Self {
            games: vec![
                game(
                    "breathing",
                    "Breathing Bubbles",
                    "Follow the expanding bubble to practice deep breathing",
                    VariantKind::Breathing,
                    Category::Mindfulness,
                    Difficulty::Easy,
                    10,
                    5,
                ),
                game(
                    "memory",
                    "Memory Palace",
                    "Remember sequences to improve working memory",
                    VariantKind::Memory,
                    Category::Cognitive,
                    Difficulty::Medium,
                    20,
                    10,
                ),
                game(
                    "focus",
                    "Focus Flow",
                    "Maintain attention on moving targets",
                    VariantKind::Target,
                    Category::Attention,
                    Difficulty::Hard,
                    30,
                    15,
                ),
                game(
                    "mood",
                    "Emotion Explorer",
                    "Identify and categorize different emotions",
                    VariantKind::Quiz,
                    Category::Emotional,
                    Difficulty::Easy,
                    15,
                    10,
                ),
            ],
        }
    }

    /// Look up a game by id.
    pub fn get(&self, id: &GameId) -> Option<&GameDefinition> {
        self.games.iter().find(|g| &g.id == id)
    }

    /// Whether `id` is in the catalog.
    pub fn contains(&self, id: &GameId) -> bool {
        self.get(id).is_some()
    }

    /// All games in catalog order.
    pub fn games(&self) -> &[GameDefinition] {
        &self.games
    }

    /// Number of games.
    pub fn len(&self) -> usize {
        self.games.len()
    }

    /// Returns `true` if the catalog has no games.
    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_has_one_game_per_variant() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.len(), 4);
        let kinds: HashSet<_> = catalog.games().iter().map(|g| g.variant).collect();
        assert_eq!(kinds.len(), 4);
        assert!(Catalog::new(catalog.games().to_vec()).is_ok());
    }

    #[test]
    fn builtin_award_values() {
        let catalog = Catalog::builtin();
        let award = |id: &str| catalog.get(&GameId::new(id)).unwrap().award;
        assert_eq!(award("breathing"), 5);
        assert_eq!(award("memory"), 10);
        assert_eq!(award("focus"), 15);
        assert_eq!(award("mood"), 10);
    }

    #[test]
    fn unknown_id_lookup() {
        let catalog = Catalog::builtin();
        assert!(catalog.get(&GameId::new("chess")).is_none());
        assert!(!catalog.contains(&GameId::new("chess")));
    }

    #[test]
    fn duplicate_ids_rejected() {
        let mut games = Catalog::builtin().games().to_vec();
        games.push(games[0].clone());
        let err = Catalog::new(games).unwrap_err();
        assert!(err.to_string().contains("duplicate game id"));
    }

    #[test]
    fn zero_duration_rejected() {
        let mut games = Catalog::builtin().games().to_vec();
        games[1].duration_secs = 0;
        assert!(matches!(
            Catalog::new(games),
            Err(GameError::InvalidConfig(_))
        ));
    }

    #[test]
    fn from_json_defaults_duration() {
        let json = r#"[{
            "id": "calm",
            "name": "Calm Seas",
            "description": "Slow breathing",
            "variant": "breathing",
            "category": "mindfulness",
            "difficulty": "easy",
            "points": 5,
            "award": 3
        }]"#;
        let catalog = Catalog::from_json(json).unwrap();
        let game = catalog.get(&GameId::new("calm")).unwrap();
        assert_eq!(game.duration_secs, DEFAULT_DURATION_SECS);
        assert_eq!(game.variant, VariantKind::Breathing);
        assert_eq!(game.award, 3);
    }

    #[test]
    fn from_json_rejects_garbage() {
        assert!(matches!(
            Catalog::from_json("{not json"),
            Err(GameError::Parse(_))
        ));
    }

    #[test]
    fn game_id_display() {
        assert_eq!(GameId::from("mood").to_string(), "mood");
    }
}
