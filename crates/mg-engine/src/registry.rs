use std::collections::HashMap;

use crate::catalog::{Catalog, GameDefinition, GameId, VariantKind};
use crate::error::{GameError, GameResult};
use crate::variant::{BreathingGame, GameVariant, MemoryGame, QuizGame, TargetGame};

/// Builds a fresh variant engine for a definition.
pub type VariantFactory = fn(&GameDefinition) -> Box<dyn GameVariant>;

fn breathing(def: &GameDefinition) -> Box<dyn GameVariant> {
    Box::new(BreathingGame::new(def.award))
}

fn memory(def: &GameDefinition) -> Box<dyn GameVariant> {
    Box::new(MemoryGame::new(def.award))
}

fn target(def: &GameDefinition) -> Box<dyn GameVariant> {
    Box::new(TargetGame::new(def.award))
}

fn quiz(def: &GameDefinition) -> Box<dyn GameVariant> {
    Box::new(QuizGame::new(def.award))
}

/// Resolves game ids to definitions and variant engines.
///
/// Selection happens once per session through [`GameRegistry::instantiate`];
/// after that the controller only talks to the returned trait object.
#[derive(Debug, Clone)]
pub struct GameRegistry {
    catalog: Catalog,
    factories: HashMap<VariantKind, VariantFactory>,
}

impl GameRegistry {
    /// Registry over `catalog` with the built-in variant engines.
    pub fn new(catalog: Catalog) -> Self {
        let mut factories: HashMap<VariantKind, VariantFactory> = HashMap::new();
        factories.insert(VariantKind::Breathing, breathing);
        factories.insert(VariantKind::Memory, memory);
        factories.insert(VariantKind::Target, target);
        factories.insert(VariantKind::Quiz, quiz);
        Self { catalog, factories }
    }

    /// The catalog this registry serves.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Look up a definition, failing on unknown ids.
    pub fn definition(&self, id: &GameId) -> GameResult<&GameDefinition> {
        self.catalog
            .get(id)
            .ok_or_else(|| GameError::UnknownGame(id.clone()))
    }

    /// Resolve `id` to its definition and a fresh variant engine.
    pub fn instantiate(&self, id: &GameId) -> GameResult<(GameDefinition, Box<dyn GameVariant>)> {
        let def = self.definition(id)?;
        let factory = self.factories.get(&def.variant).ok_or_else(|| {
            GameError::InvalidConfig(format!("no engine registered for variant {}", def.variant))
        })?;
        Ok((def.clone(), factory(def)))
    }
}

impl Default for GameRegistry {
    fn default() -> Self {
        Self::new(Catalog::builtin())
    }
}
