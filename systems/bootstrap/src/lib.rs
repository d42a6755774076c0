#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Bootstrap system that prepares a Cyberdoom run from the built-in tables.
//!
//! Level geometry, roles and difficulty presets are plain data embedded in
//! the binary as TOML. The [`Catalog`] parses and validates them once and
//! resolves the modifiers used for a run.

use cyberdoom_core::{DifficultyModifiers, LevelConfig, RoleModifiers, RunModifiers};
use cyberdoom_world::{query, World};
use serde::Deserialize;
use thiserror::Error;

const LEVELS_DOCUMENT: &str = include_str!("../assets/levels.toml");
const PROFILES_DOCUMENT: &str = include_str!("../assets/profiles.toml");

/// Role used when a requested role id is unknown.
pub const DEFAULT_ROLE: &str = "soc";
/// Difficulty used when a requested difficulty id is unknown.
pub const DEFAULT_DIFFICULTY: &str = "normal";

/// Reasons the configuration tables cannot be loaded.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A document failed to parse or a grid failed validation.
    #[error("failed to parse {document}")]
    Parse {
        /// Name of the offending document.
        document: &'static str,
        /// Underlying parser error.
        #[source]
        source: toml::de::Error,
    },
    /// The level table is empty.
    #[error("the campaign must contain at least one level")]
    NoLevels,
    /// A fallback profile is missing from the tables.
    #[error("missing default {kind} profile `{id}`")]
    MissingDefault {
        /// Either `role` or `difficulty`.
        kind: &'static str,
        /// Identifier that was expected.
        id: &'static str,
    },
}

/// Selectable player role.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct RoleProfile {
    /// Stable identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Short description shown in menus.
    #[serde(default)]
    pub description: String,
    /// Modifiers applied when the role is selected.
    pub modifiers: RoleModifiers,
}

/// Selectable difficulty preset.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct DifficultyProfile {
    /// Stable identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Short description shown in menus.
    #[serde(default)]
    pub description: String,
    /// Modifiers applied when the difficulty is selected.
    pub modifiers: DifficultyModifiers,
}

#[derive(Deserialize)]
struct LevelsDocument {
    levels: Vec<LevelConfig>,
}

#[derive(Deserialize)]
struct ProfilesDocument {
    roles: Vec<RoleProfile>,
    difficulties: Vec<DifficultyProfile>,
}

/// Validated levels, roles and difficulties.
///
/// The fallback profiles are resolved to indices at construction, so every
/// lookup has an entry to return.
#[derive(Clone, Debug)]
pub struct Catalog {
    levels: Vec<LevelConfig>,
    roles: Vec<RoleProfile>,
    difficulties: Vec<DifficultyProfile>,
    default_role: usize,
    default_difficulty: usize,
}

impl Catalog {
    /// Loads the tables embedded in the binary.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_documents(LEVELS_DOCUMENT, PROFILES_DOCUMENT)
    }

    /// Loads a custom campaign alongside the built-in roles and difficulties.
    pub fn with_levels(levels: &str) -> Result<Self, CatalogError> {
        Self::from_documents(levels, PROFILES_DOCUMENT)
    }

    /// Parses a levels document and a profiles document.
    pub fn from_documents(levels: &str, profiles: &str) -> Result<Self, CatalogError> {
        let levels: LevelsDocument =
            toml::from_str(levels).map_err(|source| CatalogError::Parse {
                document: "levels",
                source,
            })?;
        let profiles: ProfilesDocument =
            toml::from_str(profiles).map_err(|source| CatalogError::Parse {
                document: "profiles",
                source,
            })?;

        if levels.levels.is_empty() {
            return Err(CatalogError::NoLevels);
        }
        let default_role = profiles
            .roles
            .iter()
            .position(|role| role.id == DEFAULT_ROLE)
            .ok_or(CatalogError::MissingDefault {
                kind: "role",
                id: DEFAULT_ROLE,
            })?;
        let default_difficulty = profiles
            .difficulties
            .iter()
            .position(|difficulty| difficulty.id == DEFAULT_DIFFICULTY)
            .ok_or(CatalogError::MissingDefault {
                kind: "difficulty",
                id: DEFAULT_DIFFICULTY,
            })?;

        log::debug!(
            "catalog loaded: {} levels, {} roles, {} difficulties",
            levels.levels.len(),
            profiles.roles.len(),
            profiles.difficulties.len()
        );
        Ok(Self {
            levels: levels.levels,
            roles: profiles.roles,
            difficulties: profiles.difficulties,
            default_role,
            default_difficulty,
        })
    }

    /// All levels in campaign order.
    #[must_use]
    pub fn levels(&self) -> &[LevelConfig] {
        &self.levels
    }

    /// Level at `index`, if present.
    #[must_use]
    pub fn level(&self, index: usize) -> Option<&LevelConfig> {
        self.levels.get(index)
    }

    /// Index of the level after `index`, wrapping to the first level.
    #[must_use]
    pub fn next_level_index(&self, index: usize) -> usize {
        (index + 1) % self.levels.len().max(1)
    }

    /// All roles in menu order.
    #[must_use]
    pub fn roles(&self) -> &[RoleProfile] {
        &self.roles
    }

    /// All difficulties in menu order.
    #[must_use]
    pub fn difficulties(&self) -> &[DifficultyProfile] {
        &self.difficulties
    }

    /// Role with the given id, or the default role when the id is unknown.
    #[must_use]
    pub fn role(&self, id: &str) -> &RoleProfile {
        find_or_default(&self.roles, id, self.default_role, |role| &role.id)
    }

    /// Difficulty with the given id, or the default difficulty when the id is unknown.
    #[must_use]
    pub fn difficulty(&self, id: &str) -> &DifficultyProfile {
        find_or_default(&self.difficulties, id, self.default_difficulty, |difficulty| {
            &difficulty.id
        })
    }

    /// Combines the selected role and difficulty into run modifiers.
    #[must_use]
    pub fn modifiers(&self, role: &str, difficulty: &str) -> RunModifiers {
        RunModifiers::new(
            self.role(role).modifiers,
            self.difficulty(difficulty).modifiers,
        )
    }
}

fn find_or_default<'a, T>(
    entries: &'a [T],
    id: &str,
    fallback: usize,
    key: impl Fn(&T) -> &String,
) -> &'a T {
    let fallback = &entries[fallback];
    entries
        .iter()
        .find(|entry| key(*entry) == id)
        .unwrap_or_else(|| {
            log::warn!("unknown profile id `{id}`, falling back to `{}`", key(fallback));
            fallback
        })
}

/// Produces data required to greet the player.
#[derive(Debug, Default)]
pub struct Bootstrap;

impl Bootstrap {
    /// Derives the banner that should be shown when the experience starts.
    #[must_use]
    pub fn welcome_banner<'world>(&self, world: &'world World) -> &'world str {
        query::welcome_banner(world)
    }

    /// Briefing text for the level currently loaded in the world.
    #[must_use]
    pub fn briefing<'world>(&self, world: &'world World) -> &'world str {
        &query::level(world).briefing
    }

    /// Debriefing text for the level currently loaded in the world.
    #[must_use]
    pub fn debriefing<'world>(&self, world: &'world World) -> &'world str {
        &query::level(world).debriefing
    }
}
