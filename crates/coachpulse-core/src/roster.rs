//! Roster index
//!
//! Canonical mapping from player names and aliases to rostered players,
//! built from a versioned roster snapshot. The index is immutable after
//! construction; roster changes (trades, signings) are applied by
//! building a new index from a new snapshot.

use crate::error::RosterError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// A rostered player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub full_name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    pub team: String,
}

/// Player entry as it appears in a roster snapshot (team is implied by
/// the surrounding map key)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerEntry {
    pub full_name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
}

/// A point-in-time, versioned mapping of teams to players
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterSnapshot {
    pub version: String,
    pub teams: BTreeMap<String, Vec<PlayerEntry>>,
}

impl RosterSnapshot {
    pub fn from_json(json: &str) -> Result<Self, RosterError> {
        serde_json::from_str(json).map_err(|e| RosterError::ParseError(e.to_string()))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, RosterError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|_| RosterError::FileNotFound(path.as_ref().display().to_string()))?;
        Self::from_json(&content)
    }
}

/// Outcome of resolving a candidate substring against the roster
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution<'a> {
    /// Exactly one rostered player matched
    Match(&'a Player),
    /// No rostered player matched
    NotFound,
    /// More than one player matched and team context did not narrow it
    /// down. A signal, not an error: the mention is skipped and counted.
    Ambiguous,
}

/// Case-insensitive name index over a roster snapshot
#[derive(Debug, Clone)]
pub struct RosterIndex {
    version: String,
    players: Vec<Player>,
    /// Lowercased full names and aliases, unique by invariant
    by_exact: HashMap<String, usize>,
    /// Lowercased last names, possibly shared across players
    by_last_name: HashMap<String, Vec<usize>>,
}

impl RosterIndex {
    /// Build an index from a snapshot, validating that no full name or
    /// alias maps to two different players.
    pub fn new(snapshot: &RosterSnapshot) -> Result<Self, RosterError> {
        let mut players = Vec::new();
        for (team, entries) in &snapshot.teams {
            for entry in entries {
                players.push(Player {
                    full_name: entry.full_name.clone(),
                    aliases: entry.aliases.clone(),
                    team: team.clone(),
                });
            }
        }

        let mut by_exact: HashMap<String, usize> = HashMap::new();
        let mut by_last_name: HashMap<String, Vec<usize>> = HashMap::new();

        for (idx, player) in players.iter().enumerate() {
            let full_key = player.full_name.to_lowercase();
            if let Some(&existing) = by_exact.get(&full_key) {
                if players[existing].full_name.to_lowercase() == full_key {
                    return Err(RosterError::DuplicatePlayer(player.full_name.clone()));
                }
                return Err(RosterError::AliasCollision {
                    alias: player.full_name.clone(),
                    first: players[existing].full_name.clone(),
                    second: player.full_name.clone(),
                });
            }
            by_exact.insert(full_key, idx);

            for alias in &player.aliases {
                let alias_key = alias.to_lowercase();
                if let Some(&existing) = by_exact.get(&alias_key) {
                    if existing != idx {
                        return Err(RosterError::AliasCollision {
                            alias: alias.clone(),
                            first: players[existing].full_name.clone(),
                            second: player.full_name.clone(),
                        });
                    }
                    continue;
                }
                by_exact.insert(alias_key, idx);
            }

            if let Some(last) = last_name(&player.full_name) {
                by_last_name.entry(last).or_default().push(idx);
            }
        }

        Ok(Self {
            version: snapshot.version.clone(),
            players,
            by_exact,
            by_last_name,
        })
    }

    /// Snapshot version this index was built from
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Resolve a candidate substring to a player.
    ///
    /// Full names and aliases match first; a last name matches only when
    /// it identifies a single player, or when `team_context` narrows a
    /// cross-team collision to exactly one candidate. A last name shared
    /// within one team stays `Ambiguous` regardless of context.
    pub fn resolve(&self, candidate: &str, team_context: Option<&str>) -> Resolution<'_> {
        let key = candidate.trim().to_lowercase();
        if key.is_empty() {
            return Resolution::NotFound;
        }

        if let Some(&idx) = self.by_exact.get(&key) {
            return Resolution::Match(&self.players[idx]);
        }

        let Some(candidates) = self.by_last_name.get(&key) else {
            return Resolution::NotFound;
        };

        match candidates.as_slice() {
            [] => Resolution::NotFound,
            [only] => Resolution::Match(&self.players[*only]),
            many => {
                let Some(team) = team_context else {
                    return Resolution::Ambiguous;
                };
                let mut on_team = many
                    .iter()
                    .filter(|&&i| self.players[i].team.eq_ignore_ascii_case(team));
                match (on_team.next(), on_team.next()) {
                    (Some(&idx), None) => Resolution::Match(&self.players[idx]),
                    _ => Resolution::Ambiguous,
                }
            }
        }
    }

    /// All players in the active snapshot
    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.players.iter()
    }

    /// Team names in the active snapshot, sorted and deduplicated
    pub fn teams(&self) -> Vec<String> {
        let mut teams: Vec<String> = self.players.iter().map(|p| p.team.clone()).collect();
        teams.sort();
        teams.dedup();
        teams
    }

    /// Players rostered on the given team
    pub fn players_for_team(&self, team: &str) -> Vec<&Player> {
        self.players
            .iter()
            .filter(|p| p.team.eq_ignore_ascii_case(team))
            .collect()
    }

    /// Every candidate substring the extractor should scan for,
    /// deduplicated and sorted longest-first so a full name always wins
    /// over a last name contained within it.
    pub fn candidate_patterns(&self) -> Vec<String> {
        let mut patterns: Vec<String> = self
            .by_exact
            .keys()
            .chain(self.by_last_name.keys())
            .cloned()
            .collect();
        patterns.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        patterns.dedup();
        patterns
    }
}

/// Last word of a full name, skipping generational suffixes so
/// "Michael Porter Jr" indexes under "porter", not "jr"
fn last_name(full_name: &str) -> Option<String> {
    const SUFFIXES: &[&str] = &["jr", "jr.", "sr", "sr.", "ii", "iii", "iv"];
    full_name
        .split_whitespace()
        .rev()
        .map(|word| word.to_lowercase())
        .find(|word| !SUFFIXES.contains(&word.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> RosterSnapshot {
        let json = r#"{
            "version": "2024-25.1",
            "teams": {
                "Celtics": [
                    {"full_name": "Jayson Tatum"},
                    {"full_name": "Jaylen Brown", "aliases": ["JB"]}
                ],
                "Lakers": [
                    {"full_name": "Troy Brown"},
                    {"full_name": "LeBron James", "aliases": ["The King"]}
                ]
            }
        }"#;
        RosterSnapshot::from_json(json).unwrap()
    }

    #[test]
    fn test_full_name_resolves() {
        let index = RosterIndex::new(&snapshot()).unwrap();
        match index.resolve("Jayson Tatum", None) {
            Resolution::Match(p) => assert_eq!(p.team, "Celtics"),
            other => panic!("expected match, got {:?}", other),
        }
    }

    #[test]
    fn test_alias_resolves_case_insensitive() {
        let index = RosterIndex::new(&snapshot()).unwrap();
        match index.resolve("the king", None) {
            Resolution::Match(p) => assert_eq!(p.full_name, "LeBron James"),
            other => panic!("expected match, got {:?}", other),
        }
    }

    #[test]
    fn test_unique_last_name_resolves() {
        let index = RosterIndex::new(&snapshot()).unwrap();
        match index.resolve("tatum", None) {
            Resolution::Match(p) => assert_eq!(p.full_name, "Jayson Tatum"),
            other => panic!("expected match, got {:?}", other),
        }
    }

    #[test]
    fn test_shared_last_name_needs_team_context() {
        let index = RosterIndex::new(&snapshot()).unwrap();
        assert_eq!(index.resolve("Brown", None), Resolution::Ambiguous);
        match index.resolve("Brown", Some("Lakers")) {
            Resolution::Match(p) => assert_eq!(p.full_name, "Troy Brown"),
            other => panic!("expected Lakers Brown, got {:?}", other),
        }
    }

    #[test]
    fn test_shared_last_name_on_same_team_stays_ambiguous() {
        let json = r#"{
            "version": "test",
            "teams": {
                "Spurs": [
                    {"full_name": "Keldon Johnson"},
                    {"full_name": "Stanley Johnson"}
                ]
            }
        }"#;
        let snapshot = RosterSnapshot::from_json(json).unwrap();
        let index = RosterIndex::new(&snapshot).unwrap();
        assert_eq!(index.resolve("Johnson", Some("Spurs")), Resolution::Ambiguous);
        assert_eq!(index.resolve("Johnson", None), Resolution::Ambiguous);
    }

    #[test]
    fn test_alias_collision_rejected() {
        let json = r#"{
            "version": "test",
            "teams": {
                "Celtics": [{"full_name": "Jayson Tatum", "aliases": ["JT"]}],
                "Magic": [{"full_name": "Jalen Suggs", "aliases": ["JT"]}]
            }
        }"#;
        let snapshot = RosterSnapshot::from_json(json).unwrap();
        assert!(matches!(
            RosterIndex::new(&snapshot),
            Err(RosterError::AliasCollision { .. })
        ));
    }

    #[test]
    fn test_unknown_name_not_found() {
        let index = RosterIndex::new(&snapshot()).unwrap();
        assert_eq!(index.resolve("Victor Wembanyama", None), Resolution::NotFound);
    }

    #[test]
    fn test_generational_suffix_skipped_for_last_name() {
        let json = r#"{
            "version": "test",
            "teams": {
                "Nuggets": [{"full_name": "Michael Porter Jr"}]
            }
        }"#;
        let snapshot = RosterSnapshot::from_json(json).unwrap();
        let index = RosterIndex::new(&snapshot).unwrap();
        match index.resolve("Porter", None) {
            Resolution::Match(p) => assert_eq!(p.full_name, "Michael Porter Jr"),
            other => panic!("expected match, got {:?}", other),
        }
        assert_eq!(index.resolve("Jr", None), Resolution::NotFound);
    }

    #[test]
    fn test_teams_sorted_and_deduplicated() {
        let index = RosterIndex::new(&snapshot()).unwrap();
        assert_eq!(index.teams(), vec!["Celtics".to_string(), "Lakers".to_string()]);
    }

    #[test]
    fn test_patterns_sorted_longest_first() {
        let index = RosterIndex::new(&snapshot()).unwrap();
        let patterns = index.candidate_patterns();
        assert!(patterns.windows(2).all(|w| w[0].len() >= w[1].len()));
        assert!(patterns.contains(&"jaylen brown".to_string()));
        assert!(patterns.contains(&"brown".to_string()));
    }
}
