// ═══════════════════════════════════════════════════════════════════════
// Map graph — territories, continents and borders
//
// A `MapDefinition` is the raw, name-keyed input (usually JSON). It is
// validated once into an immutable `MapGraph` with dense ids; the graph
// is then shared by every state and view through an `Arc`.
// ═══════════════════════════════════════════════════════════════════════

use crate::error::ConfigError;
use crate::types::{ContinentId, TerritoryId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

// ── Raw definition ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerritoryDef {
    pub continent: String,
    pub neighbors: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContinentDef {
    pub bonus: u32,
    pub territories: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapDefinition {
    pub territories: BTreeMap<String, TerritoryDef>,
    pub continents: BTreeMap<String, ContinentDef>,
}

impl MapDefinition {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Add a continent together with its member territories.
    pub fn add_continent(&mut self, name: &str, bonus: u32, members: &[&str]) -> &mut Self {
        self.continents.insert(name.to_string(), ContinentDef {
            bonus,
            territories: members.iter().map(|m| m.to_string()).collect(),
        });
        for m in members {
            self.territories.entry(m.to_string()).or_default().continent = name.to_string();
        }
        self
    }

    /// Add a two-way border between two territories.
    pub fn add_border(&mut self, a: &str, b: &str) -> &mut Self {
        self.territories.entry(a.to_string()).or_default().neighbors.push(b.to_string());
        self.territories.entry(b.to_string()).or_default().neighbors.push(a.to_string());
        self
    }
}

// ── Validated graph ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerritoryNode {
    pub id: TerritoryId,
    pub name: String,
    pub continent: ContinentId,
    pub neighbors: Vec<TerritoryId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContinentNode {
    pub id: ContinentId,
    pub name: String,
    pub bonus: u32,
    pub territories: Vec<TerritoryId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapGraph {
    territories: Vec<TerritoryNode>,
    continents: Vec<ContinentNode>,
}

impl MapGraph {
    /// Validate referential integrity and assign ids. Territory ids follow
    /// continent order, then each continent's member order.
    pub fn from_definition(def: &MapDefinition) -> Result<Self, ConfigError> {
        if def.territories.is_empty() {
            return Err(ConfigError::EmptyMap);
        }

        for (name, t) in &def.territories {
            if !def.continents.contains_key(&t.continent) {
                return Err(ConfigError::UnknownContinent {
                    territory: name.clone(),
                    continent: t.continent.clone(),
                });
            }
            for n in &t.neighbors {
                if n == name {
                    return Err(ConfigError::SelfBorder(name.clone()));
                }
                let Some(other) = def.territories.get(n) else {
                    return Err(ConfigError::UnknownNeighbor {
                        territory: name.clone(),
                        neighbor: n.clone(),
                    });
                };
                if !other.neighbors.contains(name) {
                    return Err(ConfigError::AsymmetricBorder { from: name.clone(), to: n.clone() });
                }
            }
        }

        for (cname, c) in &def.continents {
            let mut seen = BTreeSet::new();
            for m in &c.territories {
                let Some(t) = def.territories.get(m) else {
                    return Err(ConfigError::UnknownMember {
                        continent: cname.clone(),
                        territory: m.clone(),
                    });
                };
                if !seen.insert(m) {
                    return Err(ConfigError::DuplicateMember {
                        continent: cname.clone(),
                        territory: m.clone(),
                    });
                }
                if &t.continent != cname {
                    return Err(ConfigError::ContinentMismatch {
                        territory: m.clone(),
                        declared: t.continent.clone(),
                        listed_by: cname.clone(),
                    });
                }
            }
        }

        for (name, t) in &def.territories {
            let listed = def.continents.get(&t.continent)
                .is_some_and(|c| c.territories.contains(name));
            if !listed {
                return Err(ConfigError::MissingMember {
                    territory: name.clone(),
                    continent: t.continent.clone(),
                });
            }
        }

        let too_large = || ConfigError::MapTooLarge {
            continents: def.continents.len(),
            territories: def.territories.len(),
        };
        if def.continents.len() > usize::from(u8::MAX) + 1 || def.territories.len() > usize::from(u16::MAX) + 1 {
            return Err(too_large());
        }

        // Dense ids
        let mut ids: BTreeMap<&str, TerritoryId> = BTreeMap::new();
        let mut continents = Vec::with_capacity(def.continents.len());
        let mut territories = Vec::with_capacity(def.territories.len());
        for (ci, (cname, c)) in def.continents.iter().enumerate() {
            let cid = ContinentId(u8::try_from(ci).map_err(|_| too_large())?);
            let mut members = Vec::with_capacity(c.territories.len());
            for m in &c.territories {
                let tid = TerritoryId(u16::try_from(territories.len()).map_err(|_| too_large())?);
                ids.insert(m.as_str(), tid);
                members.push(tid);
                territories.push(TerritoryNode {
                    id: tid,
                    name: m.clone(),
                    continent: cid,
                    neighbors: Vec::new(),
                });
            }
            continents.push(ContinentNode { id: cid, name: cname.clone(), bonus: c.bonus, territories: members });
        }

        for node in &mut territories {
            let mut neighbors: Vec<TerritoryId> = def.territories[&node.name].neighbors.iter()
                .filter_map(|n| ids.get(n.as_str()).copied())
                .collect();
            neighbors.sort();
            neighbors.dedup();
            node.neighbors = neighbors;
        }

        Ok(MapGraph { territories, continents })
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Self::from_definition(&MapDefinition::from_json(json)?)
    }

    pub fn territory_count(&self) -> usize {
        self.territories.len()
    }

    pub fn territories(&self) -> &[TerritoryNode] {
        &self.territories
    }

    pub fn continents(&self) -> &[ContinentNode] {
        &self.continents
    }

    pub fn territory(&self, id: TerritoryId) -> &TerritoryNode {
        &self.territories[id.0 as usize]
    }

    pub fn continent(&self, id: ContinentId) -> &ContinentNode {
        &self.continents[id.0 as usize]
    }

    pub fn contains(&self, id: TerritoryId) -> bool {
        (id.0 as usize) < self.territories.len()
    }

    pub fn name(&self, id: TerritoryId) -> &str {
        &self.territory(id).name
    }

    pub fn neighbors(&self, id: TerritoryId) -> &[TerritoryId] {
        &self.territory(id).neighbors
    }

    pub fn are_adjacent(&self, a: TerritoryId, b: TerritoryId) -> bool {
        self.contains(a) && self.neighbors(a).contains(&b)
    }

    pub fn find(&self, name: &str) -> Option<TerritoryId> {
        self.territories.iter().find(|t| t.name == name).map(|t| t.id)
    }

    pub fn territory_ids(&self) -> impl Iterator<Item = TerritoryId> + '_ {
        self.territories.iter().map(|t| t.id)
    }
}

// ── Classic board ──────────────────────────────────────────────────────
// 42 territories, 6 continents.

const CLASSIC_CONTINENTS: &[(&str, u32, &[&str])] = &[
    ("North America", 5, &[
        "Alaska", "Northwest Territory", "Greenland", "Alberta", "Ontario",
        "Quebec", "Western United States", "Eastern United States", "Central America",
    ]),
    ("South America", 2, &["Venezuela", "Peru", "Brazil", "Argentina"]),
    ("Europe", 5, &[
        "Iceland", "Great Britain", "Scandinavia", "Northern Europe",
        "Western Europe", "Southern Europe", "Ukraine",
    ]),
    ("Africa", 3, &["North Africa", "Egypt", "East Africa", "Congo", "South Africa", "Madagascar"]),
    ("Asia", 7, &[
        "Ural", "Siberia", "Yakutsk", "Kamchatka", "Irkutsk", "Mongolia",
        "Japan", "Afghanistan", "China", "Middle East", "India", "Siam",
    ]),
    ("Australia", 2, &["Indonesia", "New Guinea", "Western Australia", "Eastern Australia"]),
];

const CLASSIC_BORDERS: &[(&str, &str)] = &[
    // North America
    ("Alaska", "Northwest Territory"), ("Alaska", "Alberta"), ("Alaska", "Kamchatka"),
    ("Northwest Territory", "Alberta"), ("Northwest Territory", "Ontario"),
    ("Northwest Territory", "Greenland"),
    ("Greenland", "Ontario"), ("Greenland", "Quebec"), ("Greenland", "Iceland"),
    ("Alberta", "Ontario"), ("Alberta", "Western United States"),
    ("Ontario", "Quebec"), ("Ontario", "Western United States"), ("Ontario", "Eastern United States"),
    ("Quebec", "Eastern United States"),
    ("Western United States", "Eastern United States"), ("Western United States", "Central America"),
    ("Eastern United States", "Central America"),
    ("Central America", "Venezuela"),
    // South America
    ("Venezuela", "Peru"), ("Venezuela", "Brazil"),
    ("Peru", "Brazil"), ("Peru", "Argentina"),
    ("Brazil", "Argentina"), ("Brazil", "North Africa"),
    // Europe
    ("Iceland", "Great Britain"), ("Iceland", "Scandinavia"),
    ("Great Britain", "Scandinavia"), ("Great Britain", "Northern Europe"),
    ("Great Britain", "Western Europe"),
    ("Scandinavia", "Northern Europe"), ("Scandinavia", "Ukraine"),
    ("Northern Europe", "Ukraine"), ("Northern Europe", "Southern Europe"),
    ("Northern Europe", "Western Europe"),
    ("Western Europe", "Southern Europe"), ("Western Europe", "North Africa"),
    ("Southern Europe", "Ukraine"), ("Southern Europe", "Middle East"),
    ("Southern Europe", "Egypt"), ("Southern Europe", "North Africa"),
    ("Ukraine", "Ural"), ("Ukraine", "Afghanistan"), ("Ukraine", "Middle East"),
    // Africa
    ("North Africa", "Egypt"), ("North Africa", "East Africa"), ("North Africa", "Congo"),
    ("Egypt", "Middle East"), ("Egypt", "East Africa"),
    ("East Africa", "Congo"), ("East Africa", "South Africa"),
    ("East Africa", "Madagascar"), ("East Africa", "Middle East"),
    ("Congo", "South Africa"), ("South Africa", "Madagascar"),
    // Asia
    ("Ural", "Siberia"), ("Ural", "China"), ("Ural", "Afghanistan"),
    ("Siberia", "Yakutsk"), ("Siberia", "Irkutsk"), ("Siberia", "Mongolia"), ("Siberia", "China"),
    ("Yakutsk", "Kamchatka"), ("Yakutsk", "Irkutsk"),
    ("Kamchatka", "Irkutsk"), ("Kamchatka", "Mongolia"), ("Kamchatka", "Japan"),
    ("Irkutsk", "Mongolia"),
    ("Mongolia", "Japan"), ("Mongolia", "China"),
    ("Afghanistan", "China"), ("Afghanistan", "India"), ("Afghanistan", "Middle East"),
    ("China", "India"), ("China", "Siam"),
    ("Middle East", "India"),
    ("India", "Siam"), ("Siam", "Indonesia"),
    // Australia
    ("Indonesia", "New Guinea"), ("Indonesia", "Western Australia"),
    ("New Guinea", "Western Australia"), ("New Guinea", "Eastern Australia"),
    ("Western Australia", "Eastern Australia"),
];

/// Definition of the standard 42-territory board.
pub fn classic_definition() -> MapDefinition {
    let mut def = MapDefinition::default();
    for (name, bonus, members) in CLASSIC_CONTINENTS {
        def.add_continent(name, *bonus, members);
    }
    for (a, b) in CLASSIC_BORDERS {
        def.add_border(a, b);
    }
    def
}

pub fn classic() -> Result<MapGraph, ConfigError> {
    MapGraph::from_definition(&classic_definition())
}
