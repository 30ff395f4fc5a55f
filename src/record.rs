//! Creature records and the upstream payload they are decoded from.
//!
//! A `CreatureRecord` is the only input the classifier sees. A `CreatureProfile`
//! wraps it with the display fields the shells need (name, artwork, stat order).

use crate::error::{CalcError, CalcResult};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Elemental tags. Creatures carry one or two in practice.
pub type Categories = SmallVec<[String; 2]>;

/// Mass, height, type tags and named base stats of one creature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatureRecord {
    /// Mass in hectograms
    pub mass_hg: f64,
    /// Height in decimetres
    pub height_dm: f64,
    #[serde(default)]
    pub categories: Categories,
    #[serde(default)]
    pub attributes: FxHashMap<String, i64>,
}

impl CreatureRecord {
    pub fn new(mass_hg: f64, height_dm: f64) -> Self {
        Self {
            mass_hg,
            height_dm,
            categories: Categories::new(),
            attributes: FxHashMap::default(),
        }
    }

    /// Add a type tag. Tags are a set, so repeats are ignored.
    pub fn with_category(mut self, tag: &str) -> Self {
        self.add_category(tag);
        self
    }

    pub fn with_attribute(mut self, name: &str, value: i64) -> Self {
        self.attributes.insert(name.to_string(), value);
        self
    }

    pub fn add_category(&mut self, tag: &str) {
        let tag = tag.trim();
        if !tag.is_empty() && !self.has_category(tag) {
            self.categories.push(tag.to_string());
        }
    }

    /// Exact match. Upstream tags are lowercase and rule tags are written to match.
    pub fn has_category(&self, tag: &str) -> bool {
        self.categories.iter().any(|c| c == tag)
    }

    pub fn attribute(&self, name: &str) -> Option<i64> {
        self.attributes.get(name).copied()
    }

    /// Reject records the classifier must not guess about.
    pub fn validate(&self) -> CalcResult<()> {
        check_measure("mass_hg", self.mass_hg)?;
        check_measure("height_dm", self.height_dm)?;
        Ok(())
    }
}

fn check_measure(field: &str, value: f64) -> CalcResult<()> {
    if !value.is_finite() {
        return Err(CalcError::MalformedRecord(format!("{} is not finite", field)));
    }
    if value < 0.0 {
        return Err(CalcError::MalformedRecord(format!("{} is negative ({})", field, value)));
    }
    Ok(())
}

// ============================================================================
// Display profile
// ============================================================================

/// One named base stat, kept in upstream order for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stat {
    pub name: String,
    pub value: i64,
}

/// A fetched creature: identity, artwork and ordered stats around the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatureProfile {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub artwork_url: Option<String>,
    #[serde(default)]
    pub stats: Vec<Stat>,
    pub record: CreatureRecord,
}

// ============================================================================
// Upstream payload (PokeAPI /pokemon/{id})
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct PokemonPayload {
    pub id: u32,
    pub name: String,
    /// Hectograms. Optional so a missing value becomes MalformedRecord, not a decode error.
    pub weight: Option<f64>,
    /// Decimetres
    pub height: Option<f64>,
    #[serde(default)]
    pub sprites: Sprites,
    #[serde(default)]
    pub stats: Vec<StatSlot>,
    #[serde(default)]
    pub types: Vec<TypeSlot>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Sprites {
    pub front_default: Option<String>,
    #[serde(default)]
    pub other: OtherSprites,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OtherSprites {
    #[serde(rename = "official-artwork", default)]
    pub official_artwork: Option<Artwork>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Artwork {
    pub front_default: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatSlot {
    pub base_stat: i64,
    pub stat: NamedResource,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TypeSlot {
    #[serde(rename = "type")]
    pub kind: NamedResource,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NamedResource {
    pub name: String,
}

impl Sprites {
    /// Official artwork when present, otherwise the small front sprite.
    pub fn best_url(&self) -> Option<String> {
        self.other
            .official_artwork
            .as_ref()
            .and_then(|a| a.front_default.clone())
            .filter(|url| !url.is_empty())
            .or_else(|| self.front_default.clone())
    }
}

impl TryFrom<PokemonPayload> for CreatureProfile {
    type Error = CalcError;

    fn try_from(payload: PokemonPayload) -> CalcResult<Self> {
        let mass_hg = payload
            .weight
            .ok_or_else(|| CalcError::MalformedRecord(format!("{} has no weight", payload.name)))?;
        let height_dm = payload
            .height
            .ok_or_else(|| CalcError::MalformedRecord(format!("{} has no height", payload.name)))?;

        let mut record = CreatureRecord::new(mass_hg, height_dm);
        for slot in &payload.types {
            record.add_category(&slot.kind.name);
        }

        let stats: Vec<Stat> = payload
            .stats
            .iter()
            .map(|s| Stat { name: s.stat.name.clone(), value: s.base_stat })
            .collect();
        for stat in &stats {
            record.attributes.insert(stat.name.clone(), stat.value);
        }

        record.validate()?;

        Ok(CreatureProfile {
            id: payload.id,
            name: payload.name,
            artwork_url: payload.sprites.best_url(),
            stats,
            record,
        })
    }
}
