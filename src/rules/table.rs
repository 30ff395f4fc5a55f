//! Rule definitions and the standard rule table.

use crate::record::CreatureRecord;
use serde::{Deserialize, Serialize};

// ============================================================================
// Thresholds (upstream units: decimetres, hectograms, base-stat points)
// ============================================================================

/// Creatures shorter than 0.3 m can't get a grip on a tire.
pub const SMALL_HEIGHT_DM: f64 = 3.0;

/// Heavier than 100 kg.
pub const HEAVY_MASS_HG: f64 = 1000.0;

pub const POWER_ATTRIBUTE: &str = "attack";
pub const POWER_THRESHOLD: i64 = 100;

pub const HEAT_TAG: &str = "fire";
pub const TELEKINETIC_TAG: &str = "psychic";
pub const CORROSION_TAG: &str = "water";
pub const INCORPOREAL_TAG: &str = "ghost";
pub const POWER_GENERATING_TAG: &str = "electric";

// ============================================================================
// Rule types
// ============================================================================

/// What a rule looks at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Predicate {
    HeightBelow { dm: f64 },
    MassAbove { hg: f64 },
    /// A missing attribute never matches.
    AttributeAbove { name: String, threshold: i64 },
    HasCategory { tag: String },
}

impl Predicate {
    pub fn matches(&self, record: &CreatureRecord) -> bool {
        match self {
            Predicate::HeightBelow { dm } => record.height_dm < *dm,
            Predicate::MassAbove { hg } => record.mass_hg > *hg,
            Predicate::AttributeAbove { name, threshold } => {
                record.attribute(name).is_some_and(|v| v > *threshold)
            }
            Predicate::HasCategory { tag } => record.has_category(tag),
        }
    }
}

/// Early-exit threshold. Both comparisons are strict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "when", content = "score", rename_all = "snake_case")]
pub enum ExitCondition {
    Below(i32),
    Above(i32),
}

impl ExitCondition {
    pub fn crossed(self, score: i32) -> bool {
        match self {
            ExitCondition::Below(low) => score < low,
            ExitCondition::Above(high) => score > high,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    Helpful,
    Unhelpful,
}

impl Polarity {
    pub fn is_helpful(self) -> bool {
        self == Polarity::Helpful
    }
}

/// One weighted rule in the chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub name: String,
    pub predicate: Predicate,
    pub delta: i32,
    #[serde(default)]
    pub exit: Option<ExitCondition>,
    pub polarity: Polarity,
    pub message: String,
}

impl Rule {
    fn new(
        name: &str,
        predicate: Predicate,
        delta: i32,
        exit: ExitCondition,
        polarity: Polarity,
        message: &str,
    ) -> Self {
        Self {
            name: name.to_string(),
            predicate,
            delta,
            exit: Some(exit),
            polarity,
            message: message.to_string(),
        }
    }
}

// ============================================================================
// Standard table
// ============================================================================

pub const FALLBACK_HELPFUL: &str = "Could probably help in some way, but not specialized for the task";
pub const FALLBACK_UNHELPFUL: &str = "Probably better at moral support than at changing tires";

/// The eight standard rules, in evaluation order.
///
/// Order is significant: later rules see the score left by earlier ones even
/// when those did not exit. Size is checked first, raw strength before
/// elemental affinities.
pub fn standard_rules() -> Vec<Rule> {
    use ExitCondition::{Above, Below};
    use Polarity::{Helpful, Unhelpful};

    let tag = |t: &str| Predicate::HasCategory { tag: t.to_string() };

    vec![
        Rule::new(
            "too_small",
            Predicate::HeightBelow { dm: SMALL_HEIGHT_DM },
            -30,
            Below(20),
            Unhelpful,
            "Too small to lift or move a tire effectively",
        ),
        Rule::new(
            "heavy_lifter",
            Predicate::MassAbove { hg: HEAVY_MASS_HG },
            40,
            Above(80),
            Helpful,
            "Strong enough to lift a car without a jack!",
        ),
        Rule::new(
            "strong_attack",
            Predicate::AttributeAbove {
                name: POWER_ATTRIBUTE.to_string(),
                threshold: POWER_THRESHOLD,
            },
            30,
            Above(70),
            Helpful,
            "Strong enough to loosen tough lug nuts and lift the tire",
        ),
        Rule::new("heat", tag(HEAT_TAG), 25, Above(65), Helpful, "Can heat and loosen rusted lug nuts"),
        Rule::new(
            "telekinesis",
            tag(TELEKINETIC_TAG),
            35,
            Above(75),
            Helpful,
            "Could use psychic powers to remove lug nuts and lift the tire",
        ),
        Rule::new(
            "corrosion",
            tag(CORROSION_TAG),
            -15,
            Below(40),
            Unhelpful,
            "Might cause rust or electrical issues with the car",
        ),
        Rule::new(
            "incorporeal",
            tag(INCORPOREAL_TAG),
            -25,
            Below(30),
            Unhelpful,
            "Difficulty physically interacting with the tire and tools",
        ),
        Rule::new(
            "power_tools",
            tag(POWER_GENERATING_TAG),
            20,
            Above(60),
            Helpful,
            "Could power an impact wrench to spin off the lug nuts",
        ),
    ]
}
