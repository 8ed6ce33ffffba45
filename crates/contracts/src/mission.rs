//! Mission-resolution contract types: collaboration analysis, outcome tags,
//! consequences, and the report returned to the turn scheduler.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{EmotionKind, RelationshipDelta};

// ---------------------------------------------------------------------------
// Collaboration analysis
// ---------------------------------------------------------------------------

/// Roster-wide emotional aggregate: per-axis means plus the strongest
/// shared emotion and its intensity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmotionalContagion {
    pub averages: BTreeMap<EmotionKind, f64>,
    pub dominant: EmotionKind,
    pub dominant_intensity: f64,
}

impl Default for EmotionalContagion {
    fn default() -> Self {
        Self {
            averages: BTreeMap::new(),
            dominant: EmotionKind::Anticipation,
            dominant_intensity: 0.0,
        }
    }
}

/// Ephemeral per-mission collaboration profile. Recomputed every resolution,
/// never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct CollaborationProfile {
    pub trust_synergy: f64,
    pub skill_complementarity: f64,
    pub communication_efficiency: f64,
    pub leadership_effectiveness: f64,
    pub emotional_contagion: EmotionalContagion,
    pub group_cohesion: f64,
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// Terminal mission classification.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    PerfectSuccess,
    SuccessWithComplications,
    PartialSuccess,
    PartialSuccessWithConsequences,
    FailureWithIntel,
    FailureWithExposure,
    CompleteFailure,
    CatastrophicFailure,
    TragicSuccess,
    PyrrhicVictory,
    BeneficialFailure,
    SabotagedMission,
    BetrayalRevealed,
    UnintendedConsequences,
}

impl Outcome {
    pub const ALL: [Outcome; 14] = [
        Outcome::PerfectSuccess,
        Outcome::SuccessWithComplications,
        Outcome::PartialSuccess,
        Outcome::PartialSuccessWithConsequences,
        Outcome::FailureWithIntel,
        Outcome::FailureWithExposure,
        Outcome::CompleteFailure,
        Outcome::CatastrophicFailure,
        Outcome::TragicSuccess,
        Outcome::PyrrhicVictory,
        Outcome::BeneficialFailure,
        Outcome::SabotagedMission,
        Outcome::BetrayalRevealed,
        Outcome::UnintendedConsequences,
    ];

    /// Whether this tag sits in the success band of the base partition.
    pub fn is_base_success(self) -> bool {
        matches!(
            self,
            Outcome::PerfectSuccess | Outcome::SuccessWithComplications | Outcome::PartialSuccess
        )
    }

    /// Whether this tag sits in the failure band of the base partition.
    pub fn is_base_failure(self) -> bool {
        matches!(
            self,
            Outcome::FailureWithIntel | Outcome::CompleteFailure | Outcome::CatastrophicFailure
        )
    }

    /// One-line summary used as the opening of the mission narrative.
    pub fn headline(self) -> &'static str {
        match self {
            Outcome::PerfectSuccess => "The operation went off without a hitch.",
            Outcome::SuccessWithComplications => {
                "The objective was met, but complications followed the team home."
            }
            Outcome::PartialSuccess => "The team achieved part of what it set out to do.",
            Outcome::PartialSuccessWithConsequences => {
                "A partial win, paid for in ways that will linger."
            }
            Outcome::FailureWithIntel => {
                "The mission failed, but the team came back knowing more than it left with."
            }
            Outcome::FailureWithExposure => {
                "The mission failed, and the network's cover failed with it."
            }
            Outcome::CompleteFailure => "The operation collapsed with nothing to show for it.",
            Outcome::CatastrophicFailure => {
                "The operation ended in disaster; the cost will be counted for a long time."
            }
            Outcome::TragicSuccess => "The objective was taken, and it broke the people who took it.",
            Outcome::PyrrhicVictory => "A victory, on paper.",
            Outcome::BeneficialFailure => {
                "The mission failed, yet the failure opened a door nobody expected."
            }
            Outcome::SabotagedMission => "Someone inside made sure this mission never had a chance.",
            Outcome::BetrayalRevealed => "A betrayer showed their hand mid-operation.",
            Outcome::UnintendedConsequences => {
                "The mission resolved, and set something else in motion entirely."
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Consequences
// ---------------------------------------------------------------------------

/// Classification tag on a consequence record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ConsequenceKind {
    MoraleSurge,
    Complication,
    PartialGain,
    CompromisedGain,
    InterceptedIntel,
    NetworkExposure,
    MissionLoss,
    GovernmentCrackdown,
    TraumaticVictory,
    CostlyVictory,
    SilverLining,
    InternalSabotage,
    BetrayalFallout,
    UnforeseenRipple,
    TeamBonding,
    TeamFriction,
}

/// Faction- and network-level aggregates that immediate and delayed effects
/// mutate. All aggregate values range over [0.0, 1.0].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AggregateMetric {
    FactionMorale,
    FactionReputation,
    NetworkHeat,
    IntelReserve,
}

/// A bundle of state deltas and narrative text produced by resolving an
/// outcome. Generators build these; only the state applier mutates stores.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Consequence {
    pub kind: ConsequenceKind,
    pub description: String,
    /// Aggregate deltas applied this turn.
    #[serde(default)]
    pub immediate_effects: BTreeMap<AggregateMetric, f64>,
    /// Aggregate deltas applied `recovery_time` turns later.
    #[serde(default)]
    pub delayed_effects: BTreeMap<AggregateMetric, f64>,
    /// Turn offset for the delayed effects. Meaningful only when
    /// `delayed_effects` is non-empty; floored at one turn on application.
    pub recovery_time: u64,
    /// Per-agent emotional deltas, keyed by agent id then axis.
    #[serde(default)]
    pub emotional_impacts: BTreeMap<String, BTreeMap<EmotionKind, f64>>,
    /// Per-pair relationship deltas as (agent, agent, delta) triples.
    #[serde(default)]
    pub relationship_impacts: Vec<(String, String, RelationshipDelta)>,
    /// Lines appended verbatim to the campaign narrative log.
    #[serde(default)]
    pub narrative_hooks: Vec<String>,
    /// How likely this consequence is to escalate into follow-on trouble,
    /// in [0.0, 1.0].
    pub escalation_potential: f64,
}

impl Consequence {
    pub fn new(kind: ConsequenceKind, description: impl Into<String>) -> Self {
        Self {
            kind,
            description: description.into(),
            immediate_effects: BTreeMap::new(),
            delayed_effects: BTreeMap::new(),
            recovery_time: 0,
            emotional_impacts: BTreeMap::new(),
            relationship_impacts: Vec::new(),
            narrative_hooks: Vec::new(),
            escalation_potential: 0.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Collaborator-facing records
// ---------------------------------------------------------------------------

/// A known plot by one operative against another. Read-only input to
/// betrayal-risk scoring; owned by the betrayal subsystem.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BetrayalPlan {
    pub plotter_id: String,
    pub target_id: String,
    pub active: bool,
    pub hatched_turn: u64,
}

/// A delayed aggregate effect queued for replay by the turn scheduler.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScheduledEffect {
    pub due_turn: u64,
    pub metric: AggregateMetric,
    pub amount: f64,
    pub source: ConsequenceKind,
}

/// One line of the append-only campaign narrative log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NarrativeEntry {
    pub turn: u64,
    pub text: String,
}

/// Mission-history entry recording a resolution's terminal classification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MissionRecord {
    pub mission_id: String,
    pub turn: u64,
    pub outcome: Outcome,
}

// ---------------------------------------------------------------------------
// Mission report
// ---------------------------------------------------------------------------

/// Everything a single mission resolution produced, returned to the caller
/// after state application.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MissionReport {
    pub outcome: Outcome,
    pub original_success_probability: f64,
    pub collaboration_modified_success: f64,
    pub collaboration_analysis: CollaborationProfile,
    pub consequences: Vec<Consequence>,
    /// Emotional deltas actually applied, summed per agent per axis.
    pub emotional_impacts: BTreeMap<String, BTreeMap<EmotionKind, f64>>,
    /// Relationship deltas actually applied, as (agent, agent, delta) triples.
    pub relationship_changes: Vec<(String, String, RelationshipDelta)>,
    pub narrative: String,
}
