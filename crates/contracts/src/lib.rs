//! Cross-boundary contracts for the insurgency campaign kernel: engine
//! configuration, mission and participant inputs, relationship records, and
//! the mission-resolution output types.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

pub mod mission;
pub mod serde_u64_string;

pub use mission::{
    AggregateMetric, BetrayalPlan, CollaborationProfile, Consequence, ConsequenceKind,
    EmotionalContagion, MissionRecord, MissionReport, NarrativeEntry, Outcome, ScheduledEffect,
};

pub const SCHEMA_VERSION_V1: &str = "1.0";

// ---------------------------------------------------------------------------
// Skills
// ---------------------------------------------------------------------------

/// Skill categories an operative can be rated in. Levels are normalized to
/// [0.0, 1.0].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SkillKind {
    Combat,
    Stealth,
    Social,
    Leadership,
    Tech,
    Medical,
}

impl SkillKind {
    pub const ALL: [SkillKind; 6] = [
        SkillKind::Combat,
        SkillKind::Stealth,
        SkillKind::Social,
        SkillKind::Leadership,
        SkillKind::Tech,
        SkillKind::Medical,
    ];
}

// ---------------------------------------------------------------------------
// Emotional state
// ---------------------------------------------------------------------------

/// Axes of an operative's emotional state. The six bipolar axes range over
/// [-1.0, 1.0]; trauma is unipolar in [0.0, 1.0] and accumulates separately.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EmotionKind {
    Fear,
    Anger,
    Sadness,
    Joy,
    Trust,
    Anticipation,
    Trauma,
}

impl EmotionKind {
    pub const BIPOLAR: [EmotionKind; 6] = [
        EmotionKind::Fear,
        EmotionKind::Anger,
        EmotionKind::Sadness,
        EmotionKind::Joy,
        EmotionKind::Trust,
        EmotionKind::Anticipation,
    ];

    pub fn is_bipolar(self) -> bool {
        !matches!(self, EmotionKind::Trauma)
    }
}

/// Per-agent emotional state vector.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct EmotionalState {
    pub fear: f64,
    pub anger: f64,
    pub sadness: f64,
    pub joy: f64,
    pub trust: f64,
    pub anticipation: f64,
    pub trauma: f64,
}

impl EmotionalState {
    pub fn get(&self, kind: EmotionKind) -> f64 {
        match kind {
            EmotionKind::Fear => self.fear,
            EmotionKind::Anger => self.anger,
            EmotionKind::Sadness => self.sadness,
            EmotionKind::Joy => self.joy,
            EmotionKind::Trust => self.trust,
            EmotionKind::Anticipation => self.anticipation,
            EmotionKind::Trauma => self.trauma,
        }
    }

    /// Apply a delta to one axis, clamping to the axis range. Bipolar axes
    /// clamp to [-1, 1]; trauma clamps to [0, 1].
    pub fn apply(&mut self, kind: EmotionKind, delta: f64) {
        let slot = match kind {
            EmotionKind::Fear => &mut self.fear,
            EmotionKind::Anger => &mut self.anger,
            EmotionKind::Sadness => &mut self.sadness,
            EmotionKind::Joy => &mut self.joy,
            EmotionKind::Trust => &mut self.trust,
            EmotionKind::Anticipation => &mut self.anticipation,
            EmotionKind::Trauma => {
                self.trauma = (self.trauma + delta).clamp(0.0, 1.0);
                return;
            }
        };
        *slot = (*slot + delta).clamp(-1.0, 1.0);
    }

    /// The strongest positive bipolar axis and its intensity. Negative axis
    /// values never dominate; a fully neutral state reports zero intensity.
    pub fn dominant(&self) -> (EmotionKind, f64) {
        let mut best = (EmotionKind::Anticipation, 0.0_f64);
        for kind in EmotionKind::BIPOLAR {
            let intensity = self.get(kind).max(0.0);
            if intensity > best.1 {
                best = (kind, intensity);
            }
        }
        best
    }
}

// ---------------------------------------------------------------------------
// Missions and participants
// ---------------------------------------------------------------------------

/// Mission categories. Assassination, sabotage, and rescue form the
/// high-risk tier; recruitment, propaganda, and intelligence the social tier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MissionCategory {
    Assassination,
    Sabotage,
    Rescue,
    Recruitment,
    Propaganda,
    Intelligence,
}

impl MissionCategory {
    pub fn is_high_risk(self) -> bool {
        matches!(
            self,
            MissionCategory::Assassination | MissionCategory::Sabotage | MissionCategory::Rescue
        )
    }

    /// The skill that carries the most weight for this category.
    pub fn primary_skill(self) -> SkillKind {
        if self.is_high_risk() {
            SkillKind::Combat
        } else {
            SkillKind::Social
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MissionDifficulty {
    Easy,
    Medium,
    Hard,
    Extreme,
}

impl MissionDifficulty {
    /// Difficulty-derived starting probability before skill and emotional
    /// adjustments.
    pub fn base_success(self) -> f64 {
        match self {
            MissionDifficulty::Easy => 0.75,
            MissionDifficulty::Medium => 0.60,
            MissionDifficulty::Hard => 0.45,
            MissionDifficulty::Extreme => 0.30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Mission {
    pub mission_id: String,
    pub category: MissionCategory,
    pub difficulty: MissionDifficulty,
}

/// Input snapshot of one participating operative. Built once at the engine
/// boundary; the engine never accepts ad-hoc maps internally.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Participant {
    pub agent_id: String,
    pub name: String,
    #[serde(default)]
    pub skills: BTreeMap<SkillKind, f64>,
    #[serde(default)]
    pub emotions: EmotionalState,
    /// Stress in [0.0, 1.0].
    pub stress: f64,
    /// Loyalty to the faction in [0.0, 100.0].
    pub loyalty: f64,
}

impl Participant {
    pub fn skill(&self, kind: SkillKind) -> f64 {
        self.skills.get(&kind).copied().unwrap_or(0.0)
    }
}

// ---------------------------------------------------------------------------
// Relationships
// ---------------------------------------------------------------------------

/// Bond classification between two operatives, derived from affinity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BondKind {
    Stranger,
    Comrade,
    Confidant,
    Rival,
}

impl BondKind {
    pub fn from_affinity(affinity: f64) -> Self {
        if affinity >= 60.0 {
            BondKind::Confidant
        } else if affinity >= 15.0 {
            BondKind::Comrade
        } else if affinity <= -30.0 {
            BondKind::Rival
        } else {
            BondKind::Stranger
        }
    }
}

/// Symmetric pairwise relationship record. Affinity ranges over
/// [-100.0, 100.0]; trust and loyalty over [0.0, 1.0].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Relationship {
    pub affinity: f64,
    pub trust: f64,
    pub loyalty: f64,
    pub bond: BondKind,
    pub decay_rate: f64,
}

impl Default for Relationship {
    fn default() -> Self {
        Self {
            affinity: 0.0,
            trust: 0.0,
            loyalty: 0.0,
            bond: BondKind::Stranger,
            decay_rate: 0.01,
        }
    }
}

/// A bundle of deltas to apply to the symmetric fields of one relationship.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct RelationshipDelta {
    pub affinity: f64,
    pub trust: f64,
    pub loyalty: f64,
}

impl fmt::Display for RelationshipDelta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "affinity{:+.1} trust{:+.2} loyalty{:+.2}",
            self.affinity, self.trust, self.loyalty
        )
    }
}

// ---------------------------------------------------------------------------
// Engine configuration
// ---------------------------------------------------------------------------

/// Tunables for mission resolution. Every weight and threshold the engine
/// consults lives here so scenario configs can rebalance without code edits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngineConfig {
    pub schema_version: String,
    #[serde(with = "serde_u64_string")]
    pub seed: u64,

    // Success estimation.
    pub skill_fit_weight: f64,
    pub fear_penalty_weight: f64,
    pub anger_bonus_weight: f64,
    pub rapport_bonus_weight: f64,
    pub sadness_penalty_weight: f64,
    pub trauma_penalty_weight: f64,
    pub min_success_probability: f64,
    pub max_success_probability: f64,

    // Collaboration fold.
    pub trust_synergy_weight: f64,
    pub complementarity_weight: f64,
    pub leadership_weight: f64,
    pub cohesion_weight: f64,
    pub communication_penalty_weight: f64,
    pub contagion_weight: f64,
    pub contagion_threshold: f64,

    // Outcome banding.
    pub intel_band_width: f64,
    pub complete_failure_share: f64,

    // Override predicates, in evaluation order.
    pub betrayal_risk_threshold: f64,
    pub betrayal_roll_scale: f64,
    pub sabotage_cohesion_threshold: f64,
    pub sabotage_roll_chance: f64,
    pub tragic_trauma_threshold: f64,
    pub tragic_stress_threshold: f64,
    pub pyrrhic_trust_threshold: f64,
    pub pyrrhic_chance: f64,
    pub beneficial_chance: f64,
    pub exposure_chance: f64,
    pub unintended_chance: f64,
    pub aggregate_cost_threshold: f64,

    // Cohesion side-consequences.
    pub bonding_cohesion_threshold: f64,
    pub friction_cohesion_threshold: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION_V1.to_string(),
            seed: 1337,
            skill_fit_weight: 0.25,
            fear_penalty_weight: 0.20,
            anger_bonus_weight: 0.10,
            rapport_bonus_weight: 0.15,
            sadness_penalty_weight: 0.10,
            trauma_penalty_weight: 0.15,
            min_success_probability: 0.05,
            max_success_probability: 0.95,
            trust_synergy_weight: 0.10,
            complementarity_weight: 0.08,
            leadership_weight: 0.06,
            cohesion_weight: 0.10,
            communication_penalty_weight: 0.12,
            contagion_weight: 0.08,
            contagion_threshold: 0.50,
            intel_band_width: 0.15,
            complete_failure_share: 0.65,
            betrayal_risk_threshold: 0.70,
            betrayal_roll_scale: 0.60,
            sabotage_cohesion_threshold: 0.25,
            sabotage_roll_chance: 0.30,
            tragic_trauma_threshold: 0.60,
            tragic_stress_threshold: 0.70,
            pyrrhic_trust_threshold: 0.30,
            pyrrhic_chance: 0.25,
            beneficial_chance: 0.12,
            exposure_chance: 0.35,
            unintended_chance: 0.15,
            aggregate_cost_threshold: 0.50,
            bonding_cohesion_threshold: 0.80,
            friction_cohesion_threshold: 0.30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_configuration_completeness() {
        let cfg = EngineConfig::default();
        assert!(cfg.skill_fit_weight > 0.0);
        assert!(cfg.fear_penalty_weight > 0.0);
        assert!(cfg.anger_bonus_weight > 0.0);
        assert!(cfg.rapport_bonus_weight > 0.0);
        assert!(cfg.sadness_penalty_weight > 0.0);
        assert!(cfg.trauma_penalty_weight > 0.0);
        assert!(cfg.min_success_probability > 0.0);
        assert!(cfg.max_success_probability < 1.0);
        assert!(cfg.min_success_probability < cfg.max_success_probability);
        assert!(cfg.trust_synergy_weight > 0.0);
        assert!(cfg.complementarity_weight > 0.0);
        assert!(cfg.leadership_weight > 0.0);
        assert!(cfg.cohesion_weight > 0.0);
        assert!(cfg.communication_penalty_weight > 0.0);
        assert!(cfg.contagion_weight > 0.0);
        assert!(cfg.intel_band_width > 0.0);
        assert!(cfg.complete_failure_share > 0.0 && cfg.complete_failure_share < 1.0);
        assert!(cfg.betrayal_risk_threshold > 0.0);
        assert!(cfg.betrayal_roll_scale > 0.0);
        assert!(cfg.sabotage_cohesion_threshold > 0.0);
        assert!(cfg.sabotage_roll_chance > 0.0);
        assert!(cfg.tragic_trauma_threshold > 0.0);
        assert!(cfg.tragic_stress_threshold > 0.0);
        assert!(cfg.pyrrhic_trust_threshold > 0.0);
        assert!(cfg.pyrrhic_chance > 0.0);
        assert!(cfg.beneficial_chance > 0.0);
        assert!(cfg.exposure_chance > 0.0);
        assert!(cfg.unintended_chance > 0.0);
        assert!(cfg.aggregate_cost_threshold > 0.0);
        assert!(cfg.bonding_cohesion_threshold > cfg.friction_cohesion_threshold);
    }

    #[test]
    fn config_round_trip() {
        let mut cfg = EngineConfig::default();
        cfg.seed = 9001;
        cfg.cohesion_weight = 0.17;
        let encoded = serde_json::to_string(&cfg).expect("serialize");
        let decoded: EngineConfig = serde_json::from_str(&encoded).expect("deserialize");
        assert_eq!(cfg, decoded);
    }

    #[test]
    fn emotional_state_clamps_per_axis() {
        let mut state = EmotionalState::default();
        state.apply(EmotionKind::Fear, 3.0);
        assert_eq!(state.fear, 1.0);
        state.apply(EmotionKind::Joy, -3.0);
        assert_eq!(state.joy, -1.0);
        state.apply(EmotionKind::Trauma, -0.5);
        assert_eq!(state.trauma, 0.0);
        state.apply(EmotionKind::Trauma, 1.5);
        assert_eq!(state.trauma, 1.0);
    }

    #[test]
    fn dominant_emotion_ignores_negative_axes() {
        let state = EmotionalState {
            fear: -0.9,
            joy: 0.4,
            ..EmotionalState::default()
        };
        let (kind, intensity) = state.dominant();
        assert_eq!(kind, EmotionKind::Joy);
        assert!((intensity - 0.4).abs() < f64::EPSILON);
    }

    #[test]
    fn bond_kind_tracks_affinity_bands() {
        assert_eq!(BondKind::from_affinity(75.0), BondKind::Confidant);
        assert_eq!(BondKind::from_affinity(20.0), BondKind::Comrade);
        assert_eq!(BondKind::from_affinity(0.0), BondKind::Stranger);
        assert_eq!(BondKind::from_affinity(-50.0), BondKind::Rival);
    }

    #[test]
    fn high_risk_categories_weight_combat() {
        assert_eq!(
            MissionCategory::Assassination.primary_skill(),
            SkillKind::Combat
        );
        assert_eq!(
            MissionCategory::Recruitment.primary_skill(),
            SkillKind::Social
        );
    }

    #[test]
    fn harder_difficulty_lowers_base_success() {
        assert!(MissionDifficulty::Easy.base_success() > MissionDifficulty::Medium.base_success());
        assert!(MissionDifficulty::Medium.base_success() > MissionDifficulty::Hard.base_success());
        assert!(MissionDifficulty::Hard.base_success() > MissionDifficulty::Extreme.base_success());
    }
}
