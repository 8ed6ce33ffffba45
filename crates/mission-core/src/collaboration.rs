//! Collaboration analyzer: derives an ephemeral profile of how well a
//! mission roster works together from the relationship ledger and the
//! participants' emotional states.

use std::collections::BTreeMap;

use contracts::{
    CollaborationProfile, EmotionKind, EmotionalContagion, Participant, SkillKind,
};

use crate::ledger::RelationshipLedger;

/// Weights for folding the component scores into group cohesion.
const COHESION_TRUST_WEIGHT: f64 = 0.4;
const COHESION_COMMUNICATION_WEIGHT: f64 = 0.3;
const COHESION_LEADERSHIP_WEIGHT: f64 = 0.3;

/// Team size above which communication efficiency starts to degrade.
const COMMUNICATION_COMFORT_SIZE: f64 = 3.0;

/// Build the collaboration profile for a roster. Solo rosters get a neutral
/// profile whose cohesion carries zero impact; the success estimator applies
/// no collaboration fold for them.
pub fn analyze(roster: &[Participant], ledger: &RelationshipLedger) -> CollaborationProfile {
    let contagion = emotional_contagion(roster);
    if roster.len() < 2 {
        return CollaborationProfile {
            emotional_contagion: contagion,
            ..CollaborationProfile::default()
        };
    }

    let trust_synergy = trust_synergy(roster, ledger);
    let skill_complementarity = skill_complementarity(roster);
    let communication_efficiency = (0.8 + 0.2 * trust_synergy
        - 0.1 * (roster.len() as f64 - COMMUNICATION_COMFORT_SIZE).max(0.0))
    .max(0.0);
    let leadership_effectiveness = roster
        .iter()
        .map(|p| p.skill(SkillKind::Leadership))
        .fold(0.0_f64, f64::max);
    let group_cohesion = COHESION_TRUST_WEIGHT * trust_synergy
        + COHESION_COMMUNICATION_WEIGHT * communication_efficiency
        + COHESION_LEADERSHIP_WEIGHT * leadership_effectiveness;

    CollaborationProfile {
        trust_synergy,
        skill_complementarity,
        communication_efficiency,
        leadership_effectiveness,
        emotional_contagion: contagion,
        group_cohesion,
    }
}

/// Mean ledger trust over all unordered pairs. Pairs without a record count
/// as zero trust rather than being excluded.
fn trust_synergy(roster: &[Participant], ledger: &RelationshipLedger) -> f64 {
    let mut total = 0.0;
    let mut pairs = 0_u32;
    for (index, left) in roster.iter().enumerate() {
        for right in &roster[index + 1..] {
            total += ledger.trust_between(&left.agent_id, &right.agent_id);
            pairs += 1;
        }
    }
    if pairs == 0 {
        0.0
    } else {
        total / f64::from(pairs)
    }
}

/// Share of all known skill categories represented somewhere on the roster.
fn skill_complementarity(roster: &[Participant]) -> f64 {
    let represented = SkillKind::ALL
        .iter()
        .filter(|kind| roster.iter().any(|p| p.skill(**kind) > 0.0))
        .count();
    represented as f64 / SkillKind::ALL.len() as f64
}

/// Per-axis emotional means across the roster plus the dominant positive
/// axis and its intensity.
fn emotional_contagion(roster: &[Participant]) -> EmotionalContagion {
    let count = roster.len().max(1) as f64;
    let mut averages = BTreeMap::new();
    for kind in [
        EmotionKind::Fear,
        EmotionKind::Anger,
        EmotionKind::Sadness,
        EmotionKind::Joy,
        EmotionKind::Trust,
        EmotionKind::Anticipation,
        EmotionKind::Trauma,
    ] {
        let mean = roster.iter().map(|p| p.emotions.get(kind)).sum::<f64>() / count;
        averages.insert(kind, mean);
    }

    let mut dominant = EmotionKind::Anticipation;
    let mut dominant_intensity = 0.0_f64;
    for kind in EmotionKind::BIPOLAR {
        let intensity = averages.get(&kind).copied().unwrap_or(0.0).max(0.0);
        if intensity > dominant_intensity {
            dominant = kind;
            dominant_intensity = intensity;
        }
    }

    EmotionalContagion {
        averages,
        dominant,
        dominant_intensity,
    }
}
