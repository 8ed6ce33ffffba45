//! Success probability estimator: difficulty base, per-agent skill fit,
//! per-agent emotional modifiers, then the collaboration fold for teams.

use contracts::{CollaborationProfile, EmotionKind, EngineConfig, Mission, Participant};

/// Both probabilities a resolution reports: before and after the
/// collaboration fold. For solo rosters the two are identical.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SuccessEstimate {
    pub original: f64,
    pub collaboration_modified: f64,
}

pub fn estimate(
    mission: &Mission,
    roster: &[Participant],
    profile: &CollaborationProfile,
    config: &EngineConfig,
) -> SuccessEstimate {
    let count = roster.len().max(1) as f64;
    let base = mission.difficulty.base_success();

    let primary = mission.category.primary_skill();
    let skill_fit = roster
        .iter()
        .map(|p| p.skill(primary) * config.skill_fit_weight)
        .sum::<f64>()
        / count;

    let emotional = roster
        .iter()
        .map(|p| emotional_modifier(p, mission, config))
        .sum::<f64>()
        / count;

    let raw = base + skill_fit + emotional;
    let original = clamp_probability(raw, config);

    let collaboration_modified = if roster.len() < 2 {
        original
    } else {
        clamp_probability(raw + collaboration_fold(profile, config), config)
    };

    SuccessEstimate {
        original,
        collaboration_modified,
    }
}

/// One agent's emotional contribution. High-risk categories punish fear and
/// reward aggression; social categories reward trust and joy and punish
/// sadness; trauma always drags.
fn emotional_modifier(participant: &Participant, mission: &Mission, config: &EngineConfig) -> f64 {
    let emotions = &participant.emotions;
    let mut modifier = -config.trauma_penalty_weight * emotions.trauma;
    if mission.category.is_high_risk() {
        modifier -= config.fear_penalty_weight * emotions.fear.max(0.0);
        modifier += config.anger_bonus_weight * emotions.anger.max(0.0);
    } else {
        modifier += config.rapport_bonus_weight
            * (emotions.trust.max(0.0) + emotions.joy.max(0.0))
            / 2.0;
        modifier -= config.sadness_penalty_weight * emotions.sadness.max(0.0);
    }
    modifier
}

/// Collaboration adjustment for teams: synergy, complementarity, leadership,
/// and cohesion bonuses; a penalty proportional to communication
/// inefficiency; and a contagion term keyed to the dominant shared emotion.
fn collaboration_fold(profile: &CollaborationProfile, config: &EngineConfig) -> f64 {
    let mut fold = config.trust_synergy_weight * profile.trust_synergy
        + config.complementarity_weight * profile.skill_complementarity
        + config.leadership_weight * profile.leadership_effectiveness
        + config.cohesion_weight * profile.group_cohesion
        - config.communication_penalty_weight * (1.0 - profile.communication_efficiency);

    let contagion = &profile.emotional_contagion;
    if contagion.dominant_intensity > config.contagion_threshold {
        match contagion.dominant {
            EmotionKind::Fear => fold -= config.contagion_weight * contagion.dominant_intensity,
            EmotionKind::Anger | EmotionKind::Joy => {
                fold += config.contagion_weight * contagion.dominant_intensity
            }
            _ => {}
        }
    }
    fold
}

fn clamp_probability(value: f64, config: &EngineConfig) -> f64 {
    value.clamp(config.min_success_probability, config.max_success_probability)
}
