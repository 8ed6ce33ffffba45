//! Outcome resolver: one uniform draw against the probability-tier bands
//! selects a base outcome, then override predicates are evaluated in fixed
//! priority order and may reclassify it. At most one override applies.

use contracts::{BetrayalPlan, CollaborationProfile, EmotionKind, EngineConfig, Outcome, Participant};

use crate::rng::EngineRng;

// Betrayal-risk scoring weights.
const RISK_DISLOYALTY_WEIGHT: f64 = 0.45;
const RISK_STRESS_WEIGHT: f64 = 0.25;
const RISK_ANGER_WEIGHT: f64 = 0.20;
const RISK_FEAR_WEIGHT: f64 = 0.10;
const RISK_ACTIVE_PLAN_BONUS: f64 = 0.25;

// Relative positions of the success-band boundaries.
const PERFECT_BAND_END: f64 = 0.3;
const COMPLICATIONS_BAND_END: f64 = 0.7;

/// What the resolver decided: the band the draw landed in, the final
/// classification after overrides, and the identified betrayer when the
/// final outcome is a revealed betrayal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOutcome {
    pub base: Outcome,
    pub outcome: Outcome,
    pub betrayer: Option<String>,
}

pub fn resolve(
    roster: &[Participant],
    profile: &CollaborationProfile,
    success_probability: f64,
    plans: &[BetrayalPlan],
    rng: &mut EngineRng,
    config: &EngineConfig,
) -> ResolvedOutcome {
    let draw = rng.next_f64();
    let base = base_outcome(draw, success_probability, config);

    // 1. Betrayal: the least-loyal participant's risk score gates a
    // secondary roll. The betrayer is always that participant.
    if let Some(suspect) = least_loyal(roster) {
        let risk = betrayal_risk(suspect, plans);
        if risk > config.betrayal_risk_threshold && rng.chance(risk * config.betrayal_roll_scale) {
            return ResolvedOutcome {
                base,
                outcome: Outcome::BetrayalRevealed,
                betrayer: Some(suspect.agent_id.clone()),
            };
        }
    }

    // 2. Cohesion collapse.
    if roster.len() >= 2
        && profile.group_cohesion < config.sabotage_cohesion_threshold
        && rng.chance(config.sabotage_roll_chance)
    {
        return reclassified(base, Outcome::SabotagedMission);
    }

    // 3. Tragic success: a success-band draw with most of the roster worn
    // down reclassifies deterministically.
    if base.is_base_success() {
        let strained = roster
            .iter()
            .filter(|p| {
                p.emotions.trauma >= config.tragic_trauma_threshold
                    || p.stress >= config.tragic_stress_threshold
            })
            .count();
        if strained * 2 > roster.len() {
            return reclassified(base, Outcome::TragicSuccess);
        }
    }

    // 4. Pyrrhic victory: a flawless result the team didn't trust its way to.
    if base == Outcome::PerfectSuccess
        && profile.trust_synergy < config.pyrrhic_trust_threshold
        && rng.chance(config.pyrrhic_chance)
    {
        return reclassified(base, Outcome::PyrrhicVictory);
    }

    // 5. Failure luck.
    if base.is_base_failure() && rng.chance(config.beneficial_chance) {
        return reclassified(base, Outcome::BeneficialFailure);
    }

    // 6. A collapse with fear running through the team tends to blow cover.
    let contagion = &profile.emotional_contagion;
    if base == Outcome::CompleteFailure
        && contagion.dominant == EmotionKind::Fear
        && contagion.dominant_intensity > config.contagion_threshold
        && rng.chance(config.exposure_chance)
    {
        return reclassified(base, Outcome::FailureWithExposure);
    }

    // 7. Partial results occasionally ripple somewhere unplanned.
    if base == Outcome::PartialSuccess && rng.chance(config.unintended_chance) {
        return reclassified(base, Outcome::UnintendedConsequences);
    }

    // 8. Partial results bought with heavy wear come with strings attached.
    if base == Outcome::PartialSuccess && aggregate_emotional_cost(roster) >= config.aggregate_cost_threshold
    {
        return reclassified(base, Outcome::PartialSuccessWithConsequences);
    }

    ResolvedOutcome {
        base,
        outcome: base,
        betrayer: None,
    }
}

fn reclassified(base: Outcome, outcome: Outcome) -> ResolvedOutcome {
    ResolvedOutcome {
        base,
        outcome,
        betrayer: None,
    }
}

/// Map one uniform draw onto the base outcome bands. The success mass splits
/// 30/40/30 into perfect / complications / partial; the failure mass into a
/// narrow intel band, then complete failure, then the catastrophic tail.
pub(crate) fn base_outcome(draw: f64, success: f64, config: &EngineConfig) -> Outcome {
    if draw < success {
        let position = draw / success;
        if position < PERFECT_BAND_END {
            Outcome::PerfectSuccess
        } else if position < COMPLICATIONS_BAND_END {
            Outcome::SuccessWithComplications
        } else {
            Outcome::PartialSuccess
        }
    } else {
        let intel_end = (success + config.intel_band_width).min(1.0);
        if draw < intel_end {
            Outcome::FailureWithIntel
        } else {
            let tail = 1.0 - intel_end;
            let complete_end = intel_end + tail * config.complete_failure_share;
            if draw < complete_end {
                Outcome::CompleteFailure
            } else {
                Outcome::CatastrophicFailure
            }
        }
    }
}

/// The participant most likely to turn: lowest loyalty, ties broken by id.
pub(crate) fn least_loyal(roster: &[Participant]) -> Option<&Participant> {
    roster.iter().min_by(|a, b| {
        a.loyalty
            .partial_cmp(&b.loyalty)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.agent_id.cmp(&b.agent_id))
    })
}

/// Risk that this participant undermines the mission, in [0, 1].
pub(crate) fn betrayal_risk(participant: &Participant, plans: &[BetrayalPlan]) -> f64 {
    let disloyalty = 1.0 - (participant.loyalty / 100.0).clamp(0.0, 1.0);
    let mut risk = RISK_DISLOYALTY_WEIGHT * disloyalty
        + RISK_STRESS_WEIGHT * participant.stress.clamp(0.0, 1.0)
        + RISK_ANGER_WEIGHT * participant.emotions.anger.max(0.0)
        + RISK_FEAR_WEIGHT * participant.emotions.fear.max(0.0);
    if plans
        .iter()
        .any(|plan| plan.active && plan.plotter_id == participant.agent_id)
    {
        risk += RISK_ACTIVE_PLAN_BONUS;
    }
    risk.clamp(0.0, 1.0)
}

/// Mean of each participant's (trauma + stress) / 2.
fn aggregate_emotional_cost(roster: &[Participant]) -> f64 {
    let count = roster.len().max(1) as f64;
    roster
        .iter()
        .map(|p| (p.emotions.trauma.clamp(0.0, 1.0) + p.stress.clamp(0.0, 1.0)) / 2.0)
        .sum::<f64>()
        / count
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::EmotionalState;
    use std::collections::BTreeMap;

    fn operative(id: &str, loyalty: f64, stress: f64) -> Participant {
        Participant {
            agent_id: id.to_string(),
            name: id.to_string(),
            skills: BTreeMap::new(),
            emotions: EmotionalState::default(),
            stress,
            loyalty,
        }
    }

    fn calm_profile(cohesion: f64, trust_synergy: f64) -> CollaborationProfile {
        CollaborationProfile {
            trust_synergy,
            group_cohesion: cohesion,
            communication_efficiency: 0.9,
            ..CollaborationProfile::default()
        }
    }

    #[test]
    fn draw_bands_partition_the_probability_mass() {
        let config = EngineConfig::default();
        let success = 0.5;
        assert_eq!(base_outcome(0.0, success, &config), Outcome::PerfectSuccess);
        assert_eq!(base_outcome(0.14, success, &config), Outcome::PerfectSuccess);
        assert_eq!(
            base_outcome(0.16, success, &config),
            Outcome::SuccessWithComplications
        );
        assert_eq!(base_outcome(0.36, success, &config), Outcome::PartialSuccess);
        assert_eq!(base_outcome(0.55, success, &config), Outcome::FailureWithIntel);
        assert_eq!(base_outcome(0.70, success, &config), Outcome::CompleteFailure);
        assert_eq!(
            base_outcome(0.995, success, &config),
            Outcome::CatastrophicFailure
        );
    }

    #[test]
    fn betrayal_risk_rises_with_disloyalty_stress_and_plans() {
        let loyalist = operative("agent:loyal", 95.0, 0.1);
        let malcontent = operative("agent:bitter", 5.0, 0.9);
        assert!(betrayal_risk(&malcontent, &[]) > betrayal_risk(&loyalist, &[]));

        let plan = BetrayalPlan {
            plotter_id: "agent:bitter".to_string(),
            target_id: "agent:loyal".to_string(),
            active: true,
            hatched_turn: 0,
        };
        assert!(
            betrayal_risk(&malcontent, &[plan.clone()]) > betrayal_risk(&malcontent, &[]),
        );
        let inactive = BetrayalPlan {
            active: false,
            ..plan
        };
        assert_eq!(
            betrayal_risk(&malcontent, &[inactive]),
            betrayal_risk(&malcontent, &[])
        );
    }

    #[test]
    fn least_loyal_breaks_ties_by_id() {
        let roster = vec![
            operative("agent:b", 10.0, 0.0),
            operative("agent:a", 10.0, 0.0),
            operative("agent:c", 80.0, 0.0),
        ];
        assert_eq!(least_loyal(&roster).map(|p| p.agent_id.as_str()), Some("agent:a"));
    }

    #[test]
    fn worn_down_roster_turns_success_tragic() {
        let config = EngineConfig::default();
        let mut veteran = operative("agent:a", 90.0, 0.9);
        veteran.emotions.trauma = 0.8;
        let mut medic = operative("agent:b", 85.0, 0.8);
        medic.emotions.trauma = 0.7;
        let fresh = operative("agent:c", 88.0, 0.1);
        let roster = vec![veteran, medic, fresh];
        let profile = calm_profile(0.6, 0.7);

        let mut saw_tragic = false;
        for seed in 0..100 {
            let mut rng = EngineRng::new(seed);
            let resolved = resolve(&roster, &profile, 0.95, &[], &mut rng, &config);
            assert!(!resolved.outcome.is_base_success(), "seed {seed} left a plain success");
            if resolved.outcome == Outcome::TragicSuccess {
                saw_tragic = true;
            }
        }
        assert!(saw_tragic);
    }

    #[test]
    fn betrayal_always_names_the_least_loyal_participant() {
        let config = EngineConfig::default();
        let mut turncoat = operative("agent:turncoat", 5.0, 0.9);
        turncoat.emotions.anger = 0.6;
        let roster = vec![
            operative("agent:steady", 90.0, 0.1),
            turncoat,
            operative("agent:true", 85.0, 0.2),
        ];
        let plans = vec![BetrayalPlan {
            plotter_id: "agent:turncoat".to_string(),
            target_id: "agent:true".to_string(),
            active: true,
            hatched_turn: 0,
        }];
        let profile = calm_profile(0.6, 0.7);

        let mut betrayals = 0;
        for seed in 0..100 {
            let mut rng = EngineRng::new(seed);
            let resolved = resolve(&roster, &profile, 0.6, &plans, &mut rng, &config);
            if resolved.outcome == Outcome::BetrayalRevealed {
                betrayals += 1;
                assert_eq!(resolved.betrayer.as_deref(), Some("agent:turncoat"));
            }
        }
        assert!(betrayals > 0);
    }

    #[test]
    fn loyal_calm_rosters_do_not_betray() {
        let config = EngineConfig::default();
        let roster = vec![
            operative("agent:a", 95.0, 0.1),
            operative("agent:b", 90.0, 0.2),
        ];
        let profile = calm_profile(0.6, 0.7);
        for seed in 0..100 {
            let mut rng = EngineRng::new(seed);
            let resolved = resolve(&roster, &profile, 0.6, &[], &mut rng, &config);
            assert_ne!(resolved.outcome, Outcome::BetrayalRevealed);
        }
    }

    #[test]
    fn low_trust_perfect_successes_can_turn_pyrrhic() {
        let config = EngineConfig::default();
        let roster = vec![
            operative("agent:a", 90.0, 0.1),
            operative("agent:b", 85.0, 0.1),
        ];
        let profile = calm_profile(0.6, 0.1);
        let mut saw_pyrrhic = false;
        for seed in 0..300 {
            let mut rng = EngineRng::new(seed);
            let resolved = resolve(&roster, &profile, 0.95, &[], &mut rng, &config);
            if resolved.outcome == Outcome::PyrrhicVictory {
                assert_eq!(resolved.base, Outcome::PerfectSuccess);
                saw_pyrrhic = true;
            }
        }
        assert!(saw_pyrrhic);
    }

    #[test]
    fn failures_occasionally_turn_beneficial() {
        let config = EngineConfig::default();
        let roster = vec![operative("agent:a", 90.0, 0.1)];
        let profile = CollaborationProfile::default();
        let mut saw_beneficial = false;
        for seed in 0..300 {
            let mut rng = EngineRng::new(seed);
            let resolved = resolve(&roster, &profile, 0.05, &[], &mut rng, &config);
            if resolved.outcome == Outcome::BeneficialFailure {
                assert!(resolved.base.is_base_failure());
                saw_beneficial = true;
            }
        }
        assert!(saw_beneficial);
    }
}
