//! Consequence generation: every outcome tag maps to exactly one builder
//! returning a non-empty list of consequence records. Builders are pure
//! functions of the mission, roster, and collaboration profile; only the
//! state applier mutates stores.

use std::collections::BTreeMap;

use contracts::{
    AggregateMetric, CollaborationProfile, Consequence, ConsequenceKind, EmotionKind,
    EngineConfig, Mission, Outcome, Participant, RelationshipDelta,
};

use crate::outcome::{least_loyal, ResolvedOutcome};

/// Build the full consequence list for a resolution: the outcome-specific
/// consequences, then a team-bonding or team-friction consequence whenever
/// group cohesion crosses its high or low threshold.
pub fn generate(
    resolved: &ResolvedOutcome,
    mission: &Mission,
    roster: &[Participant],
    profile: &CollaborationProfile,
    config: &EngineConfig,
) -> Vec<Consequence> {
    let mut consequences = match resolved.outcome {
        Outcome::PerfectSuccess => perfect_success(mission, roster),
        Outcome::SuccessWithComplications => success_with_complications(mission, roster),
        Outcome::PartialSuccess => partial_success(mission, roster),
        Outcome::PartialSuccessWithConsequences => partial_with_consequences(mission, roster),
        Outcome::FailureWithIntel => failure_with_intel(mission, roster),
        Outcome::FailureWithExposure => failure_with_exposure(mission, roster),
        Outcome::CompleteFailure => complete_failure(mission, roster),
        Outcome::CatastrophicFailure => catastrophic_failure(mission, roster),
        Outcome::TragicSuccess => tragic_success(mission, roster),
        Outcome::PyrrhicVictory => pyrrhic_victory(mission, roster),
        Outcome::BeneficialFailure => beneficial_failure(mission, roster),
        Outcome::SabotagedMission => sabotaged_mission(mission, roster),
        Outcome::BetrayalRevealed => betrayal_revealed(mission, roster, resolved.betrayer.as_deref()),
        Outcome::UnintendedConsequences => unintended_consequences(mission, roster),
    };

    if roster.len() >= 2 {
        if profile.group_cohesion > config.bonding_cohesion_threshold {
            consequences.push(team_bonding(roster, profile));
        } else if profile.group_cohesion < config.friction_cohesion_threshold {
            consequences.push(team_friction(roster, profile));
        }
    }

    consequences
}

// ---------------------------------------------------------------------------
// Shared builders
// ---------------------------------------------------------------------------

fn aggregate_effects(entries: &[(AggregateMetric, f64)]) -> BTreeMap<AggregateMetric, f64> {
    entries.iter().copied().collect()
}

/// The same emotional deltas for every roster member.
fn roster_emotions(
    roster: &[Participant],
    deltas: &[(EmotionKind, f64)],
) -> BTreeMap<String, BTreeMap<EmotionKind, f64>> {
    roster
        .iter()
        .map(|p| (p.agent_id.clone(), deltas.iter().copied().collect()))
        .collect()
}

/// The same relationship delta for every unordered roster pair.
fn roster_pairs(
    roster: &[Participant],
    delta: RelationshipDelta,
) -> Vec<(String, String, RelationshipDelta)> {
    let mut impacts = Vec::new();
    for (index, left) in roster.iter().enumerate() {
        for right in &roster[index + 1..] {
            impacts.push((left.agent_id.clone(), right.agent_id.clone(), delta));
        }
    }
    impacts
}

fn roster_names(roster: &[Participant]) -> String {
    roster
        .iter()
        .map(|p| p.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

// ---------------------------------------------------------------------------
// Outcome-specific builders
// ---------------------------------------------------------------------------

fn perfect_success(mission: &Mission, roster: &[Participant]) -> Vec<Consequence> {
    let mut c = Consequence::new(
        ConsequenceKind::MoraleSurge,
        format!("{} concluded cleanly and the cell knows it", mission.mission_id),
    );
    c.immediate_effects = aggregate_effects(&[
        (AggregateMetric::FactionMorale, 0.08),
        (AggregateMetric::FactionReputation, 0.05),
    ]);
    c.emotional_impacts = roster_emotions(
        roster,
        &[
            (EmotionKind::Joy, 0.15),
            (EmotionKind::Trust, 0.10),
            (EmotionKind::Fear, -0.05),
        ],
    );
    c.relationship_impacts = roster_pairs(
        roster,
        RelationshipDelta {
            affinity: 4.0,
            trust: 0.05,
            loyalty: 0.02,
        },
    );
    c.narrative_hooks.push(format!(
        "Word of the flawless run by {} spreads through the safehouses.",
        roster_names(roster)
    ));
    c.escalation_potential = 0.1;
    vec![c]
}

fn success_with_complications(mission: &Mission, roster: &[Participant]) -> Vec<Consequence> {
    let mut c = Consequence::new(
        ConsequenceKind::Complication,
        format!("{} succeeded, but left loose ends", mission.mission_id),
    );
    c.immediate_effects = aggregate_effects(&[
        (AggregateMetric::FactionMorale, 0.04),
        (AggregateMetric::NetworkHeat, 0.05),
    ]);
    c.emotional_impacts = roster_emotions(
        roster,
        &[
            (EmotionKind::Joy, 0.08),
            (EmotionKind::Anticipation, 0.05),
            (EmotionKind::Fear, 0.05),
        ],
    );
    c.relationship_impacts = roster_pairs(
        roster,
        RelationshipDelta {
            affinity: 2.0,
            trust: 0.02,
            loyalty: 0.0,
        },
    );
    c.narrative_hooks
        .push("The objective is met, but somebody saw something they shouldn't have.".to_string());
    c.escalation_potential = 0.3;
    vec![c]
}

fn partial_success(mission: &Mission, roster: &[Participant]) -> Vec<Consequence> {
    let mut c = Consequence::new(
        ConsequenceKind::PartialGain,
        format!("{} delivered only part of its objective", mission.mission_id),
    );
    c.immediate_effects = aggregate_effects(&[(AggregateMetric::FactionMorale, 0.02)]);
    c.emotional_impacts = roster_emotions(
        roster,
        &[(EmotionKind::Joy, 0.05), (EmotionKind::Sadness, 0.05)],
    );
    c.narrative_hooks
        .push("Half a win still counts, the cell tells itself.".to_string());
    c.escalation_potential = 0.25;
    vec![c]
}

fn partial_with_consequences(mission: &Mission, roster: &[Participant]) -> Vec<Consequence> {
    let mut c = Consequence::new(
        ConsequenceKind::CompromisedGain,
        format!("{} took its objective at a price that will keep bleeding", mission.mission_id),
    );
    c.immediate_effects = aggregate_effects(&[
        (AggregateMetric::FactionMorale, 0.02),
        (AggregateMetric::NetworkHeat, 0.06),
    ]);
    c.delayed_effects = aggregate_effects(&[(AggregateMetric::NetworkHeat, 0.08)]);
    c.recovery_time = 2;
    c.emotional_impacts = roster_emotions(
        roster,
        &[
            (EmotionKind::Sadness, 0.08),
            (EmotionKind::Trauma, 0.05),
        ],
    );
    c.narrative_hooks
        .push("What it cost to get this far hasn't finished costing.".to_string());
    c.escalation_potential = 0.45;
    vec![c]
}

fn failure_with_intel(mission: &Mission, roster: &[Participant]) -> Vec<Consequence> {
    let mut c = Consequence::new(
        ConsequenceKind::InterceptedIntel,
        format!("{} failed, but the team came home with usable intelligence", mission.mission_id),
    );
    c.immediate_effects = aggregate_effects(&[
        (AggregateMetric::IntelReserve, 0.10),
        (AggregateMetric::FactionMorale, -0.03),
    ]);
    c.emotional_impacts = roster_emotions(
        roster,
        &[
            (EmotionKind::Sadness, 0.08),
            (EmotionKind::Anticipation, 0.05),
        ],
    );
    c.narrative_hooks
        .push("The mission is a loss; the notebook that came back is not.".to_string());
    c.escalation_potential = 0.3;
    vec![c]
}

fn failure_with_exposure(mission: &Mission, roster: &[Participant]) -> Vec<Consequence> {
    let mut exposure = Consequence::new(
        ConsequenceKind::NetworkExposure,
        format!("{} failed and blew cover on the way down", mission.mission_id),
    );
    exposure.immediate_effects = aggregate_effects(&[
        (AggregateMetric::NetworkHeat, 0.15),
        (AggregateMetric::FactionReputation, -0.08),
    ]);
    exposure.emotional_impacts = roster_emotions(
        roster,
        &[
            (EmotionKind::Fear, 0.15),
            (EmotionKind::Trauma, 0.08),
            (EmotionKind::Sadness, 0.05),
        ],
    );
    exposure
        .narrative_hooks
        .push("Faces were seen. Names will follow.".to_string());
    exposure.escalation_potential = 0.7;

    let mut crackdown = Consequence::new(
        ConsequenceKind::GovernmentCrackdown,
        "exposed operatives draw a sweep through the district".to_string(),
    );
    crackdown.delayed_effects = aggregate_effects(&[
        (AggregateMetric::NetworkHeat, 0.10),
        (AggregateMetric::FactionMorale, -0.04),
    ]);
    crackdown.recovery_time = 2;
    crackdown
        .narrative_hooks
        .push("Checkpoints go up within the week.".to_string());
    crackdown.escalation_potential = 0.75;

    vec![exposure, crackdown]
}

fn complete_failure(mission: &Mission, roster: &[Participant]) -> Vec<Consequence> {
    let mut c = Consequence::new(
        ConsequenceKind::MissionLoss,
        format!("{} collapsed with nothing gained", mission.mission_id),
    );
    c.immediate_effects = aggregate_effects(&[(AggregateMetric::FactionMorale, -0.08)]);
    c.emotional_impacts = roster_emotions(
        roster,
        &[
            (EmotionKind::Fear, 0.10),
            (EmotionKind::Sadness, 0.12),
            (EmotionKind::Trauma, 0.05),
        ],
    );
    c.narrative_hooks
        .push("Nobody talks on the walk back.".to_string());
    c.escalation_potential = 0.5;
    vec![c]
}

fn catastrophic_failure(mission: &Mission, roster: &[Participant]) -> Vec<Consequence> {
    let mut loss = Consequence::new(
        ConsequenceKind::MissionLoss,
        format!("{} ended in catastrophe", mission.mission_id),
    );
    loss.immediate_effects = aggregate_effects(&[
        (AggregateMetric::FactionMorale, -0.15),
        (AggregateMetric::FactionReputation, -0.10),
    ]);
    loss.emotional_impacts = roster_emotions(
        roster,
        &[
            (EmotionKind::Fear, 0.20),
            (EmotionKind::Anger, 0.10),
            (EmotionKind::Sadness, 0.15),
            (EmotionKind::Trauma, 0.15),
        ],
    );
    loss.relationship_impacts = roster_pairs(
        roster,
        RelationshipDelta {
            affinity: 0.0,
            trust: -0.03,
            loyalty: 0.0,
        },
    );
    loss.narrative_hooks
        .push("The cell will be counting this cost for a long time.".to_string());
    loss.escalation_potential = 0.85;

    let mut crackdown = Consequence::new(
        ConsequenceKind::GovernmentCrackdown,
        "the disaster hands the government its excuse".to_string(),
    );
    crackdown.delayed_effects = aggregate_effects(&[
        (AggregateMetric::NetworkHeat, 0.20),
        (AggregateMetric::FactionMorale, -0.05),
    ]);
    crackdown.recovery_time = 3;
    crackdown
        .narrative_hooks
        .push("Raids begin before the month is out.".to_string());
    crackdown.escalation_potential = 0.9;

    vec![loss, crackdown]
}

fn tragic_success(mission: &Mission, roster: &[Participant]) -> Vec<Consequence> {
    let mut c = Consequence::new(
        ConsequenceKind::TraumaticVictory,
        format!("{} succeeded and broke the people who carried it", mission.mission_id),
    );
    c.immediate_effects = aggregate_effects(&[
        (AggregateMetric::FactionMorale, 0.04),
        (AggregateMetric::FactionReputation, 0.06),
    ]);
    c.delayed_effects = aggregate_effects(&[(AggregateMetric::FactionMorale, -0.05)]);
    c.recovery_time = 2;
    c.emotional_impacts = roster_emotions(
        roster,
        &[
            (EmotionKind::Trauma, 0.20),
            (EmotionKind::Sadness, 0.15),
            (EmotionKind::Joy, -0.05),
        ],
    );
    c.narrative_hooks
        .push("The toast to victory rings hollow.".to_string());
    c.escalation_potential = 0.6;
    vec![c]
}

fn pyrrhic_victory(mission: &Mission, roster: &[Participant]) -> Vec<Consequence> {
    let mut c = Consequence::new(
        ConsequenceKind::CostlyVictory,
        format!("{} counts as a win only on paper", mission.mission_id),
    );
    c.immediate_effects = aggregate_effects(&[
        (AggregateMetric::FactionReputation, 0.05),
        (AggregateMetric::FactionMorale, -0.06),
    ]);
    c.emotional_impacts = roster_emotions(
        roster,
        &[
            (EmotionKind::Trauma, 0.10),
            (EmotionKind::Trust, -0.08),
        ],
    );
    c.relationship_impacts = roster_pairs(
        roster,
        RelationshipDelta {
            affinity: -3.0,
            trust: -0.04,
            loyalty: 0.0,
        },
    );
    c.narrative_hooks
        .push("Everyone is quietly tallying what this one cost them.".to_string());
    c.escalation_potential = 0.55;
    vec![c]
}

fn beneficial_failure(mission: &Mission, roster: &[Participant]) -> Vec<Consequence> {
    let mut c = Consequence::new(
        ConsequenceKind::SilverLining,
        format!("{} failed in a way that opened an unexpected door", mission.mission_id),
    );
    c.immediate_effects = aggregate_effects(&[
        (AggregateMetric::FactionMorale, 0.03),
        (AggregateMetric::IntelReserve, 0.05),
    ]);
    c.emotional_impacts = roster_emotions(
        roster,
        &[
            (EmotionKind::Joy, 0.05),
            (EmotionKind::Anticipation, 0.10),
        ],
    );
    c.narrative_hooks
        .push("A failure, and yet a contact made in the confusion may be worth more.".to_string());
    c.escalation_potential = 0.2;
    vec![c]
}

fn sabotaged_mission(mission: &Mission, roster: &[Participant]) -> Vec<Consequence> {
    let mut c = Consequence::new(
        ConsequenceKind::InternalSabotage,
        format!("{} never had a chance; someone inside made sure of it", mission.mission_id),
    );
    c.immediate_effects = aggregate_effects(&[
        (AggregateMetric::FactionMorale, -0.10),
        (AggregateMetric::NetworkHeat, 0.08),
    ]);
    c.delayed_effects = aggregate_effects(&[(AggregateMetric::FactionMorale, -0.04)]);
    c.recovery_time = 2;
    c.emotional_impacts = roster_emotions(
        roster,
        &[
            (EmotionKind::Anger, 0.15),
            (EmotionKind::Trust, -0.10),
        ],
    );
    c.relationship_impacts = roster_pairs(
        roster,
        RelationshipDelta {
            affinity: -5.0,
            trust: -0.08,
            loyalty: 0.0,
        },
    );
    c.narrative_hooks
        .push("Suspicion settles over the whole cell like dust.".to_string());
    c.escalation_potential = 0.75;
    vec![c]
}

/// Betrayal fallout targets the identified betrayer alone: relationship
/// deltas run only between the betrayer and each other participant, never
/// uniformly across the roster.
fn betrayal_revealed(
    mission: &Mission,
    roster: &[Participant],
    betrayer: Option<&str>,
) -> Vec<Consequence> {
    let fallback = least_loyal(roster).map(|p| p.agent_id.clone());
    let Some(betrayer_id) = betrayer.map(str::to_string).or(fallback) else {
        // Empty roster: nothing to target, but the outcome still lands.
        let mut c = Consequence::new(
            ConsequenceKind::BetrayalFallout,
            format!("{} was sold out from inside", mission.mission_id),
        );
        c.immediate_effects = aggregate_effects(&[(AggregateMetric::NetworkHeat, 0.12)]);
        c.escalation_potential = 0.9;
        c.narrative_hooks
            .push("The mission was sold out before it began.".to_string());
        return vec![c];
    };

    let betrayer_name = roster
        .iter()
        .find(|p| p.agent_id == betrayer_id)
        .map(|p| p.name.clone())
        .unwrap_or_else(|| betrayer_id.clone());

    let mut c = Consequence::new(
        ConsequenceKind::BetrayalFallout,
        format!("{} was sold out by {}", mission.mission_id, betrayer_name),
    );
    c.immediate_effects = aggregate_effects(&[
        (AggregateMetric::FactionMorale, -0.12),
        (AggregateMetric::NetworkHeat, 0.12),
    ]);
    c.delayed_effects = aggregate_effects(&[(AggregateMetric::NetworkHeat, 0.08)]);
    c.recovery_time = 2;

    let mut emotional = BTreeMap::new();
    for p in roster {
        let deltas: BTreeMap<EmotionKind, f64> = if p.agent_id == betrayer_id {
            [(EmotionKind::Fear, 0.20), (EmotionKind::Anticipation, 0.10)]
                .into_iter()
                .collect()
        } else {
            [
                (EmotionKind::Anger, 0.20),
                (EmotionKind::Trust, -0.15),
                (EmotionKind::Trauma, 0.08),
            ]
            .into_iter()
            .collect()
        };
        emotional.insert(p.agent_id.clone(), deltas);
    }
    c.emotional_impacts = emotional;

    c.relationship_impacts = roster
        .iter()
        .filter(|p| p.agent_id != betrayer_id)
        .map(|p| {
            (
                betrayer_id.clone(),
                p.agent_id.clone(),
                RelationshipDelta {
                    affinity: -30.0,
                    trust: -0.40,
                    loyalty: -0.30,
                },
            )
        })
        .collect();

    c.narrative_hooks.push(format!(
        "{} showed their hand mid-operation; the cell will not forget it.",
        betrayer_name
    ));
    c.escalation_potential = 0.9;
    vec![c]
}

fn unintended_consequences(mission: &Mission, roster: &[Participant]) -> Vec<Consequence> {
    let mut c = Consequence::new(
        ConsequenceKind::UnforeseenRipple,
        format!("{} set something else in motion entirely", mission.mission_id),
    );
    c.immediate_effects = aggregate_effects(&[
        (AggregateMetric::NetworkHeat, 0.06),
        (AggregateMetric::IntelReserve, 0.03),
    ]);
    c.delayed_effects = aggregate_effects(&[(AggregateMetric::FactionReputation, -0.04)]);
    c.recovery_time = 1;
    c.emotional_impacts = roster_emotions(
        roster,
        &[
            (EmotionKind::Anticipation, 0.10),
            (EmotionKind::Fear, 0.05),
        ],
    );
    c.narrative_hooks
        .push("Nobody planned for what happens next.".to_string());
    c.escalation_potential = 0.5;
    vec![c]
}

// ---------------------------------------------------------------------------
// Cohesion side-consequences
// ---------------------------------------------------------------------------

fn team_bonding(roster: &[Participant], profile: &CollaborationProfile) -> Consequence {
    let mut c = Consequence::new(
        ConsequenceKind::TeamBonding,
        format!(
            "the team's cohesion ({:.2}) forged the roster closer together",
            profile.group_cohesion
        ),
    );
    c.emotional_impacts = roster_emotions(roster, &[(EmotionKind::Trust, 0.08)]);
    c.relationship_impacts = roster_pairs(
        roster,
        RelationshipDelta {
            affinity: 6.0,
            trust: 0.08,
            loyalty: 0.05,
        },
    );
    c.narrative_hooks.push(format!(
        "{} come back moving like one unit.",
        roster_names(roster)
    ));
    c.escalation_potential = 0.05;
    c
}

fn team_friction(roster: &[Participant], profile: &CollaborationProfile) -> Consequence {
    let mut c = Consequence::new(
        ConsequenceKind::TeamFriction,
        format!(
            "the team's cohesion ({:.2}) ground the roster against itself",
            profile.group_cohesion
        ),
    );
    c.emotional_impacts = roster_emotions(roster, &[(EmotionKind::Anger, 0.08)]);
    c.relationship_impacts = roster_pairs(
        roster,
        RelationshipDelta {
            affinity: -4.0,
            trust: -0.05,
            loyalty: 0.0,
        },
    );
    c.narrative_hooks
        .push("Old arguments resurface before the gear is even stowed.".to_string());
    c.escalation_potential = 0.35;
    c
}
