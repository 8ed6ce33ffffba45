//! Top-level mission engine: composes the analyzer, estimator, resolver,
//! generator, and applier into one synchronous resolution per call. The
//! engine owns the seeded random source; state is passed in explicitly.

use contracts::{EngineConfig, Mission, MissionRecord, MissionReport, Participant};

use crate::applier;
use crate::collaboration;
use crate::consequence;
use crate::outcome;
use crate::probability;
use crate::rng::EngineRng;
use crate::state::CampaignState;

#[derive(Debug, Clone)]
pub struct MissionEngine {
    config: EngineConfig,
    rng: EngineRng,
}

impl MissionEngine {
    /// Build an engine from config; the random source is seeded from
    /// `config.seed`, so identical configs replay identical campaigns.
    pub fn new(config: EngineConfig) -> Self {
        let rng = EngineRng::new(config.seed);
        Self { config, rng }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Resolve one mission start to finish: collaboration analysis, success
    /// estimation, outcome resolution, consequence generation, and state
    /// application, in that order, with no suspension points. The outcome is
    /// recorded to mission history before the report is returned.
    pub fn resolve_mission(
        &mut self,
        mission: &Mission,
        roster: &[Participant],
        state: &mut CampaignState,
    ) -> MissionReport {
        let profile = collaboration::analyze(roster, &state.relationships);
        let estimate = probability::estimate(mission, roster, &profile, &self.config);
        let resolved = outcome::resolve(
            roster,
            &profile,
            estimate.collaboration_modified,
            &state.betrayal_plans,
            &mut self.rng,
            &self.config,
        );
        let consequences = consequence::generate(&resolved, mission, roster, &profile, &self.config);
        let applied = applier::apply(state, &consequences);

        state.mission_history.push(MissionRecord {
            mission_id: mission.mission_id.clone(),
            turn: state.current_turn,
            outcome: resolved.outcome,
        });

        let mut narrative = resolved.outcome.headline().to_string();
        for line in &applied.narrative_lines {
            narrative.push('\n');
            narrative.push_str(line);
        }

        MissionReport {
            outcome: resolved.outcome,
            original_success_probability: estimate.original,
            collaboration_modified_success: estimate.collaboration_modified,
            collaboration_analysis: profile,
            consequences,
            emotional_impacts: applied.emotional_impacts,
            relationship_changes: applied.relationship_changes,
            narrative,
        }
    }
}
