//! The trigger orchestrator.
//!
//! One `resolve` call is the unit of "a card's effect happens": it runs the
//! pre-trigger pass, records the invocation, dispatches it, schedules
//! doubling, and runs the post-trigger pass, in that order. The record is
//! appended before dispatch, so a failed invocation still shows up in
//! history. Doubling is never an immediate re-entrant call; it is an
//! explicit continuation the host advances after its presentation step.

use serde::{Deserialize, Serialize};

use crate::cards::{CardDefinition, Keyword};
use crate::core::InstanceId;
use crate::effects::{
    EffectCategory, EffectError, EffectRegistry, EffectResult, EffectSpec, ErrorKind, OutcomeData,
    Target,
};
use crate::history::EffectHistory;
use crate::state::GameView;

/// A scheduled second invocation, waiting for the host to advance it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PendingInvocation {
    /// Board instance whose effect is doubling, if it came from one.
    pub instance: Option<InstanceId>,
    pub category: EffectCategory,
    pub spec: EffectSpec,
    /// Snapshot of the card that carried the effect.
    pub source: CardDefinition,
}

/// What one `resolve` call produced.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TriggerReport {
    pub outcome: OutcomeData,
    /// A second invocation was scheduled; the host must call `advance`.
    pub doubled: bool,
}

/// Owns effect history and the doubling continuation for one game.
#[derive(Debug, Default)]
pub struct TriggerOrchestrator {
    history: EffectHistory,
    pending: Option<PendingInvocation>,
}

impl TriggerOrchestrator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The invocation history this orchestrator has accumulated.
    #[must_use]
    pub fn history(&self) -> &EffectHistory {
        &self.history
    }

    /// Whether a doubled invocation is waiting to be advanced.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Resolve one effect invocation.
    ///
    /// For `OnPlay` the played instance must still be on the acting board;
    /// anything else is a `StaleReference` failure with zero mutation. The
    /// marker-keyword passes (rally, doubling, inheritance) only run for
    /// `OnPlay`.
    pub fn resolve(
        &mut self,
        registry: &EffectRegistry,
        view: &mut GameView<'_>,
        category: EffectCategory,
        spec: &EffectSpec,
        source: &CardDefinition,
        instance: Option<InstanceId>,
        chosen: Option<Target>,
    ) -> Result<TriggerReport, EffectError> {
        let on_play = category == EffectCategory::OnPlay;

        if on_play {
            let Some(id) = instance else {
                return Err(EffectError::new(
                    ErrorKind::StaleReference,
                    format!("{} resolved on-play without a board instance", source.name),
                ));
            };
            if view.current.minion(id).is_none() {
                return Err(EffectError::new(
                    ErrorKind::StaleReference,
                    format!("{} is not on the acting board", source.name),
                ));
            }
        }
        view.source = instance;

        if on_play {
            rally_pass(view);
        }

        // Recorded before dispatch: an invocation that fails still happened
        // as far as history is concerned.
        if !spec.effect_type.is_replay() {
            self.history.record(
                spec.clone(),
                category,
                source.id,
                source.name.clone(),
                source.rarity,
                chosen,
            );
        }

        let outcome = registry.invoke(category, spec, source, chosen, view, &self.history)?;

        let mut doubled = false;
        if on_play && board_echoes(view) {
            self.pending = Some(PendingInvocation {
                instance,
                category,
                spec: spec.clone(),
                source: source.clone(),
            });
            doubled = true;
            view.log_event(format!("{}'s effect will echo.", source.name));
        }

        if on_play {
            inheritance_pass(view, source, instance);
        }

        Ok(TriggerReport { outcome, doubled })
    }

    /// Run the scheduled second invocation, if any.
    ///
    /// Targets are resolved fresh; the original chosen target is not reused.
    /// Returns `None` when nothing was pending.
    pub fn advance(
        &mut self,
        registry: &EffectRegistry,
        view: &mut GameView<'_>,
    ) -> Option<EffectResult> {
        let pending = self.pending.take()?;
        view.source = pending.instance;
        view.log_event(format!("{}'s effect echoes.", pending.source.name));

        if !pending.spec.effect_type.is_replay() {
            self.history.record(
                pending.spec.clone(),
                pending.category,
                pending.source.id,
                pending.source.name.clone(),
                pending.source.rarity,
                None,
            );
        }
        let result = registry.invoke(
            pending.category,
            &pending.spec,
            &pending.source,
            None,
            view,
            &self.history,
        );
        Some(result)
    }

    /// Drop a scheduled second invocation. Game-end teardown.
    pub fn cancel_pending(&mut self) {
        if self.pending.take().is_some() {
            log::debug!("pending doubled invocation cancelled");
        }
    }

    /// Reset history and pending state for a new game.
    pub fn clear(&mut self) {
        self.history.clear();
        self.pending = None;
    }
}

/// Non-silenced acting-board minions with the rally marker gain +1/+1.
fn rally_pass(view: &mut GameView<'_>) {
    let rallying: Vec<InstanceId> = view
        .current
        .board
        .iter()
        .filter(|m| !m.is_dead() && m.has_keyword(Keyword::RallyOnTrigger))
        .map(|m| m.id)
        .collect();
    for id in rallying {
        if let Some(minion) = view.current.minion_mut(id) {
            minion.buff(1, 1);
            let line = format!("{} rallies, gaining +1/+1.", minion.card.name);
            view.log.push(view.turn, line);
        }
    }
}

/// Whether any non-silenced acting-board minion doubles on-play effects.
fn board_echoes(view: &GameView<'_>) -> bool {
    view.current
        .board
        .iter()
        .any(|m| !m.is_dead() && m.has_keyword(Keyword::EchoesTriggers))
}

/// Non-silenced minions with the inheritance marker copy the played
/// card's combat keywords.
fn inheritance_pass(
    view: &mut GameView<'_>,
    source: &CardDefinition,
    played: Option<InstanceId>,
) {
    let inheritable: Vec<Keyword> = Keyword::INHERITABLE
        .into_iter()
        .filter(|&k| source.has_keyword(k))
        .collect();
    if inheritable.is_empty() {
        return;
    }

    let heirs: Vec<InstanceId> = view
        .current
        .board
        .iter()
        .filter(|m| {
            !m.is_dead() && Some(m.id) != played && m.has_keyword(Keyword::InheritsKeywords)
        })
        .map(|m| m.id)
        .collect();
    for id in heirs {
        if let Some(minion) = view.current.minion_mut(id) {
            for &keyword in &inheritable {
                minion.grant_keyword(keyword);
            }
            let name = minion.card.name.clone();
            view.log.push(
                view.turn,
                format!("{} inherits keywords from {}.", name, source.name),
            );
        }
    }
}
