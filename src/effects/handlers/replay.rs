//! Replay handler: re-invoke recorded effects with fresh targets.
//!
//! Reads the most recent non-replay invocation records and dispatches each
//! one again through the registry. Targets are never reused from the
//! original invocation; every replayed effect resolves against the board as
//! it stands now, picking randomly where the original had a chosen target.

use crate::cards::CardDefinition;
use crate::history::{EffectHistory, InvocationRecord};
use crate::state::GameView;

use super::super::outcome::{EffectResult, OutcomeData};
use super::super::registry::EffectRegistry;
use super::super::spec::EffectSpec;
use super::super::targeting::Target;

pub(super) fn replay_triggers(
    view: &mut GameView<'_>,
    spec: &EffectSpec,
    source: &CardDefinition,
    _chosen: Option<Target>,
    registry: &EffectRegistry,
    history: &EffectHistory,
) -> EffectResult {
    let k = spec.params.count.unwrap_or(1) as usize;
    let records: Vec<InvocationRecord> = history
        .recent(k)
        .into_iter()
        .filter(|r| !r.spec.effect_type.is_replay())
        .cloned()
        .collect();

    if records.is_empty() {
        view.log_event(format!("{} found nothing to echo.", source.name));
        return Ok(OutcomeData::Fizzled);
    }

    let mut replayed = 0u32;
    for record in records {
        let Some(original_source) = view.catalog.get(record.source).cloned() else {
            log::warn!("replay skipped {}: not in catalog", record.source);
            continue;
        };

        // A record that originally had a host-chosen target gets a fresh
        // random pick among currently valid targets; none valid skips it.
        let chosen = if record.spec.requires_target {
            let source_id = view.source;
            let valid = view.resolve_targets(&record.spec.selector, source_id);
            match view.rng.choose(&valid).copied() {
                Some(target) => Some(target),
                None => {
                    view.log_event(format!(
                        "{} could not echo {}: no valid target.",
                        source.name, original_source.name
                    ));
                    continue;
                }
            }
        } else {
            None
        };

        view.log_event(format!(
            "{} echoes {}.",
            source.name, original_source.name
        ));
        match registry.invoke(
            record.category,
            &record.spec,
            &original_source,
            chosen,
            view,
            history,
        ) {
            Ok(_) => replayed += 1,
            Err(err) => {
                log::warn!("replayed {} failed: {}", original_source.name, err);
            }
        }
    }

    Ok(OutcomeData::Replayed { count: replayed })
}
