//! Effect dispatch.
//!
//! The registry maps a `(category, effect type)` pair to a handler function.
//! Dispatch is uniformly contained: a missing handler is an
//! `UnknownEffectType` failure and a panicking handler is caught and
//! converted to a `HandlerError`, so no card data and no handler bug can
//! unwind through the engine.

use std::panic::{self, AssertUnwindSafe};

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::cards::CardDefinition;
use crate::history::EffectHistory;
use crate::state::GameView;

use super::outcome::{EffectError, EffectResult, ErrorKind};
use super::spec::{EffectSpec, EffectType};
use super::targeting::Target;

/// When an effect fires, for dispatch purposes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectCategory {
    /// A minion's effect as it enters play.
    OnPlay,
    /// A unit's effect as it dies.
    OnDeath,
    /// A spell being cast.
    SpellCast,
    /// A follow-up effect chained onto another play.
    Combo,
}

impl EffectCategory {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            EffectCategory::OnPlay => "on_play",
            EffectCategory::OnDeath => "on_death",
            EffectCategory::SpellCast => "spell_cast",
            EffectCategory::Combo => "combo",
        }
    }
}

/// An effect handler.
///
/// Handlers mutate game state only through the [`GameView`] primitives. The
/// registry and history references let replay-style handlers re-dispatch
/// recorded invocations without owning any state themselves.
pub type Handler = Box<
    dyn Fn(
            &mut GameView<'_>,
            &EffectSpec,
            &CardDefinition,
            Option<Target>,
            &EffectRegistry,
            &EffectHistory,
        ) -> EffectResult
        + Send
        + Sync,
>;

/// Handler table keyed by `(category, effect type)`.
#[derive(Default)]
pub struct EffectRegistry {
    handlers: FxHashMap<(EffectCategory, EffectType), Handler>,
}

impl EffectRegistry {
    /// An empty registry. Most callers want [`EffectRegistry::with_defaults`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the built-in handler set installed.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        super::handlers::register_defaults(&mut registry);
        registry
    }

    /// Register a handler. The last registration for a pair wins.
    pub fn register<F>(&mut self, category: EffectCategory, effect_type: EffectType, handler: F)
    where
        F: Fn(
                &mut GameView<'_>,
                &EffectSpec,
                &CardDefinition,
                Option<Target>,
                &EffectRegistry,
                &EffectHistory,
            ) -> EffectResult
            + Send
            + Sync
            + 'static,
    {
        if self
            .handlers
            .insert((category, effect_type.clone()), Box::new(handler))
            .is_some()
        {
            log::debug!(
                "handler for ({}, {}) replaced",
                category.as_str(),
                effect_type
            );
        }
    }

    /// Whether a handler is registered for the pair.
    #[must_use]
    pub fn has_handler(&self, category: EffectCategory, effect_type: &EffectType) -> bool {
        self.handlers
            .contains_key(&(category, effect_type.clone()))
    }

    /// Every registered `(category, effect type)` pair, sorted for stable
    /// output.
    #[must_use]
    pub fn list_registered(&self) -> Vec<(EffectCategory, EffectType)> {
        let mut pairs: Vec<_> = self.handlers.keys().cloned().collect();
        pairs.sort_by_key(|(c, t)| (c.as_str(), t.to_string()));
        pairs
    }

    /// Dispatch one effect.
    ///
    /// A missing handler fails with `UnknownEffectType`; a panic inside a
    /// handler is caught and converted to `HandlerError`. Callers are
    /// responsible for state restoration on failure.
    pub fn invoke(
        &self,
        category: EffectCategory,
        spec: &EffectSpec,
        source: &CardDefinition,
        chosen: Option<Target>,
        view: &mut GameView<'_>,
        history: &EffectHistory,
    ) -> EffectResult {
        let Some(handler) = self
            .handlers
            .get(&(category, spec.effect_type.clone()))
        else {
            log::warn!(
                "no handler for ({}, {}) from {}",
                category.as_str(),
                spec.effect_type,
                source.name
            );
            return Err(EffectError::new(
                ErrorKind::UnknownEffectType,
                format!(
                    "no handler registered for {} effect '{}'",
                    category.as_str(),
                    spec.effect_type
                ),
            ));
        };

        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            handler(view, spec, source, chosen, self, history)
        }));

        match result {
            Ok(outcome) => outcome,
            Err(payload) => {
                let message = payload
                    .downcast_ref::<&str>()
                    .map(|s| (*s).to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "handler panicked".to_string());
                log::error!(
                    "handler for ({}, {}) panicked: {}",
                    category.as_str(),
                    spec.effect_type,
                    message
                );
                Err(EffectError::new(ErrorKind::HandlerError, message))
            }
        }
    }
}

impl std::fmt::Debug for EffectRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectRegistry")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}
