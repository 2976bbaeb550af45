//! Pose selector — decides which pose comes next.
//!
//! DESIGN
//! ======
//! Rules, highest priority first:
//!
//! 1. Free tier: without full access, cycle the curated sequence at
//!    `history.len() % len`, ignoring every filter.
//! 2. Preset: a preset with an explicit sequence cycles it the same way and
//!    loops forever; the session timer ends the session.
//! 3. Pairing: a sided current pose whose sibling is not yet in history
//!    hands over to that sibling.
//! 4. Filtered random: uniform pick from eligible poses not yet shown,
//!    falling back to the whole eligible pool once all have been shown.
//!
//! `None` means there is nothing to show (empty pool, or a sequence id the
//! catalog does not know). The selector never mutates history; the caller
//! records whatever it displays.
//!
//! Catalog, presets and entitlement are injected so the selector reads no
//! ambient state, and randomness comes from the caller's `Rng`.

use std::sync::Arc;

use rand::Rng;
use rand::seq::IndexedRandom;

use crate::catalog::Catalog;
use crate::config::SessionConfig;
use crate::entitlement::Entitlement;
use crate::history::SessionHistory;
use crate::pose::Pose;
use crate::preset::{FreeTier, PresetTable};

/// Which rule produced a selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionRule {
    FreeTier,
    Preset,
    Paired,
    /// Random pick among poses not yet shown.
    Fresh,
    /// Random pick after every eligible pose has been shown.
    Repeat,
}

#[derive(Clone, Copy, Debug)]
pub struct Selection<'a> {
    pub pose: &'a Pose,
    pub rule: SelectionRule,
}

#[derive(Clone)]
pub struct PoseSelector {
    catalog: Arc<Catalog>,
    presets: Arc<PresetTable>,
    free_tier: Arc<FreeTier>,
    entitlement: Arc<dyn Entitlement>,
}

impl PoseSelector {
    #[must_use]
    pub fn new(
        catalog: Arc<Catalog>,
        presets: Arc<PresetTable>,
        free_tier: Arc<FreeTier>,
        entitlement: Arc<dyn Entitlement>,
    ) -> Self {
        Self { catalog, presets, free_tier, entitlement }
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub fn presets(&self) -> &PresetTable {
        &self.presets
    }

    /// Pick the next pose and report which rule chose it.
    pub fn select<R>(
        &self,
        config: &SessionConfig,
        current: Option<&str>,
        history: &SessionHistory,
        rng: &mut R,
    ) -> Option<Selection<'_>>
    where
        R: Rng + ?Sized,
    {
        if !self.entitlement.has_full_access() {
            return self
                .cycle(self.free_tier.sequence(), history)
                .map(|pose| Selection { pose, rule: SelectionRule::FreeTier });
        }

        if let Some(sequence) = config
            .preset_id
            .as_deref()
            .and_then(|id| self.presets.sequence(id))
        {
            return self
                .cycle(sequence, history)
                .map(|pose| Selection { pose, rule: SelectionRule::Preset });
        }

        if let Some(pose) = current.and_then(|id| self.unshown_sibling(id, history)) {
            return Some(Selection { pose, rule: SelectionRule::Paired });
        }

        let eligible = self.catalog.eligible(config);
        let fresh: Vec<&Pose> = eligible
            .iter()
            .copied()
            .filter(|p| !history.contains(&p.id))
            .collect();

        if let Some(&pose) = fresh.choose(rng) {
            return Some(Selection { pose, rule: SelectionRule::Fresh });
        }
        eligible
            .choose(rng)
            .map(|&pose| Selection { pose, rule: SelectionRule::Repeat })
    }

    /// Like [`select`](Self::select) but returns only the pose.
    pub fn next_pose<R>(
        &self,
        config: &SessionConfig,
        current: Option<&str>,
        history: &SessionHistory,
        rng: &mut R,
    ) -> Option<&Pose>
    where
        R: Rng + ?Sized,
    {
        self.select(config, current, history, rng)
            .map(|s| s.pose)
    }

    /// Poses the config's filters admit, ignoring tier and preset rules.
    #[must_use]
    pub fn eligible(&self, config: &SessionConfig) -> Vec<&Pose> {
        self.catalog.eligible(config)
    }

    fn cycle(&self, sequence: &[String], history: &SessionHistory) -> Option<&Pose> {
        if sequence.is_empty() {
            return None;
        }
        let id = &sequence[history.len() % sequence.len()];
        self.catalog.get(id)
    }

    fn unshown_sibling(&self, current_id: &str, history: &SessionHistory) -> Option<&Pose> {
        let current = self.catalog.get(current_id)?;
        self.catalog
            .sibling(current)
            .filter(|sibling| !history.contains(&sibling.id))
    }
}

#[cfg(test)]
#[path = "selector_test.rs"]
mod tests;
