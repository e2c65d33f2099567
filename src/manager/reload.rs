//! Hot-reload propagation.
//!
//! When the host reloads style definitions it notifies the manager with the
//! set of changed identifiers. Every cached merge result derived from a
//! changed source — directly or through the alias graph — is recomputed from
//! its recorded base and republished through its existing reference, then
//! the live control tree is walked to swap stale assignments in place.

use std::collections::{HashMap, HashSet};
use std::rc::Rc;
use std::time::Instant;

use log::{error, info};

use crate::sheet::RuleSet;
use crate::ui::{Control, UiRoot};

use super::StyleManager;

/// Identity key for a rule set shared through `Rc`.
fn identity(sheet: &Rc<RuleSet>) -> usize {
    Rc::as_ptr(sheet) as usize
}

impl StyleManager {
    /// Propagate a reload of `changed` style sources through the cache and
    /// the live UI tree.
    ///
    /// Dependents without a cache entry were never merged and are skipped.
    /// A failure recomputing one identifier is logged and does not abort
    /// propagation to the others.
    pub fn reload(&mut self, ui: &mut dyn UiRoot, changed: &[String]) {
        let started = Instant::now();
        self.rebuild_aliases();

        let mut visited = HashSet::new();
        let mut dependents = Vec::new();
        for id in changed {
            self.dependents_of(id, &mut visited, &mut dependents);
        }

        // Old rule-set identity -> replacement, for the tree walk below.
        // Retired sets stay alive for the whole pass: a dropped set's
        // address could be reused by a later allocation and alias its key.
        let mut replaced: HashMap<usize, Rc<RuleSet>> = HashMap::new();
        let mut retired: Vec<Rc<RuleSet>> = Vec::new();

        for id in &dependents {
            let Some((original, outdated)) = self
                .cache
                .get(id)
                .map(|entry| (Rc::clone(&entry.original), entry.reference.get()))
            else {
                continue;
            };

            match self.merge(&original, id) {
                Ok(reference) => {
                    replaced.insert(identity(&outdated), reference.get());
                    retired.push(outdated);
                }
                Err(err) => {
                    error!("failed to recompute merged style '{id}' on reload: {err}");
                }
            }
        }

        if let Some(active) = ui.active_stylesheet() {
            if let Some(updated) = replaced.get(&identity(&active)) {
                ui.set_active_stylesheet(Some(Rc::clone(updated)));
            }
        }

        ui.for_each_root(&mut |control| update_control(control, &replaced));

        info!(
            "updated {} merged stylesheet(s) in {} ms",
            replaced.len(),
            started.elapsed().as_millis()
        );
    }
}

/// Swap a stale stylesheet assignment and invalidate, parent before
/// children. Invalidation runs on every control regardless of a swap, so
/// inherited-value changes refresh too.
fn update_control(control: &mut dyn Control, replaced: &HashMap<usize, Rc<RuleSet>>) {
    if let Some(current) = control.stylesheet() {
        if let Some(updated) = replaced.get(&identity(&current)) {
            control.set_stylesheet(Some(Rc::clone(updated)));
        }
    }

    control.invalidate_styles();

    control.for_each_child(&mut |child| update_control(child, replaced));
}
