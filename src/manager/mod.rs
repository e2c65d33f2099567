//! Style manager: rule resolution, merging, caching, and hot reload.
//!
//! [`StyleManager`] is the owner of all mutable engine state — the merge
//! cache and the alias graph — and is driven by two call-ins: direct API
//! calls (resolve / merge / apply) and the host's reload notification
//! (see [`StyleManager::reload`]). Everything runs synchronously on the UI
//! thread; collaborators are injected at construction.

mod reload;
#[cfg(test)]
mod tests;

use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use log::{info, warn};

use crate::error::{Error, Result};
use crate::reactive::SheetRef;
use crate::registry::TypeRegistry;
use crate::selector::Selector;
use crate::sheet::{Property, RuleSet, StyleRule};
use crate::source::{StyleSource, StyleStore, ValueStore};
use crate::ui::UiRoot;

/// Per-identifier record of the last successful merge: the base rule set as
/// it was before merging, and the reactive reference produced. Used only to
/// recompute and republish on reload.
struct CacheEntry {
    original: Rc<RuleSet>,
    reference: SheetRef,
}

/// Merge diagnostics, reported through the log side channel.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct MergeStats {
    pub added: usize,
    pub merged: usize,
    pub overwritten: usize,
}

/// Resolves, merges, and caches style definitions for a UI control tree.
pub struct StyleManager {
    styles: Rc<dyn StyleStore>,
    values: Rc<dyn ValueStore>,
    registry: Rc<dyn TypeRegistry>,
    cache: HashMap<String, CacheEntry>,
    /// Reverse parent edges: source id -> ids declaring it as a parent.
    aliases: HashMap<String, Vec<String>>,
}

impl StyleManager {
    pub fn new(
        styles: Rc<dyn StyleStore>,
        values: Rc<dyn ValueStore>,
        registry: Rc<dyn TypeRegistry>,
    ) -> Self {
        let mut manager = StyleManager {
            styles,
            values,
            registry,
            cache: HashMap::new(),
            aliases: HashMap::new(),
        };
        manager.rebuild_aliases();
        manager
    }

    /// Rebuild the reverse-parent index from the style store. Called at
    /// construction and again on every reload cycle.
    pub fn rebuild_aliases(&mut self) {
        self.aliases.clear();
        for source in self.styles.all() {
            for parent in source.parents() {
                self.aliases
                    .entry(parent.clone())
                    .or_default()
                    .push(source.id().to_string());
            }
        }
    }

    /// Resolve the full rule sequence for a style source by strict id lookup.
    pub fn rules(&self, id: &str) -> Result<Vec<StyleRule>> {
        let source = self
            .styles
            .try_index(id)
            .ok_or_else(|| Error::style_not_found(id))?;
        self.rules_of(&source)
    }

    /// Resolve the full rule sequence for an already-resolved source:
    /// parents depth-first in declared order, ancestors before self, no
    /// merging. Duplicate selectors across the chain remain separate
    /// entries.
    pub fn rules_of(&self, source: &StyleSource) -> Result<Vec<StyleRule>> {
        let mut rules = Vec::new();
        let mut chain = Vec::new();
        self.collect_rules(source, &mut chain, &mut rules)?;
        Ok(rules)
    }

    fn collect_rules(
        &self,
        source: &StyleSource,
        chain: &mut Vec<String>,
        rules: &mut Vec<StyleRule>,
    ) -> Result<()> {
        if chain.iter().any(|id| id == source.id()) {
            let mut path = chain.clone();
            path.push(source.id().to_string());
            return Err(Error::Cycle { path });
        }

        chain.push(source.id().to_string());
        for parent_id in source.parents() {
            let parent = self
                .styles
                .try_index(parent_id)
                .ok_or_else(|| Error::style_not_found(parent_id))?;
            self.collect_rules(&parent, chain, rules)?;
        }
        chain.pop();

        for block in source.styles() {
            let selector = match Selector::parse(&block.path, Some(source), &*self.registry) {
                Ok(selector) => selector,
                Err(err) => {
                    warn!(
                        "skipping rule '{}' in style source '{}': {err}",
                        block.path,
                        source.id()
                    );
                    continue;
                }
            };

            let mut rule = StyleRule::new(selector);
            for (name, dynamic) in &block.props {
                match dynamic.resolve(&*self.values) {
                    Ok(value) => rule.set(Property::new(name.clone(), value)),
                    Err(err) => warn!(
                        "skipping property '{}' of '{}' in style source '{}': {err}",
                        name,
                        block.path,
                        source.id()
                    ),
                }
            }
            rules.push(rule);
        }

        Ok(())
    }

    /// Build a selector for an element path, resolving type aliases through
    /// the owning source when given.
    pub fn selector(&self, path: &str, owner: Option<&StyleSource>) -> Result<Selector> {
        Selector::parse(path, owner, &*self.registry)
    }

    /// Resolve a source by strict id and install its rules as the active
    /// global stylesheet.
    pub fn apply(&self, ui: &mut dyn UiRoot, id: &str) -> Result<()> {
        let Some(source) = self.styles.try_index(id) else {
            warn!("cannot apply style source '{id}': not found");
            return Ok(());
        };
        self.apply_source(ui, &source)
    }

    pub fn apply_source(&self, ui: &mut dyn UiRoot, source: &StyleSource) -> Result<()> {
        let rules = self.rules_of(source)?;
        ui.set_active_stylesheet(Some(Rc::new(RuleSet::new(rules))));
        Ok(())
    }

    /// Merge the rules of a named style source into a base rule set at
    /// property granularity and return the reactive reference tracking the
    /// result.
    ///
    /// A missing source degrades to a no-op: the returned ref wraps the
    /// unchanged base and no cache entry is recorded. On success the cache
    /// entry for `id` is created or overwritten with the pre-merge base and
    /// the (possibly reused) reference, so a later reload can recompute and
    /// republish in place.
    pub fn merge(&mut self, base: &Rc<RuleSet>, id: &str) -> Result<SheetRef> {
        self.merge_counted(base, id).map(|(reference, _)| reference)
    }

    pub(crate) fn merge_counted(
        &mut self,
        base: &Rc<RuleSet>,
        id: &str,
    ) -> Result<(SheetRef, MergeStats)> {
        let Some(source) = self.styles.try_index(id) else {
            warn!("stylesheet merge failed: style source '{id}' not found");
            return Ok((SheetRef::new(Rc::clone(base)), MergeStats::default()));
        };

        // Index the base by selector, first-wins; duplicates in the base are
        // a caller error but tolerated.
        let mut merged: Vec<StyleRule> = Vec::with_capacity(base.len());
        let mut by_selector: HashMap<Selector, usize> = HashMap::with_capacity(base.len());
        for rule in base.rules() {
            if !by_selector.contains_key(rule.selector()) {
                by_selector.insert(rule.selector().clone(), merged.len());
                merged.push(rule.clone());
            }
        }

        // Collapse the source's rule sequence per selector at property
        // granularity; descendant declarations override ancestors.
        let mut incoming: Vec<StyleRule> = Vec::new();
        let mut incoming_index: HashMap<Selector, usize> = HashMap::new();
        for rule in self.rules_of(&source)? {
            match incoming_index.get(rule.selector()) {
                Some(&at) => {
                    for property in rule.properties() {
                        incoming[at].set(property.clone());
                    }
                }
                None => {
                    incoming_index.insert(rule.selector().clone(), incoming.len());
                    incoming.push(rule);
                }
            }
        }

        let mut stats = MergeStats::default();
        for rule in incoming {
            match by_selector.get(rule.selector()) {
                Some(&at) => {
                    for property in rule.properties() {
                        stats.overwritten += 1;
                        merged[at].set(property.clone());
                    }
                    stats.merged += 1;
                }
                None => {
                    by_selector.insert(rule.selector().clone(), merged.len());
                    merged.push(rule);
                    stats.added += 1;
                }
            }
        }

        info!(
            "merged style '{id}': {} props merged, {} styles merged, {} styles added",
            stats.overwritten, stats.merged, stats.added
        );

        let result = Rc::new(RuleSet::new(merged));

        // Reuse the cached reference so observers attached before this merge
        // see the new contents without re-subscribing.
        let reference = match self.cache.get(id) {
            Some(entry) => {
                let reference = entry.reference.clone();
                reference.set(result);
                reference
            }
            None => SheetRef::new(result),
        };

        self.cache.insert(
            id.to_string(),
            CacheEntry {
                original: Rc::clone(base),
                reference: reference.clone(),
            },
        );

        Ok((reference, stats))
    }

    /// Whether a merge result is being tracked for `id`.
    pub fn is_cached(&self, id: &str) -> bool {
        self.cache.contains_key(id)
    }

    /// Ids depending on `id` through reverse parent edges, `id` itself
    /// included, depth-first. The visited set makes the walk terminate even
    /// on cyclic parent declarations.
    fn dependents_of(&self, id: &str, visited: &mut HashSet<String>, out: &mut Vec<String>) {
        if !visited.insert(id.to_string()) {
            return;
        }
        out.push(id.to_string());
        if let Some(children) = self.aliases.get(id) {
            for child in children {
                self.dependents_of(child, visited, out);
            }
        }
    }
}
