// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2024 Jonathan Lee
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License version 3
// as published by the Free Software Foundation.
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
// See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see https://www.gnu.org/licenses/.

//! Filter-change dispatch.
//!
//! The [`DependencyMap`] says which views read which filter fields. The
//! [`ViewDispatcher`] owns the session's [`FilterState`], turns each
//! [`FilterChange`] into a [`PendingUpdate`] for just the affected views, and
//! on [`ViewDispatcher::accept`] drops any view result older than the latest
//! request for that view, so the newest filter state always wins.

use crate::config::DashboardConfig;
use crate::dataset::Dataset;
use crate::filter::{FilterChange, FilterField, FilterState};
use crate::view::{compute_view, ViewKind, ViewModel};
use indexmap::IndexMap;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyMap {
    edges: IndexMap<FilterField, Vec<ViewKind>>,
}
impl DependencyMap {
    /// Derived from each view's refresh triggers.
    pub fn from_views(views: &[ViewKind]) -> Self {
        let edges = FilterField::ALL
            .iter()
            .map(|field| {
                let affected = views
                    .iter()
                    .copied()
                    .filter(|view| view.depends_on(*field))
                    .collect();
                (*field, affected)
            })
            .collect();
        Self { edges }
    }
    pub fn affected(&self, field: FilterField) -> &[ViewKind] {
        self.edges.get(&field).map(Vec::as_slice).unwrap_or(&[])
    }
}
impl Default for DependencyMap {
    fn default() -> Self {
        Self::from_views(&ViewKind::ALL)
    }
}

/// Work requested by one filter change, computable anywhere.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingUpdate {
    pub generation: u64,
    pub state: FilterState,
    pub views: Vec<ViewKind>,
}
impl PendingUpdate {
    pub fn compute(&self, dataset: &Dataset, config: &DashboardConfig) -> ViewUpdate {
        ViewUpdate {
            generation: self.generation,
            views: self
                .views
                .iter()
                .map(|kind| compute_view(dataset, &self.state, *kind, config))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewUpdate {
    pub generation: u64,
    pub views: Vec<ViewModel>,
}

pub struct ViewDispatcher<'a> {
    dataset: &'a Dataset,
    config: DashboardConfig,
    deps: DependencyMap,
    state: FilterState,
    generation: u64,
    requested: IndexMap<ViewKind, u64>,
    current: IndexMap<ViewKind, ViewModel>,
}
impl<'a> ViewDispatcher<'a> {
    /// Starts from [`FilterState::initial`] with every view computed.
    pub fn new(dataset: &'a Dataset, config: DashboardConfig) -> Self {
        let state = FilterState::initial(dataset);
        Self::with_state(dataset, config, state)
    }
    pub fn with_state(dataset: &'a Dataset, config: DashboardConfig, state: FilterState) -> Self {
        let current = ViewKind::ALL
            .iter()
            .map(|kind| (*kind, compute_view(dataset, &state, *kind, &config)))
            .collect();
        Self {
            dataset,
            config,
            deps: DependencyMap::default(),
            state,
            generation: 0,
            requested: ViewKind::ALL.iter().map(|kind| (*kind, 0)).collect(),
            current,
        }
    }
    pub fn state(&self) -> &FilterState {
        &self.state
    }
    pub fn generation(&self) -> u64 {
        self.generation
    }
    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }
    pub fn view(&self, kind: ViewKind) -> Option<&ViewModel> {
        self.current.get(&kind)
    }
    pub fn views(&self) -> impl Iterator<Item = &ViewModel> {
        self.current.values()
    }
    /// `None` when the change leaves the state as it was.
    pub fn dispatch(&mut self, change: &FilterChange) -> Option<PendingUpdate> {
        if !self.state.apply(change) {
            debug!(field = change.field().key(), "filter unchanged, nothing to recompute");
            return None;
        }
        self.generation += 1;
        let views = self.deps.affected(change.field()).to_vec();
        for kind in &views {
            self.requested.insert(*kind, self.generation);
        }
        debug!(
            generation = self.generation,
            field = change.field().key(),
            views = views.len(),
            "filter change dispatched"
        );
        Some(PendingUpdate {
            generation: self.generation,
            state: self.state.clone(),
            views,
        })
    }
    /// Keeps views at least as new as their latest request; returns the ones
    /// that were applied.
    pub fn accept(&mut self, update: ViewUpdate) -> Vec<ViewKind> {
        let mut applied = Vec::new();
        for view in update.views {
            let latest = self.requested.get(&view.kind).copied().unwrap_or(0);
            if update.generation < latest {
                debug!(
                    view = ?view.kind,
                    stale = update.generation,
                    latest,
                    "discarding stale view"
                );
                continue;
            }
            applied.push(view.kind);
            self.current.insert(view.kind, view);
        }
        applied
    }
    /// Synchronous path: dispatch, compute, accept.
    pub fn apply(&mut self, change: &FilterChange) -> Vec<&ViewModel> {
        let Some(pending) = self.dispatch(change) else {
            return Vec::new();
        };
        let update = pending.compute(self.dataset, &self.config);
        let applied = self.accept(update);
        applied
            .iter()
            .filter_map(|kind| self.current.get(kind))
            .collect()
    }
}
