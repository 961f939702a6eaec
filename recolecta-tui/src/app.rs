use std::sync::Arc;

use recolecta_core::{
    catalog::Catalog,
    filter::CategoryFilter,
    model::{Site, SiteId},
    ports::SourceId,
    service::{PlannerService, RoutePlan},
};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    SourceSelect,
    Planner,
}

pub(crate) struct App {
    pub service: Arc<PlannerService>,

    pub screen: Screen,
    pub sources: Vec<(SourceId, String)>,
    pub source_list_index: usize,
    pub selected_source: Option<SourceId>,

    pub catalog: Option<Catalog>,
    pub filter: CategoryFilter,
    pub site_list_index: usize,

    /// Visiting order, owned here and handed to the service on every change.
    pub selection: Vec<SiteId>,
    pub plan: Option<RoutePlan>,

    pub is_loading: bool,
    pub error_message: Option<String>,
}

impl App {
    pub(crate) fn new(service: Arc<PlannerService>) -> Self {
        let sources = service.sources();
        Self {
            service,
            screen: Screen::SourceSelect,
            sources,
            source_list_index: 0,
            selected_source: None,
            catalog: None,
            filter: CategoryFilter::All,
            site_list_index: 0,
            selection: Vec::new(),
            plan: None,
            is_loading: false,
            error_message: None,
        }
    }

    pub(crate) fn catalog_version(&self) -> u64 {
        self.catalog.as_ref().map_or(0, Catalog::version)
    }

    pub(crate) fn select_current_source(&mut self) -> Option<SourceId> {
        let (id, _name) = self.sources.get(self.source_list_index)?;
        self.selected_source = Some(id.clone());
        Some(id.clone())
    }

    pub(crate) fn set_catalog(&mut self, catalog: Catalog) {
        self.catalog = Some(catalog);
        self.screen = Screen::Planner;
        self.clamp_site_index();
        self.replan();
    }

    pub(crate) fn visible_sites(&self) -> Vec<&Site> {
        self.catalog
            .as_ref()
            .map(|catalog| self.service.filter(catalog, self.filter))
            .unwrap_or_default()
    }

    pub(crate) fn current_site(&self) -> Option<&Site> {
        self.visible_sites().get(self.site_list_index).copied()
    }

    pub(crate) fn selection_position(&self, id: &SiteId) -> Option<usize> {
        self.selection.iter().position(|selected| selected == id)
    }

    pub(crate) fn cycle_filter(&mut self) {
        self.filter = self.filter.next();
        self.site_list_index = 0;
    }

    pub(crate) fn toggle_current_site(&mut self) {
        let Some(id) = self.current_site().map(|site| site.id.clone()) else {
            return;
        };
        match self.selection_position(&id) {
            Some(position) => {
                self.selection.remove(position);
            }
            None => self.selection.push(id),
        }
        self.replan();
    }

    pub(crate) fn remove_last_stop(&mut self) {
        if self.selection.pop().is_some() {
            self.replan();
        }
    }

    pub(crate) fn clear_selection(&mut self) {
        self.selection.clear();
        self.replan();
    }

    pub(crate) fn move_up(&mut self) {
        self.site_list_index = self.site_list_index.saturating_sub(1);
    }

    pub(crate) fn move_down(&mut self) {
        if self.site_list_index + 1 < self.visible_sites().len() {
            self.site_list_index += 1;
        }
    }

    /// Recompute the plan from scratch against the current catalog.
    pub(crate) fn replan(&mut self) {
        let Some(catalog) = self.catalog.as_ref() else {
            self.plan = None;
            return;
        };
        match self.service.plan_route(catalog, &self.selection) {
            Ok(plan) => {
                self.error_message = if plan.skipped.is_empty() {
                    None
                } else {
                    Some(format!(
                        "Skipped sites no longer listed: {}",
                        join_ids(&plan.skipped)
                    ))
                };
                self.plan = Some(plan);
            }
            Err(err) => {
                warn!(error = %err, "route planning failed");
                self.plan = None;
                self.error_message = Some(format!("Planning failed: {err}"));
            }
        }
    }

    fn clamp_site_index(&mut self) {
        let visible = self.visible_sites().len();
        if self.site_list_index >= visible {
            self.site_list_index = visible.saturating_sub(1);
        }
    }
}

pub(crate) fn join_ids(ids: &[SiteId]) -> String {
    ids.iter()
        .map(|id| id.0.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
