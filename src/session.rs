//! Per-session dashboard state: the uploaded leads, the current source
//! selection and the detail-table toggle.

use serde::Serialize;
use tracing::debug;

use crate::config::DashboardConfig;
use crate::dashboard::{build_dashboard, Dashboard, DetailView};
use crate::models::{FilterSelection, LeadField, LeadSet};
use crate::pipeline::{self, FilteredLeads};

#[derive(Debug, Clone)]
pub struct Session {
    leads: LeadSet,
    selection: FilterSelection,
    detail_view: DetailView,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    pub total_leads: usize,
    pub sources: Vec<String>,
    pub selected_sources: Vec<String>,
    pub columns: Vec<LeadField>,
    pub detail_view: DetailView,
}

impl Session {
    /// Starts with every source selected.
    pub fn new(leads: LeadSet) -> Self {
        let selection = FilterSelection::all(&leads);
        Self {
            leads,
            selection,
            detail_view: DetailView::default(),
        }
    }

    pub fn leads(&self) -> &LeadSet {
        &self.leads
    }

    pub fn selection(&self) -> &FilterSelection {
        &self.selection
    }

    pub fn detail_view(&self) -> DetailView {
        self.detail_view
    }

    pub fn select_all(&mut self) {
        self.selection = FilterSelection::all(&self.leads);
    }

    pub fn set_selection<S: Into<String>>(&mut self, sources: impl IntoIterator<Item = S>) {
        self.selection = sources.into_iter().collect();
        debug!("Selection now {:?}", self.selection);
    }

    pub fn set_detail_view(&mut self, view: DetailView) {
        self.detail_view = view;
    }

    pub fn filtered(&self) -> FilteredLeads<'_> {
        pipeline::filter(&self.leads, &self.selection)
    }

    pub fn dashboard(&self, config: &DashboardConfig) -> Dashboard {
        build_dashboard(&self.leads, &self.selection, self.detail_view, config)
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            total_leads: self.leads.len(),
            sources: self.leads.sources(),
            selected_sources: self.selection.iter().map(str::to_string).collect(),
            columns: self.leads.columns().iter().copied().collect(),
            detail_view: self.detail_view,
        }
    }
}
