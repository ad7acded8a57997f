//! Assembles every enabled dashboard section from one filtered view.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::{DashboardConfig, Section};
use crate::models::{FilterSelection, LeadField, LeadSet};
use crate::pipeline::{
    self, FilteredLeads, HierarchyNode, PathCount, RankedCount, SourceConversion, SourceStage,
    StageShare, StageSourceCount,
};

/// Which table the detail section shows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetailView {
    #[default]
    FilteredRows,
    HierarchicalCounts,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SectionOutcome<T> {
    Ready { table: T },
    Unavailable { reason: String },
}

impl<T> SectionOutcome<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            SectionOutcome::Ready { table } => Some(table),
            SectionOutcome::Unavailable { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HierarchyTable {
    pub fields: Vec<LeadField>,
    pub nodes: Vec<HierarchyNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum DetailTable {
    FilteredRows { rows: Vec<SourceStage> },
    HierarchicalCounts { fields: Vec<LeadField>, rows: Vec<PathCount> },
}

type Outcome<T> = Option<SectionOutcome<T>>;

/// Every derived table for one filter selection. Disabled sections are `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub total_leads: usize,
    pub filtered_leads: usize,
    pub selected_sources: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage_by_source: Outcome<Vec<StageSourceCount>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hierarchy: Outcome<HierarchyTable>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Outcome<DetailTable>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage_distribution: Outcome<Vec<StageShare>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversion_rates: Outcome<Vec<SourceConversion>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_owners: Outcome<Vec<RankedCount>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_groups: Outcome<Vec<RankedCount>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owners_needing_attention: Outcome<Vec<RankedCount>>,
}

struct Builder<'c, 'l> {
    config: &'c DashboardConfig,
    leads: &'l LeadSet,
    filtered: FilteredLeads<'l>,
}

impl Builder<'_, '_> {
    fn section<T>(
        &self,
        section: Section,
        required: &[LeadField],
        build: impl FnOnce(&FilteredLeads) -> T,
    ) -> Outcome<T> {
        if !self.config.is_enabled(section) {
            return None;
        }
        Some(match self.leads.require(required) {
            Ok(()) => SectionOutcome::Ready {
                table: build(&self.filtered),
            },
            Err(e) => {
                warn!("Skipping {:?}: {}", section, e);
                SectionOutcome::Unavailable {
                    reason: e.to_string(),
                }
            }
        })
    }
}

pub fn build_dashboard(
    leads: &LeadSet,
    selection: &FilterSelection,
    detail_view: DetailView,
    config: &DashboardConfig,
) -> Dashboard {
    let b = Builder {
        config,
        leads,
        filtered: pipeline::filter(leads, selection),
    };
    debug!("Building dashboard over {}/{} leads", b.filtered.len(), leads.len());

    let positive = &config.positive_stages;
    let hierarchy_fields = config.hierarchy_path.fields().to_vec();
    let detail_required = match detail_view {
        DetailView::FilteredRows => vec![LeadField::LeadSource, LeadField::LeadStage],
        DetailView::HierarchicalCounts => config.detail_path.fields().to_vec(),
    };

    Dashboard {
        total_leads: leads.len(),
        filtered_leads: b.filtered.len(),
        selected_sources: selection.iter().map(str::to_string).collect(),
        stage_by_source: b.section(
            Section::StageBySource,
            &[LeadField::LeadStage, LeadField::LeadSource],
            pipeline::stage_by_source,
        ),
        hierarchy: b.section(Section::Hierarchy, &hierarchy_fields, |fl| HierarchyTable {
            fields: hierarchy_fields.clone(),
            nodes: pipeline::hierarchy_tree(fl, &config.hierarchy_path),
        }),
        detail: b.section(Section::Detail, &detail_required, |fl| match detail_view {
            DetailView::FilteredRows => DetailTable::FilteredRows {
                rows: pipeline::filtered_rows(fl),
            },
            DetailView::HierarchicalCounts => DetailTable::HierarchicalCounts {
                fields: config.detail_path.fields().to_vec(),
                rows: pipeline::hierarchy(fl, &config.detail_path),
            },
        }),
        stage_distribution: b.section(
            Section::StageDistribution,
            &[LeadField::LeadStage],
            pipeline::stage_distribution,
        ),
        conversion_rates: b.section(
            Section::ConversionRates,
            &[LeadField::LeadSource, LeadField::LeadStage],
            |fl| pipeline::conversion_rate(fl, positive),
        ),
        top_owners: b.section(
            Section::TopOwners,
            &[LeadField::Owner, LeadField::LeadStage],
            |fl| pipeline::top_by(fl, LeadField::Owner, positive, config.top_owners),
        ),
        top_groups: b.section(
            Section::TopGroups,
            &[LeadField::Group, LeadField::LeadStage],
            |fl| pipeline::top_by(fl, LeadField::Group, positive, config.top_groups),
        ),
        owners_needing_attention: b.section(
            Section::OwnersNeedingAttention,
            &[LeadField::Owner],
            |fl| pipeline::bottom_by(fl, LeadField::Owner, config.bottom_owners),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Variant;
    use crate::loader::load_leads_from_str;
    use crate::models::LeadRecord;

    fn leads() -> LeadSet {
        LeadSet::new(vec![
            LeadRecord::new("Web", "New Lead", "North", "Alice", "Buyer"),
            LeadRecord::new("Web", "Lost", "North", "Bob", "Renter"),
            LeadRecord::new("Ads", "Walking Done", "South", "Carol", "Buyer"),
            LeadRecord::new("Ads", "Lost", "South", "Carol", "Buyer"),
        ])
    }

    #[test]
    fn test_full_dashboard() {
        let leads = leads();
        let config = DashboardConfig::default();
        let dash = build_dashboard(&leads, &FilterSelection::all(&leads), DetailView::FilteredRows, &config);

        assert_eq!(dash.total_leads, 4);
        assert_eq!(dash.filtered_leads, 4);
        assert_eq!(dash.selected_sources, vec!["Ads", "Web"]);
        assert_eq!(dash.stage_by_source.as_ref().unwrap().ready().unwrap().len(), 4);
        let hierarchy = dash.hierarchy.as_ref().unwrap().ready().unwrap();
        assert_eq!(hierarchy.fields, vec![LeadField::Group, LeadField::Owner, LeadField::LeadStage]);
        assert_eq!(hierarchy.nodes.len(), 2);
        match dash.detail.as_ref().unwrap().ready().unwrap() {
            DetailTable::FilteredRows { rows } => assert_eq!(rows.len(), 4),
            other => panic!("unexpected detail table {:?}", other),
        }
        let top = dash.top_owners.as_ref().unwrap().ready().unwrap();
        assert_eq!(top[0].value, "Alice");
        assert_eq!(dash.top_groups.as_ref().unwrap().ready().unwrap().len(), 2);
    }

    #[test]
    fn test_hierarchical_counts_view() {
        let leads = leads();
        let config = DashboardConfig::default();
        let dash = build_dashboard(&leads, &FilterSelection::all(&leads), DetailView::HierarchicalCounts, &config);

        match dash.detail.unwrap().ready().unwrap() {
            DetailTable::HierarchicalCounts { fields, rows } => {
                assert_eq!(fields.len(), 4);
                let carol = rows.iter().find(|r| r.path[2] == "Carol").unwrap();
                assert_eq!(carol.path, vec!["South", "Buyer", "Carol", "Lost"]);
                assert_eq!(carol.count, 1);
            }
            other => panic!("unexpected detail table {:?}", other),
        }
    }

    #[test]
    fn test_variant_disables_rankings() {
        let leads = leads();
        let config = DashboardConfig::for_variant(Variant::LeadTypeMix);
        let dash = build_dashboard(&leads, &FilterSelection::all(&leads), DetailView::FilteredRows, &config);

        assert!(dash.top_owners.is_none());
        assert!(dash.owners_needing_attention.is_none());
        let json = serde_json::to_value(&dash).unwrap();
        assert!(json.get("top_groups").is_none());
        assert_eq!(json["hierarchy"]["status"], "ready");
        assert_eq!(json["hierarchy"]["table"]["fields"][1], "lead_type");
    }

    #[test]
    fn test_empty_selection_renders_empty_tables() {
        let leads = leads();
        let config = DashboardConfig::default();
        let dash = build_dashboard(&leads, &FilterSelection::none(), DetailView::FilteredRows, &config);

        assert_eq!(dash.filtered_leads, 0);
        assert!(dash.stage_distribution.unwrap().ready().unwrap().is_empty());
        assert!(dash.conversion_rates.unwrap().ready().unwrap().is_empty());
        assert!(dash.top_owners.unwrap().ready().unwrap().is_empty());
        assert!(dash.hierarchy.unwrap().ready().unwrap().nodes.is_empty());
    }

    #[test]
    fn test_missing_column_only_affects_dependent_sections() {
        let leads = load_leads_from_str(
            "Lead Source,Lead Stage,Group\nWeb,New Lead,North\nAds,Lost,South\n",
        )
        .unwrap();
        let config = DashboardConfig::default();
        let dash = build_dashboard(&leads, &FilterSelection::all(&leads), DetailView::FilteredRows, &config);

        assert!(dash.stage_by_source.unwrap().ready().is_some());
        assert!(dash.stage_distribution.unwrap().ready().is_some());
        assert!(dash.top_groups.unwrap().ready().is_some());
        match dash.top_owners.unwrap() {
            SectionOutcome::Unavailable { reason } => assert!(reason.contains("Owner")),
            other => panic!("expected unavailable, got {:?}", other),
        }
        assert!(dash.hierarchy.unwrap().ready().is_none());
    }
}
