//! Lead aggregation pipeline
//!
//! Pure functions turning a filtered view of the lead set into the derived
//! tables behind every chart and ranking. Nothing here allocates state that
//! outlives a call; every filter change recomputes from scratch.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::error::{DashboardError, Result};
use crate::models::{FilterSelection, LeadField, LeadRecord, LeadSet};

/// Stages counted as a positive outcome for conversion and rankings
pub const DEFAULT_POSITIVE_STAGES: [&str; 3] = ["New Lead", "Walking Planned", "Walking Done"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositiveStages(BTreeSet<String>);

impl PositiveStages {
    pub fn new<S: Into<String>>(stages: impl IntoIterator<Item = S>) -> Self {
        Self(stages.into_iter().map(Into::into).collect())
    }

    pub fn contains(&self, stage: &str) -> bool {
        self.0.contains(stage)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl Default for PositiveStages {
    fn default() -> Self {
        Self::new(DEFAULT_POSITIVE_STAGES)
    }
}

/// Ordered list of fields a hierarchical breakdown descends through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<LeadField>", into = "Vec<LeadField>")]
pub struct HierarchyPath(Vec<LeadField>);

impl HierarchyPath {
    pub fn new(fields: Vec<LeadField>) -> Result<Self> {
        if fields.is_empty() {
            return Err(DashboardError::EmptyHierarchyPath);
        }
        Ok(Self(fields))
    }

    /// Group -> Owner -> Lead Stage
    pub fn group_owner_stage() -> Self {
        Self(vec![LeadField::Group, LeadField::Owner, LeadField::LeadStage])
    }

    /// Group -> Lead Type -> Owner
    pub fn group_type_owner() -> Self {
        Self(vec![LeadField::Group, LeadField::LeadType, LeadField::Owner])
    }

    /// Group -> Lead Type -> Owner -> Lead Stage, the flat counts table
    pub fn detailed() -> Self {
        Self(vec![
            LeadField::Group,
            LeadField::LeadType,
            LeadField::Owner,
            LeadField::LeadStage,
        ])
    }

    pub fn fields(&self) -> &[LeadField] {
        &self.0
    }

    /// Parse a comma separated list such as `group,owner,lead_stage`.
    pub fn parse(list: &str) -> Result<Self> {
        let fields = list
            .split(',')
            .filter(|s| !s.trim().is_empty())
            .map(|s| s.trim().parse())
            .collect::<Result<Vec<LeadField>>>()?;
        Self::new(fields)
    }
}

impl TryFrom<Vec<LeadField>> for HierarchyPath {
    type Error = DashboardError;

    fn try_from(fields: Vec<LeadField>) -> Result<Self> {
        Self::new(fields)
    }
}

impl From<HierarchyPath> for Vec<LeadField> {
    fn from(path: HierarchyPath) -> Self {
        path.0
    }
}

/// View over the rows of a [`LeadSet`] whose source is selected.
#[derive(Debug, Clone)]
pub struct FilteredLeads<'a> {
    rows: Vec<&'a LeadRecord>,
}

impl<'a> FilteredLeads<'a> {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a LeadRecord> + '_ {
        self.rows.iter().copied()
    }
}

// ============================================================================
// Result Rows
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageSourceCount {
    pub lead_stage: String,
    pub lead_source: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathCount {
    pub path: Vec<String>,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HierarchyNode {
    pub label: String,
    pub count: u64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<HierarchyNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageShare {
    pub lead_stage: String,
    pub count: u64,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceConversion {
    pub lead_source: String,
    pub total_leads: u64,
    pub positive_outcomes: u64,
    pub conversion_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedCount {
    pub value: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceStage {
    pub lead_source: String,
    pub lead_stage: String,
}

// ============================================================================
// Operations
// ============================================================================

/// Round to one decimal place, ties to even.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}

/// `part / whole` as a percentage with one decimal; 0.0 when `whole` is zero.
pub fn percent(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    round1(part as f64 / whole as f64 * 100.0)
}

pub fn filter<'a>(leads: &'a LeadSet, selection: &FilterSelection) -> FilteredLeads<'a> {
    FilteredLeads {
        rows: leads
            .records()
            .iter()
            .filter(|r| selection.contains(&r.lead_source))
            .collect(),
    }
}

fn count_by<'a, K: Ord>(
    rows: impl Iterator<Item = &'a LeadRecord>,
    key: impl Fn(&'a LeadRecord) -> K,
) -> BTreeMap<K, u64> {
    let mut counts = BTreeMap::new();
    for row in rows {
        *counts.entry(key(row)).or_insert(0) += 1;
    }
    counts
}

/// Counts per (stage, source) pair, ordered by stage then source.
pub fn stage_by_source(fl: &FilteredLeads) -> Vec<StageSourceCount> {
    count_by(fl.iter(), |r| (r.lead_stage.as_str(), r.lead_source.as_str()))
        .into_iter()
        .map(|((stage, source), count)| StageSourceCount {
            lead_stage: stage.to_string(),
            lead_source: source.to_string(),
            count,
        })
        .collect()
}

/// Count of every distinct combination of values along `path`, ordered by
/// the path values.
pub fn hierarchy(fl: &FilteredLeads, path: &HierarchyPath) -> Vec<PathCount> {
    count_by(fl.iter(), |r| {
        path.fields().iter().map(|f| r.field(*f)).collect::<Vec<_>>()
    })
    .into_iter()
    .map(|(values, count)| PathCount {
        path: values.into_iter().map(str::to_string).collect(),
        count,
    })
    .collect()
}

/// The counts of [`hierarchy`] nested level by level. Inner nodes carry the
/// sum of their children.
pub fn hierarchy_tree(fl: &FilteredLeads, path: &HierarchyPath) -> Vec<HierarchyNode> {
    let mut roots: Vec<HierarchyNode> = Vec::new();
    for entry in hierarchy(fl, path) {
        let mut level = &mut roots;
        for label in entry.path {
            // rows arrive sorted, so a matching sibling is always the last one
            let reuse = level.last().map_or(false, |n| n.label == label);
            if !reuse {
                level.push(HierarchyNode {
                    label,
                    count: 0,
                    children: Vec::new(),
                });
            }
            let last = level.len() - 1;
            let node = &mut level[last];
            node.count += entry.count;
            level = &mut node.children;
        }
    }
    roots
}

/// Share of each stage in the filtered set, largest first.
pub fn stage_distribution(fl: &FilteredLeads) -> Vec<StageShare> {
    let counts = count_by(fl.iter(), |r| r.lead_stage.as_str());
    let total: u64 = counts.values().sum();

    let mut shares: Vec<StageShare> = counts
        .into_iter()
        .map(|(stage, count)| StageShare {
            lead_stage: stage.to_string(),
            count,
            percentage: percent(count, total),
        })
        .collect();
    shares.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.lead_stage.cmp(&b.lead_stage)));
    shares
}

/// Per-source totals and the share of rows in a positive stage.
pub fn conversion_rate(fl: &FilteredLeads, positive: &PositiveStages) -> Vec<SourceConversion> {
    let mut totals: BTreeMap<&str, (u64, u64)> = BTreeMap::new();
    for row in fl.iter() {
        let entry = totals.entry(row.lead_source.as_str()).or_insert((0, 0));
        entry.0 += 1;
        if positive.contains(&row.lead_stage) {
            entry.1 += 1;
        }
    }

    totals
        .into_iter()
        .map(|(source, (total, converted))| SourceConversion {
            lead_source: source.to_string(),
            total_leads: total,
            positive_outcomes: converted,
            conversion_rate: percent(converted, total),
        })
        .collect()
}

fn ranked(counts: HashMap<&str, u64>) -> Vec<RankedCount> {
    counts
        .into_iter()
        .map(|(value, count)| RankedCount {
            value: value.to_string(),
            count,
        })
        .collect()
}

/// Positive-outcome counts per `field` value, best first, at most `n` rows.
/// Ties resolve by value ascending.
pub fn top_by(
    fl: &FilteredLeads,
    field: LeadField,
    positive: &PositiveStages,
    n: usize,
) -> Vec<RankedCount> {
    let mut counts: HashMap<&str, u64> = HashMap::new();
    for row in fl.iter().filter(|r| positive.contains(&r.lead_stage)) {
        *counts.entry(row.field(field)).or_insert(0) += 1;
    }

    let mut rows = ranked(counts);
    rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));
    rows.truncate(n);
    rows
}

/// Total counts over all stages per `field` value, smallest first, at most
/// `n` rows. Ties resolve by value ascending.
pub fn bottom_by(fl: &FilteredLeads, field: LeadField, n: usize) -> Vec<RankedCount> {
    let mut counts: HashMap<&str, u64> = HashMap::new();
    for row in fl.iter() {
        *counts.entry(row.field(field)).or_insert(0) += 1;
    }

    let mut rows = ranked(counts);
    rows.sort_by(|a, b| a.count.cmp(&b.count).then_with(|| a.value.cmp(&b.value)));
    rows.truncate(n);
    rows
}

/// The (source, stage) columns of the filtered rows, in file order.
pub fn filtered_rows(fl: &FilteredLeads) -> Vec<SourceStage> {
    fl.iter()
        .map(|r| SourceStage {
            lead_source: r.lead_source.clone(),
            lead_stage: r.lead_stage.clone(),
        })
        .collect()
}
