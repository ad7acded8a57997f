use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::str::FromStr;

use crate::error::{DashboardError, Result};

/// Column of the lead file the pipeline knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadField {
    LeadSource,
    LeadStage,
    Group,
    Owner,
    LeadType,
}

impl LeadField {
    pub const ALL: [LeadField; 5] = [
        LeadField::LeadSource,
        LeadField::LeadStage,
        LeadField::Group,
        LeadField::Owner,
        LeadField::LeadType,
    ];

    /// Literal CSV header (case and spacing sensitive)
    pub fn header(self) -> &'static str {
        match self {
            LeadField::LeadSource => "Lead Source",
            LeadField::LeadStage => "Lead Stage",
            LeadField::Group => "Group",
            LeadField::Owner => "Owner",
            LeadField::LeadType => "Lead Type",
        }
    }

    pub fn from_header(header: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.header() == header)
    }
}

impl fmt::Display for LeadField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

impl FromStr for LeadField {
    type Err = DashboardError;

    /// Accepts the CSV header or its snake_case name.
    fn from_str(s: &str) -> Result<Self> {
        if let Some(field) = Self::from_header(s) {
            return Ok(field);
        }
        match s.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "lead_source" | "source" => Ok(LeadField::LeadSource),
            "lead_stage" | "stage" => Ok(LeadField::LeadStage),
            "group" => Ok(LeadField::Group),
            "owner" => Ok(LeadField::Owner),
            "lead_type" | "type" => Ok(LeadField::LeadType),
            _ => Err(DashboardError::UnknownField(s.to_string())),
        }
    }
}

/// One row of the uploaded lead file. Unknown columns are ignored and
/// absent ones deserialize to empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadRecord {
    #[serde(rename = "Lead Source", default)]
    pub lead_source: String,
    #[serde(rename = "Lead Stage", default)]
    pub lead_stage: String,
    #[serde(rename = "Group", default)]
    pub group: String,
    #[serde(rename = "Owner", default)]
    pub owner: String,
    #[serde(rename = "Lead Type", default)]
    pub lead_type: String,
}

impl LeadRecord {
    pub fn new(
        lead_source: impl Into<String>,
        lead_stage: impl Into<String>,
        group: impl Into<String>,
        owner: impl Into<String>,
        lead_type: impl Into<String>,
    ) -> Self {
        Self {
            lead_source: lead_source.into(),
            lead_stage: lead_stage.into(),
            group: group.into(),
            owner: owner.into(),
            lead_type: lead_type.into(),
        }
    }

    pub fn field(&self, field: LeadField) -> &str {
        match field {
            LeadField::LeadSource => &self.lead_source,
            LeadField::LeadStage => &self.lead_stage,
            LeadField::Group => &self.group,
            LeadField::Owner => &self.owner,
            LeadField::LeadType => &self.lead_type,
        }
    }
}

/// Immutable set of leads as loaded from a file, with the columns it carried.
#[derive(Debug, Clone, Default)]
pub struct LeadSet {
    records: Vec<LeadRecord>,
    columns: BTreeSet<LeadField>,
}

impl LeadSet {
    /// Lead set with every known column present.
    pub fn new(records: Vec<LeadRecord>) -> Self {
        Self {
            records,
            columns: LeadField::ALL.into_iter().collect(),
        }
    }

    pub fn with_columns(records: Vec<LeadRecord>, columns: BTreeSet<LeadField>) -> Self {
        Self { records, columns }
    }

    pub fn records(&self) -> &[LeadRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn columns(&self) -> &BTreeSet<LeadField> {
        &self.columns
    }

    pub fn has_column(&self, field: LeadField) -> bool {
        self.columns.contains(&field)
    }

    /// Fails with the first field in `fields` that the file did not carry.
    pub fn require(&self, fields: &[LeadField]) -> Result<()> {
        match fields.iter().find(|f| !self.has_column(**f)) {
            Some(missing) => Err(DashboardError::MissingColumn {
                column: missing.header(),
            }),
            None => Ok(()),
        }
    }

    /// Distinct Lead Source values in order of first appearance
    pub fn sources(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .filter(|r| seen.insert(r.lead_source.as_str()))
            .map(|r| r.lead_source.clone())
            .collect()
    }
}

/// Lead Source values currently selected in the filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection(BTreeSet<String>);

impl FilterSelection {
    /// Every source present in `leads` (the "select all" case)
    pub fn all(leads: &LeadSet) -> Self {
        Self(leads.sources().into_iter().collect())
    }

    pub fn none() -> Self {
        Self(BTreeSet::new())
    }

    pub fn contains(&self, source: &str) -> bool {
        self.0.contains(source)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for FilterSelection {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}
