//! Dashboard configuration
//!
//! Which hierarchy path the sunburst walks, which sections are shown and how
//! many rows the rankings keep. Loaded from an optional JSON file; every
//! field falls back to the preset of the chosen variant.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use std::str::FromStr;
use tracing::info;

use crate::error::{DashboardError, Result};
use crate::pipeline::{HierarchyPath, PositiveStages};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    StageBySource,
    Hierarchy,
    Detail,
    StageDistribution,
    ConversionRates,
    TopOwners,
    TopGroups,
    OwnersNeedingAttention,
}

impl Section {
    pub const ALL: [Section; 8] = [
        Section::StageBySource,
        Section::Hierarchy,
        Section::Detail,
        Section::StageDistribution,
        Section::ConversionRates,
        Section::TopOwners,
        Section::TopGroups,
        Section::OwnersNeedingAttention,
    ];
}

/// Preset dashboard layouts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Variant {
    /// Group -> Owner -> Stage sunburst with every chart and ranking
    #[default]
    OwnerFunnel,
    /// Group -> Lead Type -> Owner sunburst, no ranked tables
    LeadTypeMix,
}

impl FromStr for Variant {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "owner-funnel" => Ok(Variant::OwnerFunnel),
            "lead-type-mix" => Ok(Variant::LeadTypeMix),
            other => Err(DashboardError::Config(format!(
                "unknown variant '{}', expected owner-funnel or lead-type-mix",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardConfig {
    pub variant: Variant,
    pub hierarchy_path: HierarchyPath,
    pub detail_path: HierarchyPath,
    pub positive_stages: PositiveStages,
    pub top_owners: usize,
    pub top_groups: usize,
    pub bottom_owners: usize,
    pub sections: BTreeSet<Section>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self::for_variant(Variant::default())
    }
}

/// On-disk form; anything left out comes from the variant preset.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    variant: Variant,
    hierarchy_path: Option<HierarchyPath>,
    detail_path: Option<HierarchyPath>,
    positive_stages: Option<Vec<String>>,
    top_owners: Option<usize>,
    top_groups: Option<usize>,
    bottom_owners: Option<usize>,
    sections: Option<BTreeSet<Section>>,
}

impl DashboardConfig {
    pub fn for_variant(variant: Variant) -> Self {
        let (hierarchy_path, sections) = match variant {
            Variant::OwnerFunnel => (
                HierarchyPath::group_owner_stage(),
                Section::ALL.into_iter().collect(),
            ),
            Variant::LeadTypeMix => (
                HierarchyPath::group_type_owner(),
                [
                    Section::StageBySource,
                    Section::Hierarchy,
                    Section::Detail,
                    Section::StageDistribution,
                    Section::ConversionRates,
                ]
                .into_iter()
                .collect(),
            ),
        };

        Self {
            variant,
            hierarchy_path,
            detail_path: HierarchyPath::detailed(),
            positive_stages: PositiveStages::default(),
            top_owners: 5,
            top_groups: 3,
            bottom_owners: 5,
            sections,
        }
    }

    pub fn is_enabled(&self, section: Section) -> bool {
        self.sections.contains(&section)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let file: ConfigFile =
            serde_json::from_str(content).map_err(|e| DashboardError::Config(e.to_string()))?;

        let mut config = Self::for_variant(file.variant);
        if let Some(path) = file.hierarchy_path {
            config.hierarchy_path = path;
        }
        if let Some(path) = file.detail_path {
            config.detail_path = path;
        }
        if let Some(stages) = file.positive_stages {
            config.positive_stages = PositiveStages::new(stages);
        }
        if let Some(n) = file.top_owners {
            config.top_owners = n;
        }
        if let Some(n) = file.top_groups {
            config.top_groups = n;
        }
        if let Some(n) = file.bottom_owners {
            config.bottom_owners = n;
        }
        if let Some(sections) = file.sections {
            config.sections = sections;
        }
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| DashboardError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&content)?;
        info!("Loaded dashboard config from {:?} ({:?})", path, config.variant);
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LeadField;

    #[test]
    fn test_variant_presets() {
        let funnel = DashboardConfig::for_variant(Variant::OwnerFunnel);
        assert_eq!(funnel.hierarchy_path, HierarchyPath::group_owner_stage());
        assert!(funnel.is_enabled(Section::TopOwners));
        assert_eq!((funnel.top_owners, funnel.top_groups, funnel.bottom_owners), (5, 3, 5));

        let mix = DashboardConfig::for_variant(Variant::LeadTypeMix);
        assert_eq!(mix.hierarchy_path, HierarchyPath::group_type_owner());
        assert!(!mix.is_enabled(Section::TopGroups));
        assert!(mix.is_enabled(Section::Detail));
    }

    #[test]
    fn test_json_overrides_preset() {
        let config = DashboardConfig::from_json(
            r#"{
                "variant": "lead-type-mix",
                "hierarchy_path": ["group", "owner"],
                "positive_stages": ["Walking Done"],
                "top_owners": 10
            }"#,
        )
        .unwrap();
        assert_eq!(config.variant, Variant::LeadTypeMix);
        assert_eq!(config.hierarchy_path.fields(), &[LeadField::Group, LeadField::Owner]);
        assert!(config.positive_stages.contains("Walking Done"));
        assert!(!config.positive_stages.contains("New Lead"));
        assert_eq!(config.top_owners, 10);
        assert_eq!(config.top_groups, 3);
    }

    #[test]
    fn test_empty_json_is_default() {
        assert_eq!(DashboardConfig::from_json("{}").unwrap(), DashboardConfig::default());
    }

    #[test]
    fn test_rejects_bad_config() {
        assert!(DashboardConfig::from_json(r#"{"hierarchy_path": []}"#).is_err());
        assert!(DashboardConfig::from_json(r#"{"colour": "blue"}"#).is_err());
        assert!("sunburst".parse::<Variant>().is_err());
    }
}
