//! Synthetic lead generation
//!
//! Produces plausible lead files for demos and load testing. Each source has
//! its own stage mix so conversion rates differ between channels, and each
//! owner belongs to exactly one group.

use rand::distributions::{WeightedError, WeightedIndex};
use rand::prelude::*;

use crate::models::LeadRecord;

/// (source, weight of the source, stage weights in `STAGES` order)
const SOURCES: &[(&str, u32, [u32; 5])] = &[
    ("Website", 30, [30, 15, 10, 25, 20]),
    ("Referral", 15, [25, 25, 20, 10, 20]),
    ("Facebook Ads", 20, [35, 10, 5, 35, 15]),
    ("Google Ads", 20, [30, 12, 8, 30, 20]),
    ("Walk-in", 5, [10, 30, 35, 5, 20]),
    ("Property Portal", 10, [30, 15, 10, 25, 20]),
];

const STAGES: [&str; 5] = ["New Lead", "Walking Planned", "Walking Done", "Lost", "Follow Up"];

const GROUPS: &[(&str, &[&str])] = &[
    ("North Team", &["Aarav", "Bianca", "Chen"]),
    ("South Team", &["Dmitri", "Esther", "Farid", "Gwen"]),
    ("Central Team", &["Hana", "Ivan"]),
    ("Key Accounts", &["Jonas", "Keiko", "Lucia"]),
];

const LEAD_TYPES: &[(&str, u32)] = &[("Buyer", 50), ("Renter", 30), ("Investor", 15), ("Commercial", 5)];

pub struct LeadGenerator {
    source_dist: WeightedIndex<u32>,
    stage_dists: Vec<WeightedIndex<u32>>,
    type_dist: WeightedIndex<u32>,
    owners: Vec<(&'static str, &'static str)>,
}

impl LeadGenerator {
    pub fn new() -> Result<Self, WeightedError> {
        let source_dist = WeightedIndex::new(SOURCES.iter().map(|s| s.1))?;
        let stage_dists = SOURCES
            .iter()
            .map(|s| WeightedIndex::new(s.2))
            .collect::<Result<Vec<_>, _>>()?;
        let type_dist = WeightedIndex::new(LEAD_TYPES.iter().map(|t| t.1))?;
        let owners = GROUPS
            .iter()
            .flat_map(|(group, owners)| owners.iter().map(move |o| (*group, *o)))
            .collect();

        Ok(Self {
            source_dist,
            stage_dists,
            type_dist,
            owners,
        })
    }

    pub fn generate(&self, rng: &mut impl Rng) -> LeadRecord {
        let source_idx = self.source_dist.sample(rng);
        let stage = STAGES[self.stage_dists[source_idx].sample(rng)];
        let (group, owner) = self.owners[rng.gen_range(0..self.owners.len())];
        let lead_type = LEAD_TYPES[self.type_dist.sample(rng)].0;

        LeadRecord::new(SOURCES[source_idx].0, stage, group, owner, lead_type)
    }

    pub fn generate_many(&self, count: usize, rng: &mut impl Rng) -> Vec<LeadRecord> {
        (0..count).map(|_| self.generate(rng)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FilterSelection, LeadSet};
    use crate::pipeline::{conversion_rate, filter, PositiveStages};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;

    #[test]
    fn test_seed_is_reproducible() {
        let generator = LeadGenerator::new().unwrap();
        let a = generator.generate_many(50, &mut StdRng::seed_from_u64(7));
        let b = generator.generate_many(50, &mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
    }

    #[test]
    fn test_owner_belongs_to_one_group() {
        let generator = LeadGenerator::new().unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        let mut groups: HashMap<String, String> = HashMap::new();
        for lead in generator.generate_many(2000, &mut rng) {
            let group = groups.entry(lead.owner.clone()).or_insert(lead.group.clone());
            assert_eq!(*group, lead.group);
        }
        assert_eq!(groups.len(), 12);
    }

    #[test]
    fn test_walk_ins_convert_better_than_ads() {
        let generator = LeadGenerator::new().unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        let leads = LeadSet::new(generator.generate_many(20000, &mut rng));
        let rates = conversion_rate(&filter(&leads, &FilterSelection::all(&leads)), &PositiveStages::default());

        let rate = |source: &str| rates.iter().find(|r| r.lead_source == source).unwrap().conversion_rate;
        assert!(rate("Walk-in") > rate("Facebook Ads"));
    }
}
