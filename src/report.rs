//! Plain-text rendering of a dashboard for the terminal.

use std::fmt::Write;

use crate::dashboard::{Dashboard, DetailTable, SectionOutcome};
use crate::models::LeadField;
use crate::pipeline::{HierarchyNode, RankedCount};

fn section_header(out: &mut String, title: &str) {
    let _ = writeln!(out, "\n{}", "═".repeat(80));
    let _ = writeln!(out, "  {}", title);
    let _ = writeln!(out, "{}\n", "═".repeat(80));
}

fn subsection(out: &mut String, title: &str) {
    let _ = writeln!(out, "\n{}", title);
    let _ = writeln!(out, "{}", "─".repeat(70));
}

/// Writes the body of a section, or the reason it could not be built.
fn outcome<T>(out: &mut String, section: &Option<SectionOutcome<T>>, body: impl FnOnce(&mut String, &T)) {
    match section {
        None => {}
        Some(SectionOutcome::Ready { table }) => body(out, table),
        Some(SectionOutcome::Unavailable { reason }) => {
            let _ = writeln!(out, "  (unavailable: {})", reason);
        }
    }
}

fn ranked_table(out: &mut String, label: &str, count_label: &str, rows: &[RankedCount]) {
    if rows.is_empty() {
        let _ = writeln!(out, "  (no leads)");
        return;
    }
    let _ = writeln!(out, "  {:30} {:>18}", label, count_label);
    let _ = writeln!(out, "  {}", "─".repeat(49));
    for row in rows {
        let _ = writeln!(out, "  {:30} {:>18}", row.value, row.count);
    }
}

fn tree(out: &mut String, nodes: &[HierarchyNode], depth: usize) {
    for node in nodes {
        let _ = writeln!(out, "  {}{:<w$} {:>8}", "  ".repeat(depth), node.label, node.count, w = 40 - 2 * depth.min(10));
        tree(out, &node.children, depth + 1);
    }
}

fn field_list(fields: &[LeadField]) -> String {
    fields.iter().map(|f| f.header()).collect::<Vec<_>>().join(" / ")
}

pub fn render_dashboard(dash: &Dashboard) -> String {
    let mut out = String::new();

    section_header(&mut out, "LEAD ANALYSIS DASHBOARD");
    let _ = writeln!(out, "  Total Leads:          {:>12}", dash.total_leads);
    let _ = writeln!(out, "  Filtered Leads:       {:>12}", dash.filtered_leads);
    let _ = writeln!(out, "  Lead Sources:         {}", dash.selected_sources.join(", "));

    if dash.stage_by_source.is_some() {
        subsection(&mut out, "Lead Stage Distribution by Lead Source");
        outcome(&mut out, &dash.stage_by_source, |out, rows| {
            let _ = writeln!(out, "  {:24} {:24} {:>10}", "Lead Stage", "Lead Source", "Count");
            for row in rows {
                let _ = writeln!(out, "  {:24} {:24} {:>10}", row.lead_stage, row.lead_source, row.count);
            }
        });
    }

    if dash.hierarchy.is_some() {
        subsection(&mut out, "Hierarchical View of Leads");
        outcome(&mut out, &dash.hierarchy, |out, table| {
            let _ = writeln!(out, "  {}", field_list(&table.fields));
            tree(out, &table.nodes, 0);
        });
    }

    if dash.detail.is_some() {
        outcome(&mut out, &dash.detail, |out, table| match table {
            DetailTable::FilteredRows { rows } => {
                subsection(out, "Filtered Data");
                let _ = writeln!(out, "  {:30} {:30}", "Lead Source", "Lead Stage");
                for row in rows {
                    let _ = writeln!(out, "  {:30} {:30}", row.lead_source, row.lead_stage);
                }
            }
            DetailTable::HierarchicalCounts { fields, rows } => {
                subsection(out, "Hierarchical Value Counts");
                let _ = writeln!(out, "  {} / Count", field_list(fields));
                for row in rows {
                    let _ = writeln!(out, "  {} {:>8}", row.path.join(" / "), row.count);
                }
            }
        });
    }

    if dash.stage_distribution.is_some() {
        subsection(&mut out, "Lead Stage Share");
        outcome(&mut out, &dash.stage_distribution, |out, rows| {
            let _ = writeln!(out, "  {:30} {:>10} {:>10}", "Lead Stage", "Count", "Share");
            for row in rows {
                let _ = writeln!(out, "  {:30} {:>10} {:>9.1}%", row.lead_stage, row.count, row.percentage);
            }
        });
    }

    if dash.conversion_rates.is_some() {
        subsection(&mut out, "Lead Source Performance (Conversion Rates)");
        outcome(&mut out, &dash.conversion_rates, |out, rows| {
            let _ = writeln!(out, "  {:24} {:>12} {:>10} {:>12}", "Lead Source", "Total Leads", "Positive", "Conversion");
            for row in rows {
                let _ = writeln!(
                    out,
                    "  {:24} {:>12} {:>10} {:>11.1}%",
                    row.lead_source, row.total_leads, row.positive_outcomes, row.conversion_rate
                );
            }
        });
    }

    if dash.top_owners.is_some() || dash.top_groups.is_some() {
        section_header(&mut out, "TOP PERFORMERS");
    }
    if dash.top_owners.is_some() {
        subsection(&mut out, "Top Owners");
        outcome(&mut out, &dash.top_owners, |out, rows| {
            ranked_table(out, "Owner", "Positive Outcomes", rows)
        });
    }
    if dash.top_groups.is_some() {
        subsection(&mut out, "Top Groups");
        outcome(&mut out, &dash.top_groups, |out, rows| {
            ranked_table(out, "Group", "Positive Outcomes", rows)
        });
    }

    if dash.owners_needing_attention.is_some() {
        section_header(&mut out, "AREAS FOR IMPROVEMENT");
        subsection(&mut out, "Owners Needing Attention");
        outcome(&mut out, &dash.owners_needing_attention, |out, rows| {
            ranked_table(out, "Owner", "Total Leads", rows)
        });
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DashboardConfig;
    use crate::dashboard::{build_dashboard, DetailView};
    use crate::loader::load_leads_from_str;
    use crate::models::{FilterSelection, LeadRecord, LeadSet};

    #[test]
    fn test_render_full_dashboard() {
        let leads = LeadSet::new(vec![
            LeadRecord::new("Web", "New Lead", "North", "Alice", "Buyer"),
            LeadRecord::new("Ads", "Lost", "South", "Bob", "Renter"),
        ]);
        let dash = build_dashboard(
            &leads,
            &FilterSelection::all(&leads),
            DetailView::HierarchicalCounts,
            &DashboardConfig::default(),
        );
        let text = render_dashboard(&dash);

        assert!(text.contains("Lead Stage Distribution by Lead Source"));
        assert!(text.contains("Hierarchical Value Counts"));
        assert!(text.contains("North / Buyer / Alice / New Lead"));
        assert!(text.contains("Top Owners"));
        assert!(text.contains("Owners Needing Attention"));
        assert!(text.contains("50.0%"));
    }

    #[test]
    fn test_render_reports_unavailable_sections() {
        let leads = load_leads_from_str("Lead Source,Lead Stage\nWeb,Lost\n").unwrap();
        let dash = build_dashboard(
            &leads,
            &FilterSelection::all(&leads),
            DetailView::FilteredRows,
            &DashboardConfig::default(),
        );
        let text = render_dashboard(&dash);

        assert!(text.contains("unavailable: missing required column 'Group'"));
        assert!(text.contains("Filtered Data"));
    }
}
