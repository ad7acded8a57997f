//! CSV ingestion of lead files.

use csv::ReaderBuilder;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::error::{DashboardError, Result};
use crate::models::{LeadField, LeadRecord, LeadSet};

/// Load a lead file from disk.
pub fn load_leads_from_path(path: impl AsRef<Path>) -> Result<LeadSet> {
    let path = path.as_ref();
    info!("Reading leads from {:?}", path);
    let file = File::open(path).map_err(|source| DashboardError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_leads_from_reader(file)
}

/// Parse lead rows from any CSV source. Either the whole file parses or no
/// lead set is produced.
pub fn load_leads_from_reader<R: Read>(reader: R) -> Result<LeadSet> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(reader);

    let headers = reader.headers()?.clone();
    if headers.is_empty() || headers.iter().all(|h| h.trim().is_empty()) {
        return Err(DashboardError::MalformedFile("no header row".to_string()));
    }

    let columns: BTreeSet<LeadField> = headers.iter().filter_map(LeadField::from_header).collect();
    for field in LeadField::ALL {
        if !columns.contains(&field) {
            warn!("Lead file has no '{}' column", field.header());
        }
    }
    debug!("Headers: {:?}", headers);

    let records = reader
        .deserialize::<LeadRecord>()
        .collect::<std::result::Result<Vec<_>, _>>()?;

    info!("Parsed {} lead records", records.len());
    Ok(LeadSet::with_columns(records, columns))
}

/// Parse lead rows from an in-memory upload.
pub fn load_leads_from_str(content: &str) -> Result<LeadSet> {
    load_leads_from_reader(content.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = "\
Lead Source,Lead Stage,Group,Owner,Lead Type,Phone
Web,New Lead,G1,Alice,Buyer,555-0100
Web,Lost,G1,Bob,Buyer,555-0101
Referral,Walking Done,G2,Alice,Renter,555-0102
";

    #[test]
    fn test_load_sample() {
        let leads = load_leads_from_str(SAMPLE).unwrap();
        assert_eq!(leads.len(), 3);
        assert_eq!(leads.columns().len(), 5);
        assert_eq!(leads.records()[2], LeadRecord::new("Referral", "Walking Done", "G2", "Alice", "Renter"));
    }

    #[test]
    fn test_missing_column_still_loads() {
        let leads = load_leads_from_str("Lead Source,Lead Stage\nWeb,Lost\n").unwrap();
        assert_eq!(leads.len(), 1);
        assert!(!leads.has_column(LeadField::Owner));
        assert_eq!(leads.records()[0].owner, "");
        assert!(leads.require(&[LeadField::LeadSource, LeadField::LeadStage]).is_ok());
        assert!(leads.require(&[LeadField::Group]).is_err());
    }

    #[test]
    fn test_header_names_are_exact() {
        let leads = load_leads_from_str("lead source,Lead Stage\nWeb,Lost\n").unwrap();
        assert!(!leads.has_column(LeadField::LeadSource));
    }

    #[test]
    fn test_headers_only_is_empty_set() {
        let leads = load_leads_from_str("Lead Source,Lead Stage,Group,Owner,Lead Type\n").unwrap();
        assert!(leads.is_empty());
    }

    #[test]
    fn test_ragged_rows_are_malformed() {
        let err = load_leads_from_str("Lead Source,Lead Stage\nWeb,Lost,extra\n").unwrap_err();
        assert!(matches!(err, DashboardError::MalformedFile(_)));
    }

    #[test]
    fn test_empty_input_is_malformed() {
        let err = load_leads_from_str("").unwrap_err();
        assert!(matches!(err, DashboardError::MalformedFile(_)));
    }

    #[test]
    fn test_invalid_utf8_is_malformed() {
        let bytes: &[u8] = b"Lead Source,Lead Stage\n\xff\xfe,Lost\n";
        let err = load_leads_from_reader(bytes).unwrap_err();
        assert!(matches!(err, DashboardError::MalformedFile(_)));
    }

    #[test]
    fn test_load_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let leads = load_leads_from_path(file.path()).unwrap();
        assert_eq!(leads.sources(), vec!["Web", "Referral"]);
    }

    #[test]
    fn test_missing_path_is_io_error() {
        let err = load_leads_from_path("/nonexistent/leads.csv").unwrap_err();
        assert!(matches!(err, DashboardError::Io { .. }));
    }
}
