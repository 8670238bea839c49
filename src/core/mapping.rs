use crate::utils::error::{EtlError, Result};
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};
use std::path::Path;

const COL_SOURCE: &str = "Source Field";
const COL_DESTINATION: &str = "Destination Field";
const COL_DEFAULT: &str = "Default Value";

/// One category's slice of the mapping document, loaded fresh each run and
/// read-only afterwards.
///
/// `defaults` carries an entry for every non-empty destination field of the
/// sheet; a field whose `Default Value` cell is empty maps to `Value::Null`,
/// so it still counts toward the required destination set.
#[derive(Debug, Clone, Default)]
pub struct MappingSpec {
    pub rename: HashMap<String, String>,
    pub defaults: HashMap<String, Value>,
    pub json_field_order: Vec<String>,
}

impl MappingSpec {
    /// Load a spec from a mapping sheet, optionally paired with the sheet
    /// that fixes the embedded document's field order.
    pub fn from_sheets(mapping_sheet: &Path, json_order_sheet: Option<&Path>) -> Result<Self> {
        let rows = read_sheet(mapping_sheet)?;

        let mut rename = HashMap::new();
        let mut defaults = HashMap::new();
        for row in &rows {
            if let (Some(source), Some(destination)) = (&row.source, &row.destination) {
                rename.insert(source.clone(), destination.clone());
            }
            if let Some(destination) = &row.destination {
                let default = row
                    .default
                    .clone()
                    .map(Value::String)
                    .unwrap_or(Value::Null);
                defaults.insert(destination.clone(), default);
            }
        }

        let json_field_order = match json_order_sheet {
            Some(sheet) => read_json_field_order(sheet)?,
            None => Vec::new(),
        };

        Ok(Self {
            rename,
            defaults,
            json_field_order,
        })
    }

    /// The exact key set every projected record must carry:
    /// `rename.values() ∪ defaults.keys()`. Sorted so projection output is
    /// deterministic; consumers address fields by name, not position.
    pub fn destination_fields(&self) -> BTreeSet<String> {
        self.rename
            .values()
            .chain(self.defaults.keys())
            .cloned()
            .collect()
    }
}

struct SheetRow {
    source: Option<String>,
    destination: Option<String>,
    default: Option<String>,
}

fn non_empty(cell: Option<&str>) -> Option<String> {
    cell.map(str::trim)
        .filter(|cell| !cell.is_empty())
        .map(str::to_string)
}

fn column_index(headers: &csv::StringRecord, name: &str, sheet: &Path) -> Result<usize> {
    headers
        .iter()
        .position(|header| header.trim() == name)
        .ok_or_else(|| {
            EtlError::mapping(format!(
                "sheet {} is missing required column '{}'",
                sheet.display(),
                name
            ))
        })
}

fn open_sheet(sheet: &Path) -> Result<csv::Reader<std::fs::File>> {
    csv::Reader::from_path(sheet).map_err(|e| {
        EtlError::mapping(format!("cannot open sheet {}: {}", sheet.display(), e))
    })
}

fn read_sheet(sheet: &Path) -> Result<Vec<SheetRow>> {
    let mut reader = open_sheet(sheet)?;
    let headers = reader.headers()?.clone();
    let source_idx = column_index(&headers, COL_SOURCE, sheet)?;
    let destination_idx = column_index(&headers, COL_DESTINATION, sheet)?;
    let default_idx = column_index(&headers, COL_DEFAULT, sheet)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(SheetRow {
            source: non_empty(record.get(source_idx)),
            destination: non_empty(record.get(destination_idx)),
            default: non_empty(record.get(default_idx)),
        });
    }
    Ok(rows)
}

/// Destination fields of the order sheet, verbatim in row order with empty
/// entries dropped. This order defines the on-disk document's key order.
fn read_json_field_order(sheet: &Path) -> Result<Vec<String>> {
    let mut reader = open_sheet(sheet)?;
    let headers = reader.headers()?.clone();
    let destination_idx = column_index(&headers, COL_DESTINATION, sheet)?;

    let mut fields = Vec::new();
    for record in reader.records() {
        let record = record?;
        if let Some(field) = non_empty(record.get(destination_idx)) {
            fields.push(field);
        }
    }
    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_sheet(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_rename_skips_rows_without_source() {
        let dir = TempDir::new().unwrap();
        let sheet = write_sheet(
            &dir,
            "mapping.csv",
            "Source Field,Destination Field,Default Value\n\
             cust_name,customerName,Unknown\n\
             ,status,ACTIVE\n",
        );

        let spec = MappingSpec::from_sheets(&sheet, None).unwrap();

        assert_eq!(spec.rename.len(), 1);
        assert_eq!(spec.rename.get("cust_name").unwrap(), "customerName");
        // Destination without a source still seeds a default.
        assert_eq!(
            spec.defaults.get("status").unwrap(),
            &Value::String("ACTIVE".to_string())
        );
    }

    #[test]
    fn test_empty_default_records_explicit_null() {
        let dir = TempDir::new().unwrap();
        let sheet = write_sheet(
            &dir,
            "mapping.csv",
            "Source Field,Destination Field,Default Value\n\
             created_at,createdAt,\n",
        );

        let spec = MappingSpec::from_sheets(&sheet, None).unwrap();

        assert_eq!(spec.defaults.get("createdAt").unwrap(), &Value::Null);
        assert!(spec.destination_fields().contains("createdAt"));
    }

    #[test]
    fn test_destination_fields_is_union_of_renames_and_defaults() {
        let dir = TempDir::new().unwrap();
        let sheet = write_sheet(
            &dir,
            "mapping.csv",
            "Source Field,Destination Field,Default Value\n\
             cust_name,customerName,Unknown\n\
             ,status,ACTIVE\n\
             cust_no,customerNumber,\n",
        );

        let spec = MappingSpec::from_sheets(&sheet, None).unwrap();
        let fields: Vec<_> = spec.destination_fields().into_iter().collect();

        assert_eq!(fields, vec!["customerName", "customerNumber", "status"]);
    }

    #[test]
    fn test_json_field_order_preserved_with_nulls_dropped() {
        let dir = TempDir::new().unwrap();
        let mapping = write_sheet(
            &dir,
            "mapping.csv",
            "Source Field,Destination Field,Default Value\n\
             cust_name,customerName,Unknown\n",
        );
        let order = write_sheet(
            &dir,
            "json_order.csv",
            "Destination Field\n\
             customerName\n\
             \n\
             status\n\
             dateOfBirth\n",
        );

        let spec = MappingSpec::from_sheets(&mapping, Some(&order)).unwrap();

        assert_eq!(
            spec.json_field_order,
            vec!["customerName", "status", "dateOfBirth"]
        );
    }

    #[test]
    fn test_missing_sheet_fails_fast() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("no_such_sheet.csv");

        let err = MappingSpec::from_sheets(&missing, None).unwrap_err();
        assert!(matches!(
            err,
            crate::utils::error::EtlError::MappingError { .. }
        ));
    }

    #[test]
    fn test_missing_column_fails_fast() {
        let dir = TempDir::new().unwrap();
        let sheet = write_sheet(
            &dir,
            "mapping.csv",
            "Source Field,Destination Field\n\
             cust_name,customerName\n",
        );

        let err = MappingSpec::from_sheets(&sheet, None).unwrap_err();
        assert!(matches!(
            err,
            crate::utils::error::EtlError::MappingError { .. }
        ));
    }
}
