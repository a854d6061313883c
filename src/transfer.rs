//! CSV import and export over the generic storage path.
//!
//! Export writes every column of a table in declaration order with a
//! header row. Import reads the same shape back: header names must be
//! columns of the target table, an `id` column is ignored so identities
//! are regenerated, and rows insert one at a time; the first constraint
//! violation aborts the batch and rows already written stay.

use rusqlite::types::Value;
use thiserror::Error;

use crate::db::{CrmDb, DbError};

#[derive(Debug, Error)]
pub enum TransferError {
    #[error("{0}")]
    Db(#[from] DbError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Row {row}: {source}")]
    Row { row: usize, source: DbError },
}

/// Render a table as CSV: header row, then all rows in table order.
pub fn export_csv(db: &CrmDb, table: &str) -> Result<String, TransferError> {
    let (columns, rows) = db.select_all(table)?;

    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(&columns)?;
    for row in rows {
        writer.write_record(row.iter().map(value_to_field))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Append CSV rows to a table. Returns the number of rows inserted.
///
/// The header is validated up front so a column mismatch fails before
/// anything is written; a mid-batch constraint violation reports the
/// failing line and leaves earlier rows committed.
pub fn import_csv(db: &CrmDb, table: &str, data: &str) -> Result<usize, TransferError> {
    let mut reader = csv::Reader::from_reader(data.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    // Identity values are regenerated on import.
    let keep: Vec<usize> = headers
        .iter()
        .enumerate()
        .filter(|(_, h)| h.as_str() != "id")
        .map(|(i, _)| i)
        .collect();
    let columns: Vec<String> = keep.iter().map(|&i| headers[i].clone()).collect();

    db.validate_columns(table, &columns)?;

    let mut inserted = 0;
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        let values: Vec<Value> = keep
            .iter()
            .map(|&i| field_to_value(record.get(i).unwrap_or("")))
            .collect();

        // Line number as seen in the file: header is line 1.
        db.insert_row(table, &columns, values)
            .map_err(|source| TransferError::Row {
                row: index + 2,
                source,
            })?;
        inserted += 1;
    }

    Ok(inserted)
}

fn value_to_field(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Integer(i) => i.to_string(),
        Value::Real(r) => r.to_string(),
        Value::Text(t) => t.clone(),
        Value::Blob(b) => String::from_utf8_lossy(b).into_owned(),
    }
}

fn field_to_value(field: &str) -> Value {
    // Empty cells round-trip as NULL; SQLite's column affinity coerces
    // numeric text back to INTEGER/REAL on insert.
    if field.is_empty() {
        Value::Null
    } else {
        Value::Text(field.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{test_db, NewCompany, NewDeal, Stage};

    fn company(name: &str) -> NewCompany {
        NewCompany {
            name: name.to_string(),
            industry: Some("Energy".to_string()),
            city: None,
            country: Some("DE".to_string()),
            website: None,
        }
    }

    #[test]
    fn test_export_has_header_and_all_rows() {
        let db = test_db();
        db.insert_company(&company("Helios Energie GmbH")).expect("insert");
        db.insert_company(&company("Nordpark Immobilien")).expect("insert");

        let out = export_csv(&db, "companies").expect("export");
        let mut lines = out.lines();
        assert_eq!(
            lines.next(),
            Some("id,name,industry,city,country,website,created_at")
        );
        assert_eq!(lines.count(), 2);
        assert!(out.contains("Helios Energie GmbH"));
    }

    #[test]
    fn test_round_trip_preserves_rows_modulo_ids() {
        let source = test_db();
        source.insert_company(&company("Helios Energie GmbH")).expect("insert");
        source.insert_company(&company("Nordpark Immobilien")).expect("insert");

        let exported = export_csv(&source, "companies").expect("export");

        let target = test_db();
        let inserted = import_csv(&target, "companies", &exported).expect("import");
        assert_eq!(inserted, 2);

        let (_, source_rows) = source.select_all("companies").expect("read source");
        let (_, target_rows) = target.select_all("companies").expect("read target");
        assert_eq!(source_rows.len(), target_rows.len());
        for (src, dst) in source_rows.iter().zip(target_rows.iter()) {
            // Column 0 is the regenerated id; everything after must match.
            assert_eq!(src[1..], dst[1..]);
        }
    }

    #[test]
    fn test_import_restores_numeric_affinity() {
        let source = test_db();
        source
            .insert_deal(&NewDeal {
                name: "Rooftop PV".to_string(),
                company_id: None,
                contact_id: None,
                amount: 180_000.5,
                stage: Stage::Qualified,
                probability: 30,
                expected_close: Some("2026-10-01".to_string()),
            })
            .expect("insert");

        let exported = export_csv(&source, "deals").expect("export");
        let target = test_db();
        import_csv(&target, "deals", &exported).expect("import");

        let deals = target.list_deals().expect("list");
        assert_eq!(deals[0].amount, 180_000.5);
        assert_eq!(deals[0].stage, Stage::Qualified);
        assert_eq!(deals[0].probability, 30);
    }

    #[test]
    fn test_import_rejects_unknown_column_before_writing() {
        let db = test_db();
        let err = import_csv(&db, "companies", "name,shoe_size\nAcme,44\n").unwrap_err();
        assert!(matches!(
            err,
            TransferError::Db(DbError::UnknownColumn { .. })
        ));
        assert_eq!(db.count_companies().expect("count"), 0);
    }

    #[test]
    fn test_import_stops_at_first_violation_and_keeps_prior_rows() {
        let db = test_db();
        let data = "name,country\nAlpha GmbH,DE\nAlpha GmbH,DE\nBeta AG,DE\n";

        let err = import_csv(&db, "companies", data).unwrap_err();
        match err {
            TransferError::Row { row, source } => {
                assert_eq!(row, 3);
                assert!(source.to_string().contains("UNIQUE"));
            }
            other => panic!("unexpected error: {other}"),
        }
        // The first row was committed before the duplicate failed.
        assert_eq!(db.count_companies().expect("count"), 1);
    }

    #[test]
    fn test_empty_cells_import_as_null() {
        let db = test_db();
        import_csv(&db, "companies", "name,industry\nAcme,\n").expect("import");

        let companies = db.list_companies().expect("list");
        assert_eq!(companies[0].industry, None);
    }
}
