use crate::config::RunConfig;
use crate::core::bank::Bank;
use crate::core::dataset::RawTables;
use crate::core::facility::Facility;
use crate::core::loan::Loan;
use crate::core::record::{Record, Table};
use crate::reporting::report::{AllocationReport, AssignmentRow, YieldRow};
use serde::Serialize;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("cannot write '{}': {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("cannot create directory '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot encode report as JSON: {0}")]
    Json(#[from] serde_json::Error),
}

fn write_rows<W: io::Write, T: Serialize>(
    output: W,
    delimiter: u8,
    header: &[&str],
    rows: &[T],
) -> Result<(), csv::Error> {
    // The header is written by hand so that an empty table still gets one.
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .from_writer(output);
    writer.write_record(header)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// `loan_id,facility_id`, one row per assigned loan.
pub fn write_assignments<W: io::Write>(
    output: W,
    delimiter: u8,
    rows: &[AssignmentRow],
) -> Result<(), csv::Error> {
    write_rows(output, delimiter, &["loan_id", "facility_id"], rows)
}

/// `facility_id,expected_yield`, one row per facility.
pub fn write_yields<W: io::Write>(
    output: W,
    delimiter: u8,
    rows: &[YieldRow],
) -> Result<(), csv::Error> {
    write_rows(output, delimiter, &["facility_id", "expected_yield"], rows)
}

fn create(path: &Path) -> Result<File, OutputError> {
    File::create(path).map_err(|e| OutputError::Csv {
        path: path.to_path_buf(),
        source: e.into(),
    })
}

/// Write the assignment and yield tables to the paths in `config`.
pub fn write_report_files(report: &AllocationReport, config: &RunConfig) -> Result<(), OutputError> {
    let assignments = report.assignments();
    let path = &config.assignments_path;
    write_assignments(create(path)?, config.delimiter, &assignments).map_err(|source| {
        OutputError::Csv {
            path: path.clone(),
            source,
        }
    })?;
    log::info!("wrote {} assignments to {}", assignments.len(), path.display());

    let yields = report.yields();
    let path = &config.yields_path;
    write_yields(create(path)?, config.delimiter, &yields).map_err(|source| OutputError::Csv {
        path: path.clone(),
        source,
    })?;
    log::info!("wrote {} facility yields to {}", yields.len(), path.display());
    Ok(())
}

pub fn report_to_json(report: &AllocationReport) -> Result<String, OutputError> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Column order used when writing input tables. Covenants are written
/// without an id column; their ids are their row numbers.
pub fn table_header(table: Table) -> &'static [&'static str] {
    match table {
        Table::Banks => Bank::FIELDS,
        Table::Covenants => &["bank_id", "facility_id", "banned_state", "max_default_likelihood"],
        Table::Facilities => Facility::FIELDS,
        Table::Loans => Loan::FIELDS,
    }
}

/// Write records as a delimited table. Missing fields become empty values.
pub fn write_records<W: io::Write>(
    output: W,
    delimiter: u8,
    header: &[&str],
    records: &[Record],
) -> Result<(), csv::Error> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(output);
    writer.write_record(header)?;
    for record in records {
        writer.write_record(header.iter().map(|field| record.get(field).unwrap_or("")))?;
    }
    writer.flush()?;
    Ok(())
}

/// Write all four input tables into `dir`, using the file names in `config`.
pub fn write_tables(tables: &RawTables, dir: &Path, config: &RunConfig) -> Result<(), OutputError> {
    std::fs::create_dir_all(dir).map_err(|source| OutputError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let config = config.clone().with_data_dir(dir);
    for (table, records) in [
        (Table::Banks, &tables.banks),
        (Table::Covenants, &tables.covenants),
        (Table::Facilities, &tables.facilities),
        (Table::Loans, &tables.loans),
    ] {
        let path = config.table_path(table);
        write_records(create(&path)?, config.delimiter, table_header(table), records)
            .map_err(|source| OutputError::Csv { path, source })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ids::{FacilityId, LoanId};
    use crate::io::reader::read_records;
    use rust_decimal_macros::dec;

    #[test]
    fn test_write_assignments() {
        let mut out = Vec::new();
        write_assignments(
            &mut out,
            b',',
            &[AssignmentRow {
                loan_id: LoanId::new("1"),
                facility_id: FacilityId::new("2"),
            }],
        )
        .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "loan_id,facility_id\n1,2\n");
    }

    #[test]
    fn test_write_yields_integer_values() {
        let mut out = Vec::new();
        write_yields(
            &mut out,
            b',',
            &[
                YieldRow {
                    facility_id: FacilityId::new("1"),
                    expected_yield: dec!(601),
                },
                YieldRow {
                    facility_id: FacilityId::new("2"),
                    expected_yield: dec!(0),
                },
            ],
        )
        .unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "facility_id,expected_yield\n1,601\n2,0\n"
        );
    }

    #[test]
    fn test_empty_table_still_has_header() {
        let mut out = Vec::new();
        write_assignments(&mut out, b',', &[]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "loan_id,facility_id\n");
    }

    #[test]
    fn test_write_records_reads_back() {
        let records = vec![
            Record::new().with("bank_id", "1").with("banned_state", "MT"),
            Record::new().with("bank_id", "2").with("max_default_likelihood", "0.06"),
        ];
        let header = table_header(Table::Covenants);
        let mut out = Vec::new();
        write_records(&mut out, b',', header, &records).unwrap();

        let back = read_records(out.as_slice(), b',').unwrap();
        assert_eq!(back.len(), 2);
        assert_eq!(back[0].get("banned_state"), Some("MT"));
        assert_eq!(back[0].get("facility_id"), Some(""));
        assert_eq!(back[1].get("max_default_likelihood"), Some("0.06"));
    }
}
