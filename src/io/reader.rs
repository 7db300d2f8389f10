use crate::config::RunConfig;
use crate::core::dataset::{Dataset, DatasetError, RawTables};
use crate::core::record::{Record, Table};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("cannot read {table} table '{}': {source}", .path.display())]
    Csv {
        table: Table,
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error(transparent)]
    Dataset(#[from] DatasetError),
}

/// Read delimited rows with a header line into records.
///
/// Values are trimmed. Every row must have as many fields as the header.
pub fn read_records<R: io::Read>(input: R, delimiter: u8) -> Result<Vec<Record>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .from_reader(input);
    let headers = reader.headers()?.clone();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        records.push(headers.iter().zip(row.iter()).collect());
    }
    Ok(records)
}

pub fn read_table(path: &Path, table: Table, delimiter: u8) -> Result<Vec<Record>, InputError> {
    let wrap = |source| InputError::Csv {
        table,
        path: path.to_path_buf(),
        source,
    };
    let file = std::fs::File::open(path).map_err(|e| wrap(csv::Error::from(e)))?;
    let records = read_records(file, delimiter).map_err(wrap)?;
    log::debug!("read {} {} rows from {}", records.len(), table, path.display());
    Ok(records)
}

/// Read all four tables named by `config`.
pub fn read_tables(config: &RunConfig) -> Result<RawTables, InputError> {
    let read = |table| read_table(&config.table_path(table), table, config.delimiter);
    Ok(RawTables {
        banks: read(Table::Banks)?,
        covenants: read(Table::Covenants)?,
        facilities: read(Table::Facilities)?,
        loans: read(Table::Loans)?,
    })
}

/// Read, type and normalize the dataset named by `config`.
pub fn load_dataset(config: &RunConfig) -> Result<Dataset, InputError> {
    let tables = read_tables(config)?;
    let dataset = Dataset::from_records(&tables)?;
    log::info!(
        "loaded {} banks, {} facilities, {} covenants, {} loans from {}",
        dataset.banks().len(),
        dataset.facilities().len(),
        dataset.covenants().len(),
        dataset.loans().len(),
        config.data_dir.display()
    );
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_records_with_header() {
        let input = "id,bank_id,amount\n1, 2 ,61104.0\n2,1,126122.0\n";
        let records = read_records(input.as_bytes(), b',').unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("bank_id"), Some("2"));
        assert_eq!(records[1].get("amount"), Some("126122.0"));
    }

    #[test]
    fn test_read_records_keeps_empty_values() {
        let input = "facility_id,max_default_likelihood,bank_id,banned_state\n,0.09,1,MT\n";
        let records = read_records(input.as_bytes(), b',').unwrap();
        assert_eq!(records[0].get("facility_id"), Some(""));
        assert_eq!(records[0].get("banned_state"), Some("MT"));
    }

    #[test]
    fn test_read_records_custom_delimiter() {
        let input = "id;name\n1;Chase\n";
        let records = read_records(input.as_bytes(), b';').unwrap();
        assert_eq!(records[0].get("name"), Some("Chase"));
    }

    #[test]
    fn test_read_records_ragged_row_fails() {
        let input = "id,name\n1,Chase,extra\n";
        assert!(read_records(input.as_bytes(), b',').is_err());
    }

    #[test]
    fn test_read_table_missing_file() {
        let err = read_table(Path::new("/nonexistent/banks.csv"), Table::Banks, b',').unwrap_err();
        assert!(matches!(err, InputError::Csv { table: Table::Banks, .. }));
    }
}
