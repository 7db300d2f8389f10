use crate::core::record::Table;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Error)]
#[error("unknown output format '{0}' (expected 'text' or 'json')")]
pub struct UnknownFormat(String);

impl FromStr for OutputFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(UnknownFormat(other.to_string())),
        }
    }
}

/// Where an allocation run reads its tables and writes its results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Directory holding the four input tables.
    pub data_dir: PathBuf,
    pub banks_file: String,
    pub covenants_file: String,
    pub facilities_file: String,
    pub loans_file: String,
    pub assignments_path: PathBuf,
    pub yields_path: PathBuf,
    /// Field delimiter for both input and output tables.
    pub delimiter: u8,
    pub format: OutputFormat,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            banks_file: "banks.csv".to_string(),
            covenants_file: "covenants.csv".to_string(),
            facilities_file: "facilities.csv".to_string(),
            loans_file: "loans.csv".to_string(),
            assignments_path: PathBuf::from("assignments.csv"),
            yields_path: PathBuf::from("yields.csv"),
            delimiter: b',',
            format: OutputFormat::Text,
        }
    }
}

impl RunConfig {
    pub fn with_data_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.data_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Full path of an input table.
    pub fn table_path(&self, table: Table) -> PathBuf {
        let file = match table {
            Table::Banks => &self.banks_file,
            Table::Covenants => &self.covenants_file,
            Table::Facilities => &self.facilities_file,
            Table::Loans => &self.loans_file,
        };
        self.data_dir.join(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paths() {
        let config = RunConfig::default().with_data_dir("large");
        assert_eq!(config.table_path(Table::Loans), PathBuf::from("large/loans.csv"));
        assert_eq!(config.assignments_path, PathBuf::from("assignments.csv"));
        assert_eq!(config.delimiter, b',');
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("xml".parse::<OutputFormat>().is_err());
    }
}
