//! Master document register query: deliverables sorted by their IFR
//! forecast, exported to CSV and printed as a table for grepping.

use std::path::{Path, PathBuf};

use csv::{Reader, StringRecord, Writer};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Parameters;
use crate::dispatch::{artifact, record, Outcome};
use crate::errors::{CalcError, ConfigurationError};
use crate::report::Table;

/// Columns kept from the register, in output order.
pub const COLUMNS: [&str; 4] = ["TITLE", "NUMBER", "CAT", "IFR FORECAST"];

/// Register location and export options.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RegisterParams {
    /// Register to read.
    pub input: PathBuf,
    /// Export file name, placed in the output directory.
    pub output: PathBuf,
    /// Characters of each title kept.
    pub title_width: usize,
}

impl Default for RegisterParams {
    fn default() -> Self {
        Self {
            input: PathBuf::from("mdr.csv"),
            output: PathBuf::from("mdr-ifr_fc.csv"),
            title_width: 30,
        }
    }
}

impl Parameters for RegisterParams {
    fn validate(&self) -> Result<(), ConfigurationError> {
        if self.title_width == 0 {
            return Err(ConfigurationError::out_of_range(
                "title_width",
                0.0,
                "must keep at least one character",
            ));
        }
        Ok(())
    }
}

/// One register row reduced to [`COLUMNS`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    /// Zero-based row position in the register.
    pub index: usize,
    /// Truncated title.
    pub title: String,
    /// Document number.
    pub number: String,
    /// Category.
    pub category: String,
    /// Forecast issue-for-review date, as written in the register.
    pub forecast: String,
}

impl Entry {
    /// Table cells in column order.
    fn cells(&self) -> Vec<String> {
        vec![
            self.title.clone(),
            self.number.clone(),
            self.category.clone(),
            self.forecast.clone(),
        ]
    }
}

/// Position of column `name`, or [`CalcError::MissingColumn`].
fn column(headers: &StringRecord, name: &str) -> Result<usize, CalcError> {
    headers
        .iter()
        .position(|header| header.trim() == name)
        .ok_or_else(|| CalcError::MissingColumn(name.to_string()))
}

/// Read the register, keeping [`COLUMNS`] and truncating titles.
///
/// # Errors
///
/// Returns [`CalcError::MissingColumn`] when a required column is absent and
/// [`CalcError::Csv`] when the file cannot be read.
pub fn read<R: std::io::Read>(reader: &mut Reader<R>, title_width: usize) -> Result<Vec<Entry>, CalcError> {
    let headers = reader.headers()?.clone();
    let [title, number, category, forecast] = [
        column(&headers, COLUMNS[0])?,
        column(&headers, COLUMNS[1])?,
        column(&headers, COLUMNS[2])?,
        column(&headers, COLUMNS[3])?,
    ];
    let mut entries = Vec::new();
    for (index, row) in reader.records().enumerate() {
        let row = row?;
        let cell = |position: usize| row.get(position).unwrap_or_default().to_string();
        entries.push(Entry {
            index,
            title: cell(title).chars().take(title_width).collect(),
            number: cell(number),
            category: cell(category),
            forecast: cell(forecast),
        });
    }
    Ok(entries)
}

/// Stable sort by forecast; rows without a forecast go last.
pub fn sort(entries: &mut [Entry]) {
    entries.sort_by(|a, b| {
        (a.forecast.is_empty(), &a.forecast).cmp(&(b.forecast.is_empty(), &b.forecast))
    });
}

/// Write `entries` with the original row index first under a blank header.
///
/// # Errors
///
/// Returns [`CalcError::Csv`] when a record cannot be written.
pub fn export<W: std::io::Write>(writer: &mut Writer<W>, entries: &[Entry]) -> Result<(), CalcError> {
    writer.write_record(std::iter::once("").chain(COLUMNS))?;
    for entry in entries {
        let index = entry.index.to_string();
        writer.write_record(std::iter::once(index).chain(entry.cells()))?;
    }
    writer.flush()?;
    Ok(())
}

/// Text table of `entries`.
#[must_use]
pub fn table(entries: &[Entry]) -> Table {
    let mut table = Table::new(&COLUMNS);
    for entry in entries {
        table.push(entry.index, entry.cells());
    }
    table
}

/// Query the register, export the result and return the table as report text.
///
/// # Errors
///
/// Returns [`CalcError::MissingColumn`] for a register without a required
/// column and [`CalcError::Csv`] when reading or writing fails.
pub fn run(params: &RegisterParams, out_dir: &Path) -> Result<Outcome, CalcError> {
    let mut reader = Reader::from_path(&params.input)?;
    let mut entries = read(&mut reader, params.title_width)?;
    sort(&mut entries);
    debug!(rows = entries.len(), input = %params.input.display(), "register read");

    let path = artifact(out_dir, &params.output.to_string_lossy());
    export(&mut Writer::from_path(&path)?, &entries)?;
    record(&path);
    Ok(Outcome::reported(table(&entries).render(), vec![path]))
}

#[cfg(test)]
mod tests {
    use super::*;

    const REGISTER: &str = "\
NUMBER,TITLE,CAT,IFR FORECAST,OWNER
AB-CS-001,Jacket in-place analysis report for the platform,A,2022-05-10,x
AB-CG-002,Pile drivability,B,,y
AB-NZ-003,Lift analysis,A,2022-04-01,z
AB-CX-004,Loadout,C,2022-05-10,w
";

    fn entries() -> Vec<Entry> {
        let mut reader = Reader::from_reader(REGISTER.as_bytes());
        read(&mut reader, 30).expect("register parsed")
    }

    #[test]
    fn titles_are_truncated() {
        let entries = entries();
        assert_eq!(entries[0].title, "Jacket in-place analysis repor");
        assert_eq!(entries[0].title.chars().count(), 30);
    }

    #[test]
    fn sort_is_stable_with_blanks_last() {
        let mut entries = entries();
        sort(&mut entries);
        let order: Vec<usize> = entries.iter().map(|entry| entry.index).collect();
        assert_eq!(order, vec![2, 0, 3, 1]);
    }

    #[test]
    fn missing_column_is_named() {
        let mut reader = Reader::from_reader("TITLE,NUMBER,CAT\nx,y,z\n".as_bytes());
        match read(&mut reader, 30) {
            Err(CalcError::MissingColumn(name)) => assert_eq!(name, "IFR FORECAST"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn export_leads_with_a_blank_index_header() {
        let mut writer = Writer::from_writer(Vec::new());
        export(&mut writer, &entries()[2..3]).expect("export written");
        let text = String::from_utf8(writer.into_inner().expect("flushed")).expect("utf-8");
        assert_eq!(text, ",TITLE,NUMBER,CAT,IFR FORECAST\n2,Lift analysis,AB-NZ-003,A,2022-04-01\n");
    }

    #[test]
    fn run_exports_and_reports() {
        let dir = tempfile::tempdir().expect("temporary directory");
        let input = dir.path().join("mdr.csv");
        std::fs::write(&input, REGISTER).expect("register written");
        let params = RegisterParams {
            input,
            ..RegisterParams::default()
        };
        let outcome = run(&params, dir.path()).expect("register queried");
        assert!(dir.path().join("mdr-ifr_fc.csv").exists());
        match outcome {
            Outcome::Completed { text: Some(text), .. } => {
                assert_eq!(text.lines().count(), 5);
                assert!(text.lines().nth(1).is_some_and(|line| line.starts_with('2')));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }
}
