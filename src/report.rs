//! Plain-text reports for calculations that print instead of plot.

use std::fmt::Write;
use std::fs;
use std::path::Path;

use tracing::info;

/// Format values the way an engineer reads them back from a REPL: `[1.0, 2.5]`.
///
/// # Examples
/// ```
/// use offshorex::report::format_list;
///
/// assert_eq!(format_list(&[137.957, 206.0]), "[137.957, 206.0]");
/// ```
#[must_use]
pub fn format_list(values: &[f64]) -> String {
    let items: Vec<String> = values.iter().map(|value| format!("{value:?}")).collect();
    format!("[{}]", items.join(", "))
}

/// A right-aligned text table with a leading index column.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    /// Column headings, excluding the index column.
    headers: Vec<String>,
    /// Index label and cells for each row.
    rows: Vec<(String, Vec<String>)>,
}

impl Table {
    /// Create an empty table with the given column headings.
    #[must_use]
    pub fn new(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(ToString::to_string).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row; missing cells render blank and extra cells are dropped.
    pub fn push(&mut self, index: impl ToString, cells: Vec<String>) {
        self.rows.push((index.to_string(), cells));
    }

    /// Number of data rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Return `true` when the table has no data rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Lay the table out as text, one line per row after the heading line.
    #[must_use]
    pub fn render(&self) -> String {
        let index_width = self
            .rows
            .iter()
            .map(|(index, _)| index.chars().count())
            .max()
            .unwrap_or(0);
        let widths: Vec<usize> = self
            .headers
            .iter()
            .enumerate()
            .map(|(column, header)| {
                self.rows
                    .iter()
                    .filter_map(|(_, cells)| cells.get(column))
                    .map(|cell| cell.chars().count())
                    .chain(std::iter::once(header.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut output = String::new();
        write!(&mut output, "{:index_width$}", "").expect("writing to string cannot fail");
        for (header, width) in self.headers.iter().zip(&widths) {
            write!(&mut output, "  {header:>width$}").expect("writing to string cannot fail");
        }
        output.push('\n');

        for (index, cells) in &self.rows {
            write!(&mut output, "{index:<index_width$}").expect("writing to string cannot fail");
            for (column, width) in widths.iter().enumerate() {
                let cell = cells.get(column).map_or("", String::as_str);
                write!(&mut output, "  {cell:>width$}").expect("writing to string cannot fail");
            }
            output.push('\n');
        }
        output
    }
}

/// Write `text` to `path` when one is given.
///
/// # Errors
///
/// Returns the underlying I/O error when the file cannot be written.
pub fn save_text(text: &str, path: Option<&Path>) -> std::io::Result<()> {
    if let Some(path) = path {
        fs::write(path, text)?;
        info!(artifact = %path.display(), "written");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_keep_a_decimal_point() {
        assert_eq!(format_list(&[]), "[]");
        assert_eq!(format_list(&[400.0, 0.125]), "[400.0, 0.125]");
    }

    #[test]
    fn table_aligns_cells_to_the_right() {
        let mut table = Table::new(&["TITLE", "CAT"]);
        table.push(0, vec!["Piling report".to_string(), "R".to_string()]);
        table.push(12, vec!["Welds".to_string(), "CX".to_string()]);
        let text = table.render();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "            TITLE  CAT");
        assert_eq!(lines[1], "0   Piling report    R");
        assert_eq!(lines[2], "12          Welds   CX");
        assert_eq!(table.len(), 2);
    }
}
