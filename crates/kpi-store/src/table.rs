//! Delimited tables
//!
//! A [`Table`] is the in-memory form of one flat file: a header row and a list
//! of string rows. Fields holding the delimiter, a double quote or a line
//! break are wrapped in double quotes with inner quotes doubled, so any cell
//! text survives a read/write cycle.

use crate::error::StoreError;
use std::io::Write as _;
use std::path::Path;

/// Default field delimiter
pub const DEFAULT_DELIMITER: char = '|';

/// One delimited table held in memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    name: String,
    delimiter: char,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Create empty table with the given header
    #[must_use]
    pub fn new(name: impl Into<String>, delimiter: char, headers: Vec<String>) -> Self {
        Self {
            name: name.into(),
            delimiter,
            headers,
            rows: Vec::new(),
        }
    }

    /// Read and parse a table file
    ///
    /// # Errors
    /// Returns [`StoreError::Read`] on IO failure and [`StoreError::Format`] on
    /// malformed content.
    pub fn read(path: &Path, delimiter: char) -> Result<Self, StoreError> {
        let text =
            std::fs::read_to_string(path).map_err(|e| StoreError::read_error(path, e))?;
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        let table = Self::parse(name, &text, delimiter)?;
        tracing::debug!(
            table = %table.name,
            rows = table.rows.len(),
            columns = table.headers.len(),
            "loaded table"
        );
        Ok(table)
    }

    /// Parse table text
    ///
    /// The first record is the header. Blank lines between records are
    /// ignored. Every row must have exactly as many fields as the header.
    ///
    /// # Errors
    /// Returns [`StoreError::Format`] for an empty table, unterminated quotes
    /// or rows of the wrong width.
    pub fn parse(name: impl Into<String>, text: &str, delimiter: char) -> Result<Self, StoreError> {
        let name = name.into();
        let records = split_records(&name, text, delimiter)?;
        let mut records = records.into_iter();
        let Some((_, headers)) = records.next() else {
            return Err(StoreError::Format {
                table: name,
                line: 1,
                message: "missing header row".to_string(),
            });
        };

        let mut rows = Vec::new();
        for (line, fields) in records {
            if fields.len() != headers.len() {
                return Err(StoreError::Format {
                    table: name,
                    line,
                    message: format!(
                        "expected {} fields, found {}",
                        headers.len(),
                        fields.len()
                    ),
                });
            }
            rows.push(fields);
        }

        Ok(Self {
            name,
            delimiter,
            headers,
            rows,
        })
    }

    /// Table name (file name when read from disk)
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Header names in file order
    #[inline]
    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// All rows in file order
    #[inline]
    #[must_use]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of data rows
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no data rows
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of a column by exact header name
    ///
    /// # Errors
    /// Returns [`StoreError::MissingColumn`] if the header has no such name.
    pub fn column(&self, name: &str) -> Result<usize, StoreError> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| StoreError::missing_column(&self.name, name))
    }

    /// Distinct values of a column, in first-seen order
    ///
    /// # Errors
    /// Returns [`StoreError::MissingColumn`] for an unknown column.
    pub fn unique_values(&self, column: &str) -> Result<Vec<&str>, StoreError> {
        let idx = self.column(column)?;
        let mut seen = Vec::new();
        for row in &self.rows {
            let value = row[idx].as_str();
            if !seen.contains(&value) {
                seen.push(value);
            }
        }
        Ok(seen)
    }

    /// Indexes of rows whose column equals `value` exactly
    ///
    /// # Errors
    /// Returns [`StoreError::MissingColumn`] for an unknown column.
    pub fn filter_eq(&self, column: &str, value: &str) -> Result<Vec<usize>, StoreError> {
        let idx = self.column(column)?;
        Ok(self
            .rows
            .iter()
            .enumerate()
            .filter(|(_, row)| row[idx] == value)
            .map(|(i, _)| i)
            .collect())
    }

    /// Replace one cell
    ///
    /// # Panics
    /// Panics if `row` or `column` is out of bounds.
    pub fn set(&mut self, row: usize, column: usize, value: impl Into<String>) {
        self.rows[row][column] = value.into();
    }

    /// Append a row
    ///
    /// # Errors
    /// Returns [`StoreError::Format`] if the row width differs from the header.
    pub fn push_row(&mut self, row: Vec<String>) -> Result<(), StoreError> {
        if row.len() != self.headers.len() {
            return Err(StoreError::Format {
                table: self.name.clone(),
                line: self.rows.len() + 2,
                message: format!(
                    "expected {} fields, found {}",
                    self.headers.len(),
                    row.len()
                ),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// Render the table as delimited text with a trailing newline
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        for record in std::iter::once(&self.headers).chain(self.rows.iter()) {
            let line = record
                .iter()
                .map(|field| escape_field(field, self.delimiter))
                .collect::<Vec<_>>()
                .join(&self.delimiter.to_string());
            out.push_str(&line);
            out.push('\n');
        }
        out
    }

    /// Write the whole table to `path`, replacing it atomically
    ///
    /// The text goes to a temporary file in the same directory which is then
    /// renamed over the target, so readers never see a half-written table.
    ///
    /// # Errors
    /// Returns [`StoreError::Write`] on IO failure.
    pub fn write_atomic(&self, path: &Path) -> Result<(), StoreError> {
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let mut tmp =
            tempfile::NamedTempFile::new_in(dir).map_err(|e| StoreError::write_error(path, e))?;
        tmp.write_all(self.render().as_bytes())
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|e| StoreError::write_error(path, e))?;
        tmp.persist(path)
            .map_err(|e| StoreError::write_error(path, e.error))?;
        tracing::debug!(table = %self.name, rows = self.rows.len(), "wrote table");
        Ok(())
    }
}

fn escape_field(value: &str, delimiter: char) -> String {
    if value.contains(delimiter) || value.contains('"') || value.contains('\n') || value.contains('\r') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Split text into records of fields, tagged with their starting line
fn split_records(
    table: &str,
    text: &str,
    delimiter: char,
) -> Result<Vec<(usize, Vec<String>)>, StoreError> {
    let mut records = Vec::new();
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut quoted_field = false;
    let mut line = 1;
    let mut record_line = 1;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    field.push(c);
                }
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' if field.is_empty() && !quoted_field => {
                in_quotes = true;
                quoted_field = true;
            }
            c if c == delimiter => {
                fields.push(std::mem::take(&mut field));
                quoted_field = false;
            }
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                fields.push(std::mem::take(&mut field));
                if !(fields.len() == 1 && fields[0].is_empty() && !quoted_field) {
                    records.push((record_line, std::mem::take(&mut fields)));
                }
                fields.clear();
                quoted_field = false;
                line += 1;
                record_line = line;
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(StoreError::Format {
            table: table.to_string(),
            line: record_line,
            message: "unterminated quoted field".to_string(),
        });
    }
    if !field.is_empty() || !fields.is_empty() || quoted_field {
        fields.push(field);
        records.push((record_line, fields));
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const KPI_DATA: &str = "KPI_Id|KPI|KPI_Value_Date|KPI_Values\n\
        K1|K1|2024-01-01|{'target':100}\n\
        K2|Churn|2024-01-01|{'rate':0.5}\n\
        K1|K1|2024-02-01|{'target':120}\n";

    #[test]
    fn parse_reads_header_and_rows() {
        let table = Table::parse("kpi", KPI_DATA, '|').unwrap();
        assert_eq!(table.headers(), &["KPI_Id", "KPI", "KPI_Value_Date", "KPI_Values"]);
        assert_eq!(table.len(), 3);
        assert_eq!(table.rows()[1][3], "{'rate':0.5}");
    }

    #[test]
    fn parse_skips_blank_lines_and_crlf() {
        let text = "A|B\r\n\r\n1|2\r\n\n3|4";
        let table = Table::parse("t", text, '|').unwrap();
        assert_eq!(table.rows(), &[vec!["1", "2"], vec!["3", "4"]]);
    }

    #[test]
    fn parse_rejects_ragged_rows() {
        let err = Table::parse("t", "A|B\n1|2|3\n", '|').unwrap_err();
        assert!(matches!(err, StoreError::Format { line: 2, .. }));
    }

    #[test]
    fn parse_rejects_empty_text() {
        assert!(matches!(
            Table::parse("t", "", '|'),
            Err(StoreError::Format { line: 1, .. })
        ));
    }

    #[test]
    fn parse_rejects_unterminated_quote() {
        assert!(Table::parse("t", "A|B\n\"1|2\n", '|').is_err());
    }

    #[test]
    fn quoted_fields_roundtrip() {
        let mut table = Table::new("t", '|', vec!["A".into(), "B".into()]);
        table
            .push_row(vec!["a|b".into(), "say \"hi\"\nbye".into()])
            .unwrap();
        table.push_row(vec![String::new(), "plain".into()]).unwrap();

        let text = table.render();
        let parsed = Table::parse("t", &text, '|').unwrap();
        assert_eq!(parsed.rows(), table.rows());
    }

    #[test]
    fn unique_values_keep_first_seen_order() {
        let table = Table::parse("kpi", KPI_DATA, '|').unwrap();
        assert_eq!(table.unique_values("KPI").unwrap(), vec!["K1", "Churn"]);
    }

    #[test]
    fn filter_eq_is_exact() {
        let table = Table::parse("kpi", KPI_DATA, '|').unwrap();
        assert_eq!(table.filter_eq("KPI_Id", "K1").unwrap(), vec![0, 2]);
        assert!(table.filter_eq("KPI_Id", "k1").unwrap().is_empty());
    }

    #[test]
    fn missing_column_is_reported() {
        let table = Table::parse("kpi", KPI_DATA, '|').unwrap();
        assert!(matches!(
            table.column("Owner"),
            Err(StoreError::MissingColumn { .. })
        ));
    }

    #[test]
    fn push_row_checks_width() {
        let mut table = Table::new("t", '|', vec!["A".into()]);
        assert!(table.push_row(vec!["1".into(), "2".into()]).is_err());
    }
}
