//! CSV reading and writing.
//!
//! The writer emits a header row plus one line per record, quoting a field
//! only when it contains a comma, quote, or newline. Generated data never
//! triggers quoting (fake values are comma-free by construction), so the
//! reader splits on commas and only unwraps quoting when it is present.

use std::borrow::Cow;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

pub const WRITER_BUFFER_SIZE: usize = 256 * 1024;

/// Buffered writer for one CSV table file
pub struct CsvWriter {
    writer: BufWriter<File>,
    rows_written: u64,
}

impl CsvWriter {
    pub fn create(path: &Path) -> std::io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            writer: BufWriter::with_capacity(WRITER_BUFFER_SIZE, file),
            rows_written: 0,
        })
    }

    /// Write the header row
    pub fn write_header(&mut self, columns: &[String]) -> std::io::Result<()> {
        self.write_line(columns.iter().map(|c| c.as_str()))
    }

    /// Write one record; fields are escaped as needed
    pub fn write_record<'a, I>(&mut self, fields: I) -> std::io::Result<()>
    where
        I: IntoIterator<Item = Cow<'a, str>>,
    {
        let mut first = true;
        for field in fields {
            if !first {
                self.writer.write_all(b",")?;
            }
            first = false;
            self.writer.write_all(escape_field(&field).as_bytes())?;
        }
        self.writer.write_all(b"\n")?;
        self.rows_written += 1;
        Ok(())
    }

    fn write_line<'a, I>(&mut self, fields: I) -> std::io::Result<()>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut first = true;
        for field in fields {
            if !first {
                self.writer.write_all(b",")?;
            }
            first = false;
            self.writer.write_all(escape_field(field).as_bytes())?;
        }
        self.writer.write_all(b"\n")
    }

    /// Number of records written (excluding the header)
    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        self.writer.flush()
    }
}

/// Quote a field if it contains a comma, quote, or line break
pub fn escape_field(field: &str) -> Cow<'_, str> {
    if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r') {
        let mut out = String::with_capacity(field.len() + 2);
        out.push('"');
        for c in field.chars() {
            if c == '"' {
                out.push('"');
            }
            out.push(c);
        }
        out.push('"');
        Cow::Owned(out)
    } else {
        Cow::Borrowed(field)
    }
}

/// Split one CSV line into fields, unwrapping quoted fields
pub fn parse_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    current.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' if current.is_empty() => in_quotes = true,
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}

/// Read the header row of a CSV file
pub fn read_header(path: &Path) -> std::io::Result<Vec<String>> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut line = String::new();
    reader.read_line(&mut line)?;
    Ok(parse_line(line.trim_end_matches(['\n', '\r'])))
}

/// Read one named column of a CSV file into a vector, in row order.
///
/// Returns `Ok(None)` when the column is absent from the header; the caller
/// decides whether that is fatal.
pub fn read_column(path: &Path, column: &str) -> std::io::Result<Option<Vec<String>>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut lines = reader.lines();

    let header = match lines.next() {
        Some(line) => parse_line(line?.trim_end_matches(['\n', '\r'])),
        None => return Ok(Some(Vec::new())),
    };
    let index = match header.iter().position(|h| h == column) {
        Some(i) => i,
        None => return Ok(None),
    };

    let mut values = Vec::new();
    for line in lines {
        let line = line?;
        if line.is_empty() {
            continue;
        }
        let fields = parse_line(&line);
        if let Some(value) = fields.get(index) {
            values.push(value.clone());
        }
    }
    Ok(Some(values))
}
