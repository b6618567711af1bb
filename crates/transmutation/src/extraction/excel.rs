//! Spreadsheet extraction using `calamine`.
//!
//! The workbook type (XLSX, XLS, XLSB, ODS) is detected from the bytes, so
//! an `.xls` extension holding an XLSX payload still opens.

use calamine::{Data, Range, Reader, open_workbook_auto_from_rs};
use std::fmt::Write as FmtWrite;
use std::io::Cursor;

use crate::types::FormatTag;
use crate::{Result, TransmutationError};

/// One worksheet as rows of rendered cell text.
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Vec<String>>,
}

impl Sheet {
    /// A sheet with no non-empty cell.
    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(|row| row.iter().all(|cell| cell.trim().is_empty()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Workbook {
    /// Every sheet name, in workbook order.
    pub sheet_names: Vec<String>,
    /// The processed sheets, a prefix of `sheet_names`.
    pub sheets: Vec<Sheet>,
}

/// Read at most `limit` sheets (all when `None`).
pub fn read_workbook(content: &[u8], limit: Option<usize>) -> Result<Workbook> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(content))
        .map_err(|e| TransmutationError::converter_with_source(FormatTag::Xlsx, "failed to open workbook", e))?;

    let sheet_names = workbook.sheet_names();
    let take = limit.unwrap_or(sheet_names.len()).min(sheet_names.len());

    let mut sheets = Vec::with_capacity(take);
    for name in sheet_names.iter().take(take) {
        let range = workbook.worksheet_range(name).map_err(|e| {
            TransmutationError::converter_with_source(FormatTag::Xlsx, format!("failed to read sheet \"{}\"", name), e)
        })?;

        sheets.push(Sheet {
            name: name.clone(),
            rows: range_rows(&range),
        });
    }

    Ok(Workbook { sheet_names, sheets })
}

fn range_rows(range: &Range<Data>) -> Vec<Vec<String>> {
    let mut rows: Vec<Vec<String>> = range
        .rows()
        .map(|row| {
            row.iter()
                .map(|cell| {
                    let mut buffer = String::new();
                    format_cell_value_into(&mut buffer, cell);
                    buffer
                })
                .collect()
        })
        .collect();

    while rows.last().is_some_and(|row| row.iter().all(String::is_empty)) {
        rows.pop();
    }

    rows
}

#[inline]
fn format_cell_value_into(buffer: &mut String, data: &Data) {
    match data {
        Data::Empty => {}
        Data::String(s) | Data::DateTimeIso(s) => buffer.push_str(s),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < 1e15 {
                let _ = write!(buffer, "{}", *f as i64);
            } else {
                let _ = write!(buffer, "{}", f);
            }
        }
        Data::Int(i) => {
            let _ = write!(buffer, "{}", i);
        }
        Data::Bool(b) => buffer.push_str(if *b { "true" } else { "false" }),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(datetime) => {
                let _ = write!(buffer, "{}", datetime.format("%Y-%m-%d %H:%M:%S"));
            }
            None => {
                let _ = write!(buffer, "{}", dt.as_f64());
            }
        },
        Data::DurationIso(s) => {
            buffer.push_str("DURATION: ");
            buffer.push_str(s);
        }
        Data::Error(e) => {
            let _ = write!(buffer, "#ERR: {:?}", e);
        }
    }
}
