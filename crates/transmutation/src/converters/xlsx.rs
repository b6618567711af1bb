//! Spreadsheet converter.
//!
//! Each processed sheet renders as a level-one heading followed by a
//! Markdown table whose first row is the header. Sheets are separated by a
//! horizontal rule.

use crate::Result;
use crate::extraction::{Sheet, read_workbook, rows_to_markdown};
use crate::plugins::{FormatConverter, Plugin};
use crate::types::{ConversionOptions, ConversionResult, DocumentMetadata, FormatTag};
use async_trait::async_trait;
use std::time::Instant;

/// Excel workbook converter (`.xlsx`, `.xls`).
pub struct XlsxConverter;

impl Default for XlsxConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl XlsxConverter {
    pub fn new() -> Self {
        Self
    }

    fn sheet_markdown(sheet: &Sheet, warnings: &mut Vec<String>) -> String {
        if sheet.is_empty() {
            warnings.push(format!("Sheet \"{}\" is empty", sheet.name));
            return format!("# {}\n\n*Empty sheet*", sheet.name);
        }

        format!("# {}\n\n{}", sheet.name, rows_to_markdown(&sheet.rows).trim_end())
    }
}

impl Plugin for XlsxConverter {
    fn name(&self) -> &str {
        "xlsx-converter"
    }

    fn version(&self) -> String {
        env!("CARGO_PKG_VERSION").to_string()
    }

    fn initialize(&self) -> Result<()> {
        Ok(())
    }

    fn shutdown(&self) -> Result<()> {
        Ok(())
    }
}

#[async_trait]
impl FormatConverter for XlsxConverter {
    fn format(&self) -> FormatTag {
        FormatTag::Xlsx
    }

    fn extensions(&self) -> &[&str] {
        &["xlsx", "xls"]
    }

    async fn convert(&self, content: &[u8], options: &ConversionOptions) -> Result<ConversionResult> {
        let started = Instant::now();
        let limit = options.page_limit();
        let workbook = super::parse_offloaded(FormatTag::Xlsx, content, move |bytes| read_workbook(bytes, limit)).await?;

        let total = workbook.sheet_names.len();
        let mut warnings: Vec<String> = super::truncation_warning(workbook.sheets.len(), total, "sheets")
            .into_iter()
            .collect();

        let sections: Vec<String> = workbook
            .sheets
            .iter()
            .map(|sheet| Self::sheet_markdown(sheet, &mut warnings))
            .collect();

        let mut metadata = DocumentMetadata::new(FormatTag::Xlsx, content.len());
        metadata.page_count = Some(total);
        metadata
            .extra
            .insert("sheet_names".to_string(), workbook.sheet_names.clone().into());
        metadata
            .extra
            .insert("processed_sheets".to_string(), workbook.sheets.len().into());

        Ok(super::finish(
            sections.join(super::SECTION_SEPARATOR),
            metadata,
            warnings,
            options,
            started,
        ))
    }
}
