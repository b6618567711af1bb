//! DOCX converter.

use crate::Result;
use crate::extraction::extract_docx;
use crate::plugins::{FormatConverter, Plugin};
use crate::types::{ConversionOptions, ConversionResult, DocumentMetadata, FormatTag};
use async_trait::async_trait;
use std::time::Instant;

/// Microsoft Word (.docx) converter.
///
/// Headings, list items, emphasis and tables are mapped to Markdown; title,
/// author and creation date come from `docProps/core.xml`.
pub struct DocxConverter;

impl Default for DocxConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl DocxConverter {
    pub fn new() -> Self {
        Self
    }
}

impl Plugin for DocxConverter {
    fn name(&self) -> &str {
        "docx-converter"
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

    fn description(&self) -> &str {
        "Converts Word documents with headings, lists and tables"
    }
}

#[async_trait]
impl FormatConverter for DocxConverter {
    fn format(&self) -> FormatTag {
        FormatTag::Docx
    }

    fn extensions(&self) -> &[&str] {
        &["docx"]
    }

    async fn convert(&self, content: &[u8], options: &ConversionOptions) -> Result<ConversionResult> {
        let started = Instant::now();
        let doc = super::parse_offloaded(FormatTag::Docx, content, extract_docx).await?;

        let mut metadata = DocumentMetadata::new(FormatTag::Docx, content.len());
        super::apply_core_properties(&mut metadata, &doc.properties);
        metadata
            .extra
            .insert("paragraph_count".to_string(), doc.paragraph_count.into());
        metadata.extra.insert("table_count".to_string(), doc.table_count.into());

        Ok(super::finish(doc.markdown, metadata, Vec::new(), options, started))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;

    const DOCUMENT: &str = r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>
<w:p><w:pPr><w:pStyle w:val="Heading1"/></w:pPr><w:r><w:t>Quarterly Report</w:t></w:r></w:p>
<w:p><w:r><w:t xml:space="preserve">Revenue grew </w:t></w:r><w:r><w:rPr><w:b/></w:rPr><w:t>12%</w:t></w:r></w:p>
<w:p><w:pPr><w:numPr><w:ilvl w:val="0"/><w:numId w:val="1"/></w:numPr></w:pPr><w:r><w:t>North</w:t></w:r></w:p>
<w:p><w:pPr><w:numPr><w:ilvl w:val="0"/><w:numId w:val="1"/></w:numPr></w:pPr><w:r><w:t>South</w:t></w:r></w:p>
</w:body></w:document>"#;

    const CORE: &str = r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/"><dc:title>Q3</dc:title><dc:creator>Ada</dc:creator><cp:keywords>finance</cp:keywords><dcterms:created>2024-03-01T09:00:00Z</dcterms:created></cp:coreProperties>"#;

    fn docx() -> Vec<u8> {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        zip.start_file("word/document.xml", SimpleFileOptions::default()).unwrap();
        zip.write_all(DOCUMENT.as_bytes()).unwrap();
        zip.start_file("docProps/core.xml", SimpleFileOptions::default()).unwrap();
        zip.write_all(CORE.as_bytes()).unwrap();
        zip.finish().unwrap().into_inner()
    }

    #[tokio::test]
    async fn test_convert_docx() {
        let bytes = docx();
        let result = DocxConverter::new()
            .convert(&bytes, &ConversionOptions::default())
            .await
            .unwrap();

        assert!(result.markdown.starts_with("# Quarterly Report"));
        assert!(result.markdown.contains("Revenue grew **12%**"));
        assert!(result.markdown.contains("- North\n- South"));

        assert_eq!(result.metadata.title.as_deref(), Some("Q3"));
        assert_eq!(result.metadata.author.as_deref(), Some("Ada"));
        assert_eq!(
            result.metadata.created_at.map(|dt| dt.to_rfc3339()).as_deref(),
            Some("2024-03-01T09:00:00+00:00")
        );
        assert_eq!(result.metadata.extra.get("keywords"), Some(&serde_json::json!("finance")));
    }

    #[tokio::test]
    async fn test_not_a_zip() {
        let err = DocxConverter::new()
            .convert(b"plain bytes", &ConversionOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            crate::TransmutationError::Converter {
                format: FormatTag::Docx,
                ..
            }
        ));
    }
}
