//! Office Open XML container helpers shared by the DOCX and PPTX extractors.
//!
//! Both formats are ZIP archives of XML parts. This module opens the archive,
//! reads parts as text, and parses the Dublin Core properties stored in
//! `docProps/core.xml`.

use crate::types::FormatTag;
use crate::{Result, TransmutationError};
use chrono::{DateTime, Utc};
use roxmltree::Node;
use std::io::{Cursor, Read};
use zip::ZipArchive;

pub type OoxmlArchive<'a> = ZipArchive<Cursor<&'a [u8]>>;

/// Dublin Core metadata from `docProps/core.xml`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoreProperties {
    pub title: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
    pub keywords: Option<String>,
    pub last_modified_by: Option<String>,
    /// Creation timestamp as written in the document (W3CDTF).
    pub created: Option<String>,
    pub modified: Option<String>,
}

impl CoreProperties {
    /// `created` parsed as an RFC 3339 timestamp.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// Open `content` as a ZIP container.
pub fn open_archive(content: &[u8], format: FormatTag) -> Result<OoxmlArchive<'_>> {
    ZipArchive::new(Cursor::new(content))
        .map_err(|e| TransmutationError::converter_with_source(format, "not a valid Office Open XML archive", e))
}

/// Read a part as UTF-8 text. Missing parts yield `None`.
pub fn read_part(archive: &mut OoxmlArchive<'_>, name: &str, format: FormatTag) -> Result<Option<String>> {
    let mut file = match archive.by_name(name) {
        Ok(file) => file,
        Err(zip::result::ZipError::FileNotFound) => return Ok(None),
        Err(e) => {
            return Err(TransmutationError::converter_with_source(
                format,
                format!("failed to open {}", name),
                e,
            ));
        }
    };

    let mut xml = String::new();
    file.read_to_string(&mut xml)
        .map_err(|e| TransmutationError::converter_with_source(format, format!("failed to read {}", name), e))?;

    Ok(Some(xml))
}

/// Parse an XML part, wrapping parser errors in a converter failure.
pub fn parse_xml<'x>(xml: &'x str, part: &str, format: FormatTag) -> Result<roxmltree::Document<'x>> {
    roxmltree::Document::parse(xml)
        .map_err(|e| TransmutationError::converter_with_source(format, format!("failed to parse {}", part), e))
}

/// Extract core properties. A missing `core.xml` yields empty properties.
pub fn extract_core_properties(archive: &mut OoxmlArchive<'_>, format: FormatTag) -> Result<CoreProperties> {
    let Some(xml) = read_part(archive, "docProps/core.xml", format)? else {
        return Ok(CoreProperties::default());
    };

    let doc = parse_xml(&xml, "docProps/core.xml", format)?;
    let root = doc.root_element();

    Ok(CoreProperties {
        title: parse_xml_text(root, "title"),
        subject: parse_xml_text(root, "subject"),
        creator: parse_xml_text(root, "creator"),
        keywords: parse_xml_text(root, "keywords"),
        last_modified_by: parse_xml_text(root, "lastModifiedBy"),
        created: parse_xml_text(root, "created"),
        modified: parse_xml_text(root, "modified"),
    })
}

/// Trimmed, non-empty text of the first descendant named `name`.
pub(crate) fn parse_xml_text(node: Node, name: &str) -> Option<String> {
    node.descendants()
        .find(|n| n.has_tag_name(name))
        .and_then(|n| n.text())
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// Attribute lookup by local name, ignoring the namespace prefix.
pub(crate) fn local_attribute<'a>(node: Node<'a, '_>, name: &str) -> Option<&'a str> {
    node.attributes().find(|a| a.name() == name).map(|a| a.value())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn zip_with(parts: &[(&str, &str)]) -> Vec<u8> {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for (name, body) in parts {
            zip.start_file(*name, SimpleFileOptions::default()).unwrap();
            zip.write_all(body.as_bytes()).unwrap();
        }
        zip.finish().unwrap().into_inner()
    }

    #[test]
    fn test_extract_core_properties() {
        let core_xml = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties"
                   xmlns:dc="http://purl.org/dc/elements/1.1/"
                   xmlns:dcterms="http://purl.org/dc/terms/"
                   xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
    <dc:title>Quarterly Report</dc:title>
    <dc:creator>Ada Lovelace</dc:creator>
    <cp:lastModifiedBy>Charles Babbage</cp:lastModifiedBy>
    <dcterms:created xsi:type="dcterms:W3CDTF">2024-01-01T10:00:00Z</dcterms:created>
</cp:coreProperties>"#;
        let bytes = zip_with(&[("docProps/core.xml", core_xml)]);

        let mut archive = open_archive(&bytes, FormatTag::Docx).unwrap();
        let props = extract_core_properties(&mut archive, FormatTag::Docx).unwrap();

        assert_eq!(props.title.as_deref(), Some("Quarterly Report"));
        assert_eq!(props.creator.as_deref(), Some("Ada Lovelace"));
        assert_eq!(props.last_modified_by.as_deref(), Some("Charles Babbage"));
        assert_eq!(
            props.created_at().unwrap().to_rfc3339(),
            "2024-01-01T10:00:00+00:00"
        );
    }

    #[test]
    fn test_missing_core_properties_is_empty() {
        let bytes = zip_with(&[("word/document.xml", "<w:document/>")]);
        let mut archive = open_archive(&bytes, FormatTag::Docx).unwrap();
        let props = extract_core_properties(&mut archive, FormatTag::Docx).unwrap();
        assert_eq!(props, CoreProperties::default());
    }

    #[test]
    fn test_open_archive_rejects_garbage() {
        let err = open_archive(b"definitely not a zip", FormatTag::Pptx).unwrap_err();
        assert!(matches!(err, TransmutationError::Converter { format: FormatTag::Pptx, .. }));
    }

    #[test]
    fn test_read_part_missing() {
        let bytes = zip_with(&[("a.xml", "<a/>")]);
        let mut archive = open_archive(&bytes, FormatTag::Docx).unwrap();
        assert!(read_part(&mut archive, "b.xml", FormatTag::Docx).unwrap().is_none());
        assert_eq!(
            read_part(&mut archive, "a.xml", FormatTag::Docx).unwrap().as_deref(),
            Some("<a/>")
        );
    }
}
