//! PDF text extraction using `lopdf`.
//!
//! Text is pulled page by page so a page limit never parses more content
//! than it needs. A page whose content stream can't be decoded yields an
//! empty page and a warning instead of failing the whole document.

use crate::types::FormatTag;
use crate::{Result, TransmutationError};
use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc};
use lopdf::{Document, Object};

/// Fields from the trailer's `Info` dictionary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PdfInfo {
    pub title: Option<String>,
    pub author: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PdfDocument {
    /// Text of each processed page, in page order.
    pub pages: Vec<String>,
    pub total_pages: usize,
    pub info: PdfInfo,
    pub warnings: Vec<String>,
}

/// Extract the text of at most `limit` pages (all when `None`).
pub fn extract_pdf(content: &[u8], limit: Option<usize>) -> Result<PdfDocument> {
    let doc = Document::load_mem(content)
        .map_err(|e| TransmutationError::converter_with_source(FormatTag::Pdf, "failed to parse PDF", e))?;

    let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
    let total_pages = page_numbers.len();
    let take = limit.unwrap_or(total_pages).min(total_pages);

    let mut pages = Vec::with_capacity(take);
    let mut warnings = Vec::new();

    for number in page_numbers.into_iter().take(take) {
        match doc.extract_text(&[number]) {
            Ok(text) => pages.push(text),
            Err(e) => {
                tracing::debug!(page = number, error = %e, "PDF page text extraction failed");
                warnings.push(format!("Failed to extract text from page {}", number));
                pages.push(String::new());
            }
        }
    }

    Ok(PdfDocument {
        pages,
        total_pages,
        info: read_info(&doc),
        warnings,
    })
}

fn read_info(doc: &Document) -> PdfInfo {
    let info = match doc.trailer.get(b"Info") {
        Ok(Object::Reference(id)) => doc.get_dictionary(*id).ok(),
        Ok(Object::Dictionary(dict)) => Some(dict),
        _ => None,
    };

    let Some(info) = info else {
        return PdfInfo::default();
    };

    let field = |key: &[u8]| {
        info.get(key)
            .ok()
            .and_then(|obj| obj.as_str().ok())
            .map(decode_pdf_string)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    };

    PdfInfo {
        title: field(b"Title"),
        author: field(b"Author"),
        creator: field(b"Creator"),
        producer: field(b"Producer"),
        created_at: field(b"CreationDate").as_deref().and_then(parse_pdf_date),
    }
}

/// Decode a PDF text string: UTF-16BE with a byte order mark, otherwise
/// one byte per character.
fn decode_pdf_string(bytes: &[u8]) -> String {
    if let Some(utf16) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = utf16
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }

    bytes.iter().map(|&b| b as char).collect()
}

/// Parse a PDF date (`D:YYYYMMDDHHmmSSOHH'mm'`); everything after the year
/// is optional.
pub(crate) fn parse_pdf_date(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    let s = s.strip_prefix("D:").unwrap_or(s);

    let digits: String = s.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.len() < 4 {
        return None;
    }

    let part = |start: usize, len: usize, default: u32| -> Option<u32> {
        match digits.get(start..start + len) {
            Some(v) => v.parse().ok(),
            None => Some(default),
        }
    };

    let year: i32 = digits[0..4].parse().ok()?;
    let month = part(4, 2, 1)?;
    let day = part(6, 2, 1)?;
    let hour = part(8, 2, 0)?;
    let minute = part(10, 2, 0)?;
    let second = part(12, 2, 0)?;

    let naive = NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, second)?;

    let rest = &s[digits.len()..];
    let offset_seconds = match rest.chars().next() {
        Some(sign @ ('+' | '-')) => {
            let tz: String = rest[1..].chars().filter(|c| c.is_ascii_digit()).collect();
            let hours: i32 = tz.get(0..2).and_then(|v| v.parse().ok()).unwrap_or(0);
            let minutes: i32 = tz.get(2..4).and_then(|v| v.parse().ok()).unwrap_or(0);
            let total = hours * 3600 + minutes * 60;
            if sign == '-' { -total } else { total }
        }
        _ => 0,
    };

    let offset = FixedOffset::east_opt(offset_seconds)?;
    offset
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}
