//! PPTX text extraction.
//!
//! Slides live at `ppt/slides/slideN.xml`. They are read in numeric order
//! (`slide2` before `slide10`) and each `a:p` paragraph's `a:t` runs are
//! joined into one line of text.

use crate::extraction::ooxml::{self, CoreProperties};
use crate::types::FormatTag;
use crate::Result;
use roxmltree::Node;

/// Text of a single slide.
#[derive(Debug, Clone, PartialEq)]
pub struct Slide {
    /// Number taken from the part name (`slide3.xml` → 3).
    pub number: u32,
    pub paragraphs: Vec<String>,
}

impl Slide {
    pub fn has_text(&self) -> bool {
        !self.paragraphs.is_empty()
    }

    /// `## Slide N` followed by the slide's paragraphs.
    pub fn to_markdown(&self) -> String {
        let mut markdown = format!("## Slide {}", self.number);
        for paragraph in &self.paragraphs {
            markdown.push_str("\n\n");
            markdown.push_str(paragraph);
        }
        markdown
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PptxDocument {
    /// Slides in numeric order, including slides without text.
    pub slides: Vec<Slide>,
    pub properties: CoreProperties,
}

/// Read at most `limit` slides (all when `None`).
///
/// Slides beyond the limit are not parsed; [`PptxDocument::slides`] then
/// holds only the processed ones while `total_slides` reports the full count.
pub fn extract_pptx(content: &[u8], limit: Option<usize>) -> Result<(PptxDocument, usize)> {
    let mut archive = ooxml::open_archive(content, FormatTag::Pptx)?;

    let mut parts: Vec<(u32, String)> = archive
        .file_names()
        .filter_map(|name| slide_number(name).map(|n| (n, name.to_string())))
        .collect();
    parts.sort_by_key(|(number, _)| *number);

    let total_slides = parts.len();
    let take = limit.unwrap_or(total_slides).min(total_slides);

    let mut slides = Vec::with_capacity(take);
    for (number, part) in parts.into_iter().take(take) {
        let Some(xml) = ooxml::read_part(&mut archive, &part, FormatTag::Pptx)? else {
            continue;
        };
        let doc = ooxml::parse_xml(&xml, &part, FormatTag::Pptx)?;
        slides.push(Slide {
            number,
            paragraphs: slide_paragraphs(doc.root()),
        });
    }

    let properties = ooxml::extract_core_properties(&mut archive, FormatTag::Pptx)?;

    Ok((PptxDocument { slides, properties }, total_slides))
}

fn slide_number(part: &str) -> Option<u32> {
    part.strip_prefix("ppt/slides/slide")?
        .strip_suffix(".xml")?
        .parse()
        .ok()
}

fn slide_paragraphs(root: Node) -> Vec<String> {
    root.descendants()
        .filter(|n| n.has_tag_name("p") && n.tag_name().namespace().is_some_and(|ns| ns.ends_with("/drawingml/2006/main")))
        .map(|p| {
            p.descendants()
                .filter(|n| n.has_tag_name("t"))
                .filter_map(|t| t.text())
                .collect::<String>()
        })
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .collect()
}
