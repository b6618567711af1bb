//! DOCX text extraction.
//!
//! Walks the body of `word/document.xml` in document order and renders
//! Markdown blocks:
//!
//! - paragraphs styled `Heading1`..`Heading6` become `#`..`######` headings
//!   and `Title` becomes a level-one heading
//! - numbered or bulleted paragraphs become `- ` list items, indented by
//!   their list level
//! - bold and italic runs are wrapped in `**` and `*`
//! - tables become Markdown tables with the first row as header

use crate::extraction::ooxml::{self, CoreProperties, local_attribute};
use crate::extraction::table::rows_to_markdown;
use crate::types::FormatTag;
use crate::{Result, TransmutationError};
use roxmltree::Node;

const DOCUMENT_PART: &str = "word/document.xml";

/// Extracted DOCX content.
#[derive(Debug, Clone, PartialEq)]
pub struct DocxDocument {
    pub markdown: String,
    pub properties: CoreProperties,
    pub paragraph_count: usize,
    pub table_count: usize,
}

#[derive(Debug)]
enum Block {
    Paragraph(String),
    ListItem(String),
    Table(String),
}

pub fn extract_docx(content: &[u8]) -> Result<DocxDocument> {
    let mut archive = ooxml::open_archive(content, FormatTag::Docx)?;

    let xml = ooxml::read_part(&mut archive, DOCUMENT_PART, FormatTag::Docx)?
        .ok_or_else(|| TransmutationError::converter(FormatTag::Docx, "missing word/document.xml"))?;
    let doc = ooxml::parse_xml(&xml, DOCUMENT_PART, FormatTag::Docx)?;

    let properties = ooxml::extract_core_properties(&mut archive, FormatTag::Docx)?;

    let body = doc
        .descendants()
        .find(|n| n.has_tag_name("body"))
        .ok_or_else(|| TransmutationError::converter(FormatTag::Docx, "document has no body"))?;

    let mut blocks = Vec::new();
    let mut paragraph_count = 0;
    let mut table_count = 0;

    for child in body.children().filter(Node::is_element) {
        match child.tag_name().name() {
            "p" => {
                paragraph_count += 1;
                if let Some(block) = paragraph_block(child) {
                    blocks.push(block);
                }
            }
            "tbl" => {
                table_count += 1;
                let table = table_markdown(child);
                if !table.is_empty() {
                    blocks.push(Block::Table(table));
                }
            }
            _ => {}
        }
    }

    Ok(DocxDocument {
        markdown: join_blocks(&blocks),
        properties,
        paragraph_count,
        table_count,
    })
}

fn paragraph_block(paragraph: Node) -> Option<Block> {
    let text = paragraph_text(paragraph, true);
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let properties = child_element(paragraph, "pPr");

    if let Some(level) = properties.and_then(heading_level) {
        return Some(Block::Paragraph(format!("{} {}", "#".repeat(level), text)));
    }

    if let Some(numbering) = properties.and_then(|p| child_element(p, "numPr")) {
        let level = child_element(numbering, "ilvl")
            .and_then(|n| local_attribute(n, "val"))
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(0)
            .min(MAX_LIST_LEVEL);
        return Some(Block::ListItem(format!("{}- {}", "  ".repeat(level), text)));
    }

    Some(Block::Paragraph(text.to_string()))
}

/// Deepest `w:ilvl` a numbering definition can declare (levels 0 through 8).
const MAX_LIST_LEVEL: usize = 8;

/// Heading level from a paragraph's style id (`Heading2` → 2, `Title` → 1).
fn heading_level(properties: Node) -> Option<usize> {
    let style = child_element(properties, "pStyle").and_then(|n| local_attribute(n, "val"))?;
    let style = style.to_ascii_lowercase();

    if style == "title" {
        return Some(1);
    }

    let level = style.strip_prefix("heading")?.trim().parse::<usize>().ok()?;
    (level >= 1).then_some(level.min(6))
}

fn paragraph_text(paragraph: Node, with_emphasis: bool) -> String {
    let mut text = String::new();

    for run in paragraph.descendants().filter(|n| n.has_tag_name("r")) {
        let run_text = run_text(run);
        if run_text.trim().is_empty() {
            text.push_str(&run_text);
            continue;
        }

        let (bold, italic) = if with_emphasis {
            child_element(run, "rPr").map(run_emphasis).unwrap_or((false, false))
        } else {
            (false, false)
        };

        match (bold, italic) {
            (true, true) => text.push_str(&format!("***{}***", run_text.trim())),
            (true, false) => text.push_str(&format!("**{}**", run_text.trim())),
            (false, true) => text.push_str(&format!("*{}*", run_text.trim())),
            (false, false) => text.push_str(&run_text),
        }
    }

    text
}

fn run_text(run: Node) -> String {
    let mut text = String::new();
    for node in run.children().filter(Node::is_element) {
        match node.tag_name().name() {
            "t" => text.push_str(node.text().unwrap_or_default()),
            "tab" => text.push('\t'),
            "br" | "cr" => text.push('\n'),
            _ => {}
        }
    }
    text
}

fn run_emphasis(properties: Node) -> (bool, bool) {
    let enabled = |name: &str| {
        child_element(properties, name)
            .map(|n| !matches!(local_attribute(n, "val"), Some("0" | "false" | "off")))
            .unwrap_or(false)
    };
    (enabled("b"), enabled("i"))
}

fn table_markdown(table: Node) -> String {
    let rows: Vec<Vec<String>> = table
        .children()
        .filter(|n| n.has_tag_name("tr"))
        .map(|row| {
            row.children()
                .filter(|n| n.has_tag_name("tc"))
                .map(|cell| {
                    cell.children()
                        .filter(|n| n.has_tag_name("p"))
                        .map(|p| paragraph_text(p, false).trim().to_string())
                        .filter(|t| !t.is_empty())
                        .collect::<Vec<_>>()
                        .join(" ")
                })
                .collect()
        })
        .collect();

    rows_to_markdown(&rows)
}

fn join_blocks(blocks: &[Block]) -> String {
    let mut markdown = String::new();
    let mut previous_was_list = false;

    for block in blocks {
        let (text, is_list) = match block {
            Block::Paragraph(text) => (text.as_str(), false),
            Block::ListItem(text) => (text.as_str(), true),
            Block::Table(text) => (text.trim_end(), false),
        };

        if !markdown.is_empty() {
            markdown.push_str(if previous_was_list && is_list { "\n" } else { "\n\n" });
        }
        markdown.push_str(text);
        previous_was_list = is_list;
    }

    markdown
}

fn child_element<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|n| n.has_tag_name(name))
}
