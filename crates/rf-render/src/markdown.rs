//! Markdown to WordprocessingML fragment conversion.
//!
//! Free-text report fields (descriptions, remediation, proof of concept)
//! are markdown. Each top-level block becomes a single-cell table: code
//! blocks get a shaded, bordered, monospace rendition so they stand out
//! from prose; everything else gets an invisible wrapper so multi-line
//! text flows consistently regardless of template paragraph styling.

use crate::wordml::{line_break, paragraph, run, single_cell_table, RunStyle};
use pulldown_cmark::{Event, Parser, Tag, TagEnd};
use rf_docx::Fragment;
use tracing::debug;

/// Code block cell shading.
pub const CODE_FILL: &str = "F2F2F2";

/// Code block border color.
pub const CODE_BORDER: &str = "BFBFBF";

/// Render markdown into a block-level fragment.
///
/// Empty or whitespace-only input yields `None`; the caller skips the
/// write and the placeholder stays untouched.
pub fn render_markdown(markdown: &str) -> Option<Fragment> {
    if markdown.trim().is_empty() {
        return None;
    }

    let blocks = parse_blocks(markdown);
    if blocks.is_empty() {
        return None;
    }
    debug!(blocks = blocks.len(), "Markdown rendered");

    let mut xml = String::new();
    for block in blocks {
        match block {
            Block::Code(code) => {
                let mono = RunStyle {
                    mono: true,
                    ..Default::default()
                };
                let content: String = code
                    .trim_end_matches('\n')
                    .split('\n')
                    .map(|line| paragraph(&run(line, mono)))
                    .collect();
                xml.push_str(&single_cell_table(&content, Some(CODE_BORDER), Some(CODE_FILL)));
            }
            Block::Prose(paragraphs) => {
                let content: String = paragraphs
                    .iter()
                    .map(|inlines| paragraph(&inline_runs(inlines)))
                    .collect();
                xml.push_str(&single_cell_table(&content, None, None));
            }
        }
    }
    Some(Fragment::from_xml(xml))
}

/// One top-level markdown block.
#[derive(Debug)]
enum Block {
    /// Prose paragraphs (a plain paragraph, heading, or whole list).
    Prose(Vec<Vec<Inline>>),
    /// Preformatted code.
    Code(String),
}

#[derive(Debug)]
enum Inline {
    Text { text: String, style: RunStyle },
    Break,
}

fn inline_runs(inlines: &[Inline]) -> String {
    let mut xml = String::new();
    for inline in inlines {
        match inline {
            Inline::Text { text, style } => xml.push_str(&run(text, *style)),
            Inline::Break => xml.push_str(&line_break()),
        }
    }
    xml
}

fn parse_blocks(markdown: &str) -> Vec<Block> {
    let mut blocks = Vec::new();

    // Current paragraph and, while inside a list, the accumulated item
    // paragraphs that form one prose block.
    let mut inlines: Vec<Inline> = Vec::new();
    let mut group: Vec<Vec<Inline>> = Vec::new();
    let mut code: Option<String> = None;

    let mut bold = 0u32;
    let mut italic = 0u32;
    let mut heading = false;
    let mut list_depth = 0u32;

    let flush_paragraph = |inlines: &mut Vec<Inline>,
                               group: &mut Vec<Vec<Inline>>,
                               blocks: &mut Vec<Block>,
                               in_list: bool| {
        if inlines.is_empty() {
            return;
        }
        let paragraph = std::mem::take(inlines);
        if in_list {
            group.push(paragraph);
        } else {
            blocks.push(Block::Prose(vec![paragraph]));
        }
    };

    for event in Parser::new(markdown) {
        match event {
            Event::Start(Tag::CodeBlock(_)) => {
                flush_paragraph(&mut inlines, &mut group, &mut blocks, list_depth > 0);
                code = Some(String::new());
            }
            Event::End(TagEnd::CodeBlock) => {
                if let Some(text) = code.take() {
                    blocks.push(Block::Code(text));
                }
            }
            Event::Start(Tag::Heading { .. }) => heading = true,
            Event::End(TagEnd::Heading(_)) => {
                flush_paragraph(&mut inlines, &mut group, &mut blocks, list_depth > 0);
                heading = false;
            }
            Event::End(TagEnd::Paragraph) => {
                flush_paragraph(&mut inlines, &mut group, &mut blocks, list_depth > 0);
            }
            Event::Start(Tag::List(_)) => list_depth += 1,
            Event::End(TagEnd::List(_)) => {
                list_depth -= 1;
                if list_depth == 0 && !group.is_empty() {
                    blocks.push(Block::Prose(std::mem::take(&mut group)));
                }
            }
            Event::Start(Tag::Item) => {
                let indent = "  ".repeat(list_depth.saturating_sub(1) as usize);
                inlines.push(Inline::Text {
                    text: format!("{}- ", indent),
                    style: RunStyle::default(),
                });
            }
            Event::End(TagEnd::Item) => {
                flush_paragraph(&mut inlines, &mut group, &mut blocks, list_depth > 0);
            }
            Event::Start(Tag::Strong) => bold += 1,
            Event::End(TagEnd::Strong) => bold = bold.saturating_sub(1),
            Event::Start(Tag::Emphasis) => italic += 1,
            Event::End(TagEnd::Emphasis) => italic = italic.saturating_sub(1),
            Event::Text(text) => {
                if let Some(code) = code.as_mut() {
                    code.push_str(&text);
                } else {
                    inlines.push(Inline::Text {
                        text: text.to_string(),
                        style: RunStyle {
                            bold: bold > 0 || heading,
                            italic: italic > 0,
                            ..Default::default()
                        },
                    });
                }
            }
            Event::Code(text) => {
                inlines.push(Inline::Text {
                    text: text.to_string(),
                    style: RunStyle {
                        mono: true,
                        bold: bold > 0,
                        italic: italic > 0,
                        ..Default::default()
                    },
                });
            }
            Event::SoftBreak | Event::HardBreak => inlines.push(Inline::Break),
            _ => {}
        }
    }
    // Trailing paragraph without an explicit end event.
    flush_paragraph(&mut inlines, &mut group, &mut blocks, false);

    blocks
}
