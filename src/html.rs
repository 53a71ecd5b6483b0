use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::block::{Block, Cell, List, StyledRun};

/// Render styled runs as escaped inline HTML.
///
/// Text is escaped before any tag is added, so model output can never inject
/// markup of its own.
pub fn runs_to_html(runs: &[StyledRun]) -> String {
    let mut out = String::new();
    push_runs(runs, &mut out);
    out
}

/// Convert blocks to an HTML fragment
pub fn blocks_to_html(blocks: &[Block]) -> String {
    let mut out = String::new();
    for block in blocks {
        emit_block(block, &mut out);
    }
    out
}

fn emit_block(block: &Block, out: &mut String) {
    match block {
        Block::Heading {
            level,
            runs,
            is_repeat,
        } => {
            out.push_str(&format!("<h{level}"));
            if *is_repeat {
                out.push_str(" class=\"page-break\"");
            }
            out.push('>');
            push_runs(runs, out);
            out.push_str(&format!("</h{level}>\n"));
        }
        Block::Paragraph { runs } => {
            out.push_str("<p>");
            push_runs(runs, out);
            out.push_str("</p>\n");
        }
        Block::CodeBlock { language, lines } => {
            out.push_str("<pre><code");
            if let Some(lang) = language {
                out.push_str(" class=\"language-");
                out.push_str(&encode_double_quoted_attribute(lang));
                out.push('"');
            }
            out.push('>');
            out.push_str(&encode_text(&lines.join("\n")));
            out.push_str("</code></pre>\n");
        }
        Block::List(list) => emit_list(list, out),
        Block::Table { header, rows } => {
            out.push_str("<table>\n");
            if !header.is_empty() {
                out.push_str("<thead><tr>");
                for cell in header {
                    emit_cell("th", cell, out);
                }
                out.push_str("</tr></thead>\n");
            }
            out.push_str("<tbody>\n");
            for row in rows {
                out.push_str("<tr>");
                for cell in row {
                    emit_cell("td", cell, out);
                }
                out.push_str("</tr>\n");
            }
            out.push_str("</tbody>\n</table>\n");
        }
    }
}

fn emit_list(list: &List, out: &mut String) {
    let tag = if list.ordered { "ol" } else { "ul" };
    out.push_str(&format!("<{tag}>\n"));
    for item in &list.items {
        out.push_str("<li>");
        push_runs(item, out);
        out.push_str("</li>\n");
    }
    out.push_str(&format!("</{tag}>\n"));
}

fn emit_cell(tag: &str, cell: &Cell, out: &mut String) {
    out.push_str(&format!("<{tag}>"));
    for (i, line) in cell.lines.iter().enumerate() {
        if i > 0 {
            out.push_str("<br>");
        }
        push_runs(line, out);
    }
    out.push_str(&format!("</{tag}>"));
}

fn push_runs(runs: &[StyledRun], out: &mut String) {
    for run in runs {
        if run.bold {
            out.push_str("<strong>");
        }
        if run.italic {
            out.push_str("<em>");
        }
        if run.code {
            out.push_str("<code>");
        }
        out.push_str(&encode_text(&run.text));
        if run.code {
            out.push_str("</code>");
        }
        if run.italic {
            out.push_str("</em>");
        }
        if run.bold {
            out.push_str("</strong>");
        }
    }
}
