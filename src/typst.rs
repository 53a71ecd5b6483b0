use crate::block::{Block, Cell, List, StyledRun};
use crate::config::Config;

/// Convert blocks to Typst markup
pub fn blocks_to_typst(blocks: &[Block], config: &Config) -> String {
    let mut out = String::new();

    // Set up paragraph settings to prevent widows/orphans
    out.push_str("#set par(linebreaks: \"optimized\")\n");
    if config.print.page_numbers {
        out.push_str("#set page(numbering: \"1\")\n");
    }
    out.push('\n');

    let mut i = 0;
    while i < blocks.len() {
        let block = &blocks[i];

        match block {
            Block::Heading { is_repeat, .. } => {
                if *is_repeat && config.print.page_break_before_repeat_sections {
                    out.push_str("#pagebreak(weak: true)\n\n");
                }

                // Keep heading with following content using a block that prevents breaks
                out.push_str("#block(breakable: false)[\n");
                emit_heading(block, &mut out);

                // Pull in the next block unless it is a heading with its own grouping
                if let Some(next) = blocks.get(i + 1) {
                    if !matches!(next, Block::Heading { .. }) {
                        i += 1;
                        emit_block(next, &mut out);
                    }
                }
                out.push_str("]\n\n");
            }
            _ => {
                emit_block(block, &mut out);
            }
        }

        i += 1;
    }

    out
}

fn emit_heading(block: &Block, out: &mut String) {
    if let Block::Heading { level, runs, .. } = block {
        for _ in 0..*level {
            out.push('=');
        }
        out.push(' ');
        runs_to_typst(runs, out);
        out.push('\n');
        out.push('\n');
    }
}

fn emit_block(block: &Block, out: &mut String) {
    match block {
        Block::Heading { .. } => {
            emit_heading(block, out);
        }
        Block::Paragraph { runs } => {
            runs_to_typst(runs, out);
            out.push('\n');
            out.push('\n');
        }
        Block::CodeBlock { language, lines } => {
            // Keep code blocks together when possible
            let fence = raw_fence(lines);
            out.push_str("#block(breakable: false)[\n");
            out.push_str(&fence);
            if let Some(lang) = language.as_deref().map(raw_lang_tag) {
                out.push_str(lang);
            }
            out.push('\n');
            for line in lines {
                out.push_str(line);
                out.push('\n');
            }
            out.push_str(&fence);
            out.push_str("\n]\n\n");
        }
        Block::List(list) => {
            // Wrap list to keep together when small, allow breaks when large
            if list.items.len() <= 5 {
                out.push_str("#block(breakable: false)[\n");
                list_to_typst(list, out);
                out.push_str("]\n\n");
            } else {
                list_to_typst(list, out);
                out.push('\n');
            }
        }
        Block::Table { header, rows } => {
            // Keep tables together when possible
            out.push_str("#block(breakable: false)[\n");
            table_to_typst(header, rows, out);
            out.push_str("]\n\n");
        }
    }
}

/// A backtick fence longer than any backtick run inside the code.
fn raw_fence(lines: &[String]) -> String {
    let longest = lines
        .iter()
        .flat_map(|line| line.split(|c: char| c != '`'))
        .map(str::len)
        .max()
        .unwrap_or(0);
    "`".repeat(longest.max(2) + 1)
}

/// Leading tag characters of a fence language; the rest could end the raw block.
fn raw_lang_tag(language: &str) -> &str {
    let end = language
        .find(|c: char| !(c.is_alphanumeric() || matches!(c, '-' | '_' | '+' | '.' | '#')))
        .unwrap_or(language.len());
    &language[..end]
}

fn runs_to_typst(runs: &[StyledRun], out: &mut String) {
    for run in runs {
        run_to_typst(run, out);
    }
}

fn run_to_typst(run: &StyledRun, out: &mut String) {
    if run.text.is_empty() {
        return;
    }
    // Typst strong/emph delimiters only work at word edges, so use the
    // function forms which work anywhere.
    if run.bold {
        out.push_str("#strong[");
    }
    if run.italic {
        out.push_str("#emph[");
    }
    if run.code {
        out.push_str("#raw(\"");
        for ch in run.text.chars() {
            match ch {
                '"' | '\\' => {
                    out.push('\\');
                    out.push(ch);
                }
                _ => out.push(ch),
            }
        }
        out.push_str("\")");
    } else {
        escape_text(&run.text, out);
    }
    if run.italic {
        out.push(']');
    }
    if run.bold {
        out.push(']');
    }
}

fn escape_text(text: &str, out: &mut String) {
    // Escape special Typst characters
    for ch in text.chars() {
        match ch {
            '#' | '*' | '_' | '@' | '$' | '\\' | '`' | '<' | '>' | '[' | ']' | '=' | '-'
            | '+' | '/' | '~' => {
                out.push('\\');
                out.push(ch);
            }
            _ => out.push(ch),
        }
    }
}

fn list_to_typst(list: &List, out: &mut String) {
    let prefix = if list.ordered { "+" } else { "-" };

    for item in &list.items {
        out.push_str(prefix);
        out.push(' ');
        runs_to_typst(item, out);
        out.push('\n');
    }
}

fn cell_to_typst(cell: &Cell, out: &mut String) {
    for (i, line) in cell.lines.iter().enumerate() {
        if i > 0 {
            out.push_str(" \\\n");
        }
        runs_to_typst(line, out);
    }
}

fn table_to_typst(header: &[Cell], rows: &[Vec<Cell>], out: &mut String) {
    // Ragged rows: size the grid to the widest row and fill the gaps
    let col_count = rows
        .iter()
        .map(Vec::len)
        .chain(std::iter::once(header.len()))
        .max()
        .unwrap_or(0);
    if col_count == 0 {
        return;
    }

    out.push_str("#table(\n");
    out.push_str(&format!("  columns: {},\n", col_count));

    if !header.is_empty() {
        // Header cells (bold)
        for cell in header {
            out.push_str("  [#strong[");
            cell_to_typst(cell, out);
            out.push_str("]],\n");
        }
        for _ in header.len()..col_count {
            out.push_str("  [],\n");
        }
    }

    // Data rows
    for row in rows {
        for cell in row {
            out.push_str("  [");
            cell_to_typst(cell, out);
            out.push_str("],\n");
        }
        for _ in row.len()..col_count {
            out.push_str("  [],\n");
        }
    }

    out.push_str(")\n");
}
