use crate::block::{Block, plain_text};

/// Render blocks as plain text, one block per paragraph.
pub fn blocks_to_text(blocks: &[Block]) -> String {
    let mut sections = Vec::with_capacity(blocks.len());

    for block in blocks {
        let section = match block {
            Block::Heading { runs, .. } | Block::Paragraph { runs } => plain_text(runs),
            Block::CodeBlock { lines, .. } => lines.join("\n"),
            Block::List(list) => list
                .items
                .iter()
                .enumerate()
                .map(|(i, item)| {
                    if list.ordered {
                        format!("{}. {}", i + 1, plain_text(item))
                    } else {
                        format!("- {}", plain_text(item))
                    }
                })
                .collect::<Vec<_>>()
                .join("\n"),
            Block::Table { header, rows } => std::iter::once(header)
                .chain(rows)
                .filter(|row| !row.is_empty())
                .map(|row| {
                    row.iter()
                        .map(|cell| cell.plain_text().replace('\n', " / "))
                        .collect::<Vec<_>>()
                        .join(" | ")
                })
                .collect::<Vec<_>>()
                .join("\n"),
        };
        sections.push(section);
    }

    let mut out = sections.join("\n\n");
    if !out.is_empty() {
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    #[test]
    fn renders_every_block_kind() {
        let md = "# Notes\n\nSome **bold** text.\n\n```\nlet x = 1;\n```\n\n1. a\n2. `b`\n\n| A | B |\n|---|---|\n| 1 | x<br>y |";
        assert_eq!(
            blocks_to_text(&parse(md)),
            "Notes\n\nSome bold text.\n\nlet x = 1;\n\n1. a\n2. b\n\nA | B\n1 | x / y\n"
        );
    }

    #[test]
    fn empty() {
        assert_eq!(blocks_to_text(&[]), "");
    }
}
