//! Line-oriented block scanner.
//!
//! Each iteration classifies the line under the cursor and hands it to the
//! matching builder, which consumes one or more lines and returns a single
//! block. The cursor only moves forward, and every iteration moves it by at
//! least one line.

use crate::block::{Block, Cell, List, SpannedBlock, StyledRun};
use crate::inline;

const FENCE: &str = "```";

/// What a single line looks like to the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Blank,
    Fence,
    Heading,
    TableRow,
    ListItem,
    Paragraph,
}

/// Line tests in priority order. The first match wins; a non-blank line
/// matching none of them is a paragraph.
pub const DISPATCH: &[(LineKind, fn(&str) -> bool)] = &[
    (LineKind::Fence, is_fence),
    (LineKind::Heading, is_heading),
    (LineKind::TableRow, is_table_row),
    (LineKind::ListItem, is_list_item),
];

pub fn classify(line: &str) -> LineKind {
    if line.trim().is_empty() {
        return LineKind::Blank;
    }
    DISPATCH
        .iter()
        .find(|(_, accepts)| accepts(line))
        .map(|(kind, _)| *kind)
        .unwrap_or(LineKind::Paragraph)
}

pub fn is_fence(line: &str) -> bool {
    line.trim().starts_with(FENCE)
}

pub fn is_heading(line: &str) -> bool {
    heading_parts(line).is_some()
}

pub fn is_table_row(line: &str) -> bool {
    line.trim().starts_with('|')
}

pub fn is_list_item(line: &str) -> bool {
    list_marker(line).is_some()
}

/// `(level, content)` for `#`–`######`, at least one space, then content.
fn heading_parts(line: &str) -> Option<(u8, &str)> {
    let line = line.trim_start();
    let hashes = line.bytes().take_while(|&b| b == b'#').count();
    if !(1..=6).contains(&hashes) {
        return None;
    }
    let rest = &line[hashes..];
    if !rest.starts_with([' ', '\t']) {
        return None;
    }
    let content = rest.trim();
    if content.is_empty() {
        return None;
    }
    Some((hashes as u8, content))
}

/// `(ordered, content)` for `* item`, `- item` or `12. item`.
fn list_marker(line: &str) -> Option<(bool, &str)> {
    let line = line.trim_start();
    if let Some(rest) = line.strip_prefix("* ").or_else(|| line.strip_prefix("- ")) {
        return Some((false, rest.trim()));
    }
    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    if digits > 0 {
        if let Some(rest) = line[digits..].strip_prefix(". ") {
            return Some((true, rest.trim()));
        }
    }
    None
}

/// Continuation of the previous list item: indented by two or more spaces,
/// not blank, and not an item of its own.
fn is_continuation(line: &str) -> bool {
    line.starts_with("  ") && !line.trim().is_empty() && !is_list_item(line)
}

/// Shared forward-only position over the input lines.
struct LineCursor<'a> {
    lines: Vec<&'a str>,
    pos: usize,
}

impl<'a> LineCursor<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<&'a str> {
        self.lines.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<&'a str> {
        let line = self.peek()?;
        self.pos += 1;
        Some(line)
    }

    /// Take the next line if `accept` says so.
    fn advance_if(&mut self, accept: impl Fn(&str) -> bool) -> Option<&'a str> {
        match self.peek() {
            Some(line) if accept(line) => self.advance(),
            _ => None,
        }
    }
}

/// Scanner state that lives for one `scan` call.
#[derive(Default)]
struct ScanState {
    top_level_headings: usize,
}

/// Scan normalized text into blocks.
pub fn scan(text: &str) -> Vec<Block> {
    scan_spanned(text)
        .into_iter()
        .map(|spanned| spanned.block)
        .collect()
}

/// Scan normalized text into blocks, keeping the line range each came from.
pub fn scan_spanned(text: &str) -> Vec<SpannedBlock> {
    let mut cursor = LineCursor::new(text);
    let mut state = ScanState::default();
    let mut blocks = Vec::new();

    while let Some(line) = cursor.peek() {
        let start = cursor.pos;
        let kind = classify(line);
        log::trace!("line {start}: {kind:?}");

        let block = match kind {
            LineKind::Blank => {
                cursor.advance();
                continue;
            }
            LineKind::Fence => build_code_block(&mut cursor),
            LineKind::Heading => build_heading(&mut cursor, &mut state),
            LineKind::TableRow => build_table(&mut cursor),
            LineKind::ListItem => build_list(&mut cursor),
            LineKind::Paragraph => build_paragraph(&mut cursor),
        };
        debug_assert!(cursor.pos > start, "builder for {kind:?} did not advance");

        blocks.push(SpannedBlock {
            lines: start..cursor.pos,
            block,
        });
    }

    log::debug!(
        "Scanned {} lines into {} blocks",
        cursor.lines.len(),
        blocks.len()
    );
    blocks
}

fn build_code_block(cursor: &mut LineCursor) -> Block {
    let opening = cursor.advance().unwrap_or_default();
    let language = opening.trim().trim_start_matches(FENCE).trim();
    let language = if language.is_empty() {
        None
    } else {
        Some(language.to_string())
    };

    let mut lines = Vec::new();
    while let Some(line) = cursor.advance() {
        if is_fence(line) {
            return Block::CodeBlock { language, lines };
        }
        lines.push(line.to_string());
    }

    log::debug!("Unterminated code fence, took {} lines to end of input", lines.len());
    Block::CodeBlock { language, lines }
}

fn build_heading(cursor: &mut LineCursor, state: &mut ScanState) -> Block {
    let line = cursor.advance().unwrap_or_default();
    let (level, content) = heading_parts(line).unwrap_or((1, line.trim()));

    let content = content
        .strip_prefix("**")
        .and_then(|inner| inner.strip_suffix("**"))
        .unwrap_or(content);

    let is_repeat = if level <= 2 {
        state.top_level_headings += 1;
        state.top_level_headings > 1
    } else {
        false
    };

    Block::Heading {
        level,
        runs: inline::format(content),
        is_repeat,
    }
}

fn build_table(cursor: &mut LineCursor) -> Block {
    let mut rows: Vec<Vec<Cell>> = Vec::new();
    while let Some(line) = cursor.advance_if(is_table_row) {
        let row: Vec<Cell> = line
            .split('|')
            .map(str::trim)
            .filter(|cell| !cell.is_empty() && !is_separator_cell(cell))
            .map(build_cell)
            .collect();
        if !row.is_empty() {
            rows.push(row);
        }
    }

    let mut rows = rows.into_iter();
    let header = rows.next().unwrap_or_default();
    Block::Table {
        header,
        rows: rows.collect(),
    }
}

/// `---`, `:---`, `---:` or `:---:`
fn is_separator_cell(cell: &str) -> bool {
    cell.contains('-') && cell.chars().all(|c| c == '-' || c == ':')
}

fn build_cell(text: &str) -> Cell {
    Cell {
        lines: split_line_breaks(text)
            .into_iter()
            .map(|part| inline::format(part.trim()))
            .collect(),
    }
}

/// Split on `<br>`, `<br/>`, `<br />` in any letter case.
fn split_line_breaks(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut search = 0;
    while let Some(offset) = text[search..].find('<') {
        let at = search + offset;
        match line_break_len(&text[at..]) {
            Some(len) => {
                parts.push(&text[start..at]);
                start = at + len;
                search = start;
            }
            None => search = at + 1,
        }
    }
    parts.push(&text[start..]);
    parts
}

/// Byte length of a `<br>` tag at the start of `text`.
fn line_break_len(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    if bytes.len() < 3 || bytes[0] != b'<' || !bytes[1..3].eq_ignore_ascii_case(b"br") {
        return None;
    }
    let mut i = 3;
    while bytes.get(i).is_some_and(u8::is_ascii_whitespace) {
        i += 1;
    }
    if bytes.get(i) == Some(&b'/') {
        i += 1;
    }
    (bytes.get(i) == Some(&b'>')).then_some(i + 1)
}

fn build_list(cursor: &mut LineCursor) -> Block {
    let mut ordered = None;
    let mut items: Vec<Vec<StyledRun>> = Vec::new();

    while let Some(line) = cursor.advance_if(is_list_item) {
        let Some((item_ordered, content)) = list_marker(line) else {
            break;
        };
        ordered.get_or_insert(item_ordered);

        let mut text = content.to_string();
        while let Some(continuation) = cursor.advance_if(is_continuation) {
            if !text.is_empty() {
                text.push(' ');
            }
            text.push_str(continuation.trim());
        }
        items.push(inline::format(&text));
    }

    Block::List(List {
        ordered: ordered.unwrap_or(false),
        items,
    })
}

fn build_paragraph(cursor: &mut LineCursor) -> Block {
    let line = cursor.advance().unwrap_or_default();
    Block::Paragraph {
        runs: inline::format(line.trim()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn cell(text: &str) -> Cell {
        Cell {
            lines: vec![vec![StyledRun::plain(text)]],
        }
    }

    #[rstest]
    #[case("", LineKind::Blank)]
    #[case("   \t", LineKind::Blank)]
    #[case("```rust", LineKind::Fence)]
    #[case("   ```", LineKind::Fence)]
    #[case("# Title", LineKind::Heading)]
    #[case("###### Six", LineKind::Heading)]
    #[case("####### Seven", LineKind::Paragraph)]
    #[case("#NoSpace", LineKind::Paragraph)]
    #[case("# ", LineKind::Blank)]
    #[case("#", LineKind::Paragraph)]
    #[case("| a | b |", LineKind::TableRow)]
    #[case("  | indented |", LineKind::TableRow)]
    #[case("- item", LineKind::ListItem)]
    #[case("* item", LineKind::ListItem)]
    #[case("  - nested", LineKind::ListItem)]
    #[case("12. twelfth", LineKind::ListItem)]
    #[case("12.no space", LineKind::Paragraph)]
    #[case("**bold** start", LineKind::Paragraph)]
    #[case("---", LineKind::Paragraph)]
    #[case("plain words", LineKind::Paragraph)]
    fn classifies_lines(#[case] line: &str, #[case] expected: LineKind) {
        assert_eq!(classify(line), expected);
    }

    #[test]
    fn fence_beats_everything() {
        assert_eq!(classify("```| - # x"), LineKind::Fence);
    }

    #[test]
    fn heading_beats_table_and_list() {
        assert_eq!(classify("# | - x"), LineKind::Heading);
    }

    #[test]
    fn table_beats_list() {
        assert_eq!(classify("| - x |"), LineKind::TableRow);
    }

    #[test]
    fn dispatch_order_is_fixed() {
        let order: Vec<LineKind> = DISPATCH.iter().map(|(kind, _)| *kind).collect();
        assert_eq!(
            order,
            vec![
                LineKind::Fence,
                LineKind::Heading,
                LineKind::TableRow,
                LineKind::ListItem,
            ]
        );
    }

    #[test]
    fn empty_input() {
        assert!(scan("").is_empty());
        assert!(scan("\n\n   \n").is_empty());
    }

    #[test]
    fn heading_and_paragraph() {
        assert_eq!(
            scan("# Title\n\nSome **bold** text."),
            vec![
                Block::Heading {
                    level: 1,
                    runs: vec![StyledRun::plain("Title")],
                    is_repeat: false,
                },
                Block::Paragraph {
                    runs: vec![
                        StyledRun::plain("Some "),
                        StyledRun::bold("bold"),
                        StyledRun::plain(" text."),
                    ],
                },
            ]
        );
    }

    #[test]
    fn heading_strips_enclosing_bold() {
        assert_eq!(
            scan("## **Key Concepts**"),
            vec![Block::Heading {
                level: 2,
                runs: vec![StyledRun::plain("Key Concepts")],
                is_repeat: false,
            }]
        );
    }

    #[test]
    fn repeat_top_level_headings() {
        let repeats: Vec<(u8, bool)> = scan("# A\n### a1\n## B\n#### b1\n## C\n# D")
            .into_iter()
            .filter_map(|block| match block {
                Block::Heading {
                    level, is_repeat, ..
                } => Some((level, is_repeat)),
                _ => None,
            })
            .collect();
        assert_eq!(
            repeats,
            vec![
                (1, false),
                (3, false),
                (2, true),
                (4, false),
                (2, true),
                (1, true),
            ]
        );
    }

    #[test]
    fn closed_code_block() {
        assert_eq!(
            scan("```rust\nlet x = 1;\n  indented\n```\nafter"),
            vec![
                Block::CodeBlock {
                    language: Some("rust".to_string()),
                    lines: vec!["let x = 1;".to_string(), "  indented".to_string()],
                },
                Block::Paragraph {
                    runs: vec![StyledRun::plain("after")],
                },
            ]
        );
    }

    #[test]
    fn code_block_keeps_markup_and_blank_lines() {
        assert_eq!(
            scan("```\n# not a heading\n\n| not | a table |\n```"),
            vec![Block::CodeBlock {
                language: None,
                lines: vec![
                    "# not a heading".to_string(),
                    String::new(),
                    "| not | a table |".to_string(),
                ],
            }]
        );
    }

    #[test]
    fn unterminated_code_block_runs_to_end() {
        assert_eq!(
            scan("```go\nfunc main() {}\n"),
            vec![Block::CodeBlock {
                language: Some("go".to_string()),
                lines: vec!["func main() {}".to_string()],
            }]
        );
    }

    #[test]
    fn table_with_separator() {
        assert_eq!(
            scan("| A | B |\n| --- | --- |\n| 1 | 2 |"),
            vec![Block::Table {
                header: vec![cell("A"), cell("B")],
                rows: vec![vec![cell("1"), cell("2")]],
            }]
        );
    }

    #[test]
    fn aligned_separator_is_dropped() {
        assert_eq!(
            scan("| A |\n|:---:|\n| 1 |"),
            vec![Block::Table {
                header: vec![cell("A")],
                rows: vec![vec![cell("1")]],
            }]
        );
    }

    #[test]
    fn ragged_table_is_not_padded() {
        assert_eq!(
            scan("| A | B |\n| 1 |"),
            vec![Block::Table {
                header: vec![cell("A"), cell("B")],
                rows: vec![vec![cell("1")]],
            }]
        );
    }

    #[test]
    fn table_of_only_separators() {
        assert_eq!(
            scan("| --- |\n|"),
            vec![Block::Table {
                header: vec![],
                rows: vec![],
            }]
        );
    }

    #[test]
    fn table_ends_at_first_non_row() {
        let blocks = scan("| A |\n| 1 |\nafter\n| B |");
        assert_eq!(blocks.len(), 3);
        assert!(matches!(blocks[1], Block::Paragraph { .. }));
        assert!(matches!(blocks[2], Block::Table { .. }));
    }

    #[test]
    fn cell_line_breaks() {
        let blocks = scan("| Q | **Step 1**: a<br>b<BR/>c <br /> d |");
        let Block::Table { header, .. } = &blocks[0] else {
            panic!("expected table, got {blocks:?}");
        };
        assert_eq!(header.len(), 2);
        assert_eq!(
            header[1].lines,
            vec![
                vec![StyledRun::bold("Step 1"), StyledRun::plain(": a")],
                vec![StyledRun::plain("b")],
                vec![StyledRun::plain("c")],
                vec![StyledRun::plain("d")],
            ]
        );
    }

    #[rstest]
    #[case("a<br>b", vec!["a", "b"])]
    #[case("a<br><br>b", vec!["a", "", "b"])]
    #[case("<Br  />x", vec!["", "x"])]
    #[case("a<b>c", vec!["a<b>c"])]
    #[case("a<brx>b", vec!["a<brx>b"])]
    #[case("trailing <br", vec!["trailing <br"])]
    fn splits_line_breaks(#[case] input: &str, #[case] expected: Vec<&str>) {
        assert_eq!(split_line_breaks(input), expected);
    }

    #[test]
    fn list_with_continuation() {
        assert_eq!(
            scan("- item one\n  continued\n- item two"),
            vec![Block::List(List {
                ordered: false,
                items: vec![
                    vec![StyledRun::plain("item one continued")],
                    vec![StyledRun::plain("item two")],
                ],
            })]
        );
    }

    #[test]
    fn first_item_fixes_list_kind() {
        assert_eq!(
            scan("1. first\n- second\n2. third"),
            vec![Block::List(List {
                ordered: true,
                items: vec![
                    vec![StyledRun::plain("first")],
                    vec![StyledRun::plain("second")],
                    vec![StyledRun::plain("third")],
                ],
            })]
        );
    }

    #[test]
    fn indented_items_are_new_items() {
        let blocks = scan("- parent\n  - child\n    more");
        assert_eq!(
            blocks,
            vec![Block::List(List {
                ordered: false,
                items: vec![
                    vec![StyledRun::plain("parent")],
                    vec![StyledRun::plain("child more")],
                ],
            })]
        );
    }

    #[test]
    fn list_stops_at_blank_or_unindented_line() {
        let blocks = scan("- a\nnot indented\n- b\n\n- c");
        assert_eq!(blocks.len(), 4);
        assert!(matches!(blocks[0], Block::List(_)));
        assert!(matches!(blocks[1], Block::Paragraph { .. }));
        assert!(matches!(blocks[2], Block::List(_)));
        assert!(matches!(blocks[3], Block::List(_)));
    }

    #[test]
    fn list_items_are_formatted() {
        assert_eq!(
            scan("- **Term**: meaning"),
            vec![Block::List(List {
                ordered: false,
                items: vec![vec![
                    StyledRun::bold("Term"),
                    StyledRun::plain(": meaning"),
                ]],
            })]
        );
    }

    #[test]
    fn each_paragraph_line_is_its_own_block() {
        assert_eq!(scan("one\ntwo\nthree").len(), 3);
    }

    #[test]
    fn crlf_line_endings() {
        assert_eq!(
            scan("# T\r\n- a\r\n  b\r\n"),
            vec![
                Block::Heading {
                    level: 1,
                    runs: vec![StyledRun::plain("T")],
                    is_repeat: false,
                },
                Block::List(List {
                    ordered: false,
                    items: vec![vec![StyledRun::plain("a b")]],
                }),
            ]
        );
    }

    #[test]
    fn spanned_ranges() {
        let ranges: Vec<_> = scan_spanned("# T\n\n```\ncode\n```\n| a |\n| b |\n- x\n  y\np")
            .into_iter()
            .map(|spanned| spanned.lines)
            .collect();
        assert_eq!(ranges, vec![0..1, 2..5, 5..7, 7..9, 9..10]);
    }
}
