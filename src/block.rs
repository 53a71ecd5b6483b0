use std::ops::Range;

use serde::Serialize;

/// A run of text sharing one combination of inline styles
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StyledRun {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
    pub code: bool,
}

impl StyledRun {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: true,
            ..Self::default()
        }
    }

    pub fn italic(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            italic: true,
            ..Self::default()
        }
    }

    pub fn code(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            code: true,
            ..Self::default()
        }
    }

    pub fn same_style(&self, other: &StyledRun) -> bool {
        self.bold == other.bold && self.italic == other.italic && self.code == other.code
    }
}

/// Concatenated text of a run sequence, styling dropped.
pub fn plain_text(runs: &[StyledRun]) -> String {
    runs.iter().map(|run| run.text.as_str()).collect()
}

/// Table cell content: one entry per `<br>`-separated sub-line
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Cell {
    pub lines: Vec<Vec<StyledRun>>,
}

impl Cell {
    pub fn plain_text(&self) -> String {
        self.lines
            .iter()
            .map(|line| plain_text(line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A list (ordered or unordered); each item is one line of styled runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct List {
    pub ordered: bool,
    pub items: Vec<Vec<StyledRun>>,
}

/// Block-level elements parsed from note markdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Block {
    Heading {
        level: u8,
        runs: Vec<StyledRun>,
        /// A level 1 or 2 heading that follows an earlier level 1 or 2 heading.
        is_repeat: bool,
    },
    CodeBlock {
        language: Option<String>,
        lines: Vec<String>,
    },
    Table {
        header: Vec<Cell>,
        rows: Vec<Vec<Cell>>,
    },
    List(List),
    Paragraph {
        runs: Vec<StyledRun>,
    },
}

/// A block with the range of input lines it was built from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpannedBlock {
    pub lines: Range<usize>,
    pub block: Block,
}
