//! Inline emphasis and code-span resolution.
//!
//! Works on a per-character slot array so each pass can see what earlier
//! passes claimed: code spans first (their content is never re-scanned), then
//! bold, then italic over whatever bold left alone. Delimiters that find no
//! partner stay in the text as literal characters.

use crate::block::StyledRun;

#[derive(Debug, Clone, Copy)]
struct Slot {
    ch: char,
    /// Consumed delimiter; not part of the output text.
    hidden: bool,
    /// Delimiter of a bold span. Italic spans may not cross these.
    bold_edge: bool,
    bold: bool,
    italic: bool,
    code: bool,
}

impl Slot {
    fn new(ch: char) -> Self {
        Self {
            ch,
            hidden: false,
            bold_edge: false,
            bold: false,
            italic: false,
            code: false,
        }
    }

    /// Still available as a delimiter.
    fn is_free(&self) -> bool {
        !self.hidden && !self.code
    }
}

/// Resolve `**bold**`, `__bold__`, `*italic*`, `_italic_` and `` `code` ``
/// into styled runs.
pub fn format(text: &str) -> Vec<StyledRun> {
    let mut slots: Vec<Slot> = text.chars().map(Slot::new).collect();
    mark_code_spans(&mut slots);
    mark_bold(&mut slots);
    mark_italic(&mut slots);
    collect_runs(&slots)
}

fn mark_code_spans(slots: &mut [Slot]) {
    let mut i = 0;
    while i < slots.len() {
        if slots[i].ch != '`' {
            i += 1;
            continue;
        }
        match (i + 1..slots.len()).find(|&j| slots[j].ch == '`') {
            // "``" has nothing to format
            Some(j) if j == i + 1 => i = j + 1,
            Some(j) => {
                slots[i].hidden = true;
                slots[j].hidden = true;
                for slot in &mut slots[i + 1..j] {
                    slot.code = true;
                }
                i = j + 1;
            }
            None => return,
        }
    }
}

fn mark_bold(slots: &mut [Slot]) {
    // Closers only depend on state bold never touches ahead of the cursor,
    // so they can be found once up front.
    let star = next_matching(slots.len(), |k| is_bold_closer(slots, k, '*'));
    let underscore = next_matching(slots.len(), |k| is_bold_closer(slots, k, '_'));

    let mut i = 0;
    while i + 1 < slots.len() {
        let delim = slots[i].ch;
        let opens = is_delimiter(delim)
            && slots[i].is_free()
            && slots[i + 1].is_free()
            && slots[i + 1].ch == delim
            && opens_at(slots, i, 2);
        if !opens {
            i += 1;
            continue;
        }

        let closers = if delim == '*' { &star } else { &underscore };
        match closers.get(i + 3).copied().flatten() {
            Some(k) => {
                for edge in [i, i + 1, k, k + 1] {
                    slots[edge].hidden = true;
                    slots[edge].bold_edge = true;
                }
                for slot in &mut slots[i + 2..k] {
                    slot.bold = true;
                }
                i = k + 2;
            }
            None => i += 1,
        }
    }
}

fn is_bold_closer(slots: &[Slot], at: usize, delim: char) -> bool {
    at + 1 < slots.len()
        && slots[at].ch == delim
        && slots[at + 1].ch == delim
        && slots[at].is_free()
        && slots[at + 1].is_free()
        && closes_at(slots, at, 2)
}

fn mark_italic(slots: &mut [Slot]) {
    let star = next_matching(slots.len(), |k| is_italic_closer(slots, k, '*'));
    let underscore = next_matching(slots.len(), |k| is_italic_closer(slots, k, '_'));
    let bold = next_matching(slots.len(), |k| slots[k].bold || slots[k].bold_edge);

    let mut i = 0;
    while i < slots.len() {
        let delim = slots[i].ch;
        let opens =
            is_delimiter(delim) && slots[i].is_free() && !slots[i].bold && opens_at(slots, i, 1);
        if !opens {
            i += 1;
            continue;
        }

        // Italic may not reach across bold text.
        let closers = if delim == '*' { &star } else { &underscore };
        let barrier = bold.get(i + 2).copied().flatten();
        let close = closers
            .get(i + 2)
            .copied()
            .flatten()
            .filter(|&k| barrier.is_none_or(|b| k < b));

        match close {
            Some(k) => {
                slots[i].hidden = true;
                slots[k].hidden = true;
                for slot in &mut slots[i + 1..k] {
                    slot.italic = true;
                }
                i = k + 1;
            }
            None => i += 1,
        }
    }
}

fn is_italic_closer(slots: &[Slot], at: usize, delim: char) -> bool {
    slots[at].ch == delim && slots[at].is_free() && closes_at(slots, at, 1)
}

/// For each position `p`, the first position at or after `p` where `hit`
/// holds. Has one extra trailing entry so `p == len` is a valid lookup.
fn next_matching(len: usize, hit: impl Fn(usize) -> bool) -> Vec<Option<usize>> {
    let mut next = vec![None; len + 1];
    for p in (0..len).rev() {
        next[p] = if hit(p) { Some(p) } else { next[p + 1] };
    }
    next
}

fn is_delimiter(ch: char) -> bool {
    ch == '*' || ch == '_'
}

/// A delimiter of `width` chars at `at` can open: content follows without
/// whitespace, and `_` is not glued to a preceding word.
fn opens_at(slots: &[Slot], at: usize, width: usize) -> bool {
    let Some(next) = slots.get(at + width) else {
        return false;
    };
    if next.ch.is_whitespace() {
        return false;
    }
    if slots[at].ch == '_' && at > 0 && slots[at - 1].ch.is_alphanumeric() {
        return false;
    }
    true
}

/// A delimiter of `width` chars at `at` can close: no whitespace before it,
/// and `_` is not glued to a following word.
fn closes_at(slots: &[Slot], at: usize, width: usize) -> bool {
    if at == 0 || slots[at - 1].ch.is_whitespace() {
        return false;
    }
    if slots[at].ch == '_'
        && slots
            .get(at + width)
            .is_some_and(|next| next.ch.is_alphanumeric())
    {
        return false;
    }
    true
}

fn collect_runs(slots: &[Slot]) -> Vec<StyledRun> {
    let mut runs: Vec<StyledRun> = Vec::new();
    for slot in slots.iter().filter(|slot| !slot.hidden) {
        let next = StyledRun {
            text: String::new(),
            bold: slot.bold,
            italic: slot.italic,
            code: slot.code,
        };
        if !runs.last().is_some_and(|run| run.same_style(&next)) {
            runs.push(next);
        }
        if let Some(run) = runs.last_mut() {
            run.text.push(slot.ch);
        }
    }
    runs
}
