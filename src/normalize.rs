use std::borrow::Cow;

use crate::config::{Correction, NormalizeConfig};
use crate::corrections::CorrectionTable;

/// Decodes HTML entities and repairs known mojibake sequences.
#[derive(Debug, Clone)]
pub struct Normalizer {
    // Sorted longest pattern first.
    corrections: Vec<(String, String)>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::with_table(CorrectionTable::latest(), &[])
    }
}

impl Normalizer {
    /// Build a normalizer from a built-in table plus extra repairs.
    ///
    /// Extra repairs must have a non-empty pattern and a strictly shorter
    /// replacement; anything else is skipped with a warning.
    pub fn with_table(table: CorrectionTable, extra: &[Correction]) -> Self {
        let mut corrections: Vec<(String, String)> = table
            .entries()
            .map(|(from, to)| (from.to_string(), to.to_string()))
            .collect();

        for correction in extra {
            if correction.from.is_empty() || correction.to.len() >= correction.from.len() {
                log::warn!(
                    "Ignoring correction {:?} -> {:?}: replacement must be shorter than the pattern",
                    correction.from,
                    correction.to
                );
                continue;
            }
            corrections.push((correction.from.clone(), correction.to.clone()));
        }

        // Stable, so built-in order wins among equal lengths.
        corrections.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

        Self { corrections }
    }

    pub fn from_config(config: &NormalizeConfig) -> Self {
        let table = CorrectionTable::builtin(config.table_version).unwrap_or_else(|| {
            let latest = CorrectionTable::latest();
            log::warn!(
                "Unknown correction table version {}, using version {}",
                config.table_version,
                latest.version
            );
            latest
        });
        Self::with_table(table, &config.extra_corrections)
    }

    /// Normalize `raw` until it stops changing.
    ///
    /// A pass that changes the text either consumes an entity's `&` or
    /// shrinks the text, so the pass count is bounded by the input length.
    pub fn normalize(&self, raw: &str) -> String {
        let mut text = raw.to_string();
        for _ in 0..=raw.len() {
            match self.pass(&text) {
                Cow::Borrowed(_) => return text,
                Cow::Owned(next) => text = next,
            }
        }
        log::warn!("Normalization did not settle after {} passes", raw.len() + 1);
        text
    }

    /// One entity-decode and repair pass. Borrowed means nothing changed.
    fn pass<'a>(&self, text: &'a str) -> Cow<'a, str> {
        let decoded = html_escape::decode_html_entities(text);
        let mut changed = !matches!(decoded, Cow::Borrowed(_));
        let mut out = decoded.into_owned();

        for (from, to) in &self.corrections {
            if out.contains(from.as_str()) {
                out = out.replace(from.as_str(), to);
                changed = true;
            }
        }

        if changed && out != text {
            Cow::Owned(out)
        } else {
            Cow::Borrowed(text)
        }
    }
}

/// Normalize with the latest built-in correction table.
pub fn normalize(raw: &str) -> String {
    Normalizer::default().normalize(raw)
}
