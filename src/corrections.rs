//! Built-in mojibake repair tables.
//!
//! Each entry maps one exact corrupted sequence to the text it should have
//! been. Sequences come from UTF-8 bytes being decoded as Windows-1252 (bytes
//! that code page leaves undefined survive as C1 control characters), once for
//! the single-generation table and twice for the double-generation table.
//! Anything not listed here passes through untouched.

/// Version selected when a config does not name one.
pub const LATEST_VERSION: u32 = 2;

/// A versioned, read-only set of literal repairs.
#[derive(Debug, Clone, Copy)]
pub struct CorrectionTable {
    pub version: u32,
    layers: &'static [&'static [(&'static str, &'static str)]],
}

impl CorrectionTable {
    /// Look up a built-in table by version.
    pub fn builtin(version: u32) -> Option<Self> {
        let layers: &'static [&'static [(&str, &str)]] = match version {
            1 => &[SINGLE_GENERATION],
            2 => &[DOUBLE_GENERATION, SINGLE_GENERATION],
            _ => return None,
        };
        Some(Self { version, layers })
    }

    pub fn latest() -> Self {
        Self {
            version: LATEST_VERSION,
            layers: &[DOUBLE_GENERATION, SINGLE_GENERATION],
        }
    }

    /// All `(corrupted, repaired)` pairs of this table.
    pub fn entries(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.layers.iter().flat_map(|layer| layer.iter().copied())
    }

    pub fn len(&self) -> usize {
        self.layers.iter().map(|layer| layer.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

const SINGLE_GENERATION: &[(&str, &str)] = &[
    ("ðŸ”‘", "🔑"),
    ("ðŸ‘‰", "👉"),
    ("ðŸ“\u{9d}", "📝"),
    ("ðŸ’¡", "💡"),
    ("ðŸš€", "🚀"),
    ("ðŸ“Œ", "📌"),
    ("ðŸ’»", "💻"),
    ("ðŸ”§", "🔧"),
    ("ðŸ“Š", "📊"),
    ("ðŸ”¢", "🔢"),
    ("ðŸŽ“", "🎓"),
    ("ðŸ¤”", "🤔"),
    ("ðŸ“š", "📚"),
    ("ðŸ”\u{8d}", "🔍"),
    ("ðŸ›\u{a0}", "🛠"),
    ("â€™", "’"),
    ("â€“", "–"),
    ("â€”", "—"),
    ("â†’", "→"),
    ("ðŸŽ¯", "🎯"),
    ("ðŸ§\u{a0}", "🧠"),
    ("â€˜", "‘"),
    ("â€œ", "“"),
    ("â€\u{9d}", "”"),
    ("â€¦", "…"),
    ("â€¢", "•"),
    ("â†\u{90}", "←"),
    ("âœ“", "✓"),
    ("âœ”", "✔"),
    ("â„¢", "™"),
    ("â‚¬", "€"),
    ("âœ…", "✅"),
    ("âš¡", "⚡"),
    ("â\u{8f}\u{ad}", "⏭"),
    ("â\u{9d}Œ", "❌"),
    ("âš\u{a0}", "⚠"),
    ("â\u{ad}\u{90}", "⭐"),
    ("ï¸\u{8f}", "\u{fe0f}"),
    ("Ã‰", "É"),
    ("Ã—", "×"),
    ("Â·", "·"),
    ("Ã©", "é"),
    ("Ã¨", "è"),
    ("Ã¡", "á"),
    ("Ã\u{ad}", "í"),
    ("Ã³", "ó"),
    ("Ãº", "ú"),
    ("Ã±", "ñ"),
    ("Ã¼", "ü"),
    ("Ã¶", "ö"),
    ("Ã¤", "ä"),
    ("Ã§", "ç"),
    ("Â°", "°"),
    ("Â©", "©"),
    ("Â®", "®"),
    ("Â£", "£"),
    ("Â\u{a0}", "\u{a0}"),
];

const DOUBLE_GENERATION: &[(&str, &str)] = &[
    ("Ã¢â€\u{a0}â€™", "→"),
    ("Ã¢â‚¬â„¢", "’"),
    ("Ã¢â‚¬â€œ", "–"),
    ("Ã¢â‚¬â€\u{9d}", "—"),
    ("Ã¢â‚¬Å“", "“"),
    ("Ã¢Å“â€œ", "✓"),
    ("Ã¢Å“â€\u{9d}", "✔"),
    ("Ã¢â‚¬Ëœ", "‘"),
    ("Ã¢â‚¬Â\u{9d}", "”"),
    ("Ã¢â‚¬Â¦", "…"),
    ("Ã¢â‚¬Â¢", "•"),
    ("Ã¢â€\u{a0}Â\u{90}", "←"),
    ("Ã¢â€žÂ¢", "™"),
    ("Ã¢â€šÂ¬", "€"),
    ("Ãƒâ€”", "×"),
    ("Ãƒâ€°", "É"),
    ("Ã‚Â·", "·"),
    ("Ã‚Â°", "°"),
    ("Ã‚Â©", "©"),
    ("Ã‚Â®", "®"),
    ("Ã‚Â£", "£"),
    ("ÃƒÂ©", "é"),
    ("ÃƒÂ¨", "è"),
    ("ÃƒÂ¡", "á"),
    ("ÃƒÂ\u{ad}", "í"),
    ("ÃƒÂ³", "ó"),
    ("ÃƒÂº", "ú"),
    ("ÃƒÂ±", "ñ"),
    ("ÃƒÂ¼", "ü"),
    ("ÃƒÂ¶", "ö"),
    ("ÃƒÂ¤", "ä"),
    ("ÃƒÂ§", "ç"),
    ("Ã‚Â\u{a0}", "\u{a0}"),
];
