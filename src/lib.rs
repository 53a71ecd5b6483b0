mod block;
mod config;
pub mod corrections;
mod html;
mod inline;
mod normalize;
pub mod parser;
pub mod response;
mod text;
mod typst;

pub use block::{Block, Cell, List, SpannedBlock, StyledRun, plain_text};
pub use config::{Config, ConfigError, Correction, NormalizeConfig, PrintConfig};
pub use html::{blocks_to_html, runs_to_html};
pub use inline::format;
pub use normalize::{Normalizer, normalize};
pub use parser::{scan, scan_spanned};
pub use text::blocks_to_text;
pub use typst::blocks_to_typst;

use thiserror::Error;
use typst_as_lib::TypstEngine;
use typst_as_lib::typst_kit_options::TypstKitFontOptions;
use typst_pdf::PdfOptions;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Typst compilation failed: {0}")]
    Compile(String),

    #[error("PDF generation failed: {0}")]
    Pdf(String),
}

/// Parse note markdown into a vector of blocks.
pub fn parse(raw: &str) -> Vec<Block> {
    parse_with(raw, &Normalizer::default())
}

/// Parse with a configured normalizer.
pub fn parse_with(raw: &str, normalizer: &Normalizer) -> Vec<Block> {
    scan(&normalizer.normalize(raw))
}

/// Convert markdown to an HTML fragment.
pub fn markdown_to_html(markdown: &str) -> String {
    blocks_to_html(&parse(markdown))
}

/// Convert markdown to Typst markup using default config.
pub fn markdown_to_typst(markdown: &str) -> String {
    markdown_to_typst_with_config(markdown, &Config::compiled_default())
}

/// Convert markdown to Typst markup with custom config.
pub fn markdown_to_typst_with_config(markdown: &str, config: &Config) -> String {
    let blocks = parse_with(markdown, &Normalizer::from_config(&config.normalize));
    blocks_to_typst(&blocks, config)
}

/// Convert markdown to PDF bytes.
pub fn markdown_to_pdf(markdown: &str, config: &Config) -> Result<Vec<u8>, ExportError> {
    let blocks = parse_with(markdown, &Normalizer::from_config(&config.normalize));
    blocks_to_pdf(&blocks, config)
}

/// Typeset already parsed blocks as PDF bytes.
pub fn blocks_to_pdf(blocks: &[Block], config: &Config) -> Result<Vec<u8>, ExportError> {
    use typst_library::layout::PagedDocument;

    let typst_content = blocks_to_typst(blocks, config);

    let font_options = TypstKitFontOptions::new()
        .include_embedded_fonts(true)
        .include_system_fonts(false);

    let engine = TypstEngine::builder()
        .main_file(typst_content)
        .search_fonts_with(font_options)
        .build();

    let doc: PagedDocument = engine
        .compile()
        .output
        .map_err(|e| ExportError::Compile(format!("{:?}", e)))?;

    typst_pdf::pdf(&doc, &PdfOptions::default()).map_err(|e| ExportError::Pdf(format!("{:?}", e)))
}
