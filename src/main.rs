use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use gist::response::GenerateResponse;
use gist::{Config, Normalizer};

#[derive(Parser)]
#[command(name = "gist")]
#[command(about = "Render generated video notes as JSON, HTML, Typst, text or PDF")]
struct Cli {
    /// Input markdown file (reads stdin when omitted or "-")
    input: Option<PathBuf>,

    /// Output file (defaults to stdout, or the input name with .pdf for PDF)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Json)]
    format: Format,

    /// Config file
    #[arg(short, long, default_value = "gist.toml")]
    config: PathBuf,

    /// Treat input as a /api/generate JSON response body
    #[arg(long)]
    response: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Html,
    Typst,
    Text,
    Pdf,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let config = match Config::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    // Read input
    let input = match read_input(cli.input.as_deref()) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading input: {}", e);
            std::process::exit(1);
        }
    };

    let markdown = if cli.response {
        match GenerateResponse::from_json(&input) {
            Ok(response) => {
                if let Some(limit) = &response.rate_limit {
                    log::info!("Rate limit: {} of {} remaining", limit.remaining, limit.limit);
                }
                response.markdown
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        input
    };

    let rendered = match render(&markdown, cli.format, &config) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    // Determine output path; PDF never goes to a terminal
    let output = cli.output.or_else(|| match (cli.format, &cli.input) {
        (Format::Pdf, Some(input)) if input.as_os_str() != "-" => Some(input.with_extension("pdf")),
        (Format::Pdf, _) => Some(PathBuf::from("notes.pdf")),
        _ => None,
    });

    match output {
        Some(path) => {
            if let Err(e) = fs::write(&path, rendered) {
                eprintln!("Error writing {}: {}", path.display(), e);
                std::process::exit(1);
            }
            println!("Created {}", path.display());
        }
        None => {
            if let Err(e) = io::stdout().write_all(&rendered) {
                eprintln!("Error writing output: {}", e);
                std::process::exit(1);
            }
        }
    }
}

fn read_input(path: Option<&Path>) -> io::Result<String> {
    match path {
        Some(path) if path.as_os_str() != "-" => fs::read_to_string(path),
        _ => {
            let mut content = String::new();
            io::stdin().read_to_string(&mut content)?;
            Ok(content)
        }
    }
}

fn render(
    markdown: &str,
    format: Format,
    config: &Config,
) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    let normalizer = Normalizer::from_config(&config.normalize);
    let blocks = gist::parse_with(markdown, &normalizer);
    log::debug!("Parsed {} blocks", blocks.len());

    let bytes = match format {
        Format::Json => {
            let mut json = serde_json::to_vec_pretty(&blocks)?;
            json.push(b'\n');
            json
        }
        Format::Html => gist::blocks_to_html(&blocks).into_bytes(),
        Format::Typst => gist::blocks_to_typst(&blocks, config).into_bytes(),
        Format::Text => gist::blocks_to_text(&blocks).into_bytes(),
        Format::Pdf => gist::blocks_to_pdf(&blocks, config)?,
    };
    Ok(bytes)
}
