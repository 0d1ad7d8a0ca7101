//! mmd-html - Render a parsed MultiMarkdown token tree to HTML

use std::fs::{self, File};
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mmd_html::html::QuoteLanguage;
use mmd_html::tree::json;
use mmd_html::{Options, render_complete, render_fragment};

#[derive(Parser)]
#[command(name = "mmd-html")]
#[command(version, about = "Render a parsed MultiMarkdown token tree to HTML", long_about = None)]
#[command(after_help = "EXAMPLES:
    mmd-html doc.json                 Print the HTML fragment
    mmd-html --complete doc.json out.html
                                      Write a standalone HTML document
    mmd-html --critic --accept doc.json
                                      Apply all CriticMarkup changes")]
struct Cli {
    /// Token tree in JSON form
    #[arg(value_name = "TREE")]
    input: PathBuf,

    /// Output file (stdout when omitted)
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Disable smart quotes, dashes and ellipses
    #[arg(long)]
    no_smart: bool,

    /// Disable footnotes, citations and glossary
    #[arg(long)]
    no_notes: bool,

    /// Render CriticMarkup changes
    #[arg(long)]
    critic: bool,

    /// Accept all CriticMarkup changes
    #[arg(long, conflicts_with = "reject")]
    accept: bool,

    /// Reject all CriticMarkup changes
    #[arg(long)]
    reject: bool,

    /// Markdown compatibility mode
    #[arg(short, long)]
    compat: bool,

    /// Do not add ids to headings
    #[arg(long)]
    no_labels: bool,

    /// Level at which first-level headings are rendered
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u8).range(1..=6))]
    base_header_level: Option<u8>,

    /// Smart quote style (english, dutch, french, german, germanguillemets, swedish)
    #[arg(long, value_name = "LANG")]
    quotes: Option<QuoteLanguage>,

    /// Wrap the output in a complete HTML document
    #[arg(long)]
    complete: bool,

    /// Seed for e-mail address obfuscation
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Log debug output to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "mmd_html=debug" } else { "mmd_html=warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> mmd_html::Result<()> {
    let loaded = json::from_reader(BufReader::new(File::open(&cli.input)?))?;
    debug!(
        nodes = loaded.document.node_count(),
        links = loaded.references.link_count(),
        "loaded {}",
        cli.input.display()
    );

    let options = options(cli, &loaded.metadata);
    let result = if cli.complete {
        render_complete(&loaded.document, &loaded.references, &loaded.metadata, options)
    } else {
        render_fragment(&loaded.document, &loaded.references, &loaded.metadata, options)
    };

    if !result.diagnostics.is_empty() {
        warn!("{} node(s) could not be rendered", result.diagnostics.len());
    }

    match &cli.output {
        Some(path) => write_output(path, &result.html),
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(result.html.as_bytes())?;
            stdout.write_all(b"\n")?;
            Ok(())
        }
    }
}

/// Metadata settings first, then command-line flags on top.
fn options(cli: &Cli, meta: &mmd_html::Metadata) -> Options {
    let mut options = Options::from_metadata(meta)
        .with_smart(!cli.no_smart)
        .with_notes(!cli.no_notes)
        .with_critic(cli.critic || cli.accept || cli.reject)
        .with_critic_accept(cli.accept)
        .with_critic_reject(cli.reject)
        .with_compatibility(cli.compat);

    if cli.no_labels {
        options = options.with_no_labels(true);
    }
    if let Some(level) = cli.base_header_level {
        options = options.with_base_header_level(level);
    }
    if let Some(lang) = cli.quotes {
        options = options.with_quote_language(lang);
    }
    if let Some(seed) = cli.seed {
        options = options.with_obfuscation_seed(seed);
    }
    options
}

fn write_output(path: &Path, html: &str) -> mmd_html::Result<()> {
    fs::write(path, html)?;
    debug!("wrote {}", path.display());
    Ok(())
}
