//! Highlight text in an HTML file from the command line.
//!
//! ```text
//! annotate article.html --select "quick brown fox" --color cyan --note "pangram"
//! ```
//!
//! Prints the resulting `<body>` markup, or with `--groups` the highlights as JSON.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use hilite::{HighlightColor, Highlighter, HighlighterConfig};
use hilite_dom::editing::EditingCapabilities;
use hilite_dom::{BaseDocument, BoundaryPoint, DocumentConfig};
use hilite_html::HtmlDocument;

#[derive(Parser)]
#[command(name = "annotate", version, about = "Apply persistent highlights to an HTML file")]
struct Cli {
    /// HTML file to read
    file: PathBuf,

    /// Text to highlight (the first occurrence; may span elements)
    #[arg(short, long)]
    select: Vec<String>,

    /// Highlight colour: yellow, green, cyan, pink or peach
    #[arg(short, long, default_value = "yellow")]
    color: String,

    /// Note attached to every highlight
    #[arg(short, long)]
    note: Option<String>,

    /// Highlighter configuration (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Pretend the host has no native highlight command
    #[arg(long)]
    no_native: bool,

    /// Print the highlights as JSON instead of the markup
    #[arg(long)]
    groups: bool,
}

fn main() -> ExitCode {
    #[cfg(feature = "tracing")]
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("annotate: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), String> {
    let html = fs::read_to_string(&cli.file)
        .map_err(|err| format!("cannot read {}: {err}", cli.file.display()))?;
    let color: HighlightColor = cli.color.parse::<HighlightColor>().map_err(|err| err.to_string())?;
    let config = match &cli.config {
        Some(path) => {
            let json = fs::read_to_string(path)
                .map_err(|err| format!("cannot read {}: {err}", path.display()))?;
            HighlighterConfig::from_json(&json).map_err(|err| err.to_string())?
        }
        None => HighlighterConfig::default(),
    };

    let capabilities = if cli.no_native {
        EditingCapabilities::empty()
    } else {
        EditingCapabilities::default()
    };
    let mut doc = HtmlDocument::from_html(
        &html,
        DocumentConfig {
            capabilities: Some(capabilities),
            ..Default::default()
        },
    )
    .into_inner();
    let mut highlighter = Highlighter::new(config);

    for needle in &cli.select {
        if !select_text(&mut doc, needle) {
            return Err(format!("{needle:?} does not occur in the document"));
        }
        if !highlighter.apply_highlight(&mut doc, color, cli.note.as_deref()) {
            return Err(format!("could not highlight {needle:?}"));
        }
    }

    let container = doc.body_element().map(|body| body.id).unwrap_or(0);
    if cli.groups {
        let groups = highlighter.highlight_groups(&doc, container);
        let json = serde_json::to_string_pretty(&groups).map_err(|err| err.to_string())?;
        println!("{json}");
    } else if let Some(body) = doc.get_node(container) {
        println!("{}", body.inner_html());
    }
    Ok(())
}

/// Select the first occurrence of `needle` in the document's text
fn select_text(doc: &mut BaseDocument, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    let root = doc.body_element().map(|body| body.id).unwrap_or(0);
    let leaves: Vec<(usize, usize)> = doc
        .text_leaves(root)
        .into_iter()
        .filter_map(|leaf| Some((leaf, doc.get_node(leaf)?.text_data()?.content.len())))
        .collect();
    let text: String = leaves
        .iter()
        .filter_map(|&(leaf, _)| doc.get_node(leaf)?.text_data().map(|data| data.content.as_str()))
        .collect();

    let Some(start) = text.find(needle) else {
        return false;
    };
    let end = start + needle.len();

    let mut anchor = None;
    let mut focus = None;
    let mut offset = 0;
    for (leaf, len) in leaves {
        let leaf_end = offset + len;
        if anchor.is_none() && start < leaf_end {
            anchor = Some(BoundaryPoint::new(leaf, start - offset));
        }
        if focus.is_none() && end <= leaf_end {
            focus = Some(BoundaryPoint::new(leaf, end - offset));
        }
        offset = leaf_end;
    }

    match (anchor, focus) {
        (Some(anchor), Some(focus)) => doc.set_selection(anchor, focus),
        _ => false,
    }
}
