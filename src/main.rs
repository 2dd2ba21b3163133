//! Pipeline Canvas - Command-line entry point
//!
//! Loads a pipeline document through the editing engine and prints a summary
//! of it. A document that breaks the graph invariants is rejected with a
//! non-zero exit code.
//!
//! Usage: `pipeline-canvas <document.json> [--config <editor.toml>]`

use anyhow::{bail, Context};
use pipeline_canvas::{
    config::EditorConfig,
    editor::ContainerState,
    graph::{GraphDocument, NodeKind},
    Editor,
};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

struct Args {
    document: PathBuf,
    config: Option<PathBuf>,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut args = std::env::args().skip(1);
    let mut document = None;
    let mut config = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let path = args.next().context("--config needs a path")?;
                config = Some(PathBuf::from(path));
            }
            "-h" | "--help" => {
                println!("Usage: pipeline-canvas <document.json> [--config <editor.toml>]");
                std::process::exit(0);
            }
            other if document.is_none() => document = Some(PathBuf::from(other)),
            other => bail!("unexpected argument: {}", other),
        }
    }
    let document = document
        .context("Usage: pipeline-canvas <document.json> [--config <editor.toml>]")?;
    Ok(Args { document, config })
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,pipeline_canvas=debug")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = parse_args()?;

    let config = match &args.config {
        Some(path) => EditorConfig::load(path)
            .with_context(|| format!("loading editor config {:?}", path))?,
        None => EditorConfig::load_or_default(),
    };

    let document = GraphDocument::load(&args.document)
        .with_context(|| format!("reading {:?}", args.document))?;

    let mut editor = Editor::new(config);
    editor
        .import_document(document)
        .with_context(|| format!("rejected {:?}", args.document))?;

    let store = editor.store();
    println!("{}", args.document.display());
    println!("  nodes: {}", store.nodes().len());
    let kinds = std::iter::once(NodeKind::Placeholder)
        .chain(NodeKind::all_concrete().iter().copied());
    for kind in kinds {
        let count = store.nodes().iter().filter(|n| n.kind == kind).count();
        if count > 0 {
            println!("    {:<12} {}", kind.display_name(), count);
        }
    }
    println!("  edges: {}", store.edges().len());

    let containers: Vec<_> = store.nodes().iter().filter(|n| n.is_container()).collect();
    if !containers.is_empty() {
        println!("  containers:");
        for node in containers {
            let state = match editor.container_state(&node.id)? {
                ContainerState::Expanded => "expanded",
                ContainerState::Collapsed => "collapsed",
            };
            println!(
                "    {} ({}) {} {}",
                node.id,
                node.kind.display_name(),
                state,
                node.size
            );
        }
    }

    let trailing: Vec<_> = store
        .nodes()
        .iter()
        .filter(|n| n.is_placeholder() && store.outgoing(&n.id).next().is_none())
        .map(|n| n.id.to_string())
        .collect();
    println!("  open placeholders: {}", trailing.join(", "));

    tracing::info!("Summarized {:?}", args.document);
    Ok(())
}
