use clap::{Arg, ArgAction, Command};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use wn_dict::{CompilerConfig, load_config_from_file, load_dictionaries};
use wn_dict_mt::{
    ChunkOrder, ExternalConfig, ExternalTranslation, MockMode, MockTranslator, normalize_locale,
    tag_document, translate_document,
};

fn command() -> Command {
    Command::new("wn-mt")
        .version("0.1.0")
        .about("Tag a chapter with dictionary placeholders, run a simulated page translator and resolve the result")
        .arg(
            Arg::new("chapter")
                .help("Chapter text file, one content line per line")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("dict")
                .long("dict")
                .short('d')
                .help("Dictionary files, lowest priority first")
                .required(true)
                .num_args(1..),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("JSON compiler configuration"),
        )
        .arg(
            Arg::new("source-locale")
                .long("source")
                .short('s')
                .help("Source language code (default: ja)")
                .default_value("ja"),
        )
        .arg(
            Arg::new("target-locale")
                .long("target")
                .short('t')
                .help("Target language code (default: en)")
                .default_value("en"),
        )
        .arg(
            Arg::new("mode")
                .long("mode")
                .short('m')
                .help("Mock translator behaviour")
                .value_parser(["noop", "uppercase", "reword"])
                .default_value("uppercase"),
        )
        .arg(
            Arg::new("chunk-size")
                .long("chunk-size")
                .help("Lines translated per batch")
                .value_parser(clap::value_parser!(usize))
                .default_value("4"),
        )
        .arg(
            Arg::new("reverse")
                .long("reverse")
                .help("Translate chunks last to first")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("skip-marker")
                .long("skip-marker")
                .help("Boundary marker the translator never touches (repeatable)")
                .value_parser(clap::value_parser!(usize))
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("delay")
                .long("delay")
                .help("Simulated latency per batch in milliseconds")
                .value_parser(clap::value_parser!(u64))
                .default_value("0"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print the full session report as JSON")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("html")
                .long("html")
                .help("Print the resolved chapter as HTML")
                .conflicts_with("json")
                .action(ArgAction::SetTrue),
        )
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("wn_dict_mt=info,warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = command().get_matches();

    let chapter_path = matches.get_one::<String>("chapter").ok_or("missing chapter")?;
    let dict_paths: Vec<PathBuf> = matches
        .get_many::<String>("dict")
        .ok_or("missing dictionaries")?
        .map(PathBuf::from)
        .collect();
    let config = match matches.get_one::<String>("config") {
        Some(path) => load_config_from_file(Path::new(path))?,
        None => CompilerConfig::default(),
    };

    let paths: Vec<&Path> = dict_paths.iter().map(PathBuf::as_path).collect();
    let dictionary = load_dictionaries(&paths, &config)?;
    for diagnostic in &dictionary.diagnostics {
        eprintln!("warning: {}", diagnostic);
    }

    let chapter = std::fs::read_to_string(chapter_path)?;
    let document = tag_document(&chapter, &dictionary);

    let mode = match matches.get_one::<String>("mode").map(String::as_str) {
        Some("noop") => MockMode::NoOp,
        Some("reword") => MockMode::Reword("someone".to_string()),
        _ => MockMode::Uppercase,
    };
    let delay = matches.get_one::<u64>("delay").copied().unwrap_or(0);
    let translator = Arc::new(MockTranslator::with_delay(mode, delay));

    let external_config = ExternalConfig {
        source_locale: normalize_locale(
            matches.get_one::<String>("source-locale").ok_or("missing source locale")?,
        ),
        target_locale: normalize_locale(
            matches.get_one::<String>("target-locale").ok_or("missing target locale")?,
        ),
        chunk_size: matches.get_one::<usize>("chunk-size").copied().unwrap_or(4),
        order: if matches.get_flag("reverse") {
            ChunkOrder::Reverse
        } else {
            ChunkOrder::Forward
        },
        skip_markers: matches
            .get_many::<usize>("skip-marker")
            .map(|markers| markers.copied().collect())
            .unwrap_or_else(BTreeSet::new),
        ..ExternalConfig::default()
    };
    let external = ExternalTranslation::new(translator, external_config);

    let report = translate_document(document, dictionary.mapping(), &external).await?;

    if matches.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if matches.get_flag("html") {
        println!("{}", report.document.to_html());
    } else {
        println!("{}", report.document.text());
    }
    if !report.pending_units.is_empty() {
        eprintln!("unresolved lines: {:?}", report.pending_units);
    }
    for popover in report.annotations.iter() {
        eprintln!("  term {} (entry {}): {}", popover.term_id, popover.entry_id, popover.content);
    }
    Ok(())
}
