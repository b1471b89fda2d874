use clap::{Arg, ArgAction, Command};
use std::path::{Path, PathBuf};
use wn_dict::template::default_dictionary;
use wn_dict::{
    CompilerConfig, create_dictionary_file, lex_document, load_config_from_file, load_dictionaries,
};

fn command() -> Command {
    Command::new("wn-dict")
        .version("0.1.0")
        .about("Lint and compile translation dictionary (.dict) files")
        .subcommand_required(true)
        .subcommand(
            Command::new("lint")
                .about("Report lines the dictionary lexer rejects")
                .arg(Arg::new("file").help("Dictionary file").required(true)),
        )
        .subcommand(
            Command::new("compile")
                .about("Compile dictionaries (lowest priority first) into a mapping")
                .arg(
                    Arg::new("files")
                        .help("Dictionary files, e.g. common_dict.dict NRT_syosetu_n1.dict")
                        .required(true)
                        .num_args(1..),
                )
                .arg(
                    Arg::new("config")
                        .long("config")
                        .short('c')
                        .help("JSON compiler configuration (language, honorifics, ...)"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Print the id-keyed mapping as JSON")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("new")
                .about("Create a dictionary file from the default template")
                .arg(Arg::new("path").required(true))
                .arg(Arg::new("title").long("title").required(true))
                .arg(Arg::new("abbr").long("abbr").required(true))
                .arg(Arg::new("link").long("link").default_value("")),
        )
}

fn lint(path: &Path) -> Result<bool, Box<dyn std::error::Error>> {
    let source = std::fs::read_to_string(path)?;
    let mut clean = true;
    for line in lex_document(&source) {
        if !line.has_errors() {
            continue;
        }
        clean = false;
        println!("{}:{}: {}", path.display(), line.line_number, line.text);
        let mut marks = String::new();
        let mut at = 0;
        for span in line.error_spans() {
            marks.push_str(&" ".repeat(line.text[at..span.start].chars().count()));
            marks.push_str(&"^".repeat(line.text[span.clone()].chars().count()));
            at = span.end;
        }
        let prefix = format!("{}:{}: ", path.display(), line.line_number);
        println!("{}{}", " ".repeat(prefix.chars().count()), marks);
    }
    Ok(clean)
}

fn compile(
    files: Vec<PathBuf>,
    config: Option<&String>,
    as_json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = match config {
        Some(path) => load_config_from_file(Path::new(path))?,
        None => CompilerConfig::default(),
    };
    let paths: Vec<&Path> = files.iter().map(PathBuf::as_path).collect();
    let dictionary = load_dictionaries(&paths, &config)?;

    for diagnostic in &dictionary.diagnostics {
        eprintln!("warning: {}", diagnostic);
    }

    if as_json {
        println!("{}", serde_json::to_string_pretty(&dictionary.mapping())?);
    } else {
        for (id, entry) in dictionary.iter_with_ids() {
            match &entry.comment {
                Some(comment) => {
                    println!("{:>5}  {} --> {}  // {}", id, entry.raw, entry.translation, comment)
                }
                None => println!("{:>5}  {} --> {}", id, entry.raw, entry.translation),
            }
        }
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = command().get_matches();
    match matches.subcommand() {
        Some(("lint", sub)) => {
            let file = sub.get_one::<String>("file").ok_or("missing file")?;
            if !lint(Path::new(file))? {
                std::process::exit(1);
            }
        }
        Some(("compile", sub)) => {
            let files = sub
                .get_many::<String>("files")
                .ok_or("missing files")?
                .map(PathBuf::from)
                .collect();
            compile(files, sub.get_one::<String>("config"), sub.get_flag("json"))?;
        }
        Some(("new", sub)) => {
            let path = sub.get_one::<String>("path").ok_or("missing path")?;
            let title = sub.get_one::<String>("title").ok_or("missing title")?;
            let abbr = sub.get_one::<String>("abbr").ok_or("missing abbr")?;
            let link = sub.get_one::<String>("link").ok_or("missing link")?;
            let contents = default_dictionary(title, abbr, link);
            if create_dictionary_file(Path::new(path), &contents)? {
                println!("Created {}", path);
            } else {
                println!("{} already exists, left untouched", path);
            }
        }
        _ => unreachable!("subcommand_required"),
    }
    Ok(())
}
