use anyhow::{Context, Result};
use caretkeep_config::Config;
use caretkeep_engine::html::{inner_html, set_inner_html};
use caretkeep_engine::{Editable, HostSchema, Tree, normalize_html};
use std::io::{self, Read};
use std::path::PathBuf;
use std::{env, process};

enum Command {
    Normalize { input: Option<PathBuf> },
    Markers { strip: bool, input: Option<PathBuf> },
}

fn usage(program: &str) -> String {
    format!(
        "Usage: {program} normalize [FILE]\n       {program} markers [--strip] [FILE]\n\n\
         Reads standard input when FILE is omitted."
    )
}

fn parse_args(args: &[String]) -> Option<Command> {
    let (command, rest) = args.split_first()?;
    match command.as_str() {
        "normalize" => match rest {
            [] => Some(Command::Normalize { input: None }),
            [file] => Some(Command::Normalize {
                input: Some(PathBuf::from(file)),
            }),
            _ => None,
        },
        "markers" => {
            let strip = rest.first().is_some_and(|arg| arg == "--strip");
            let files = if strip { &rest[1..] } else { rest };
            match files {
                [] => Some(Command::Markers { strip, input: None }),
                [file] if !file.starts_with("--") => Some(Command::Markers {
                    strip,
                    input: Some(PathBuf::from(file)),
                }),
                _ => None,
            }
        }
        _ => None,
    }
}

fn read_input(input: Option<&PathBuf>) -> Result<String> {
    match input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut content = String::new();
            io::stdin()
                .read_to_string(&mut content)
                .context("Failed to read standard input")?;
            Ok(content)
        }
    }
}

fn load_schema() -> Result<HostSchema> {
    let config_path = Config::config_path();
    match Config::load()? {
        Some(config) => {
            log::info!("Loaded config from {}", config_path.display());
            Ok(config.schema)
        }
        None => {
            log::debug!("No config file at {}, using defaults", config_path.display());
            Ok(HostSchema::default())
        }
    }
}

/// Reports markers left behind in stored markup. Returns how many were found.
fn check_markers(markup: &str, schema: HostSchema, strip: bool) -> Result<usize> {
    let mut tree = Tree::new();
    let root = tree.create_element("div");
    let doc = tree.document();
    tree.append_child(doc, root)?;
    set_inner_html(&mut tree, root, markup, &schema)?;
    let editable = Editable::new(root, schema);

    let mut markers = editable.markers(&mut tree);
    let found = markers.get_markers().len();
    if found > 0 {
        log::warn!("Found {found} stray selection markers");
    }
    if strip {
        markers.remove_markers();
        print!("{}", inner_html(&tree, root, editable.schema()));
    } else {
        println!("{found} selection markers");
    }
    Ok(found)
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args: Vec<String> = env::args().collect();
    let program = args
        .first()
        .cloned()
        .unwrap_or_else(|| "caretkeep-cli".to_string());

    let Some(command) = parse_args(args.get(1..).unwrap_or_default()) else {
        eprintln!("{}", usage(&program));
        process::exit(2);
    };

    let schema = load_schema()?;

    match command {
        Command::Normalize { input } => {
            let markup = read_input(input.as_ref())?;
            let normalized = normalize_html(&markup, &schema)?;
            print!("{normalized}");
        }
        Command::Markers { strip, input } => {
            let markup = read_input(input.as_ref())?;
            let found = check_markers(&markup, schema, strip)?;
            if found > 0 && !strip {
                process::exit(1);
            }
        }
    }

    Ok(())
}
