//! Command line front end for checking and rendering block proofs.

use std::{error::Error, fs, path::Path};

use proofblocks::{
    check_outline, render, serialization::parse_script, Assembler, BlockGraph, Category, Config,
    ProofTree, Registry, DEFAULT_LOG_FILTER,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn print_usage() {
    eprintln!("proofblocks - Check and render block proofs");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  proofblocks shapes [category]   List block shapes");
    eprintln!("  proofblocks check <file>        Assemble and check a proof");
    eprintln!("  proofblocks render <file>       Print the proof text");
    eprintln!("  proofblocks tree <file>         Print the assembled proof trees as JSON");
    eprintln!();
    eprintln!("Files ending in .json are read as a list of block instances, anything else as a");
    eprintln!("proof script.");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  PROOFBLOCKS_MAX_DEPTH      Deepest nesting accepted (default: 64)");
    eprintln!("  PROOFBLOCKS_STRICT_FIELDS  Reject undeclared fields (default: true)");
    eprintln!("  RUST_LOG                   Log filter (default: proofblocks=info)");
}

fn load_graph(path: &str) -> Result<BlockGraph, Box<dyn Error>> {
    let input = fs::read_to_string(path)?;
    let graph = if Path::new(path).extension().map_or(false, |e| e == "json") {
        serde_json::from_str(&input)?
    } else {
        parse_script(&input)?.graph
    };
    info!(path, blocks = graph.len(), "loaded block graph");
    Ok(graph)
}

fn assemble_file(
    config: &Config,
    registry: &Registry,
    path: &str,
) -> Result<Vec<(String, ProofTree)>, Box<dyn Error>> {
    let graph = load_graph(path)?;
    let trees = Assembler::with_options(registry, config.options).assemble_all(&graph)?;
    Ok(trees)
}

fn list_shapes(registry: &Registry, category: Option<&str>) -> Result<(), Box<dyn Error>> {
    let categories = match category {
        Some(name) => {
            vec![Category::from_name(name).ok_or_else(|| format!("unknown category: {}", name))?]
        }
        None => Category::ALL.to_vec(),
    };
    for category in categories {
        println!("{}:", category);
        for shape in registry.by_category(category) {
            let fields: Vec<&str> = shape.fields().iter().map(|f| f.name.as_str()).collect();
            let mut flags = String::new();
            if shape.has_nested_slot() {
                flags.push_str(" [nested]");
            }
            if !shape.connects_below() {
                flags.push_str(" [terminal]");
            }
            println!("  {:<32} {}{}", shape.type_id(), fields.join(" "), flags);
        }
    }
    Ok(())
}

fn run(config: &Config, command: &str, args: &[String]) -> Result<(), Box<dyn Error>> {
    let registry = Registry::standard()?;
    let file = || {
        args.first()
            .map(String::as_str)
            .ok_or_else(|| format!("{} requires a file argument", command))
    };

    match command {
        "shapes" => list_shapes(&registry, args.first().map(String::as_str)),
        "check" => {
            let path = file()?;
            let trees = assemble_file(config, &registry, path)?;
            if trees.is_empty() {
                return Err("no proof found".into());
            }
            for (root, tree) in trees.iter() {
                check_outline(tree, &registry).map_err(|e| format!("proof at `{}`: {}", root, e))?;
            }
            println!("ok: {} proof(s)", trees.len());
            Ok(())
        }
        "render" => {
            let path = file()?;
            for (_, tree) in assemble_file(config, &registry, path)? {
                print!("{}", render(&tree, &registry)?);
            }
            Ok(())
        }
        "tree" => {
            let path = file()?;
            let trees = assemble_file(config, &registry, path)?;
            println!("{}", serde_json::to_string_pretty(&trees)?);
            Ok(())
        }
        other => Err(format!("unknown command: {}", other).into()),
    }
}

fn main() {
    let config = Config::from_env();
    let filter = config
        .as_ref()
        .map_or(DEFAULT_LOG_FILTER, |c| c.log_filter.as_str());
    tracing_subscriber::registry()
        .with(EnvFilter::try_new(filter).unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }
    if matches!(args[1].as_str(), "help" | "--help" | "-h") {
        print_usage();
        return;
    }

    let result = config
        .map_err(Box::<dyn Error>::from)
        .and_then(|config| run(&config, &args[1], &args[2..]));
    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
