//! `metamodel` command-line interface
//!
//! Loads a schema with its imports and prints the answer to one
//! inheritance query. Diagnostics collected along the way are printed to
//! stderr after the answer.

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use metamodel_core::{
    config::MetamodelConfig,
    diagnostics::{CollectingSink, Diagnostics, Severity},
    error::ElementKind,
};
use metamodel_service::{AncestorQuery, SchemaDocument, SchemaLoader, SchemaView};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Inheritance queries over a LinkML metamodel schema
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Root schema file
    #[arg(short, long, global = true, default_value = "meta.yaml")]
    schema: PathBuf,

    /// Extra directory to search for imports (repeatable)
    #[arg(short = 'I', long = "search-path", global = true)]
    search_paths: Vec<PathBuf>,

    /// Configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Query to run
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Linearized ancestors of a class or slot
    Ancestors {
        /// Class (or slot, with --slot) name
        name: String,

        /// Treat NAME as a slot
        #[arg(long)]
        slot: bool,

        /// Follow mixins
        #[arg(long)]
        mixins: bool,

        /// Do not follow is_a from NAME itself
        #[arg(long)]
        no_isa: bool,

        /// Leave NAME out of the result
        #[arg(long)]
        exclude_self: bool,
    },

    /// Effective value of a slot attribute in a class
    Attribute {
        /// Class name
        class: String,
        /// Slot name
        slot: String,
        /// Attribute name, e.g. range or multivalued
        attribute: String,
    },

    /// Effective range of a slot in a class
    Range {
        /// Class name
        class: String,
        /// Slot name
        slot: String,
    },

    /// Direct is-a children of a class
    Children {
        /// Class name
        class: String,

        /// List classes mixing CLASS in instead
        #[arg(long)]
        mixins: bool,
    },

    /// Classes whose slots range over a class or its descendants
    Usages {
        /// Class name
        class: String,
    },

    /// Slots applicable to a class
    Slots {
        /// Class name
        class: String,

        /// Include slots from mixins
        #[arg(long)]
        mixins: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let sink = Arc::new(CollectingSink::new());
    let diagnostics = Diagnostics::new(sink.clone());

    let outcome = load(&cli, diagnostics).and_then(|view| run(&cli.command, &view));
    for diagnostic in sink.entries() {
        let label = match diagnostic.severity() {
            Severity::Warning => "warning",
            Severity::Fatal => "error",
        };
        eprintln!("{label}[{}]: {diagnostic}", diagnostic.code());
    }
    outcome
}

fn init_logging(verbose: bool) {
    let default = if verbose { "metamodel=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load(cli: &Cli, diagnostics: Diagnostics) -> anyhow::Result<SchemaView> {
    let mut config = match &cli.config {
        Some(path) => MetamodelConfig::from_file(path)
            .with_context(|| format!("reading configuration {}", path.display()))?,
        None => MetamodelConfig::default(),
    };
    for path in cli.search_paths.iter().rev() {
        config = config.with_search_path(path);
    }
    if let Some(parent) = cli.schema.parent().filter(|p| !p.as_os_str().is_empty()) {
        config = config.with_search_path(parent);
    }

    let document = SchemaDocument::from_file(&cli.schema)
        .with_context(|| format!("reading schema {}", cli.schema.display()))?;
    let view = SchemaLoader::from_config(config)
        .with_diagnostics(diagnostics)
        .load_document(&document)
        .with_context(|| format!("loading {}", display(&cli.schema)))?;
    Ok(view)
}

fn run(command: &Commands, view: &SchemaView) -> anyhow::Result<()> {
    match command {
        Commands::Ancestors {
            name,
            slot,
            mixins,
            no_isa,
            exclude_self,
        } => {
            let kind = if *slot { ElementKind::Slot } else { ElementKind::Class };
            let query = AncestorQuery::new()
                .use_isa(!no_isa)
                .use_mixins(*mixins)
                .reflexive(!exclude_self);
            print_lines(&view.ancestors_of(kind, name, query)?);
        }
        Commands::Attribute {
            class,
            slot,
            attribute,
        } => match view.resolve_attribute(class, slot, attribute)? {
            Some(value) => println!("{}", serde_yaml::to_string(&value)?.trim_end()),
            None => bail!("{attribute} is not declared for {class}.{slot}"),
        },
        Commands::Range { class, slot } => match view.effective_range(class, slot)? {
            Some(range) => println!("{range}"),
            None => bail!("{class}.{slot} has no range"),
        },
        Commands::Children { class, mixins } => {
            let children = if *mixins {
                view.children_via_mixin(class)?
            } else {
                view.direct_children(class)?
            };
            print_lines(&children);
        }
        Commands::Usages { class } => {
            for (user, referenced) in view.all_usages_of(class)? {
                println!("{user}\t{referenced}");
            }
        }
        Commands::Slots { class, mixins } => {
            print_lines(&view.class_slots(class, true, *mixins)?);
        }
    }
    Ok(())
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}

fn display(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned())
}
