use anyhow::{Context, Result};
use clap::Parser;
use polylint::cli::{Cli, OutputFormat};
use polylint::coordinator::{RunCoordinator, RunOptions};
use polylint::process::SystemRunner;
use polylint::registry::{CategoryRegistry, DispatchMode};
use polylint::report;
use std::fs;
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

/// `path` relative to `base` when it lies below it, `.` for `base` itself
fn display_relative(path: &Path, base: &Path) -> String {
    match path.strip_prefix(base) {
        Ok(rel) if rel.as_os_str().is_empty() => ".".to_string(),
        Ok(rel) => rel.display().to_string(),
        Err(_) => path.display().to_string(),
    }
}

/// Print the registered categories (`--list`)
fn print_categories(registry: &CategoryRegistry) {
    println!("Source root: {}", registry.source_root().display());
    for category in registry.categories() {
        let aliases = if category.aliases.is_empty() {
            String::new()
        } else {
            format!(" (aliases: {})", category.aliases.join(", "))
        };
        println!("{}{}", category.key, aliases);
        if !category.description.is_empty() {
            println!("    {}", category.description);
        }
        let roots: Vec<String> = category
            .roots
            .iter()
            .map(|root| display_relative(root, registry.source_root()))
            .collect();
        println!("    roots: {}", roots.join(", "));
        println!(
            "    extensions: {}",
            category.predicate.extensions().collect::<Vec<_>>().join(", ")
        );
        let mode = match category.mode {
            DispatchMode::Batch => "batch",
            DispatchMode::PerFile => "per-file",
        };
        println!("    tool: {} ({})", category.tool.program, mode);
    }
}

fn main() -> Result<()> {
    let args = Cli::parse();

    // Initialize tracing if --debug flag is set
    init_tracing(args.debug);

    let source_root = fs::canonicalize(&args.root)
        .with_context(|| format!("Invalid source root {}", args.root.display()))?;

    let registry = CategoryRegistry::discover(&source_root, args.config.as_deref())?;

    if args.list {
        print_categories(&registry);
        return Ok(());
    }

    let options = RunOptions {
        categories: args.selected_categories(),
        changed_only: args.changed,
        fix: args.fix,
        verbose: args.verbose,
    };

    let runner = SystemRunner;
    let mut coordinator = RunCoordinator::new(&registry, &runner);
    let run_report = coordinator.run(&options)?;

    match args.format {
        OutputFormat::Json => println!("{}", report::to_json(&run_report)?),
        OutputFormat::Text if args.verbose => {
            for line in report::summary_lines(&run_report) {
                println!("{}", line);
            }
        }
        OutputFormat::Text => {}
    }

    let code = run_report.exit_code();
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}
