// ============================================================================
// CreoTools CLI — headless thumbnail rendering via command-line arguments
// ============================================================================
//
// Usage examples:
//   creotools --template A --output thumb.png
//   creotools --design layout.json -o out.png
//   creotools --list-templates
//
// No GUI is opened in CLI mode. Rendering runs synchronously on the current
// thread with the same rasterizer the Export button uses, so CLI output is
// pixel-identical to an in-app export.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;

use crate::ops::{ai, export, templates};

// ============================================================================
// CLI argument definition (clap Derive)
// ============================================================================

/// CreoTools headless thumbnail renderer.
///
/// Render template or design-model JSON thumbnails to PNG — no GUI required.
#[derive(Parser, Debug)]
#[command(
    name = "creotools",
    about = "CreoTools headless thumbnail renderer",
    long_about = "Render thumbnails from built-in templates or design-model JSON\n\
                  files without opening the GUI.\n\n\
                  Example:\n  \
                  creotools --template A --output thumb.png\n  \
                  creotools --design layout.json -o out.png"
)]
pub struct CliArgs {
    /// Built-in template id to render (see --list-templates).
    #[arg(short, long, value_name = "ID", conflicts_with = "design")]
    pub template: Option<String>,

    /// Design-model JSON file to render (same structure the AI generator
    /// produces: a `canvas` object plus a `layers` array).
    #[arg(short, long, value_name = "FILE.json")]
    pub design: Option<PathBuf>,

    /// Output PNG path. Defaults to a timestamped name in the current
    /// directory.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// List available template ids and exit.
    #[arg(long)]
    pub list_templates: bool,

    /// Print per-render timing information.
    #[arg(short, long)]
    pub verbose: bool,
}

impl CliArgs {
    /// Returns `true` when any CLI-mode flag is present in the real process
    /// arguments. Used by `main()` to route before creating an eframe window.
    pub fn is_cli_mode() -> bool {
        std::env::args().any(|a| {
            a == "--template"
                || a == "-t"
                || a == "--design"
                || a == "-d"
                || a == "--list-templates"
        })
    }
}

// ============================================================================
// Public entry point
// ============================================================================

/// Run all CLI processing and return an OS exit code.
pub fn run(args: CliArgs) -> ExitCode {
    if args.list_templates {
        for template in templates::catalog() {
            println!("{:24} {}", template.id, template.name);
        }
        return ExitCode::SUCCESS;
    }

    let document = if let Some(id) = &args.template {
        let catalog = templates::catalog();
        match templates::by_id(&catalog, id) {
            Some(template) => template.document.instantiated(),
            None => {
                eprintln!("error: unknown template '{}'. Try --list-templates.", id);
                return ExitCode::FAILURE;
            }
        }
    } else if let Some(path) = &args.design {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) => {
                eprintln!("error: cannot read {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        };
        match ai::design_from_json(&raw) {
            Ok(doc) => doc,
            Err(e) => {
                eprintln!("error: {}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        eprintln!("error: nothing to render. Pass --template or --design.");
        return ExitCode::FAILURE;
    };

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(export::default_export_filename()));

    let started = Instant::now();
    match export::export_png(&document, &output) {
        Ok(()) => {
            if args.verbose {
                println!(
                    "rendered {}x{} with {} layer(s) in {:.1?}",
                    document.width,
                    document.height,
                    document.layers.len(),
                    started.elapsed()
                );
            }
            println!("wrote {}", output.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
