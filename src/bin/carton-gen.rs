//! Regeneration glue around the carton [`Encoder`].
//!
//! Usage: `carton-gen [--bootstrap <template>] <package> <name> <source> <dest>`
//!
//! The default mode fetches the artifact template through the crate's own
//! embedded store (self-hosted). `--bootstrap` reads it from a local file
//! instead, for the one-time case where no artifact exists yet.

use std::path::PathBuf;
use std::process::ExitCode;

use carton_rs::{assets, Encoder};

struct Args {
    bootstrap: Option<PathBuf>,
    package: String,
    name: String,
    source: PathBuf,
    dest: PathBuf,
}

fn parse_args() -> Option<Args> {
    let mut args = std::env::args().skip(1);
    let mut bootstrap = None;
    let mut positional = Vec::new();

    while let Some(arg) = args.next() {
        if arg == "--bootstrap" {
            bootstrap = Some(PathBuf::from(args.next()?));
        } else {
            positional.push(arg);
        }
    }
    let [package, name, source, dest]: [String; 4] = positional.try_into().ok()?;
    Some(Args {
        bootstrap,
        package,
        name,
        source: PathBuf::from(source),
        dest: PathBuf::from(dest),
    })
}

fn run(args: &Args) -> carton_rs::Result<()> {
    let encoder = match &args.bootstrap {
        Some(template) => Encoder::from_template_file(&args.package, &args.name, template)?,
        None => Encoder::from_store(&args.package, &args.name, assets::carton())?,
    };

    let report = encoder.generate(&args.source, &args.dest)?;
    eprintln!(
        "embedded {} files into {}",
        report.embedded,
        args.dest.display()
    );
    for (path, reason) in &report.skipped {
        eprintln!("skipped {path}: {reason}");
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let Some(args) = parse_args() else {
        eprintln!("usage: carton-gen [--bootstrap <template>] <package> <name> <source> <dest>");
        return ExitCode::from(2);
    };

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("carton-gen: {err}");
            ExitCode::FAILURE
        }
    }
}
