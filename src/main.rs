use std::{fs, path::PathBuf, process::ExitCode, time::Instant};

use clap::Parser;
use docreflect::{display_error, loader::FileOptions, parser::file::SourceFile};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Reflects over PHP source files and prints an XML description of each.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct ReflectArgs {
    /// PHP files to reflect over
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Check every file with `php -l` before reading it
    #[arg(long, default_value_t = false)]
    validate: bool,

    /// Replace the marker terms, comma separated
    #[arg(long, value_delimiter = ',')]
    markers: Option<Vec<String>>,

    /// Add a marker term to the active set
    #[arg(long = "marker", value_name = "TERM")]
    extra_markers: Vec<String>,

    /// Write the documents to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl ReflectArgs {
    fn file_options(&self) -> FileOptions {
        let mut options = FileOptions {
            validate: self.validate,
            ..FileOptions::default()
        };

        if let Some(markers) = &self.markers {
            options.markers = markers.clone();
        }
        for term in &self.extra_markers {
            if !options.markers.contains(term) {
                options.markers.push(term.clone());
            }
        }

        options
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = ReflectArgs::parse();
    let options = args.file_options();
    let start = Instant::now();

    let mut documents = vec![];
    for path in &args.files {
        let file_start = Instant::now();

        let mut file = match SourceFile::from_path(path, &options) {
            Ok(file) => file,
            Err(error) => {
                display_error(&error, None);
                return ExitCode::FAILURE;
            }
        };

        if let Err(error) = file.process() {
            display_error(&error, Some(file.contents()));
            return ExitCode::FAILURE;
        }

        debug!("reflected {} in {:?}", path.display(), file_start.elapsed());
        documents.push(file.serialize());
    }

    let output = documents.join("\n");
    match &args.output {
        Some(target) => {
            if let Err(err) = fs::write(target, output + "\n") {
                eprintln!("Error: unable to write {}: {}", target.display(), err);
                return ExitCode::FAILURE;
            }
        }
        None => println!("{}", output),
    }

    info!("reflected {} files in {:?}", args.files.len(), start.elapsed());
    ExitCode::SUCCESS
}
