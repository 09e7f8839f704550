//! Reading PHP sources from disk and optionally linting them first.

use std::{
    fs,
    path::Path,
    process::Command,
    rc::Rc,
    time::UNIX_EPOCH,
};

use tracing::{debug, warn};

use crate::{
    errors::errors::{Error, ErrorImpl},
    parser::markers::DEFAULT_MARKERS,
    Position,
};

/// Per-file processing options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOptions {
    /// Run the syntax validator before reading the file.
    pub validate: bool,
    /// Marker terms scanned for in line comments.
    pub markers: Vec<String>,
}

impl Default for FileOptions {
    fn default() -> Self {
        FileOptions {
            validate: false,
            markers: DEFAULT_MARKERS.iter().map(|term| term.to_string()).collect(),
        }
    }
}

/// A file's text together with the identity it is reported under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedSource {
    pub path: String,
    /// Change token; the modification time in seconds since the epoch.
    pub hash: String,
    pub contents: String,
}

pub trait SourceLoader {
    fn load(&self, path: &Path) -> Result<LoadedSource, Error>;
}

pub trait Validator {
    /// Fails with [`ErrorImpl::ValidationFailed`] when the file is not valid.
    fn validate(&self, path: &Path) -> Result<(), Error>;
}

/// Reads sources straight from the filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsLoader;

impl SourceLoader for FsLoader {
    fn load(&self, path: &Path) -> Result<LoadedSource, Error> {
        let path_name = path.to_string_lossy().to_string();
        let unreadable = |err: std::io::Error| {
            Error::new(
                ErrorImpl::UnreadableFile {
                    path: path_name.clone(),
                    reason: err.to_string(),
                },
                Position(0, Rc::new(path_name.clone())),
            )
        };

        let bytes = fs::read(path).map_err(&unreadable)?;
        let modified = fs::metadata(path)
            .and_then(|metadata| metadata.modified())
            .map_err(&unreadable)?;
        let hash = modified
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or_default()
            .to_string();

        let contents = match String::from_utf8(bytes) {
            Ok(contents) => contents,
            Err(err) => {
                warn!("{} is not valid UTF-8, invalid sequences were replaced", path_name);
                String::from_utf8_lossy(err.as_bytes()).into_owned()
            }
        };

        debug!("loaded {} ({} bytes)", path_name, contents.len());

        Ok(LoadedSource {
            path: path_name,
            hash,
            contents,
        })
    }
}

/// Validates files with `php -l`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhpLint {
    pub binary: String,
}

impl Default for PhpLint {
    fn default() -> Self {
        PhpLint {
            binary: "php".to_string(),
        }
    }
}

impl Validator for PhpLint {
    fn validate(&self, path: &Path) -> Result<(), Error> {
        let position = Position(0, Rc::new(path.to_string_lossy().to_string()));

        let output = Command::new(&self.binary)
            .arg("-l")
            .arg(path)
            .output()
            .map_err(|err| {
                Error::new(
                    ErrorImpl::ValidationFailed {
                        output: vec![format!("unable to run `{} -l`: {}", self.binary, err)],
                    },
                    position.clone(),
                )
            })?;

        if output.status.success() {
            return Ok(());
        }

        let lines = String::from_utf8_lossy(&output.stdout)
            .lines()
            .chain(String::from_utf8_lossy(&output.stderr).lines())
            .filter(|line| !line.trim().is_empty())
            .map(str::to_string)
            .collect();

        Err(Error::new(ErrorImpl::ValidationFailed { output: lines }, position))
    }
}
