//! Editing workflow on top of [`ImageSession`]: open, transform, save.
//!
//! This is the layer a front end talks to. It adds what the raster core
//! leaves to its caller:
//!
//! - **Input restriction**: only configured extensions are opened.
//! - **Parameter validation**: resize targets must fall in the configured
//!   range, file names must have an acceptable length.
//! - **Safe saving**: output goes to `<directory>/<name>.<extension>` and an
//!   existing file is never overwritten.
//! - **Audit trail**: every success is recorded as `ACTION`, every failure as
//!   `ERROR`, through the injected [`AuditSink`].

use crate::audit::AuditSink;
use crate::config::{AppConfig, InputConfig};
use crate::error::CoreError;
use crate::imaging::codec::{extension_of, output_format};
use crate::imaging::{CodecError, ImageCodec, OperationSpec, Raster, RowBandScheduler};
use crate::session::ImageSession;
use std::fs::OpenOptions;
use std::ffi::OsStr;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error("File format not allowed: {0}")]
    UnsupportedExtension(String),
    #[error("{field} must be within {min}-{max} (got {value})")]
    DimensionOutOfRange {
        field: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },
    #[error("File name must have at least {min} characters")]
    NameTooShort { min: usize },
    #[error("File name must have at most {max} characters")]
    NameTooLong { max: usize },
    #[error("File name must not contain path separators: {0}")]
    NameNotPlain(String),
    #[error("File {} already exists, choose another name", .0.display())]
    FileExists(PathBuf),
    #[error("Could not write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Where an image was saved, and whether it was saved without any edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOutcome {
    pub path: PathBuf,
    pub unmodified: bool,
}

/// Summary of a freshly opened image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opened {
    pub file_name: String,
    pub width: u32,
    pub height: u32,
}

impl Opened {
    fn describe(path: &Path, raster: &Raster) -> Self {
        let (width, height) = raster.dimensions();
        Self {
            file_name: display_name(path),
            width,
            height,
        }
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Decode `path` if its extension is accepted by `input`.
fn read_image<C: ImageCodec>(
    codec: &C,
    input: &InputConfig,
    path: &Path,
) -> Result<Raster, EditorError> {
    let ext = extension_of(path).unwrap_or_default();
    if !input.accepts(&ext) {
        return Err(EditorError::UnsupportedExtension(display_name(path)));
    }
    let bytes = std::fs::read(path).map_err(CodecError::from)?;
    Ok(codec.decode(&bytes)?)
}

/// Read the size of an accepted image without opening a session or auditing.
pub fn inspect<C: ImageCodec>(
    codec: &C,
    input: &InputConfig,
    path: &Path,
) -> Result<Opened, EditorError> {
    let raster = read_image(codec, input, path)?;
    Ok(Opened::describe(path, &raster))
}

pub struct Editor<C: ImageCodec> {
    session: ImageSession,
    codec: C,
    audit: Arc<dyn AuditSink>,
    config: AppConfig,
    save_dir: PathBuf,
}

impl<C: ImageCodec> Editor<C> {
    /// Build an editor with a worker pool sized by `config.processing.workers`.
    pub fn new(
        config: AppConfig,
        codec: C,
        audit: Arc<dyn AuditSink>,
    ) -> Result<Self, EditorError> {
        let scheduler = RowBandScheduler::new(config.processing.workers)?;
        let save_dir = config.save.resolved_directory();
        Ok(Self {
            session: ImageSession::new(scheduler),
            codec,
            audit,
            config,
            save_dir,
        })
    }

    /// Save into `dir` instead of the configured directory.
    pub fn with_save_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.save_dir = dir.into();
        self
    }

    pub fn session(&self) -> &ImageSession {
        &self.session
    }

    pub fn save_dir(&self) -> &Path {
        &self.save_dir
    }

    /// Record `err` as an `ERROR` audit entry prefixed with `context`, then return it.
    fn fail<T>(&self, context: &str, err: impl Into<EditorError>) -> Result<T, EditorError> {
        let err = err.into();
        self.audit.error(&format!("{context}: {err}"));
        Err(err)
    }

    /// Open and decode `path`, replacing the current session.
    pub fn open(&mut self, path: &Path) -> Result<Opened, EditorError> {
        let raster = match read_image(&self.codec, &self.config.input, path) {
            Ok(r) => r,
            Err(e @ EditorError::UnsupportedExtension(_)) => return self.fail("Rejected file", e),
            Err(e) => return self.fail(&format!("Failed to load {}", display_name(path)), e),
        };

        let opened = Opened::describe(path, &raster);
        self.session.load(raster);
        self.audit.action(&format!("Loaded image: {}", opened.file_name));
        Ok(opened)
    }

    fn check_dimension(&self, field: &'static str, value: u32) -> Result<(), EditorError> {
        let range = &self.config.resize;
        if value < range.min || value > range.max {
            return Err(EditorError::DimensionOutOfRange {
                field,
                value,
                min: range.min,
                max: range.max,
            });
        }
        Ok(())
    }

    /// Apply `op` to the current image.
    pub fn apply(&mut self, op: &OperationSpec) -> Result<(), EditorError> {
        if let OperationSpec::Resample { width, height } = *op {
            let checked = self
                .check_dimension("width", width)
                .and_then(|_| self.check_dimension("height", height));
            if let Err(e) = checked {
                return self.fail("Rejected resize", e);
            }
        }
        match self.session.apply(op) {
            Ok(()) => {
                self.audit.action(&format!("Applied operation: {op}"));
                Ok(())
            }
            Err(e) => self.fail(&format!("Operation {} failed", op.name()), e),
        }
    }

    /// Dimensions of the image as it was loaded, for "restore original size".
    pub fn original_dimensions(&self) -> Option<(u32, u32)> {
        self.session.original().ok().map(Raster::dimensions)
    }

    /// Output path for `name`, after trimming and length checks.
    ///
    /// The name must be a single path component so the file lands directly
    /// in the save directory.
    pub fn target_path(&self, name: &str) -> Result<PathBuf, EditorError> {
        let name = name.trim();
        let len = name.chars().count();
        let rules = &self.config.save;
        if len < rules.min_name_len {
            return Err(EditorError::NameTooShort {
                min: rules.min_name_len,
            });
        }
        if len > rules.max_name_len {
            return Err(EditorError::NameTooLong {
                max: rules.max_name_len,
            });
        }
        let plain = Path::new(name).file_name() == Some(OsStr::new(name));
        if !plain || name.contains(['/', '\\']) {
            return Err(EditorError::NameNotPlain(name.to_string()));
        }
        Ok(self
            .save_dir
            .join(format!("{name}.{}", rules.extension.to_ascii_lowercase())))
    }

    /// Encode the current image and write it under `name`. Never overwrites.
    pub fn save(&self, name: &str) -> Result<SaveOutcome, EditorError> {
        let raster = match self.session.current() {
            Ok(r) => r,
            Err(e) => return self.fail("Nothing to save", e),
        };
        let path = match self.target_path(name) {
            Ok(p) => p,
            Err(e) => return self.fail("Rejected file name", e),
        };
        if path.exists() {
            return self.fail("Refused to save", EditorError::FileExists(path));
        }

        let bytes = match output_format(&self.config.save.extension)
            .and_then(|format| self.codec.encode(raster, format))
        {
            Ok(b) => b,
            Err(e) => return self.fail("Failed to encode image", e),
        };
        if let Err(e) = write_new(&path, &bytes) {
            return self.fail("Failed to save image", e);
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.audit.action(&format!("Saved image as: {file_name}"));
        Ok(SaveOutcome {
            path,
            unmodified: !self.session.is_modified(),
        })
    }
}

/// Write `bytes` to a file that must not exist yet, creating parent directories.
fn write_new(path: &Path, bytes: &[u8]) -> Result<(), EditorError> {
    let wrap = |source| EditorError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(wrap)?;
    }
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::AlreadyExists {
                EditorError::FileExists(path.to_path_buf())
            } else {
                wrap(e)
            }
        })?;
    file.write_all(bytes).map_err(wrap)
}
