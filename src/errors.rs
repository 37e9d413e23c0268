use miette::Diagnostic;
use std::{io::ErrorKind, path::PathBuf};
use thiserror::Error;

#[derive(Debug, Error, Diagnostic, Clone, Copy, PartialEq, Eq)]
pub enum FileOperation {
    #[error("reading a file")]
    Read,
    #[error("writing a file")]
    Write,
    #[error("creating a directory")]
    Mkdir,
}
/// A filesystem primitive that failed on `path`.
///
/// The help line depends on what went wrong. A path already taken by the other
/// node type gets its own hint, because that is the usual failure on a rerun.
#[derive(Debug, Error, Diagnostic)]
#[error("{operation} failed on path '{path}'")]
#[diagnostic(code(ueki::fs))]
pub struct IoError {
    pub operation: FileOperation,
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
    #[help]
    pub hint: String,
}
impl IoError {
    pub fn new(operation: FileOperation, path: PathBuf, error: std::io::Error) -> Self {
        let hint = hint_for(operation, &error);

        Self {
            operation,
            path,
            source: error,
            hint,
        }
    }
    /// The message of the underlying [`std::io::Error`], without the path prefix.
    pub fn reason(&self) -> String {
        self.source.to_string()
    }
}

fn hint_for(operation: FileOperation, error: &std::io::Error) -> String {
    match (operation, error.kind()) {
        (FileOperation::Read, ErrorKind::NotFound) => {
            "Check that the tree file exists and the path is spelled correctly.".to_string()
        }
        (FileOperation::Mkdir, ErrorKind::AlreadyExists | ErrorKind::NotADirectory) => {
            "A file already occupies this path or one of its parents; remove it or rename the directory in the tree.".to_string()
        }
        (FileOperation::Write, ErrorKind::IsADirectory | ErrorKind::NotADirectory) => {
            "A directory occupies this path, or a parent is a file; remove it or add an extension in the tree.".to_string()
        }
        (_, ErrorKind::PermissionDenied) => {
            "Check write permissions on the output directory.".to_string()
        }
        _ => "Check disk space and that the output directory is writable.".to_string(),
    }
}
