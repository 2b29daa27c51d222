use crate::domain::VerifyError;
use sha2::{Digest, Sha256};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("missing {kind}: '{}'", .path.display())]
    Missing { kind: &'static str, path: PathBuf },
    #[error("failed to read '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("'{}' is not valid UTF-8: {source}", .path.display())]
    NotUtf8 {
        path: PathBuf,
        #[source]
        source: std::string::FromUtf8Error,
    },
    #[error("CRLF found in '{}' at line {line}; expected LF-only line endings", .path.display())]
    CrlfLineEnding { path: PathBuf, line: usize },
}

impl From<ArtifactError> for VerifyError {
    fn from(error: ArtifactError) -> Self {
        let message = error.to_string();
        match error {
            ArtifactError::Missing { .. } => {
                VerifyError::missing_artifact("ARTIFACT.MISSING", message)
            }
            ArtifactError::Read { .. } => VerifyError::internal("SYS.ARTIFACT_READ", message),
            ArtifactError::NotUtf8 { .. } => {
                VerifyError::format_violation("FORMAT.ENCODING", message)
            }
            ArtifactError::CrlfLineEnding { .. } => {
                VerifyError::format_violation("FORMAT.LINE_ENDING", message)
            }
        }
    }
}

pub fn require_dir(path: &Path, kind: &'static str) -> Result<(), ArtifactError> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(ArtifactError::Missing {
            kind,
            path: path.to_path_buf(),
        })
    }
}

pub fn require_file(path: &Path, kind: &'static str) -> Result<(), ArtifactError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(ArtifactError::Missing {
            kind,
            path: path.to_path_buf(),
        })
    }
}

pub fn read_bytes(path: &Path, kind: &'static str) -> Result<Vec<u8>, ArtifactError> {
    fs::read(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => ArtifactError::Missing {
            kind,
            path: path.to_path_buf(),
        },
        _ => ArtifactError::Read {
            path: path.to_path_buf(),
            source,
        },
    })
}

/// Reads a UTF-8 text artifact and rejects any CRLF sequence in it.
pub fn read_text_lf(path: &Path, kind: &'static str) -> Result<String, ArtifactError> {
    let bytes = read_bytes(path, kind)?;
    let text = String::from_utf8(bytes).map_err(|source| ArtifactError::NotUtf8 {
        path: path.to_path_buf(),
        source,
    })?;
    ensure_lf_only(path, &text)?;
    Ok(text)
}

pub fn ensure_lf_only(path: &Path, text: &str) -> Result<(), ArtifactError> {
    match text.find("\r\n") {
        Some(offset) => Err(ArtifactError::CrlfLineEnding {
            path: path.to_path_buf(),
            line: text[..offset].matches('\n').count() + 1,
        }),
        None => Ok(()),
    }
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    digest.iter().map(|byte| format!("{byte:02x}")).collect()
}

pub fn first_mismatch_offset(left: &[u8], right: &[u8]) -> Option<usize> {
    left.iter()
        .zip(right.iter())
        .position(|(left_byte, right_byte)| left_byte != right_byte)
        .or_else(|| (left.len() != right.len()).then_some(left.len().min(right.len())))
}
