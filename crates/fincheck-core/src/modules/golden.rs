use crate::common::text::{ArtifactError, first_mismatch_offset, read_bytes, sha256_hex};
use crate::domain::VerifyError;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoldenComparison {
    pub artifact: String,
    pub expected_bytes: usize,
    pub actual_bytes: usize,
    pub expected_sha256: String,
    pub actual_sha256: String,
    pub first_mismatch_offset: Option<usize>,
}

impl GoldenComparison {
    pub fn passed(&self) -> bool {
        self.first_mismatch_offset.is_none()
    }

    pub fn into_result(self) -> Result<Self, GoldenMismatch> {
        match self.first_mismatch_offset {
            None => Ok(self),
            Some(offset) => Err(GoldenMismatch {
                artifact: self.artifact,
                offset,
                expected_bytes: self.expected_bytes,
                actual_bytes: self.actual_bytes,
                expected_sha256: self.expected_sha256,
                actual_sha256: self.actual_sha256,
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "golden mismatch: {artifact} differs at byte {offset} (expected {expected_bytes} bytes sha256={expected_sha256}, actual {actual_bytes} bytes sha256={actual_sha256})"
)]
pub struct GoldenMismatch {
    pub artifact: String,
    pub offset: usize,
    pub expected_bytes: usize,
    pub actual_bytes: usize,
    pub expected_sha256: String,
    pub actual_sha256: String,
}

impl From<GoldenMismatch> for VerifyError {
    fn from(error: GoldenMismatch) -> Self {
        VerifyError::golden_mismatch("GOLDEN.MISMATCH", error.to_string())
    }
}

/// Byte-compares an output artifact with its golden. `artifact` is the
/// case-relative name used in diagnostics.
pub fn compare_golden(
    artifact: impl Into<String>,
    expected_path: &Path,
    actual_path: &Path,
) -> Result<GoldenComparison, ArtifactError> {
    let expected = read_bytes(expected_path, "golden file")?;
    let actual = read_bytes(actual_path, "output file")?;
    Ok(compare_golden_bytes(artifact, &expected, &actual))
}

pub fn compare_golden_bytes(
    artifact: impl Into<String>,
    expected: &[u8],
    actual: &[u8],
) -> GoldenComparison {
    GoldenComparison {
        artifact: artifact.into(),
        expected_bytes: expected.len(),
        actual_bytes: actual.len(),
        expected_sha256: sha256_hex(expected),
        actual_sha256: sha256_hex(actual),
        first_mismatch_offset: first_mismatch_offset(expected, actual),
    }
}
