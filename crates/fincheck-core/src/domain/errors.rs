use std::error::Error;
use std::fmt::{Display, Formatter};

pub type VerifyResult<T> = Result<T, VerifyError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VerifyErrorCategory {
    InvalidInvocation,
    MissingArtifact,
    FormatViolation,
    EchoMismatch,
    AggregateMismatch,
    GoldenMismatch,
    InternalError,
}

impl VerifyErrorCategory {
    pub const fn exit_mapping(self) -> ExitMapping {
        match self {
            Self::InvalidInvocation => ExitMapping {
                exit_code: 2,
                category_name: "InvalidInvocation",
                code_prefix: "CLI",
            },
            Self::MissingArtifact => ExitMapping {
                exit_code: 3,
                category_name: "MissingArtifact",
                code_prefix: "ARTIFACT",
            },
            Self::FormatViolation => ExitMapping {
                exit_code: 4,
                category_name: "FormatViolation",
                code_prefix: "FORMAT",
            },
            Self::EchoMismatch => ExitMapping {
                exit_code: 5,
                category_name: "EchoMismatch",
                code_prefix: "ECHO",
            },
            Self::AggregateMismatch => ExitMapping {
                exit_code: 6,
                category_name: "AggregateMismatch",
                code_prefix: "AGGREGATE",
            },
            Self::GoldenMismatch => ExitMapping {
                exit_code: 7,
                category_name: "GoldenMismatch",
                code_prefix: "GOLDEN",
            },
            Self::InternalError => ExitMapping {
                exit_code: 8,
                category_name: "InternalError",
                code_prefix: "SYS",
            },
        }
    }

    pub const fn exit_code(self) -> i32 {
        self.exit_mapping().exit_code
    }

    pub const fn category_name(self) -> &'static str {
        self.exit_mapping().category_name
    }

    pub const fn code_prefix(self) -> &'static str {
        self.exit_mapping().code_prefix
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitMapping {
    pub exit_code: i32,
    pub category_name: &'static str,
    pub code_prefix: &'static str,
}

/// Fail-fast verification error: a category that fixes the exit code, a stable
/// dotted code for scripting, and a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyError {
    category: VerifyErrorCategory,
    code: &'static str,
    message: String,
}

impl VerifyError {
    pub fn new(category: VerifyErrorCategory, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            category,
            code,
            message: message.into(),
        }
    }

    pub fn invalid_invocation(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(VerifyErrorCategory::InvalidInvocation, code, message)
    }

    pub fn missing_artifact(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(VerifyErrorCategory::MissingArtifact, code, message)
    }

    pub fn format_violation(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(VerifyErrorCategory::FormatViolation, code, message)
    }

    pub fn echo_mismatch(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(VerifyErrorCategory::EchoMismatch, code, message)
    }

    pub fn aggregate_mismatch(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(VerifyErrorCategory::AggregateMismatch, code, message)
    }

    pub fn golden_mismatch(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(VerifyErrorCategory::GoldenMismatch, code, message)
    }

    pub fn internal(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(VerifyErrorCategory::InternalError, code, message)
    }

    pub const fn category(&self) -> VerifyErrorCategory {
        self.category
    }

    pub const fn code(&self) -> &'static str {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn exit_code(&self) -> i32 {
        self.category.exit_code()
    }

    pub fn diagnostic_line(&self) -> String {
        format!("ERROR: [{}] {}", self.code, self.message)
    }

    pub fn fatal_exit_line(&self) -> String {
        format!("FATAL EXIT CODE: {}", self.exit_code())
    }
}

impl Display for VerifyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}] {}",
            self.category.category_name(),
            self.code,
            self.message
        )
    }
}

impl Error for VerifyError {}
