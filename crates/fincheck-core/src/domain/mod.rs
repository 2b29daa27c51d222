pub mod errors;

pub use errors::{ExitMapping, VerifyError, VerifyErrorCategory, VerifyResult};

use serde::Deserialize;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const SCHEMA_VERSION_V1: &str = "v1";
pub const CALCULATOR_NAME: &str = "amortize";

/// Input contract of the calculator under test. Money is integer cents and the
/// rate is in basis points.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoanRequest {
    pub principal_cents: i64,
    pub annual_rate_bps: i64,
    pub term_months: i64,
    pub start_date: String,
}

/// Summary response written by the calculator. Fields beyond these are
/// accepted and ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoanResponse {
    #[serde(default)]
    pub schema_version: Option<String>,
    #[serde(default)]
    pub calculator: Option<String>,
    pub principal_cents: i64,
    pub annual_rate_bps: i64,
    pub term_months: i64,
    pub start_date: String,
    pub payment_cents: i64,
    pub last_payment_cents: i64,
    pub total_interest_cents: i64,
    pub total_paid_cents: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleRow {
    pub period: i64,
    pub date: String,
    pub payment_cents: i64,
    pub principal_cents: i64,
    pub interest_cents: i64,
    pub balance_cents: i64,
}

/// Raw bytes of an expected-failure output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorArtifact {
    pub path: PathBuf,
    pub bytes: Vec<u8>,
}

impl ErrorArtifact {
    pub fn new(path: impl Into<PathBuf>, bytes: Vec<u8>) -> Self {
        Self {
            path: path.into(),
            bytes,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaseKind {
    ExpectedFailure,
    Success,
}

impl CaseKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ExpectedFailure => "expected-failure",
            Self::Success => "success",
        }
    }
}

impl Display for CaseKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).as_str())
    }
}

/// Totals gathered while the schedule invariants were checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScheduleSummary {
    pub row_count: usize,
    pub principal_sum: i128,
    pub interest_sum: i128,
    pub payment_sum: i128,
    pub final_balance_cents: i64,
}
