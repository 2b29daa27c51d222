//! Cross-artifact invariants between a loan request, the calculator's summary
//! response and its amortization schedule.
//!
//! Checks run in a fixed order and stop at the first violation:
//! contract fields, request echoes, row count, period sequence, principal,
//! interest and payment totals, final balance, and per-row payments.

use crate::domain::{
    CALCULATOR_NAME, LoanRequest, LoanResponse, SCHEMA_VERSION_V1, ScheduleRow, ScheduleSummary,
    VerifyError,
};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvariantViolation {
    #[error(
        "schema_version mismatch: expected '{}', found {}",
        SCHEMA_VERSION_V1,
        describe_optional(.found)
    )]
    SchemaVersion { found: Option<String> },
    #[error(
        "calculator mismatch: expected '{}', found {}",
        CALCULATOR_NAME,
        describe_optional(.found)
    )]
    Calculator { found: Option<String> },
    #[error("echo field mismatch: {field} (request={request}, response={response})")]
    EchoField {
        field: &'static str,
        request: String,
        response: String,
    },
    #[error("schedule row count {rows} != term_months {term_months}")]
    RowCount { rows: usize, term_months: i64 },
    #[error("period sequence mismatch at row {row}: expected period {expected}, found {found}")]
    PeriodSequence { row: usize, expected: i64, found: i64 },
    #[error("principal sum mismatch: schedule={schedule}, response principal_cents={response}")]
    PrincipalSum { schedule: i128, response: i64 },
    #[error("interest sum mismatch: schedule={schedule}, response total_interest_cents={response}")]
    InterestSum { schedule: i128, response: i64 },
    #[error("total paid mismatch: schedule={schedule}, response total_paid_cents={response}")]
    PaymentSum { schedule: i128, response: i64 },
    #[error("final balance must be 0: schedule has no rows")]
    EmptySchedule,
    #[error("final balance must be 0: period {period} ends with balance_cents={balance}")]
    FinalBalance { period: i64, balance: i64 },
    #[error("non-last payment must equal payment_cents: period {period} pays {found}, expected {expected}")]
    RegularPayment { period: i64, found: i64, expected: i64 },
    #[error("last payment must equal last_payment_cents: period {period} pays {found}, expected {expected}")]
    LastPayment { period: i64, found: i64, expected: i64 },
}

impl InvariantViolation {
    pub const fn code(&self) -> &'static str {
        match self {
            Self::SchemaVersion { .. } => "ECHO.SCHEMA_VERSION",
            Self::Calculator { .. } => "ECHO.CALCULATOR",
            Self::EchoField { .. } => "ECHO.FIELD",
            Self::RowCount { .. } => "AGGREGATE.ROW_COUNT",
            Self::PeriodSequence { .. } => "AGGREGATE.PERIOD_SEQUENCE",
            Self::PrincipalSum { .. } => "AGGREGATE.PRINCIPAL_SUM",
            Self::InterestSum { .. } => "AGGREGATE.INTEREST_SUM",
            Self::PaymentSum { .. } => "AGGREGATE.TOTAL_PAID",
            Self::EmptySchedule | Self::FinalBalance { .. } => "AGGREGATE.FINAL_BALANCE",
            Self::RegularPayment { .. } => "AGGREGATE.PAYMENT",
            Self::LastPayment { .. } => "AGGREGATE.LAST_PAYMENT",
        }
    }

    pub const fn is_echo(&self) -> bool {
        matches!(
            self,
            Self::SchemaVersion { .. } | Self::Calculator { .. } | Self::EchoField { .. }
        )
    }
}

impl From<InvariantViolation> for VerifyError {
    fn from(violation: InvariantViolation) -> Self {
        let code = violation.code();
        let message = violation.to_string();
        if violation.is_echo() {
            VerifyError::echo_mismatch(code, message)
        } else {
            VerifyError::aggregate_mismatch(code, message)
        }
    }
}

fn describe_optional(value: &Option<String>) -> String {
    match value {
        Some(value) => format!("'{value}'"),
        None => "nothing".to_string(),
    }
}

pub fn check_invariants(
    request: &LoanRequest,
    response: &LoanResponse,
    rows: &[ScheduleRow],
) -> Result<ScheduleSummary, InvariantViolation> {
    check_contract(response)?;
    check_echoes(request, response)?;
    check_periods(response, rows)?;
    let summary = check_totals(response, rows)?;
    check_payments(response, rows)?;
    Ok(summary)
}

pub fn check_contract(response: &LoanResponse) -> Result<(), InvariantViolation> {
    if response.schema_version.as_deref() != Some(SCHEMA_VERSION_V1) {
        return Err(InvariantViolation::SchemaVersion {
            found: response.schema_version.clone(),
        });
    }
    if response.calculator.as_deref() != Some(CALCULATOR_NAME) {
        return Err(InvariantViolation::Calculator {
            found: response.calculator.clone(),
        });
    }
    Ok(())
}

pub fn check_echoes(
    request: &LoanRequest,
    response: &LoanResponse,
) -> Result<(), InvariantViolation> {
    let integer_echoes = [
        (
            "principal_cents",
            request.principal_cents,
            response.principal_cents,
        ),
        (
            "annual_rate_bps",
            request.annual_rate_bps,
            response.annual_rate_bps,
        ),
        ("term_months", request.term_months, response.term_months),
    ];
    for (field, requested, echoed) in integer_echoes {
        if requested != echoed {
            return Err(InvariantViolation::EchoField {
                field,
                request: requested.to_string(),
                response: echoed.to_string(),
            });
        }
    }

    if request.start_date != response.start_date {
        return Err(InvariantViolation::EchoField {
            field: "start_date",
            request: format!("{:?}", request.start_date),
            response: format!("{:?}", response.start_date),
        });
    }

    debug!("request echo fields match response");
    Ok(())
}

pub fn check_periods(
    response: &LoanResponse,
    rows: &[ScheduleRow],
) -> Result<(), InvariantViolation> {
    let row_count_matches =
        i64::try_from(rows.len()).is_ok_and(|count| count == response.term_months);
    if !row_count_matches {
        return Err(InvariantViolation::RowCount {
            rows: rows.len(),
            term_months: response.term_months,
        });
    }

    for (expected, (index, row)) in (1_i64..).zip(rows.iter().enumerate()) {
        if row.period != expected {
            return Err(InvariantViolation::PeriodSequence {
                row: index + 1,
                expected,
                found: row.period,
            });
        }
    }

    debug!(rows = rows.len(), "schedule periods form 1..=term_months");
    Ok(())
}

/// Ties schedule totals out against the response and checks the loan fully
/// amortizes.
pub fn check_totals(
    response: &LoanResponse,
    rows: &[ScheduleRow],
) -> Result<ScheduleSummary, InvariantViolation> {
    let principal_sum = rows
        .iter()
        .map(|row| i128::from(row.principal_cents))
        .sum::<i128>();
    let interest_sum = rows
        .iter()
        .map(|row| i128::from(row.interest_cents))
        .sum::<i128>();
    let payment_sum = rows
        .iter()
        .map(|row| i128::from(row.payment_cents))
        .sum::<i128>();

    if principal_sum != i128::from(response.principal_cents) {
        return Err(InvariantViolation::PrincipalSum {
            schedule: principal_sum,
            response: response.principal_cents,
        });
    }
    if interest_sum != i128::from(response.total_interest_cents) {
        return Err(InvariantViolation::InterestSum {
            schedule: interest_sum,
            response: response.total_interest_cents,
        });
    }
    if payment_sum != i128::from(response.total_paid_cents) {
        return Err(InvariantViolation::PaymentSum {
            schedule: payment_sum,
            response: response.total_paid_cents,
        });
    }

    let last = rows.last().ok_or(InvariantViolation::EmptySchedule)?;
    if last.balance_cents != 0 {
        return Err(InvariantViolation::FinalBalance {
            period: last.period,
            balance: last.balance_cents,
        });
    }

    debug!(
        %principal_sum,
        %interest_sum,
        %payment_sum,
        "schedule totals tie out"
    );
    Ok(ScheduleSummary {
        row_count: rows.len(),
        principal_sum,
        interest_sum,
        payment_sum,
        final_balance_cents: last.balance_cents,
    })
}

pub fn check_payments(
    response: &LoanResponse,
    rows: &[ScheduleRow],
) -> Result<(), InvariantViolation> {
    let Some((last, regular)) = rows.split_last() else {
        return Err(InvariantViolation::EmptySchedule);
    };

    if let Some(row) = regular
        .iter()
        .find(|row| row.payment_cents != response.payment_cents)
    {
        return Err(InvariantViolation::RegularPayment {
            period: row.period,
            found: row.payment_cents,
            expected: response.payment_cents,
        });
    }
    if last.payment_cents != response.last_payment_cents {
        return Err(InvariantViolation::LastPayment {
            period: last.period,
            found: last.payment_cents,
            expected: response.last_payment_cents,
        });
    }
    Ok(())
}
