//! File names and fixed shapes of the calculator's artifacts.

pub const REQUEST_FILE: &str = "request.json";
pub const RESPONSE_FILE: &str = "response.json";
pub const SCHEDULE_FILE: &str = "schedule.csv";
pub const ERROR_FILE: &str = "error.txt";

pub const FIXTURE_INPUT_DIR: &str = "input";
pub const FIXTURE_EXPECTED_DIR: &str = "expected";

pub const SCHEDULE_HEADER: [&str; 6] = [
    "period",
    "date",
    "payment_cents",
    "principal_cents",
    "interest_cents",
    "balance_cents",
];

/// Artifacts byte-compared against goldens for a success case, in check order.
pub const GOLDEN_SUCCESS_FILES: [&str; 2] = [RESPONSE_FILE, SCHEDULE_FILE];

pub const DEFAULT_REPO_ROOT: &str = ".";
pub const DEFAULT_FIXTURES_ROOT: &str = "fixtures";
pub const DEFAULT_OUT_ROOT: &str = "out/demo";
pub const DEFAULT_CASE: &str = "case02_interest";
