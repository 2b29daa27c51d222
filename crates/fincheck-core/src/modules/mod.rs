pub mod golden;
pub mod invariants;
pub mod layout;
pub mod parser;
pub mod verifier;

pub use golden::{GoldenComparison, GoldenMismatch, compare_golden, compare_golden_bytes};
pub use invariants::{InvariantViolation, check_invariants};
pub use layout::CaseLayout;
pub use parser::{ParseError, parse_request_json, parse_response_json, parse_schedule_csv};
pub use verifier::{VerificationOutcome, VerifierConfig, verify_case};
