//! Correctness oracle for amortization-schedule calculator outputs.
//!
//! [`verify_case`] checks one recorded case: the calculator's `response.json`
//! and `schedule.csv` must agree with the fixture `request.json` and with each
//! other, and may additionally be required to match checked-in goldens byte for
//! byte. Expected-failure cases compare `error.txt` only.

pub mod common;
pub mod domain;
pub mod modules;

pub use domain::{VerifyError, VerifyErrorCategory, VerifyResult};
pub use modules::{VerificationOutcome, VerifierConfig, verify_case};
