use super::golden::{GoldenComparison, compare_golden, compare_golden_bytes};
use super::invariants::check_invariants;
use super::layout::CaseLayout;
use super::parser::{parse_request_json, parse_response_json, parse_schedule_csv};
use crate::common::constants::{
    DEFAULT_CASE, DEFAULT_FIXTURES_ROOT, DEFAULT_OUT_ROOT, DEFAULT_REPO_ROOT, ERROR_FILE,
    GOLDEN_SUCCESS_FILES,
};
use crate::common::text::{read_bytes, read_text_lf, require_file};
use crate::domain::{CaseKind, ErrorArtifact, ScheduleSummary, VerifyResult};
use std::path::PathBuf;
use tracing::{debug, info, info_span};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifierConfig {
    pub repo_root: PathBuf,
    /// Fixtures root, relative to `repo_root` unless absolute.
    pub fixtures_root: PathBuf,
    /// Output root, relative to `repo_root` unless absolute.
    pub out_root: PathBuf,
    pub case_name: String,
    pub compare_goldens: bool,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            repo_root: PathBuf::from(DEFAULT_REPO_ROOT),
            fixtures_root: PathBuf::from(DEFAULT_FIXTURES_ROOT),
            out_root: PathBuf::from(DEFAULT_OUT_ROOT),
            case_name: DEFAULT_CASE.to_string(),
            compare_goldens: false,
        }
    }
}

impl VerifierConfig {
    pub fn fixtures_dir(&self) -> PathBuf {
        self.repo_root.join(&self.fixtures_root)
    }

    pub fn out_dir(&self) -> PathBuf {
        self.repo_root.join(&self.out_root)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationOutcome {
    ExpectedFailure {
        case_name: String,
        error_artifact: GoldenComparison,
    },
    Success {
        case_name: String,
        summary: ScheduleSummary,
        goldens: Vec<GoldenComparison>,
    },
}

impl VerificationOutcome {
    pub fn kind(&self) -> CaseKind {
        match self {
            Self::ExpectedFailure { .. } => CaseKind::ExpectedFailure,
            Self::Success { .. } => CaseKind::Success,
        }
    }

    pub fn case_name(&self) -> &str {
        match self {
            Self::ExpectedFailure { case_name, .. } | Self::Success { case_name, .. } => case_name,
        }
    }

    pub fn confirmation_line(&self) -> &'static str {
        match self {
            Self::ExpectedFailure { .. } => "OK: expected-fail case error.txt matches goldens.",
            Self::Success { .. } => "OK: fincalc demo outputs are internally consistent.",
        }
    }
}

/// Verifies one case's recorded outputs. Any violated precondition or
/// invariant aborts with the first error found.
pub fn verify_case(config: &VerifierConfig) -> VerifyResult<VerificationOutcome> {
    let layout = CaseLayout::resolve(config)?;
    let kind = layout.case_kind();
    let span = info_span!("verify_case", case = %layout.case_name, %kind);
    let _guard = span.enter();
    debug!(
        expected = %layout.expected_dir.display(),
        input = %layout.input_dir.display(),
        output = %layout.output_dir.display(),
        "resolved case layout"
    );

    let outcome = match kind {
        CaseKind::ExpectedFailure => verify_expected_failure(&layout)?,
        CaseKind::Success => verify_success(&layout, config.compare_goldens)?,
    };
    info!("case verified");
    Ok(outcome)
}

fn verify_expected_failure(layout: &CaseLayout) -> VerifyResult<VerificationOutcome> {
    let output_path = layout.output_error_path();
    require_file(&output_path, "error artifact")?;
    let output = ErrorArtifact::new(
        &output_path,
        read_text_lf(&output_path, "error artifact")?.into_bytes(),
    );
    let expected_path = layout.expected_error_path();
    let expected = ErrorArtifact::new(&expected_path, read_bytes(&expected_path, "golden file")?);

    let comparison = compare_golden_bytes(
        layout.artifact_label(ERROR_FILE),
        &expected.bytes,
        &output.bytes,
    )
    .into_result()?;
    debug!(
        output = %output.path.display(),
        golden = %expected.path.display(),
        sha256 = %comparison.actual_sha256,
        "error artifact matches golden"
    );

    Ok(VerificationOutcome::ExpectedFailure {
        case_name: layout.case_name.clone(),
        error_artifact: comparison,
    })
}

fn verify_success(layout: &CaseLayout, compare_goldens: bool) -> VerifyResult<VerificationOutcome> {
    let response_path = layout.output_response_path();
    let schedule_path = layout.output_schedule_path();
    require_file(&response_path, "output file")?;
    let response_text = read_text_lf(&response_path, "output file")?;
    require_file(&schedule_path, "output file")?;
    let schedule_text = read_text_lf(&schedule_path, "output file")?;

    let response = parse_response_json(&response_path, &response_text)?;
    let rows = parse_schedule_csv(&schedule_path, &schedule_text)?;
    let request_path = layout.request_path();
    let request_text = read_text_lf(&request_path, "fixture request")?;
    let request = parse_request_json(&request_path, &request_text)?;
    debug!(rows = rows.len(), "parsed request, response and schedule");

    let summary = check_invariants(&request, &response, &rows)?;

    let mut goldens = Vec::new();
    if compare_goldens {
        for file_name in GOLDEN_SUCCESS_FILES {
            let comparison = compare_golden(
                layout.artifact_label(file_name),
                &layout.expected_dir.join(file_name),
                &layout.output_dir.join(file_name),
            )?
            .into_result()?;
            debug!(artifact = %comparison.artifact, "output matches golden");
            goldens.push(comparison);
        }
    }

    Ok(VerificationOutcome::Success {
        case_name: layout.case_name.clone(),
        summary,
        goldens,
    })
}

#[cfg(test)]
mod tests {
    use super::{VerificationOutcome, VerifierConfig, verify_case};
    use crate::domain::{CaseKind, VerifyErrorCategory};
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    const SCHEDULE: &str = "period,date,payment_cents,principal_cents,interest_cents,balance_cents\n\
1,2024-01-01,50375,49875,500,50125\n\
2,2024-02-01,50376,50125,251,0\n";

    const RESPONSE: &str = r#"{
  "schema_version": "v1",
  "calculator": "amortize",
  "principal_cents": 100000,
  "annual_rate_bps": 600,
  "term_months": 2,
  "start_date": "2024-01-01",
  "payment_cents": 50375,
  "last_payment_cents": 50376,
  "total_interest_cents": 751,
  "total_paid_cents": 100751
}
"#;

    const REQUEST: &str = r#"{
  "principal_cents": 100000,
  "annual_rate_bps": 600,
  "term_months": 2,
  "start_date": "2024-01-01"
}
"#;

    fn write_file(path: &Path, content: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("parent dir should be created");
        }
        fs::write(path, content).expect("file should be written");
    }

    fn stage_success_case(root: &Path, case_name: &str) -> VerifierConfig {
        write_file(
            &root.join("fixtures/input").join(case_name).join("request.json"),
            REQUEST,
        );
        for base in ["fixtures/expected", "out/demo"] {
            let dir = root.join(base).join(case_name);
            write_file(&dir.join("response.json"), RESPONSE);
            write_file(&dir.join("schedule.csv"), SCHEDULE);
        }
        VerifierConfig {
            repo_root: root.to_path_buf(),
            case_name: case_name.to_string(),
            ..VerifierConfig::default()
        }
    }

    #[test]
    fn default_config_matches_cli_defaults() {
        let config = VerifierConfig::default();
        assert_eq!(config.repo_root, PathBuf::from("."));
        assert_eq!(config.fixtures_dir(), PathBuf::from("./fixtures"));
        assert_eq!(config.out_dir(), PathBuf::from("./out/demo"));
        assert_eq!(config.case_name, "case02_interest");
        assert!(!config.compare_goldens);
    }

    #[test]
    fn absolute_out_root_is_not_joined_under_repo_root() {
        let config = VerifierConfig {
            repo_root: PathBuf::from("/repo"),
            out_root: PathBuf::from("/tmp/run-7"),
            ..VerifierConfig::default()
        };
        assert_eq!(config.out_dir(), PathBuf::from("/tmp/run-7"));
    }

    #[test]
    fn consistent_success_case_passes_with_goldens() {
        let temp = TempDir::new().expect("tempdir should be created");
        let mut config = stage_success_case(temp.path(), "case-a");
        config.compare_goldens = true;

        let outcome = verify_case(&config).expect("case should verify");
        assert_eq!(outcome.kind(), CaseKind::Success);
        assert_eq!(outcome.case_name(), "case-a");
        assert_eq!(
            outcome.confirmation_line(),
            "OK: fincalc demo outputs are internally consistent."
        );
        match outcome {
            VerificationOutcome::Success {
                summary, goldens, ..
            } => {
                assert_eq!(summary.row_count, 2);
                assert_eq!(goldens.len(), 2);
                assert_eq!(goldens[0].artifact, "case-a/response.json");
                assert_eq!(goldens[1].artifact, "case-a/schedule.csv");
            }
            other => panic!("expected success outcome, got {other:?}"),
        }
    }

    #[test]
    fn golden_mode_is_layered_after_semantic_checks() {
        let temp = TempDir::new().expect("tempdir should be created");
        let mut config = stage_success_case(temp.path(), "case-b");
        write_file(
            &temp.path().join("fixtures/expected/case-b/response.json"),
            &RESPONSE.replace("  ", "    "),
        );

        verify_case(&config).expect("semantic checks alone should pass");

        config.compare_goldens = true;
        let error = verify_case(&config).expect_err("golden bytes differ");
        assert_eq!(error.category(), VerifyErrorCategory::GoldenMismatch);
        assert!(error.message().contains("case-b/response.json"));
    }

    #[test]
    fn crlf_output_is_rejected_before_parsing() {
        let temp = TempDir::new().expect("tempdir should be created");
        let config = stage_success_case(temp.path(), "case-c");
        write_file(
            &temp.path().join("out/demo/case-c/schedule.csv"),
            &SCHEDULE.replace('\n', "\r\n"),
        );

        let error = verify_case(&config).expect_err("CRLF should fail");
        assert_eq!(error.code(), "FORMAT.LINE_ENDING");
    }

    #[test]
    fn missing_schedule_is_a_missing_artifact() {
        let temp = TempDir::new().expect("tempdir should be created");
        let config = stage_success_case(temp.path(), "case-d");
        fs::remove_file(temp.path().join("out/demo/case-d/schedule.csv"))
            .expect("schedule should be removed");

        let error = verify_case(&config).expect_err("schedule is missing");
        assert_eq!(error.category(), VerifyErrorCategory::MissingArtifact);
        assert!(error.message().contains("schedule.csv"));
    }

    #[test]
    fn expected_failure_case_ignores_success_artifacts() {
        let temp = TempDir::new().expect("tempdir should be created");
        let root = temp.path();
        write_file(&root.join("fixtures/input/bad/request.json"), REQUEST);
        write_file(
            &root.join("fixtures/expected/bad/error.txt"),
            "term_months must be positive\n",
        );
        write_file(
            &root.join("out/demo/bad/error.txt"),
            "term_months must be positive\n",
        );
        write_file(&root.join("out/demo/bad/response.json"), "not json at all\r\n");

        let config = VerifierConfig {
            repo_root: root.to_path_buf(),
            case_name: "bad".to_string(),
            ..VerifierConfig::default()
        };
        let outcome = verify_case(&config).expect("error artifact matches");
        assert_eq!(outcome.kind(), CaseKind::ExpectedFailure);
        assert_eq!(
            outcome.confirmation_line(),
            "OK: expected-fail case error.txt matches goldens."
        );
    }

    #[test]
    fn expected_failure_requires_output_error_artifact() {
        let temp = TempDir::new().expect("tempdir should be created");
        let root = temp.path();
        write_file(&root.join("fixtures/input/bad/request.json"), REQUEST);
        write_file(&root.join("fixtures/expected/bad/error.txt"), "boom\n");
        fs::create_dir_all(root.join("out/demo/bad")).expect("out dir should be created");

        let config = VerifierConfig {
            repo_root: root.to_path_buf(),
            case_name: "bad".to_string(),
            ..VerifierConfig::default()
        };
        let error = verify_case(&config).expect_err("error.txt is missing");
        assert_eq!(error.category(), VerifyErrorCategory::MissingArtifact);
        assert!(error.message().starts_with("missing error artifact"));
    }
}
