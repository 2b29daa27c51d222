use super::verifier::VerifierConfig;
use crate::common::constants::{
    ERROR_FILE, FIXTURE_EXPECTED_DIR, FIXTURE_INPUT_DIR, REQUEST_FILE, RESPONSE_FILE,
    SCHEDULE_FILE,
};
use crate::common::text::require_dir;
use crate::domain::{CaseKind, VerifyError, VerifyResult};
use std::path::{Component, Path, PathBuf};

/// The three directories one case is verified from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseLayout {
    pub case_name: String,
    pub expected_dir: PathBuf,
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl CaseLayout {
    /// Resolves the case directories, failing on the first one that is absent
    /// (expected fixtures, then input fixtures, then outputs).
    pub fn resolve(config: &VerifierConfig) -> VerifyResult<Self> {
        validate_case_name(&config.case_name)?;

        let fixtures_dir = config.fixtures_dir();
        let layout = Self {
            case_name: config.case_name.clone(),
            expected_dir: fixtures_dir
                .join(FIXTURE_EXPECTED_DIR)
                .join(&config.case_name),
            input_dir: fixtures_dir.join(FIXTURE_INPUT_DIR).join(&config.case_name),
            output_dir: config.out_dir().join(&config.case_name),
        };

        require_dir(&layout.expected_dir, "expected fixture directory")?;
        require_dir(&layout.input_dir, "input fixture directory")?;
        require_dir(&layout.output_dir, "output case directory")?;
        Ok(layout)
    }

    /// A golden `error.txt` marks an expected-failure case.
    pub fn case_kind(&self) -> CaseKind {
        if self.expected_error_path().is_file() {
            CaseKind::ExpectedFailure
        } else {
            CaseKind::Success
        }
    }

    pub fn request_path(&self) -> PathBuf {
        self.input_dir.join(REQUEST_FILE)
    }

    pub fn expected_error_path(&self) -> PathBuf {
        self.expected_dir.join(ERROR_FILE)
    }

    pub fn output_error_path(&self) -> PathBuf {
        self.output_dir.join(ERROR_FILE)
    }

    pub fn output_response_path(&self) -> PathBuf {
        self.output_dir.join(RESPONSE_FILE)
    }

    pub fn output_schedule_path(&self) -> PathBuf {
        self.output_dir.join(SCHEDULE_FILE)
    }

    /// Case-relative artifact name used in diagnostics, e.g. `case02/schedule.csv`.
    pub fn artifact_label(&self, file_name: &str) -> String {
        format!("{}/{}", self.case_name, file_name)
    }
}

fn validate_case_name(case_name: &str) -> VerifyResult<()> {
    let mut components = Path::new(case_name).components();
    let single_normal = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    );
    if single_normal {
        Ok(())
    } else {
        Err(VerifyError::invalid_invocation(
            "CLI.CASE_NAME",
            format!("case name '{case_name}' must be a single directory name"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::CaseLayout;
    use crate::domain::{CaseKind, VerifyErrorCategory};
    use crate::modules::verifier::VerifierConfig;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn config(root: &Path, case_name: &str) -> VerifierConfig {
        VerifierConfig {
            repo_root: root.to_path_buf(),
            case_name: case_name.to_string(),
            ..VerifierConfig::default()
        }
    }

    fn make_case_dirs(root: &Path, case_name: &str) {
        for dir in ["fixtures/expected", "fixtures/input", "out/demo"] {
            fs::create_dir_all(root.join(dir).join(case_name)).expect("dir should be created");
        }
    }

    #[test]
    fn resolves_paths_under_repo_root() {
        let temp = TempDir::new().expect("tempdir should be created");
        make_case_dirs(temp.path(), "case02_interest");

        let layout = CaseLayout::resolve(&config(temp.path(), "case02_interest"))
            .expect("layout should resolve");
        assert_eq!(
            layout.request_path(),
            temp.path()
                .join("fixtures/input/case02_interest/request.json")
        );
        assert_eq!(
            layout.output_schedule_path(),
            temp.path().join("out/demo/case02_interest/schedule.csv")
        );
        assert_eq!(layout.case_kind(), CaseKind::Success);
        assert_eq!(layout.artifact_label("schedule.csv"), "case02_interest/schedule.csv");
    }

    #[test]
    fn expected_error_file_selects_expected_failure_branch() {
        let temp = TempDir::new().expect("tempdir should be created");
        make_case_dirs(temp.path(), "case03");
        fs::write(
            temp.path().join("fixtures/expected/case03/error.txt"),
            "error: term_months must be > 0\n",
        )
        .expect("error golden should be written");

        let layout =
            CaseLayout::resolve(&config(temp.path(), "case03")).expect("layout should resolve");
        assert_eq!(layout.case_kind(), CaseKind::ExpectedFailure);
    }

    #[test]
    fn missing_directories_are_reported_in_order() {
        let temp = TempDir::new().expect("tempdir should be created");

        let error = CaseLayout::resolve(&config(temp.path(), "absent"))
            .expect_err("nothing exists yet");
        assert_eq!(error.category(), VerifyErrorCategory::MissingArtifact);
        assert!(error.message().contains("expected fixture directory"));

        fs::create_dir_all(temp.path().join("fixtures/expected/absent"))
            .expect("dir should be created");
        let error = CaseLayout::resolve(&config(temp.path(), "absent"))
            .expect_err("input is still missing");
        assert!(error.message().contains("input fixture directory"));

        fs::create_dir_all(temp.path().join("fixtures/input/absent"))
            .expect("dir should be created");
        let error = CaseLayout::resolve(&config(temp.path(), "absent"))
            .expect_err("output is still missing");
        assert!(error.message().contains("output case directory"));
    }

    #[test]
    fn case_name_must_be_a_single_component() {
        let temp = TempDir::new().expect("tempdir should be created");
        for bad in ["", "..", "a/b", "/abs"] {
            let error = CaseLayout::resolve(&config(temp.path(), bad))
                .expect_err("bad case name should fail");
            assert_eq!(error.category(), VerifyErrorCategory::InvalidInvocation);
            assert_eq!(error.code(), "CLI.CASE_NAME");
        }
    }
}
