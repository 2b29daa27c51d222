use super::CliError;
use fincheck_core::{VerifierConfig, verify_case};
use std::path::PathBuf;
use tracing::debug;

#[derive(clap::Args, Debug)]
pub(super) struct VerifyArgs {
    /// Output root containing <case>/ directories written by the calculator
    #[arg(long, default_value = "out/demo")]
    out_root: PathBuf,

    /// Case folder name
    #[arg(long = "case", default_value = "case02_interest")]
    case_name: String,

    /// Also compare output bytes to fixtures/expected goldens
    #[arg(long)]
    compare_goldens: bool,

    /// Repository root that fixture and output paths are resolved against
    #[arg(long, default_value = ".")]
    repo_root: PathBuf,

    /// Fixtures root, relative to the repository root
    #[arg(long = "fixtures", default_value = "fixtures")]
    fixtures_root: PathBuf,
}

impl VerifyArgs {
    fn into_config(self) -> VerifierConfig {
        VerifierConfig {
            repo_root: self.repo_root,
            fixtures_root: self.fixtures_root,
            out_root: self.out_root,
            case_name: self.case_name,
            compare_goldens: self.compare_goldens,
        }
    }
}

pub(super) fn run_verify_command(args: VerifyArgs) -> Result<i32, CliError> {
    let config = args.into_config();
    debug!(?config, "verifying case");
    let outcome = verify_case(&config).map_err(CliError::Verify)?;
    println!("{}", outcome.confirmation_line());
    Ok(0)
}
