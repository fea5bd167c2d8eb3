//! Pipeline orchestration for SBOM commands.
//!
//! Shared load and output steps used by the CLI command handlers.

mod output;
mod parse;

pub use output::{should_use_color, write_output, OutputTarget};
pub use parse::{parse_sbom_with_context, ParsedSbom};

/// Exit codes for CI/CD integration
pub mod exit_codes {
    /// Success
    pub const SUCCESS: i32 = 0;
    /// Verification found issues, or the package was not found
    pub const CHECK_FAILED: i32 = 1;
    /// An error occurred
    pub const ERROR: i32 = 3;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_values() {
        assert_eq!(exit_codes::SUCCESS, 0);
        assert_eq!(exit_codes::CHECK_FAILED, 1);
        assert_eq!(exit_codes::ERROR, 3);
    }
}
