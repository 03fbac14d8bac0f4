//! Admission engine configuration

use clap::Args;

/// Attempts per operation when the default is not overridden.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Admission engine settings.
#[derive(Debug, Clone, Copy, Args)]
pub struct AdmissionsConfig {
    /// Attempts per admission operation before a store conflict is reported
    #[arg(long, env = "ADMISSION_MAX_ATTEMPTS", default_value_t = DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: u32,
}

impl Default for AdmissionsConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}
