//! Environment-backed configuration.

use crate::arb::controller::LoopPolicy;

/// Runtime configuration for the demo binary, read from the environment
/// (a `.env` file is honored via dotenv).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Flash-loan fee charged by the demo pool, in basis points.
    pub fee_bps: u64,
    /// Loop policy assembled from the slippage and profitability knobs.
    pub policy: LoopPolicy,
}

impl Config {
    /// Reads configuration from the environment, falling back to the
    /// reference defaults: 9 bps fee, unlimited slippage tolerance,
    /// unprofitable-but-solvent loops allowed.
    ///
    /// Recognized variables: `FLASHLOOP_FEE_BPS`,
    /// `FLASHLOOP_MAX_SLIPPAGE_BPS`, `FLASHLOOP_REJECT_UNPROFITABLE`.
    /// Unparsable values fall back to the defaults.
    #[must_use]
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        let fee_bps = env_u64("FLASHLOOP_FEE_BPS").unwrap_or(9);
        let policy = LoopPolicy {
            max_slippage_bps: env_u64("FLASHLOOP_MAX_SLIPPAGE_BPS"),
            reject_unprofitable: std::env::var("FLASHLOOP_REJECT_UNPROFITABLE")
                .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        };

        Self { fee_bps, policy }
    }
}

/// Parses an optional numeric environment variable.
fn env_u64(name: &str) -> Option<u64> {
    std::env::var(name).ok().and_then(|value| value.parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fee_bps: 9,
            policy: LoopPolicy::default(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_behavior() {
        let config = Config::default();
        assert_eq!(config.fee_bps, 9);
        assert_eq!(config.policy.max_slippage_bps, None);
        assert!(!config.policy.reject_unprofitable);
    }
}
