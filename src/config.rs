// src/config.rs
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use tracing::info;

/// Distribution policy knobs. Defaults are the production policy (entries
/// start at 09:00, at most 8h per business day, claims above 24h are split);
/// the env loader exists so staging setups can vary them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DistributorConfig {
    pub workday_start_hour: u32,
    pub daily_cap_hours: Decimal,
    pub single_entry_max_hours: Decimal,
}

impl Default for DistributorConfig {
    fn default() -> Self {
        Self {
            workday_start_hour: 9,
            daily_cap_hours: dec!(8),
            single_entry_max_hours: dec!(24),
        }
    }
}

impl DistributorConfig {
    /// Loads overrides from `TIMEBILL_`-prefixed environment variables
    /// (e.g. `TIMEBILL_DAILY_CAP_HOURS=6`), falling back to defaults for
    /// anything unset. Reads a local `.env` file first if present.
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenv::dotenv().ok();
        let config: Self = envy::prefixed("TIMEBILL_").from_env()?;
        info!(
            "Distributor config: start={}h, cap={}h/day, split threshold={}h",
            config.workday_start_hour, config.daily_cap_hours, config.single_entry_max_hours
        );
        Ok(config)
    }
}
