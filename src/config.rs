use config::{Config, ConfigError, Environment, File};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use tracing::info;
use validator::Validate;

/// Default values for configuration
const DEFAULT_STOCK: u32 = 10;
const DEFAULT_THRESHOLD: u32 = 3;
const DEFAULT_HISTORY_CAP: usize = 500;
const DEFAULT_ORDERS_CAP: usize = 200;
const DEFAULT_INTERACTIONS_CAP: usize = 100;
const DEFAULT_LOCAL_DISTRICT: &str = "Dhaka";
const DEFAULT_CURRENCY: &str = "BDT";
const CONFIG_FILE: &str = "config/storefront";
const ENV_PREFIX: &str = "POSHABAYA";

/// Storefront configuration with validation.
///
/// Everything has a sensible default; hosts only override what they need,
/// either via `config/storefront.{toml,yaml,json}` or `POSHABAYA_`-prefixed
/// environment variables.
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    /// Seed quantity applied per product (and per declared size) when the
    /// inventory key is absent.
    pub default_stock: u32,

    /// Low-stock cutoff used for products without an explicit threshold.
    pub default_threshold: u32,

    /// Maximum retained audit trail length; oldest entries are evicted.
    #[validate(range(min = 1))]
    pub history_cap: usize,

    /// Maximum retained order list length; oldest orders are evicted.
    #[validate(range(min = 1))]
    pub orders_cap: usize,

    /// Maximum interactions kept per customer profile.
    #[validate(range(min = 1))]
    pub interactions_cap: usize,

    /// Subtotal at or above which shipping is free.
    pub free_shipping_threshold: Decimal,

    /// District billed at the local flat fee; everywhere else pays the
    /// zone fee.
    #[validate(length(min = 1))]
    pub local_district: String,

    pub shipping_local: Decimal,
    pub shipping_zone: Decimal,

    /// ISO currency code used for display formatting.
    #[validate(length(min = 3, max = 3))]
    pub currency: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            default_stock: DEFAULT_STOCK,
            default_threshold: DEFAULT_THRESHOLD,
            history_cap: DEFAULT_HISTORY_CAP,
            orders_cap: DEFAULT_ORDERS_CAP,
            interactions_cap: DEFAULT_INTERACTIONS_CAP,
            free_shipping_threshold: dec!(15000),
            local_district: DEFAULT_LOCAL_DISTRICT.to_string(),
            shipping_local: dec!(80),
            shipping_zone: dec!(150),
            currency: DEFAULT_CURRENCY.to_string(),
        }
    }
}

impl StoreConfig {
    /// Loads configuration from the optional config file and environment,
    /// falling back to defaults for anything unset.
    pub fn load() -> Result<Self, ConfigError> {
        let raw = Config::builder()
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?;

        let parsed: StoreConfig = raw.try_deserialize()?;
        parsed
            .validate()
            .map_err(|e| ConfigError::Message(e.to_string()))?;
        info!(
            default_stock = parsed.default_stock,
            orders_cap = parsed.orders_cap,
            history_cap = parsed.history_cap,
            "loaded storefront configuration"
        );
        Ok(parsed)
    }
}
