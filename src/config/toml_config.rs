use crate::utils::error::{BookingError, Result};
use crate::utils::validation::{validate_range, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub delays: DelayConfig,
    pub payments: PaymentConfig,
    pub pricing: PricingConfig,
    pub logging: LoggingConfig,
}

/// Simulated network latency, in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DelayConfig {
    pub submit_ms: u64,
    pub card_ms: u64,
    pub push_ms: u64,
    pub confirm_ms: u64,
    pub contact_ms: u64,
}

impl Default for DelayConfig {
    fn default() -> Self {
        Self {
            submit_ms: 2000,
            card_ms: 3000,
            push_ms: 2000,
            confirm_ms: 3000,
            contact_ms: 2000,
        }
    }
}

impl DelayConfig {
    pub fn none() -> Self {
        Self {
            submit_ms: 0,
            card_ms: 0,
            push_ms: 0,
            confirm_ms: 0,
            contact_ms: 0,
        }
    }

    pub fn submit(&self) -> Duration {
        Duration::from_millis(self.submit_ms)
    }

    pub fn card(&self) -> Duration {
        Duration::from_millis(self.card_ms)
    }

    pub fn push(&self) -> Duration {
        Duration::from_millis(self.push_ms)
    }

    pub fn confirm(&self) -> Duration {
        Duration::from_millis(self.confirm_ms)
    }

    pub fn contact(&self) -> Duration {
        Duration::from_millis(self.contact_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentConfig {
    pub card_success_rate: f64,
    pub mobile_money_success_rate: f64,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            card_success_rate: 0.90,
            mobile_money_success_rate: 0.85,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    pub tax_rate: f64,
    pub card_fee_rate: f64,
    pub card_fee_fixed_usd: f64,
    pub ksh_per_usd: f64,
    pub mobile_money_fee_rate: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            tax_rate: 0.08,
            card_fee_rate: 0.029,
            card_fee_fixed_usd: 0.30,
            ksh_per_usd: 150.0,
            mobile_money_fee_rate: 0.01,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub json: bool,
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;
        Ok(toml::from_str(&processed_content)?)
    }

    /// 替換環境變數 (例如 ${CARD_SUCCESS_RATE})
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| BookingError::ConfigError {
            field: "environment".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// Zero latency everywhere; for tests and scripted runs.
    pub fn instant() -> Self {
        Self {
            delays: DelayConfig::none(),
            ..Self::default()
        }
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validate_range(
            "payments.card_success_rate",
            self.payments.card_success_rate,
            0.0,
            1.0,
        )?;
        validate_range(
            "payments.mobile_money_success_rate",
            self.payments.mobile_money_success_rate,
            0.0,
            1.0,
        )?;
        validate_range("pricing.tax_rate", self.pricing.tax_rate, 0.0, 1.0)?;
        validate_range("pricing.card_fee_rate", self.pricing.card_fee_rate, 0.0, 1.0)?;
        validate_range(
            "pricing.mobile_money_fee_rate",
            self.pricing.mobile_money_fee_rate,
            0.0,
            1.0,
        )?;

        if self.pricing.card_fee_fixed_usd < 0.0 {
            return Err(BookingError::ConfigError {
                field: "pricing.card_fee_fixed_usd".to_string(),
                message: "fixed fee cannot be negative".to_string(),
            });
        }
        if self.pricing.ksh_per_usd <= 0.0 {
            return Err(BookingError::ConfigError {
                field: "pricing.ksh_per_usd".to_string(),
                message: "exchange rate must be positive".to_string(),
            });
        }

        Ok(())
    }
}
