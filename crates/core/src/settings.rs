//! Store-level settings and the first-run setup wizard.

use serde::{Deserialize, Deserializer, Serialize};

use crate::types::CurrencyCode;

/// Errors from completing the setup wizard.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SetupError {
    /// Store name was blank or the table count was zero.
    #[error("please complete all fields: store name and at least one table are required")]
    IncompleteSetup,
}

/// Settings persisted under `nexus_settings`.
///
/// Missing fields take their defaults, and an unrecognized currency code
/// falls back to USD, so older or hand-edited documents still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub store_name: String,
    pub table_count: u32,
    pub setup_done: bool,
    pub language: String,
    #[serde(deserialize_with = "lenient_currency")]
    pub currency: CurrencyCode,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            store_name: "NEXUS POS".to_string(),
            table_count: 10,
            setup_done: false,
            language: "en".to_string(),
            currency: CurrencyCode::USD,
        }
    }
}

/// Values collected by the setup wizard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupForm {
    pub store_name: String,
    pub table_count: u32,
    pub language: String,
    pub currency: CurrencyCode,
}

impl Settings {
    /// Symbol shown in front of prices.
    #[must_use]
    pub const fn currency_symbol(&self) -> &'static str {
        self.currency.symbol()
    }

    /// Selectable table numbers, `1..=table_count`.
    pub fn tables(&self) -> impl Iterator<Item = u32> {
        1..=self.table_count
    }

    /// Apply the setup wizard and mark setup as done.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::IncompleteSetup`] if the store name is blank or
    /// the table count is zero; the settings are left untouched.
    pub fn complete_setup(&mut self, form: SetupForm) -> Result<(), SetupError> {
        let store_name = form.store_name.trim();
        if store_name.is_empty() || form.table_count == 0 {
            return Err(SetupError::IncompleteSetup);
        }

        self.store_name = store_name.to_string();
        self.table_count = form.table_count;
        self.language = form.language;
        self.currency = form.currency;
        self.setup_done = true;
        Ok(())
    }
}

fn lenient_currency<'de, D>(deserializer: D) -> Result<CurrencyCode, D::Error>
where
    D: Deserializer<'de>,
{
    let code = String::deserialize(deserializer)?;
    Ok(code.parse().unwrap_or_else(|_| {
        tracing::warn!(currency = %code, "Unknown currency in settings, using USD");
        CurrencyCode::USD
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form(store_name: &str, table_count: u32) -> SetupForm {
        SetupForm {
            store_name: store_name.to_string(),
            table_count,
            language: "fil".to_string(),
            currency: CurrencyCode::PHP,
        }
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.store_name, "NEXUS POS");
        assert_eq!(settings.table_count, 10);
        assert!(!settings.setup_done);
        assert_eq!(settings.currency_symbol(), "$");
    }

    #[test]
    fn test_complete_setup() {
        let mut settings = Settings::default();
        settings.complete_setup(form(" Cyber Diner ", 4)).unwrap();
        assert_eq!(settings.store_name, "Cyber Diner");
        assert_eq!(settings.table_count, 4);
        assert_eq!(settings.language, "fil");
        assert_eq!(settings.currency_symbol(), "₱");
        assert!(settings.setup_done);
        assert_eq!(settings.tables().collect::<Vec<_>>(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_complete_setup_requires_name_and_tables() {
        let mut settings = Settings::default();
        assert_eq!(
            settings.complete_setup(form("", 4)),
            Err(SetupError::IncompleteSetup)
        );
        assert_eq!(
            settings.complete_setup(form("Cyber Diner", 0)),
            Err(SetupError::IncompleteSetup)
        );
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_serde_uses_camel_case_keys() {
        let json = serde_json::to_value(Settings::default()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "storeName": "NEXUS POS",
                "tableCount": 10,
                "setupDone": false,
                "language": "en",
                "currency": "USD"
            })
        );
    }

    #[test]
    fn test_deserialize_fills_missing_fields() {
        let settings: Settings =
            serde_json::from_str(r#"{"storeName": "Retro Bar", "setupDone": true}"#).unwrap();
        assert_eq!(settings.store_name, "Retro Bar");
        assert!(settings.setup_done);
        assert_eq!(settings.table_count, 10);
        assert_eq!(settings.currency, CurrencyCode::USD);
    }

    #[test]
    fn test_deserialize_unknown_currency_falls_back() {
        let settings: Settings = serde_json::from_str(r#"{"currency": "BTC"}"#).unwrap();
        assert_eq!(settings.currency, CurrencyCode::USD);
        assert_eq!(settings.currency_symbol(), "$");
    }
}
