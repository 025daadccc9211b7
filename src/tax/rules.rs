//! Country tax rules: bracket table, VAT rate and social contribution rate

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::brackets::{BracketTable, TaxBracket};
use super::loader;
use crate::error::{CalcError, CalcResult};

/// Rates a country/locale supplies to the calculators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxRules {
    /// Display name, e.g. a country or tax year
    pub name: String,

    /// Standard VAT rate as a fraction
    pub vat_rate: f64,

    /// Flat employee social contribution rate as a fraction
    pub social_rate: f64,

    /// Income tax brackets
    pub brackets: BracketTable,
}

impl TaxRules {
    /// Built-in sample schedule used when no rules directory is given
    pub fn sample() -> Self {
        let brackets = vec![
            TaxBracket::up_to(12_570.0, 0.0),
            TaxBracket::up_to(50_270.0, 0.20),
            TaxBracket::up_to(125_140.0, 0.40),
            TaxBracket::open(0.45),
        ];

        Self {
            name: "Sample progressive schedule".to_string(),
            vat_rate: 0.20,
            social_rate: 0.08,
            brackets: BracketTable::new_unchecked(brackets),
        }
    }

    /// Load `rules.json` from `dir`, replacing its brackets with
    /// `brackets.csv` when that file is present
    pub fn load_from(dir: &Path) -> CalcResult<Self> {
        let mut rules = loader::load_rules_json(&dir.join(loader::RULES_FILE))?;

        let csv_path = dir.join(loader::BRACKETS_FILE);
        if csv_path.exists() {
            rules.brackets = loader::load_brackets_csv(&csv_path)?;
        }

        rules.validate()?;
        Ok(rules)
    }

    /// Load from [`loader::DEFAULT_RULES_PATH`]
    pub fn load_default() -> CalcResult<Self> {
        Self::load_from(Path::new(loader::DEFAULT_RULES_PATH))
    }

    /// Check the flat rates; bracket rates are checked on construction
    pub fn validate(&self) -> CalcResult<()> {
        for rate in [self.vat_rate, self.social_rate] {
            if !(0.0..=1.0).contains(&rate) {
                return Err(CalcError::RateOutOfRange { rate });
            }
        }
        Ok(())
    }
}

impl Default for TaxRules {
    fn default() -> Self {
        Self::sample()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn shipped_rules_dir() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join(loader::DEFAULT_RULES_PATH)
    }

    #[test]
    fn test_sample_is_valid() {
        let rules = TaxRules::sample();
        assert!(rules.validate().is_ok());
        assert_eq!(rules.brackets.brackets().len(), 4);
    }

    #[test]
    fn test_load_shipped_rules() {
        let rules = TaxRules::load_from(&shipped_rules_dir()).unwrap();
        assert_eq!(rules, TaxRules::sample());
    }

    #[test]
    fn test_load_default_reads_shipped_rules() {
        // cargo runs unit tests from the package root
        let rules = TaxRules::load_default().unwrap();
        assert_eq!(rules, TaxRules::sample());
    }

    #[test]
    fn test_validate_rejects_bad_vat_rate() {
        let mut rules = TaxRules::sample();
        rules.vat_rate = 1.2;
        assert!(matches!(rules.validate(), Err(CalcError::RateOutOfRange { .. })));
    }

    #[test]
    fn test_missing_directory_is_io_error() {
        let err = TaxRules::load_from(Path::new("does/not/exist")).unwrap_err();
        assert!(matches!(err, CalcError::Io(_)));
    }
}
