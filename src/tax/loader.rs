//! File-based tax rules loader
//!
//! Reads country rules from data/rules/: `rules.json` holds the whole
//! `TaxRules`, `brackets.csv` optionally overrides its bracket table.

use log::{debug, info};
use std::fs::File;
use std::path::Path;

use super::brackets::{BracketTable, TaxBracket};
use super::rules::TaxRules;
use crate::error::{CalcError, CalcResult};

/// Default path to the rules directory
pub const DEFAULT_RULES_PATH: &str = "data/rules";

pub const RULES_FILE: &str = "rules.json";
pub const BRACKETS_FILE: &str = "brackets.csv";

/// Deserialize a `TaxRules` from a JSON file
pub fn load_rules_json(path: &Path) -> CalcResult<TaxRules> {
    let file = File::open(path)?;
    let rules: TaxRules = serde_json::from_reader(file)?;
    info!(
        "Loaded tax rules '{}' with {} brackets from {}",
        rules.name,
        rules.brackets.brackets().len(),
        path.display()
    );
    Ok(rules)
}

/// Load brackets from a CSV with header `upper_bound,rate`
///
/// An empty `upper_bound` (or `inf`) marks the open top bracket.
pub fn load_brackets_csv(path: &Path) -> CalcResult<BracketTable> {
    let file = File::open(path)?;
    read_brackets(file)
}

fn read_brackets<R: std::io::Read>(source: R) -> CalcResult<BracketTable> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(source);
    let mut brackets = Vec::new();

    for result in reader.records() {
        let record = result?;
        let bound = record.get(0).unwrap_or_default();
        let rate = record.get(1).unwrap_or_default();

        let upper_bound = if bound.is_empty() || bound.eq_ignore_ascii_case("inf") {
            None
        } else {
            Some(parse_field(bound)?)
        };

        brackets.push(TaxBracket {
            upper_bound,
            rate: parse_field(rate)?,
        });
    }

    debug!("Read {} bracket rows", brackets.len());
    BracketTable::new(brackets)
}

fn parse_field(field: &str) -> CalcResult<f64> {
    field.parse().map_err(|_| CalcError::Parse {
        input: field.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_brackets_with_open_top() {
        let csv = "upper_bound,rate\n100000,0.1\n,0.2\n";
        let table = read_brackets(csv.as_bytes()).unwrap();
        assert_eq!(table.brackets()[0], TaxBracket::up_to(100_000.0, 0.1));
        assert_eq!(table.brackets()[1], TaxBracket::open(0.2));
    }

    #[test]
    fn test_inf_marker_and_whitespace() {
        let csv = "upper_bound,rate\n 5000 , 0\n INF , 0.3\n";
        let table = read_brackets(csv.as_bytes()).unwrap();
        assert_eq!(table.brackets()[1].upper_bound, None);
    }

    #[test]
    fn test_bad_number_is_parse_error() {
        let csv = "upper_bound,rate\nabc,0.1\n,0.2\n";
        assert!(matches!(read_brackets(csv.as_bytes()), Err(CalcError::Parse { .. })));
    }

    #[test]
    fn test_table_shape_is_validated() {
        let csv = "upper_bound,rate\n100,0.1\n50,0.2\n,0.3\n";
        assert!(matches!(
            read_brackets(csv.as_bytes()),
            Err(CalcError::InvalidBracketTable(_))
        ));
    }

    #[test]
    fn test_load_shipped_files_agree() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join(DEFAULT_RULES_PATH);
        let from_json = load_rules_json(&dir.join(RULES_FILE)).unwrap();
        let from_csv = load_brackets_csv(&dir.join(BRACKETS_FILE)).unwrap();
        assert_eq!(from_json.brackets, from_csv);
    }
}
