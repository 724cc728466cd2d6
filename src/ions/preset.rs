//! Named ion selections for common acquisition modes.

use std::fmt;
use std::str::FromStr;

use super::{as_provided, find, IonSelection};

/// Ion presets for common use cases.
///
/// A preset is only a starting selection; explicitly listed ions are merged
/// on top of it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IonPreset {
    /// Positive mode defaults.
    ///
    /// - `[M]+`, `[M+H]+`, `[M+Na]+`, `[2M+H]+`
    #[default]
    Positive,

    /// Negative mode defaults.
    ///
    /// - `[M-H]-`, `[2M-H]-`, `[M-2H]2-`, `[M+Cl]-`
    Negative,

    /// The uploaded table already holds final m/z values.
    AsProvided,

    /// Start from an empty selection.
    None,
}

const POSITIVE_DEFAULTS: [&str; 4] = ["[M]+", "[M+H]+", "[M+Na]+", "[2M+H]+"];
const NEGATIVE_DEFAULTS: [&str; 4] = ["[M-H]-", "[2M-H]-", "[M-2H]2-", "[M+Cl]-"];

impl IonPreset {
    /// Returns the selection this preset stands for.
    pub fn selection(&self) -> IonSelection {
        let mut selection = IonSelection::new();
        let labels: Vec<&str> = match self {
            IonPreset::Positive => POSITIVE_DEFAULTS.to_vec(),
            IonPreset::Negative => NEGATIVE_DEFAULTS.to_vec(),
            IonPreset::AsProvided => vec![as_provided().label],
            IonPreset::None => Vec::new(),
        };
        for label in labels {
            debug_assert!(find(label).is_some());
            // Preset labels come from the catalog itself
            let _ = selection.insert(label);
        }
        selection
    }

    /// Returns all available preset names.
    pub fn variants() -> &'static [&'static str] {
        &["positive", "negative", "as-provided", "none"]
    }
}

impl fmt::Display for IonPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IonPreset::Positive => write!(f, "positive"),
            IonPreset::Negative => write!(f, "negative"),
            IonPreset::AsProvided => write!(f, "as-provided"),
            IonPreset::None => write!(f, "none"),
        }
    }
}

impl FromStr for IonPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "positive" | "pos" | "default" => Ok(IonPreset::Positive),
            "negative" | "neg" => Ok(IonPreset::Negative),
            "as-provided" | "asprovided" | "orig" => Ok(IonPreset::AsProvided),
            "none" | "empty" => Ok(IonPreset::None),
            _ => Err(format!(
                "Unknown preset '{}'. Valid options: {}",
                s,
                IonPreset::variants().join(", ")
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_defaults() {
        let positive = IonPreset::default().selection();
        assert_eq!(positive.len(), 4);
        assert!(positive.contains("[M+H]+"));
        assert!(positive.contains("[2M+H]+"));
        assert!(!positive.contains("[M+K]+"));

        let negative = IonPreset::Negative.selection();
        assert!(negative.transforms().all(|ion| ion.charge.unwrap().ends_with('-')));
    }

    #[test]
    fn test_preset_from_str() {
        assert_eq!(IonPreset::from_str("positive").unwrap(), IonPreset::Positive);
        assert_eq!(IonPreset::from_str("NEG").unwrap(), IonPreset::Negative);
        assert_eq!(
            IonPreset::from_str("as-provided").unwrap(),
            IonPreset::AsProvided
        );
        assert!(IonPreset::from_str("invalid").is_err());
    }

    #[test]
    fn test_as_provided_preset() {
        let selection = IonPreset::AsProvided.selection();
        assert_eq!(selection.len(), 1);
        assert!(selection.transforms().all(|ion| ion.is_as_provided()));
        assert!(IonPreset::None.selection().is_empty());
    }
}
