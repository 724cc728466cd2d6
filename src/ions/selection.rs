use serde::Serialize;

use super::{find, IonTransform, ION_CATALOG};

/// Errors raised while building an ion selection
#[derive(Debug, thiserror::Error)]
pub enum IonError {
    /// Label that is not part of the catalog
    #[error("Unknown ion '{0}'. Run `matchmass ions` to list the catalog")]
    UnknownIon(String),
}

/// The set of ion transforms a user ticked for expansion.
///
/// Transforms are always yielded in catalog order regardless of the order they
/// were added in, so two selections of the same labels expand identically.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IonSelection {
    labels: Vec<&'static str>,
}

impl IonSelection {
    /// Empty selection
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a selection from labels, rejecting unknown ones
    pub fn from_labels<I, S>(labels: I) -> Result<Self, IonError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut selection = Self::new();
        for label in labels {
            selection.insert(label.as_ref())?;
        }
        Ok(selection)
    }

    /// Tick one ion by label
    pub fn insert(&mut self, label: &str) -> Result<(), IonError> {
        let ion = find(label).ok_or_else(|| IonError::UnknownIon(label.to_string()))?;
        if !self.labels.contains(&ion.label) {
            self.labels.push(ion.label);
        }
        Ok(())
    }

    /// Merge another selection into this one
    pub fn extend(&mut self, other: &IonSelection) {
        for label in &other.labels {
            if !self.labels.contains(label) {
                self.labels.push(label);
            }
        }
    }

    /// Whether `label` is ticked
    pub fn contains(&self, label: &str) -> bool {
        self.labels.iter().any(|l| *l == label)
    }

    /// Number of ticked ions
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// True when nothing is ticked
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Selected transforms in catalog order
    pub fn transforms(&self) -> impl Iterator<Item = &'static IonTransform> + '_ {
        ION_CATALOG
            .iter()
            .filter(move |ion| self.contains(ion.label))
    }
}
