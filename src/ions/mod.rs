//! # Ion Catalog
//!
//! Static registry of the ionization adducts a theoretical table can be
//! expanded with. Each entry is a linear mass transform: the neutral mass is
//! multiplied first and shifted second, so `[M+2H]2+` is `mass * 0.5 + 1.007276`.
//!
//! The catalog is a process-wide `static` slice and is never mutated; it can be
//! read from any number of threads without synchronization.
//!
//! The "as-provided" sentinel is just one more entry (multiplier 1, shift 0,
//! no charge) so the expander needs no special case for tables that already
//! hold final m/z values.

mod preset;
mod selection;

use serde::Serialize;
use std::fmt;

pub use preset::IonPreset;
pub use selection::{IonError, IonSelection};

/// Polarity class of an ion transform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IonCategory {
    /// Positive-mode adduct
    Cation,
    /// Negative-mode adduct
    Anion,
    /// Keep uploaded m/z values unchanged
    AsProvided,
}

impl fmt::Display for IonCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IonCategory::Cation => write!(f, "cation"),
            IonCategory::Anion => write!(f, "anion"),
            IonCategory::AsProvided => write!(f, "as-provided"),
        }
    }
}

/// An immutable mass transform from a neutral mass to the m/z of one ion form
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IonTransform {
    /// Display label, e.g. "[M+H]+"
    pub label: &'static str,
    /// Additive mass shift in Da, applied after the multiplier
    pub mass_shift: f64,
    /// Multiplier applied to the neutral mass (never zero)
    pub multiplier: f64,
    /// Charge annotation ("1+", "2-"), absent for the as-provided sentinel
    pub charge: Option<&'static str>,
    /// Polarity class
    pub category: IonCategory,
    /// Molecule lost in a neutral-loss ion, e.g. "H2O"
    pub neutral_loss: Option<&'static str>,
}

impl IonTransform {
    const fn new(
        label: &'static str,
        mass_shift: f64,
        multiplier: f64,
        charge: Option<&'static str>,
        category: IonCategory,
    ) -> Self {
        Self {
            label,
            mass_shift,
            multiplier,
            charge,
            category,
            neutral_loss: None,
        }
    }

    const fn cation(label: &'static str, mass_shift: f64, multiplier: f64, charge: &'static str) -> Self {
        Self::new(label, mass_shift, multiplier, Some(charge), IonCategory::Cation)
    }

    const fn anion(label: &'static str, mass_shift: f64, multiplier: f64, charge: &'static str) -> Self {
        Self::new(label, mass_shift, multiplier, Some(charge), IonCategory::Anion)
    }

    const fn with_neutral_loss(mut self, molecule: &'static str) -> Self {
        self.neutral_loss = Some(molecule);
        self
    }

    /// m/z of this ion form for a neutral (or as-provided) mass
    #[inline]
    pub fn apply(&self, mass: f64) -> f64 {
        mass * self.multiplier + self.mass_shift
    }

    /// Whether this entry is the keep-as-uploaded sentinel
    pub fn is_as_provided(&self) -> bool {
        self.category == IonCategory::AsProvided
    }
}

impl fmt::Display for IonTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (x{} {:+}",
            self.label, self.multiplier, self.mass_shift
        )?;
        if let Some(charge) = self.charge {
            write!(f, ", {}", charge)?;
        }
        write!(f, ")")
    }
}

/// Label of the as-provided sentinel
pub const AS_PROVIDED_LABEL: &str = "use uploaded theoretical m/z";

const PROTON: f64 = 1.007276;

/// Every ion transform known to the tool, in display order
pub static ION_CATALOG: &[IonTransform] = &[
    IonTransform::new(AS_PROVIDED_LABEL, 0.0, 1.0, None, IonCategory::AsProvided),
    // Cations
    IonTransform::cation("[M]+", -0.00054858026, 1.0, "1+"),
    IonTransform::cation("[M+H]+", PROTON, 1.0, "1+"),
    IonTransform::cation("[M+Na]+", 22.989218, 1.0, "1+"),
    IonTransform::cation("[M+K]+", 38.963158, 1.0, "1+"),
    IonTransform::cation("[M+NH4]+", 18.033823, 1.0, "1+"),
    IonTransform::cation("[M+2H]2+", PROTON, 0.5, "2+"),
    IonTransform::cation("[2M+H]+", PROTON, 2.0, "1+"),
    IonTransform::cation("[M+H+Na]2+", 11.998247, 0.5, "2+"),
    IonTransform::cation("[M+2Na]2+", 22.989218, 0.5, "2+"),
    IonTransform::cation("[M+3H]3+", PROTON, 0.3333333, "3+"),
    IonTransform::cation("[M-H2O+H]+", -17.003284, 1.0, "1+").with_neutral_loss("H2O"),
    IonTransform::cation("[M-H2O+Na]+", 4.978658, 1.0, "1+").with_neutral_loss("H2O"),
    // Anions
    IonTransform::anion("[M-H]-", -PROTON, 1.0, "1-"),
    IonTransform::anion("[2M-H]-", -PROTON, 2.0, "1-"),
    IonTransform::anion("[M-2H]2-", -PROTON, 0.5, "2-"),
    IonTransform::anion("[M+Cl]-", 34.969402, 1.0, "1-"),
    IonTransform::anion("[M+Br]-", 78.918885, 1.0, "1-"),
    IonTransform::anion("[M+HCOO]-", 44.998201, 1.0, "1-"),
    IonTransform::anion("[M+CH3COO]-", 59.013851, 1.0, "1-"),
    IonTransform::anion("[M+CF3COO]-", 112.985589, 1.0, "1-"),
];

/// Look up a transform by its label
pub fn find(label: &str) -> Option<&'static IonTransform> {
    ION_CATALOG.iter().find(|ion| ion.label == label)
}

/// The as-provided sentinel
pub fn as_provided() -> &'static IonTransform {
    &ION_CATALOG[0]
}

/// All positive-mode transforms
pub fn cations() -> impl Iterator<Item = &'static IonTransform> {
    by_category(IonCategory::Cation)
}

/// All negative-mode transforms
pub fn anions() -> impl Iterator<Item = &'static IonTransform> {
    by_category(IonCategory::Anion)
}

fn by_category(category: IonCategory) -> impl Iterator<Item = &'static IonTransform> {
    ION_CATALOG.iter().filter(move |ion| ion.category == category)
}
