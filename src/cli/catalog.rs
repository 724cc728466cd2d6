use anyhow::Result;

use matchmass::ions::{anions, as_provided, cations, IonPreset, IonTransform};

/// List every ion transform, grouped by polarity
pub fn run() -> Result<()> {
    println!("Ion Catalog");
    println!("===========");
    println!();

    println!("Passthrough:");
    print_ion(as_provided());
    println!();

    println!("Cations:");
    cations().for_each(print_ion);
    println!();

    println!("Anions:");
    anions().for_each(print_ion);
    println!();

    println!("Presets: {}", IonPreset::variants().join(", "));
    Ok(())
}

fn print_ion(ion: &IonTransform) {
    let loss = ion
        .neutral_loss
        .map(|loss| format!("  (-{})", loss))
        .unwrap_or_default();
    println!(
        "  {:<30} {:>4}  m/z = M x {:<9} {:+.8}{}",
        ion.label,
        ion.charge.unwrap_or("-"),
        ion.multiplier,
        ion.mass_shift,
        loss
    );
}
