#![no_main]

use libfuzzer_sys::fuzz_target;
use matchmass::io::{peak_list_from_reader, TableFormat};
use matchmass::ions::IonPreset;
use matchmass::matching::{match_file, summarize_file};
use matchmass::theoretical::{annotate_ambiguity, expand_theoretical_table, BaseMolecule};

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes either parse into a peak list or fail with an error,
    // and whatever parses must match without panicking
    let table = annotate_ambiguity(
        expand_theoretical_table(
            &[
                BaseMolecule::new("a", 300.0),
                BaseMolecule::new("b", 300.001),
            ],
            &IonPreset::Positive.selection(),
        ),
        0.01,
    );

    for format in [TableFormat::Csv, TableFormat::Tsv] {
        if let Ok(peaks) = peak_list_from_reader(data, format, "fuzz", "fuzz") {
            let rows = match_file(&peaks, 0.0, 0.01, &table);
            let _ = summarize_file(rows, table.max_molecule_id());
        }
    }
});
