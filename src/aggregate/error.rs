/// Errors that can occur while aggregating per-file results
///
/// These never leave [`aggregate_across_files`](super::aggregate_across_files);
/// they are folded into a [`MatchStatus`](super::MatchStatus) with an empty table.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AggregateError {
    /// No experimental files were supplied
    #[error("No experimental files were supplied")]
    NoFiles,

    /// Files were supplied but none produced a match
    #[error("None of the {0} experimental files produced a match")]
    NoMatches(usize),

    /// A row carried a NaN or infinite value
    #[error("Non-finite {field} in file '{file}' for molecule {molecule_id}")]
    NonFinite {
        /// Source file of the offending row
        file: String,
        /// Molecule id of the offending row
        molecule_id: u32,
        /// Which value was non-finite
        field: &'static str,
    },
}
