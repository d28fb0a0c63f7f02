//! Conversion from Tree-sitter points to diagnostic coordinates.
//!
//! Tree-sitter rows and columns count from zero and columns are byte
//! offsets. Diagnostics use one-based lines and columns, which is also what
//! `go vet` and `gofmt -l` report.

/// Returns the one-based `(line, column)` of `point`, saturating at
/// `u32::MAX`.
#[must_use]
pub(crate) fn point_to_one_based(point: tree_sitter::Point) -> (u32, u32) {
    (one_based(point.row), one_based(point.column))
}

fn one_based(zero_based: usize) -> u32 {
    u32::try_from(zero_based.saturating_add(1)).unwrap_or(u32::MAX)
}
