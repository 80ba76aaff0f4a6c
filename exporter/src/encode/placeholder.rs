//! Placeholder text for multi-row parameterized inserts
//!
//! Each row shape gets its own [`RowPlaceholder`] instance with a fixed column
//! width. The generated text keeps the trailing comma of the last group; the
//! statement builder strips it.

/// Columns in one exemplar row: FilteredAttributes, TimeUnix, Value, SpanId, TraceId
pub const EXEMPLAR_ROW_WIDTH: usize = 5;

/// Placeholder generator for a row shape of `WIDTH` bound parameters
#[derive(Debug, Clone, Copy, Default)]
pub struct RowPlaceholder<const WIDTH: usize>;

impl<const WIDTH: usize> RowPlaceholder<WIDTH> {
    /// One group, e.g. `(?,?,?),` for a width of 3
    pub fn group() -> String {
        let mut group = String::with_capacity(2 * WIDTH + 2);
        group.push('(');
        for i in 0..WIDTH {
            if i > 0 {
                group.push(',');
            }
            group.push('?');
        }
        group.push_str("),");
        group
    }

    /// `row_count` groups concatenated; empty for zero rows
    pub fn repeat(row_count: usize) -> String {
        Self::group().repeat(row_count)
    }
}

/// Placeholder text for `row_count` exemplar-shaped rows.
///
/// `batch_placeholders(2)` is `"(?,?,?,?,?),(?,?,?,?,?),"`.
pub fn batch_placeholders(row_count: usize) -> String {
    RowPlaceholder::<EXEMPLAR_ROW_WIDTH>::repeat(row_count)
}
