//! Database query functions organized by collection.
//!
//! Each collection exposes `load_all` / `replace_all` for whole-collection
//! access alongside the row-level functions the engine uses.

pub mod challenges;
pub mod check_ins;
pub mod comments;
pub mod follows;
pub mod likes;
pub mod users;

use rusqlite::types::Type;

/// Wrap a label parse failure as a column conversion error.
pub(crate) fn label_error(
    column: usize,
    err: yolo_types::ParseLabelError,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(err))
}

/// Read an optional integer column as `u64`.
pub(crate) fn opt_u64(row: &rusqlite::Row<'_>, column: usize) -> rusqlite::Result<Option<u64>> {
    Ok(row.get::<_, Option<i64>>(column)?.map(|v| v as u64))
}
