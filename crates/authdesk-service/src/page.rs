//! Cursor pagination over id-ordered listings.
//!
//! Pages are keyed by entity id. Record ids are canonical UUID strings,
//! whose lexicographic order matches the underlying byte order, so the
//! store can answer "strictly after this id" with a plain string
//! comparison. The repositories fetch one row beyond the page size; the
//! extra row only signals that another page exists and is never
//! returned.

use authdesk_core::{DeskError, DeskResult};
use uuid::Uuid;

pub const MIN_PAGE_SIZE: i64 = 1;
pub const MAX_PAGE_SIZE: i64 = 100;

/// A validated page request.
#[derive(Debug, Clone, Copy)]
pub struct PageRequest {
    /// Resume strictly after this id; `None` starts from the beginning.
    pub after: Option<Uuid>,
    pub size: usize,
}

impl PageRequest {
    /// Validates the raw page size and decodes the cursor. The cursor
    /// is opaque to clients but must parse back to a UUID.
    pub fn parse(cursor: Option<&str>, page_size: i64) -> DeskResult<Self> {
        if !(MIN_PAGE_SIZE..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(DeskError::InvalidPageSize { size: page_size });
        }
        let after = match cursor {
            Some(raw) => {
                Some(Uuid::parse_str(raw).map_err(|_| DeskError::InvalidCursor {
                    cursor: raw.to_string(),
                })?)
            }
            None => None,
        };
        Ok(Self {
            after,
            size: page_size as usize,
        })
    }

    /// Rows to request from the store: one past the page size, to
    /// detect whether a further page exists.
    pub fn probe_limit(&self) -> u32 {
        self.size as u32 + 1
    }
}

/// Clips a probe result down to the page and derives the next cursor.
///
/// The cursor is the id of the last *returned* item, present only when
/// the probe proved more rows exist.
pub fn clip<T>(mut rows: Vec<T>, size: usize, id_of: impl Fn(&T) -> Uuid) -> (Vec<T>, Option<String>) {
    let has_more = rows.len() > size;
    rows.truncate(size);
    let next_cursor = if has_more {
        rows.last().map(|row| id_of(row).to_string())
    } else {
        None
    };
    (rows, next_cursor)
}
