// Path: crates/api/src/query.rs

//! Cursor-based pagination over prefix scans.
//!
//! Cursors are key suffixes relative to the scanned prefix, so a cursor
//! returned by one page can be passed back verbatim to fetch the next.

use crate::state::StateAccess;
use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Serialize};
use xchain_types::error::StateError;

/// Page size used when a request leaves `limit` at zero.
pub const DEFAULT_PAGE_LIMIT: u64 = 100;

/// Which slice of a collection to return.
#[derive(Encode, Decode, Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct PageRequest {
    /// Resume from this key suffix (inclusive). Takes precedence over `offset`.
    pub key: Option<Vec<u8>>,
    /// Number of entries to skip when no `key` is given.
    pub offset: u64,
    /// Maximum entries to return; zero means `DEFAULT_PAGE_LIMIT`.
    pub limit: u64,
    /// Also count every entry under the prefix.
    pub count_total: bool,
}

impl PageRequest {
    /// The first `limit` entries.
    pub fn first(limit: u64) -> Self {
        Self {
            limit,
            ..Default::default()
        }
    }

    /// The `limit` entries starting at cursor `key`.
    pub fn after(key: Vec<u8>, limit: u64) -> Self {
        Self {
            key: Some(key),
            limit,
            ..Default::default()
        }
    }
}

/// Where the next page starts.
#[derive(Encode, Decode, Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct PageResponse {
    /// Cursor of the first entry of the next page; `None` on the last page.
    pub next_key: Option<Vec<u8>>,
    /// Total entries under the prefix, when requested.
    pub total: Option<u64>,
}

/// Scans `prefix` and decodes one page of entries with `decode(key_suffix, value)`.
pub fn paginate<T, F>(
    state: &dyn StateAccess,
    prefix: &[u8],
    page: &PageRequest,
    mut decode: F,
) -> Result<(Vec<T>, PageResponse), StateError>
where
    F: FnMut(&[u8], &[u8]) -> Result<T, StateError>,
{
    let limit = match page.limit {
        0 => DEFAULT_PAGE_LIMIT as usize,
        n => n as usize,
    };

    let mut items = Vec::new();
    let mut next_key = None;
    let mut skipped = 0u64;
    let mut total = 0u64;

    for entry in state.prefix_scan(prefix)? {
        let (key, value) = entry?;
        total += 1;
        let suffix = key.get(prefix.len()..).unwrap_or_default();

        let before_cursor = match &page.key {
            Some(cursor) => suffix < cursor.as_slice(),
            None => {
                if skipped < page.offset {
                    skipped += 1;
                    true
                } else {
                    false
                }
            }
        };
        if before_cursor {
            continue;
        }

        if items.len() == limit {
            if next_key.is_none() {
                next_key = Some(suffix.to_vec());
            }
            if !page.count_total {
                break;
            }
            continue;
        }
        items.push(decode(suffix, &value)?);
    }

    Ok((
        items,
        PageResponse {
            next_key,
            total: page.count_total.then_some(total),
        },
    ))
}
