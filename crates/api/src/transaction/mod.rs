// Path: crates/api/src/transaction/mod.rs
//! Atomic execution of message handlers.

use crate::state::{StateAccess, StateOverlay};
use xchain_types::error::TransactionError;

pub mod context;

/// Runs `f` against a copy-on-write overlay of `state` and commits the
/// overlay's writes with a single `batch_apply` only if `f` succeeds.
///
/// A failing handler leaves `state` exactly as it was.
pub fn execute_atomic<T, F>(state: &mut dyn StateAccess, f: F) -> Result<T, TransactionError>
where
    F: FnOnce(&mut dyn StateAccess) -> Result<T, TransactionError>,
{
    let (out, (inserts, deletes)) = {
        let mut overlay = StateOverlay::new(&*state);
        match f(&mut overlay) {
            Ok(out) => (out, overlay.into_ordered_batch()),
            Err(e) => {
                tracing::debug!(
                    target: "xchain::tx",
                    pending = overlay.pending_len(),
                    error = %e,
                    "discarding overlay of failed handler"
                );
                return Err(e);
            }
        }
    };
    tracing::trace!(
        target: "xchain::tx",
        inserts = inserts.len(),
        deletes = deletes.len(),
        "committing handler writes"
    );
    state.batch_apply(&inserts, &deletes)?;
    Ok(out)
}
