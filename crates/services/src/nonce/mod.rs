// Path: crates/services/src/nonce/mod.rs
//! Outbound nonce tracker.
//!
//! Each chain has one monotonic counter (`ChainNonces.nonce`), at most one
//! outstanding window of reserved nonces per signer, and a binding from
//! every finalized nonce to the cross-chain transaction that used it. The
//! counter always sits on the lowest unbound nonce; bindings beyond it are
//! out-of-order finalizations that the counter sweeps up once the gap
//! closes.

use crate::observer::ensure_flow_enabled;
use crate::store::{exists, load, load_all, save};
use crate::tss::{get_fund_migrator, get_tss, previous_tss};
use xchain_api::state::StateAccess;
use xchain_api::transaction::context::TxContext;
use xchain_types::app::{ChainId, ChainNonces, NonceToCctx, ObservationType, PendingNonces};
use xchain_types::error::{NonceError, StateError, TransactionError, TssError};
use xchain_types::keys::{
    chain_nonces_key, nonce_to_cctx_chain_prefix, nonce_to_cctx_key, pending_nonces_chain_prefix,
    pending_nonces_key, CHAIN_NONCES_PREFIX,
};
use xchain_types::prelude::OptionExt;


pub fn get_chain_nonces(
    state: &dyn StateAccess,
    chain_id: ChainId,
) -> Result<Option<ChainNonces>, StateError> {
    load(state, &chain_nonces_key(chain_id))
}

pub fn set_chain_nonces(state: &mut dyn StateAccess, nonces: &ChainNonces) -> Result<(), StateError> {
    save(state, &chain_nonces_key(nonces.chain_id), nonces)
}

pub fn get_all_chain_nonces(state: &dyn StateAccess) -> Result<Vec<ChainNonces>, StateError> {
    load_all(state, CHAIN_NONCES_PREFIX)
}

pub fn get_pending_nonces(
    state: &dyn StateAccess,
    chain_id: ChainId,
    tss: &str,
) -> Result<Option<PendingNonces>, StateError> {
    load(state, &pending_nonces_key(chain_id, tss))
}

pub fn set_pending_nonces(
    state: &mut dyn StateAccess,
    pending: &PendingNonces,
) -> Result<(), StateError> {
    save(state, &pending_nonces_key(pending.chain_id, &pending.tss), pending)
}

/// Every signer's window on `chain_id`, drained ones included.
pub fn pending_nonces_by_chain(
    state: &dyn StateAccess,
    chain_id: ChainId,
) -> Result<Vec<PendingNonces>, StateError> {
    load_all(state, &pending_nonces_chain_prefix(chain_id))
}

pub fn get_nonce_to_cctx(
    state: &dyn StateAccess,
    chain_id: ChainId,
    nonce: u64,
) -> Result<Option<NonceToCctx>, StateError> {
    load(state, &nonce_to_cctx_key(chain_id, nonce))
}

pub fn set_nonce_to_cctx(state: &mut dyn StateAccess, binding: &NonceToCctx) -> Result<(), StateError> {
    save(state, &nonce_to_cctx_key(binding.chain_id, binding.nonce), binding)
}

/// Every binding on `chain_id`, in nonce order.
pub fn nonce_bindings_by_chain(
    state: &dyn StateAccess,
    chain_id: ChainId,
) -> Result<Vec<NonceToCctx>, StateError> {
    load_all(state, &nonce_to_cctx_chain_prefix(chain_id))
}

fn is_bound(state: &dyn StateAccess, chain_id: ChainId, nonce: u64) -> Result<bool, StateError> {
    exists(state, &nonce_to_cctx_key(chain_id, nonce))
}

/// The TSS allowed to sign for `chain_id`: the previous key while a fund
/// migration is in flight on the chain, the active key otherwise.
pub fn authorized_signer(
    state: &dyn StateAccess,
    chain_id: ChainId,
) -> Result<String, TransactionError> {
    if get_fund_migrator(state, chain_id)?.is_some() {
        let previous = previous_tss(state)?.required(TssError::NoPreviousTss)?;
        return Ok(previous.tss_pubkey);
    }
    Ok(get_tss(state)?.required(TssError::TssNotFound)?.tss_pubkey)
}

/// Reserves `count` nonces for `signer`, starting at the chain's counter.
///
/// Only one window may be outstanding per chain: the next one is handed out
/// once every nonce of the previous one is finalized.
pub fn allocate_range(
    state: &mut dyn StateAccess,
    chain_id: ChainId,
    signer: &str,
    count: u64,
) -> Result<PendingNonces, TransactionError> {
    if count == 0 {
        return Err(NonceError::EmptyRange.into());
    }
    ensure_flow_enabled(state, ObservationType::OutBoundTx)?;
    let chain = get_chain_nonces(state, chain_id)?.required(NonceError::ChainNoncesNotFound(chain_id))?;
    if authorized_signer(state, chain_id)? != signer {
        return Err(NonceError::SignerNotAuthorized {
            chain_id,
            tss: signer.to_string(),
        }
        .into());
    }
    if let Some(open) = pending_nonces_by_chain(state, chain_id)?
        .into_iter()
        .find(|p| !p.is_drained())
    {
        return Err(NonceError::RangeConflict {
            chain_id,
            nonce_low: open.nonce_low,
            nonce_high: open.nonce_high,
        }
        .into());
    }

    let nonce_high = chain.nonce.checked_add(count).ok_or_else(|| {
        TransactionError::Invalid(format!("nonce range of {} overflows at {}", count, chain.nonce))
    })?;
    let window = PendingNonces {
        chain_id,
        tss: signer.to_string(),
        nonce_low: chain.nonce,
        nonce_high,
    };
    set_pending_nonces(state, &window)?;
    log::debug!(
        "Allocated nonces [{}, {}) on chain {} to {}",
        window.nonce_low,
        window.nonce_high,
        chain_id,
        signer
    );
    Ok(window)
}

/// Binds `nonce` to `cctx_index` and advances the chain counter over every
/// contiguous bound nonce. Returns the updated counter.
pub fn finalize_nonce(
    state: &mut dyn StateAccess,
    ctx: &TxContext,
    chain_id: ChainId,
    nonce: u64,
    cctx_index: &str,
) -> Result<ChainNonces, TransactionError> {
    let mut chain = get_chain_nonces(state, chain_id)?.required(NonceError::ChainNoncesNotFound(chain_id))?;
    if is_bound(state, chain_id, nonce)? {
        return Err(NonceError::AlreadyBound { chain_id, nonce }.into());
    }
    let signer = authorized_signer(state, chain_id)?;
    let mut window = get_pending_nonces(state, chain_id, &signer)?
        .filter(|w| w.contains(nonce))
        .required(NonceError::PendingNoncesNotFound { chain_id, nonce })?;

    set_nonce_to_cctx(
        state,
        &NonceToCctx {
            chain_id,
            nonce,
            cctx_index: cctx_index.to_string(),
        },
    )?;

    if nonce == chain.nonce {
        while chain.nonce < window.nonce_high && is_bound(state, chain_id, chain.nonce)? {
            chain.nonce += 1;
        }
        window.nonce_low = chain.nonce;
        set_pending_nonces(state, &window)?;
    } else {
        log::debug!(
            "Nonce {} on chain {} finalized ahead of counter {}",
            nonce,
            chain_id,
            chain.nonce
        );
    }

    chain.finalized_height = ctx.block_height;
    if !chain.signers.contains(&ctx.signer_account_id) {
        chain.signers.push(ctx.signer_account_id);
    }
    set_chain_nonces(state, &chain)?;
    Ok(chain)
}

/// Hands `from`'s window on `chain_id` to `to` with the same bounds. A
/// drained window is dropped instead.
pub fn rekey_pending_nonces(
    state: &mut dyn StateAccess,
    chain_id: ChainId,
    from: &str,
    to: &str,
) -> Result<Option<PendingNonces>, StateError> {
    let Some(window) = get_pending_nonces(state, chain_id, from)? else {
        return Ok(None);
    };
    state.delete(&pending_nonces_key(chain_id, from))?;
    if window.is_drained() {
        return Ok(None);
    }
    let moved = PendingNonces {
        tss: to.to_string(),
        ..window
    };
    set_pending_nonces(state, &moved)?;
    log::info!(
        "Moved nonce window [{}, {}) on chain {} from {} to {}",
        moved.nonce_low,
        moved.nonce_high,
        chain_id,
        from,
        to
    );
    Ok(Some(moved))
}

/// Checks the consistency of `chain_id`'s counter, windows, and bindings.
pub fn check_nonce_invariants(
    state: &dyn StateAccess,
    chain_id: ChainId,
) -> Result<(), TransactionError> {
    let chain = get_chain_nonces(state, chain_id)?.required(NonceError::ChainNoncesNotFound(chain_id))?;
    let violated = |msg: String| -> TransactionError { NonceError::InvariantViolated(msg).into() };

    let mut ceiling = chain.nonce;
    for window in pending_nonces_by_chain(state, chain_id)? {
        if window.nonce_low > window.nonce_high {
            return Err(violated(format!(
                "window of {} is inverted: [{}, {})",
                window.tss, window.nonce_low, window.nonce_high
            )));
        }
        if !window.is_drained() && window.nonce_low != chain.nonce {
            return Err(violated(format!(
                "window of {} starts at {} but the counter is {}",
                window.tss, window.nonce_low, chain.nonce
            )));
        }
        ceiling = ceiling.max(window.nonce_high);
    }
    if is_bound(state, chain_id, chain.nonce)? {
        return Err(violated(format!("counter nonce {} is already bound", chain.nonce)));
    }
    if let Some(stray) = nonce_bindings_by_chain(state, chain_id)?
        .into_iter()
        .find(|b| b.nonce >= ceiling)
    {
        return Err(violated(format!(
            "nonce {} is bound beyond the reserved range ending at {}",
            stray.nonce, ceiling
        )));
    }
    Ok(())
}
