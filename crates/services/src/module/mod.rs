// Path: crates/services/src/module/mod.rs
//! The `crosschain` service: decodes method parameters and runs each
//! handler atomically against the host state.

use crate::genesis::init_genesis;
use crate::nonce::{allocate_range, finalize_nonce};
use crate::observer::ballot::prune_finalized_ballots;
use crate::observer::mapper::is_observer_for_chain;
use crate::observer::node_account::set_node_keys;
use crate::observer::observation::vote_on_observation;
use crate::observer::update::update_observer;
use crate::observer::update_crosschain_flags;
use crate::store::load;
use crate::tss::{add_blame_vote, begin_migration, complete_migration, request_keygen, vote_tss};
use parity_scale_codec::Decode;
use std::sync::Arc;
use xchain_api::lifecycle::OnEndBlock;
use xchain_api::oracle::{PolicyOracle, StaticPolicyOracle, ValidatorStatusOracle};
use xchain_api::services::BlockchainService;
use xchain_api::state::StateAccess;
use xchain_api::transaction::context::TxContext;
use xchain_api::transaction::execute_atomic;
use xchain_types::app::{
    AddBlameVoteParams, AllocateNoncesParams, BeginMigrationParams, ChainId,
    CompleteMigrationParams, FinalizeNonceParams, ObserverParams, RequestKeygenParams,
    SetNodeKeysParams, UpdateCrosschainFlagsParams, UpdateObserverParams, VoteObservationParams,
    VoteTssParams,
};
use xchain_types::codec;
use xchain_types::config::{CoreConfig, GenesisState};
use xchain_types::error::{ObserverError, StateError, TransactionError};
use xchain_types::keys::OBSERVER_PARAMS_KEY;

#[cfg(test)]
mod tests;

/// The observer, nonce, and TSS message handlers behind one service id.
pub struct CrosschainService {
    validators: Arc<dyn ValidatorStatusOracle>,
    policies: Arc<dyn PolicyOracle>,
}

impl CrosschainService {
    pub fn new(validators: Arc<dyn ValidatorStatusOracle>, policies: Arc<dyn PolicyOracle>) -> Self {
        Self {
            validators,
            policies,
        }
    }

    /// Builds the service with the admin policies listed in `config`.
    pub fn from_config(config: &CoreConfig, validators: Arc<dyn ValidatorStatusOracle>) -> Self {
        let policies = StaticPolicyOracle::from_policies(&config.admin_policies);
        Self::new(validators, Arc::new(policies))
    }

    /// Imports `genesis` atomically.
    pub fn init_genesis(
        &self,
        state: &mut dyn StateAccess,
        genesis: &GenesisState,
    ) -> Result<(), TransactionError> {
        execute_atomic(state, |s| init_genesis(s, genesis))
    }

    fn decode<T: Decode>(params: &[u8]) -> Result<T, TransactionError> {
        codec::from_bytes_canonical(params).map_err(TransactionError::Deserialization)
    }

    fn ensure_observer(
        state: &dyn StateAccess,
        chain_id: ChainId,
        ctx: &TxContext,
    ) -> Result<(), TransactionError> {
        if !is_observer_for_chain(state, chain_id, &ctx.signer_account_id)? {
            return Err(ObserverError::NotObserver {
                chain_id,
                address: ctx.signer_account_id,
            }
            .into());
        }
        Ok(())
    }
}

impl BlockchainService for CrosschainService {
    fn id(&self) -> &str {
        "crosschain"
    }

    fn as_on_end_block(&self) -> Option<&dyn OnEndBlock> {
        Some(self)
    }

    fn handle_service_call(
        &self,
        state: &mut dyn StateAccess,
        method: &str,
        params: &[u8],
        ctx: &TxContext,
    ) -> Result<(), TransactionError> {
        log::debug!(
            "crosschain: {} from {} at height {}",
            method,
            ctx.signer_account_id,
            ctx.block_height
        );
        match method {
            "update_observer@v1" => {
                let p: UpdateObserverParams = Self::decode(params)?;
                execute_atomic(state, |s| {
                    update_observer(
                        s,
                        self.validators.as_ref(),
                        self.policies.as_ref(),
                        ctx,
                        &p.old_observer_address,
                        &p.new_observer_address,
                        p.update_reason,
                    )
                })
            }
            "set_node_keys@v1" => {
                let p: SetNodeKeysParams = Self::decode(params)?;
                execute_atomic(state, |s| {
                    set_node_keys(s, &ctx.signer_account_id, p.pubkey_set).map(|_| ())
                })
            }
            "vote_observation@v1" => {
                let p: VoteObservationParams = Self::decode(params)?;
                execute_atomic(state, |s| {
                    vote_on_observation(s, ctx, p.chain_id, p.observation_type, &p.digest, p.vote)
                        .map(|_| ())
                })
            }
            "update_crosschain_flags@v1" => {
                let p: UpdateCrosschainFlagsParams = Self::decode(params)?;
                execute_atomic(state, |s| {
                    update_crosschain_flags(s, self.policies.as_ref(), ctx, p.flags)
                })
            }
            "allocate_nonces@v1" => {
                let p: AllocateNoncesParams = Self::decode(params)?;
                execute_atomic(state, |s| {
                    Self::ensure_observer(s, p.chain_id, ctx)?;
                    allocate_range(s, p.chain_id, &p.tss_pubkey, p.count).map(|_| ())
                })
            }
            "finalize_nonce@v1" => {
                let p: FinalizeNonceParams = Self::decode(params)?;
                execute_atomic(state, |s| {
                    Self::ensure_observer(s, p.chain_id, ctx)?;
                    finalize_nonce(s, ctx, p.chain_id, p.nonce, &p.cctx_index).map(|_| ())
                })
            }
            "request_keygen@v1" => {
                let p: RequestKeygenParams = Self::decode(params)?;
                execute_atomic(state, |s| {
                    request_keygen(s, self.policies.as_ref(), ctx, p.grantee_pubkeys, p.block_number)
                        .map(|_| ())
                })
            }
            "vote_tss@v1" => {
                let p: VoteTssParams = Self::decode(params)?;
                execute_atomic(state, |s| vote_tss(s, ctx, p).map(|_| ()))
            }
            "add_blame_vote@v1" => {
                let p: AddBlameVoteParams = Self::decode(params)?;
                execute_atomic(state, |s| add_blame_vote(s, ctx, p).map(|_| ()))
            }
            "begin_migration@v1" => {
                let p: BeginMigrationParams = Self::decode(params)?;
                execute_atomic(state, |s| {
                    begin_migration(s, self.policies.as_ref(), ctx, p.chain_id, p.migration_cctx_index)
                        .map(|_| ())
                })
            }
            "complete_migration@v1" => {
                let p: CompleteMigrationParams = Self::decode(params)?;
                execute_atomic(state, |s| {
                    complete_migration(s, self.policies.as_ref(), ctx, p.chain_id)
                })
            }
            _ => Err(TransactionError::Unsupported(format!(
                "Service '{}' does not implement the method '{}'",
                self.id(),
                method
            ))),
        }
    }
}

impl OnEndBlock for CrosschainService {
    fn on_end_block(&self, state: &mut dyn StateAccess, ctx: &TxContext) -> Result<(), StateError> {
        let Some(params) = load::<ObserverParams>(state, OBSERVER_PARAMS_KEY)? else {
            log::warn!("crosschain: no observer params at height {}, skipping ballot pruning", ctx.block_height);
            return Ok(());
        };
        if params.ballot_retention_blocks == 0 {
            return Ok(());
        }
        let cutoff = ctx.block_height.saturating_sub(params.ballot_retention_blocks);
        let pruned = prune_finalized_ballots(state, cutoff)?;
        if pruned > 0 {
            log::info!(
                "crosschain: pruned {} finalized ballots created before height {}",
                pruned,
                cutoff
            );
        }
        Ok(())
    }
}
