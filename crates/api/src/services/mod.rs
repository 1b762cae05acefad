// Path: crates/api/src/services/mod.rs
//! The dispatch trait implemented by on-chain services.

use crate::lifecycle::OnEndBlock;
use crate::state::StateAccess;
use crate::transaction::context::TxContext;
use xchain_types::error::TransactionError;

/// The base trait for any service managed by the chain.
///
/// Methods are addressed as `"name@vN"` and take SCALE-encoded parameter
/// structs. Handlers are synchronous and run to completion before the next
/// call is dispatched.
pub trait BlockchainService: Send + Sync {
    /// A unique, static, lowercase string identifier for the service.
    fn id(&self) -> &str;

    /// Handles a dispatched call.
    ///
    /// The default implementation rejects every method.
    fn handle_service_call(
        &self,
        state: &mut dyn StateAccess,
        method: &str,
        params: &[u8],
        ctx: &TxContext,
    ) -> Result<(), TransactionError> {
        let _ = (state, params, ctx);
        Err(TransactionError::Unsupported(format!(
            "Service '{}' does not implement the method '{}'",
            self.id(),
            method
        )))
    }

    /// Attempts to downcast this service to an `OnEndBlock` trait object.
    fn as_on_end_block(&self) -> Option<&dyn OnEndBlock> {
        None
    }
}
