//! The transaction orchestration pipeline.
//!
//! Every user-initiated financial action runs the same sequence:
//! validate → approval gate → gas estimate (best-effort) → notify pending →
//! submit → await receipt → classify → refresh local state. Each step
//! short-circuits to a terminal failure notification; every terminal state
//! releases the slot so retry never needs a restart.

use alloy::primitives::{Bytes, U256};
use arc_swap::ArcSwapOption;
use std::sync::Arc;
use std::time::Duration;

use crate::actions::{ActionKind, MigrationPhase, PendingAction, WithdrawKind};
use crate::chain::types::Account;
use crate::chain::{swap, ChainError, ChainReader, ChainWriter, ContractSet, WriteCall};
use crate::config::loader::ConfigError;
use crate::config::schema::{ClientConfig, OrchestratorConfig};
use crate::estimation::{EstimationEngine, EstimationOutcome};
use crate::orchestrator::approval::{self, AllowanceStatus};
use crate::orchestrator::notify::{FailureReason, Notification, NotificationSink};
use crate::orchestrator::slot::{SlotGuard, SlotPhase, SlotRegistry, TerminalKind};
use crate::orchestrator::types::{is_user_rejection, OrchestratorError, TxOutcome};
use crate::resilience::{Debounce, Debouncer};
use crate::state::config_cache::ConfigCache;
use crate::state::dynamic::{DynamicState, StateStore};
use crate::state::migration::MigrationStatus;
use crate::state::static_config::StaticEscrowConfig;
use crate::tokens::KnownTokens;
use crate::validation::{parse_amount, validate, ValidationContext, ValidationError};

/// Default V3 fee tier for the reward → METRO autocompound path.
const AUTOCOMPOUND_FEE: u32 = 100;

/// Workflow controller for all user-initiated financial actions.
pub struct Orchestrator {
    reader: ChainReader,
    writer: ChainWriter,
    estimator: EstimationEngine,
    store: StateStore,
    cache: ConfigCache,
    slots: SlotRegistry,
    session: ArcSwapOption<Account>,
    sink: Arc<dyn NotificationSink>,
    contracts: ContractSet,
    tokens: KnownTokens,
    settings: OrchestratorConfig,
    validation_debounce: Debouncer,
    estimation_debounce: Debouncer,
}

impl Orchestrator {
    pub fn new(
        reader: ChainReader,
        writer: ChainWriter,
        sink: Arc<dyn NotificationSink>,
        config: &ClientConfig,
    ) -> Result<Self, ConfigError> {
        let contracts = ContractSet::from_config(&config.contracts)
            .map_err(|e| ConfigError::Validation(vec![e]))?;
        let tokens = KnownTokens::from_config(&config.tokens, config.chain.chain_id)
            .map_err(|e| ConfigError::Validation(vec![e]))?;

        let cache = if config.cache.path.is_empty() {
            ConfigCache::new(None, config.cache.version)
        } else {
            ConfigCache::load_from_file(&config.cache.path, config.cache.version).unwrap_or_else(
                |e| {
                    tracing::warn!(error = %e, "Static config cache unavailable, using memory only");
                    ConfigCache::new(None, config.cache.version)
                },
            )
        };

        let settings = config.orchestrator.clone();

        Ok(Self {
            estimator: EstimationEngine::new(reader.clone(), contracts),
            store: StateStore::new(),
            cache,
            slots: SlotRegistry::new(Duration::from_millis(settings.terminal_hold_ms)),
            session: ArcSwapOption::empty(),
            sink,
            contracts,
            tokens,
            validation_debounce: Debouncer::from_millis(settings.validation_debounce_ms),
            estimation_debounce: Debouncer::from_millis(settings.estimation_debounce_ms),
            settings,
            reader,
            writer,
        })
    }

    // ---- session -----------------------------------------------------------

    /// Adopt the account supplied by the wallet collaborator. Everything
    /// derived from the previous account is dropped.
    pub fn connect(&self, account: Account) {
        self.session.store(Some(Arc::new(account)));
        self.store.clear();
        self.estimator.invalidate();
        tracing::info!(address = %account.address, chain_id = account.chain_id, "Account connected");
    }

    /// Clear the session on disconnect or chain switch.
    pub fn disconnect(&self) {
        self.session.store(None);
        self.store.clear();
        self.estimator.invalidate();
        tracing::info!("Account disconnected");
    }

    pub fn account(&self) -> Option<Account> {
        self.session.load_full().map(|a| *a)
    }

    fn require_account(&self) -> Result<Account, OrchestratorError> {
        let account = self
            .session
            .load_full()
            .ok_or(OrchestratorError::NotConnected)?;
        if !account.is_on_chain(self.writer.chain_id()) {
            return Err(OrchestratorError::WrongNetwork {
                expected: self.writer.chain_id(),
                actual: account.chain_id,
            });
        }
        Ok(*account)
    }

    // ---- state access ------------------------------------------------------

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    pub fn estimator(&self) -> &EstimationEngine {
        &self.estimator
    }

    pub fn cache(&self) -> &ConfigCache {
        &self.cache
    }

    /// Current phase of an action's slot.
    pub fn slot_phase(&self, kind: ActionKind) -> SlotPhase {
        self.slots.phase(kind.slot())
    }

    /// Fetch a fresh dynamic snapshot for the connected account.
    pub async fn refresh_state(&self) -> Result<Arc<DynamicState>, OrchestratorError> {
        let account = self.require_account()?;
        Ok(self
            .store
            .refresh(&self.reader, &self.contracts, &self.tokens, &account)
            .await?)
    }

    /// Static escrow parameters, cache first.
    async fn static_config(&self) -> Result<StaticEscrowConfig, OrchestratorError> {
        if let Some(cached) = self.cache.get(&self.contracts.escrow) {
            tracing::debug!("Using cached static escrow config");
            return Ok(cached);
        }
        let fetched = StaticEscrowConfig::fetch(&self.reader, self.contracts.escrow).await?;
        self.cache.set(self.contracts.escrow, fetched.clone());
        Ok(fetched)
    }

    /// Drop the cached escrow parameters and refetch from the chain.
    pub async fn refresh_static_config(&self) -> Result<StaticEscrowConfig, OrchestratorError> {
        self.cache.clear();
        self.static_config().await
    }

    /// Migration availability derived from static config, fresh minted
    /// amounts, and the snapshot's block timestamp.
    pub async fn migration_status(&self) -> Result<MigrationStatus, OrchestratorError> {
        let account = self.require_account()?;
        let state = self.current_state(&account).await?;
        self.migration_from(&state).await
    }

    async fn migration_from(
        &self,
        state: &DynamicState,
    ) -> Result<MigrationStatus, OrchestratorError> {
        let config = self.static_config().await?;
        Ok(MigrationStatus::derive(
            &config,
            &state.minted,
            state.block.timestamp,
        ))
    }

    async fn current_state(
        &self,
        account: &Account,
    ) -> Result<Arc<DynamicState>, OrchestratorError> {
        if let Some(snapshot) = self.store.snapshot() {
            return Ok(snapshot);
        }
        Ok(self
            .store
            .refresh(&self.reader, &self.contracts, &self.tokens, account)
            .await?)
    }

    // ---- validation & preview ---------------------------------------------

    /// Validate an action against the current snapshot. `Ok(None)` means
    /// permitted.
    pub async fn validate_action(
        &self,
        action: &PendingAction,
    ) -> Result<Option<ValidationError>, OrchestratorError> {
        let account = self.require_account()?;
        let state = self.current_state(&account).await?;
        let ctx = self.validation_context(action, &state).await?;
        Ok(validate(action, &ctx))
    }

    /// Debounced [`Self::validate_action`] for keystroke-driven input.
    /// Superseded callers report no error; only the newest caller's result
    /// is authoritative.
    pub async fn validate_debounced(
        &self,
        action: &PendingAction,
    ) -> Result<Option<ValidationError>, OrchestratorError> {
        if self.validation_debounce.settle().await == Debounce::Skip {
            return Ok(None);
        }
        self.validate_action(action).await
    }

    /// Debounced, cancellable preview of what an action would produce.
    pub async fn preview(
        &self,
        action: &PendingAction,
    ) -> Result<EstimationOutcome, OrchestratorError> {
        if self.estimation_debounce.settle().await == Debounce::Skip {
            return Ok(EstimationOutcome::Superseded);
        }

        let account = self.require_account()?;
        let state = self.current_state(&account).await?;
        let ctx = self.validation_context(action, &state).await?;

        // Invalid or over-balance input never reaches the node.
        let Some(raw) = action.amount.as_deref() else {
            return Ok(EstimationOutcome::Unavailable);
        };
        let Ok(amount) = parse_amount(raw, ctx.decimals) else {
            return Ok(EstimationOutcome::Unavailable);
        };
        if amount > ctx.balance {
            return Ok(EstimationOutcome::Unavailable);
        }

        match action.kind {
            ActionKind::Stake { contributor } => {
                let use_contributor = contributor && state.is_contributor;
                Ok(self
                    .estimator
                    .estimate_stake(&account, amount, use_contributor)
                    .await)
            }
            ActionKind::Unstake => Ok(self.estimator.estimate_unstake(&account, amount).await),
            ActionKind::Migrate(phase) => {
                let migration = ctx
                    .migration
                    .ok_or(OrchestratorError::EstimationFailed)?;
                Ok(self
                    .estimator
                    .estimate_migrate(action.kind, migration.phase(phase), amount))
            }
            ActionKind::Autocompound => {
                let swap_data = self.autocompound_swap_data()?;
                Ok(self
                    .estimator
                    .estimate_autocompound(&account, swap_data)
                    .await)
            }
            _ => Ok(EstimationOutcome::Unavailable),
        }
    }

    async fn validation_context(
        &self,
        action: &PendingAction,
        state: &DynamicState,
    ) -> Result<ValidationContext, OrchestratorError> {
        let migration = match action.kind {
            ActionKind::Migrate(_) => Some(self.migration_from(state).await?),
            _ => None,
        };
        let (balance, decimals) = self.relevant_balance(action.kind, state);
        Ok(ValidationContext {
            decimals,
            balance,
            migration,
        })
    }

    /// The balance an action is checked against, and the decimals its typed
    /// amount is denominated in.
    fn relevant_balance(&self, kind: ActionKind, state: &DynamicState) -> (U256, u8) {
        match kind {
            ActionKind::Approve { token, .. } => (U256::MAX, self.decimals_of(token)),
            ActionKind::Migrate(MigrationPhase::Thor10M | MigrationPhase::Thor3M) => {
                (state.balances.thor, self.tokens.thor.decimals)
            }
            ActionKind::Migrate(MigrationPhase::YThor) => {
                (state.balances.ythor, self.tokens.ythor.decimals)
            }
            ActionKind::Stake { .. } => (state.balances.metro, self.tokens.metro.decimals),
            ActionKind::Unstake => (state.balances.xmetro, self.tokens.xmetro.decimals),
            ActionKind::Withdraw(kind) => (
                state.withdrawable.for_kind(kind),
                self.tokens.metro.decimals,
            ),
            ActionKind::Claim | ActionKind::Autocompound => {
                (state.claimable, self.tokens.reward.decimals)
            }
            ActionKind::SetAutocompound(_) => (U256::ZERO, 18),
        }
    }

    fn decimals_of(&self, token: alloy::primitives::Address) -> u8 {
        [
            &self.tokens.thor,
            &self.tokens.ythor,
            &self.tokens.metro,
            &self.tokens.xmetro,
            &self.tokens.reward,
        ]
        .into_iter()
        .find(|t| t.address == token)
        .map(|t| t.decimals)
        .unwrap_or(18)
    }

    // ---- submission --------------------------------------------------------

    /// Run the full pipeline for one action. One call at a time per slot;
    /// a second call while the first is in flight is rejected without any
    /// broadcast.
    pub async fn submit(&self, action: PendingAction) -> Result<TxOutcome, OrchestratorError> {
        let slot = action.kind.slot();
        let Some(mut guard) = self.slots.acquire(slot) else {
            tracing::debug!(slot, "Submission ignored, slot already pending");
            return Err(OrchestratorError::SlotBusy(slot));
        };
        let label = action.kind.label();

        // 1. Connected account on the right chain.
        let account = match self.require_account() {
            Ok(account) => account,
            Err(e) => {
                let message = match &e {
                    OrchestratorError::WrongNetwork { .. } => {
                        "Please switch to the correct network".to_string()
                    }
                    _ => "Please connect your wallet".to_string(),
                };
                self.fail(&mut guard, label, FailureReason::NotConnected, message);
                return Err(e);
            }
        };

        // 2. Re-run validation against current state.
        let state = match self.current_state(&account).await {
            Ok(state) => state,
            Err(e) => {
                self.fail(
                    &mut guard,
                    label,
                    FailureReason::TransactionFailed,
                    e.to_string(),
                );
                return Err(e);
            }
        };
        let ctx = match self.validation_context(&action, &state).await {
            Ok(ctx) => ctx,
            Err(e) => {
                self.fail(
                    &mut guard,
                    label,
                    FailureReason::TransactionFailed,
                    e.to_string(),
                );
                return Err(e);
            }
        };
        if let Some(error) = validate(&action, &ctx) {
            self.fail(&mut guard, label, FailureReason::Validation, error.to_string());
            return Err(error.into());
        }

        // 3. Approval gate for token-moving actions.
        let amount = self.action_amount(&action, ctx.decimals)?;
        if let Some(requirement) =
            approval::requirement(&action.kind, amount, &self.contracts, &self.tokens)
        {
            match approval::check(&self.reader, &requirement, account.address).await {
                Ok(AllowanceStatus::Sufficient) => {}
                Ok(AllowanceStatus::Insufficient { current }) => {
                    tracing::info!(
                        token = %requirement.token,
                        spender = %requirement.spender,
                        %current,
                        "Allowance insufficient, approve first"
                    );
                    // Not a failure: the UI swaps the action for an Approve.
                    return Err(OrchestratorError::ApprovalRequired {
                        token: requirement.token,
                        spender: requirement.spender,
                    });
                }
                Err(e) => {
                    let e = OrchestratorError::from(e);
                    self.fail(
                        &mut guard,
                        label,
                        FailureReason::TransactionFailed,
                        e.to_string(),
                    );
                    return Err(e);
                }
            }
        }

        guard.set_phase(SlotPhase::Estimating);
        let call = match self.build_call(&action, amount, &state, &account).await {
            Ok(call) => call,
            Err(e) => {
                self.fail(
                    &mut guard,
                    label,
                    FailureReason::TransactionFailed,
                    e.to_string(),
                );
                return Err(e);
            }
        };

        // 4. Gas estimation is best-effort; fall back to the configured
        // default limit rather than aborting.
        let gas_limit = self
            .writer
            .estimate_gas_limit(&call, &self.contracts)
            .await
            .unwrap_or(self.writer.config().fallback_gas_limit);

        // 5. Signature and broadcast.
        guard.set_phase(SlotPhase::AwaitingSignature);
        self.sink.notify(Notification::Pending { action: label });

        let tx_hash = match self.writer.send(&call, &self.contracts, gas_limit).await {
            Ok(hash) => hash,
            Err(e) => return Err(self.classify(&mut guard, label, e)),
        };

        // 6. Finality.
        guard.set_phase(SlotPhase::Pending);
        let receipt = match self.writer.wait_for_receipt(tx_hash).await {
            Ok(receipt) => receipt,
            Err(e) => return Err(self.classify(&mut guard, label, e)),
        };

        // 7/8. Classify the receipt and refresh local state on success.
        if receipt.status() {
            self.sink.notify(Notification::Success {
                action: label,
                message: self.success_message(&action),
                tx_hash,
            });
            self.estimator.invalidate();
            if let Err(e) = self
                .store
                .refresh(&self.reader, &self.contracts, &self.tokens, &account)
                .await
            {
                tracing::warn!(error = %e, "Post-confirmation state refresh failed");
            }
            guard.finish(TerminalKind::Confirmed);
            Ok(TxOutcome {
                hash: tx_hash,
                block_number: receipt.block_number,
            })
        } else {
            self.sink.notify(Notification::Failure {
                action: label,
                reason: FailureReason::TransactionFailed,
                message: "Transaction was not successful".to_string(),
            });
            guard.finish(TerminalKind::Reverted);
            Err(OrchestratorError::Reverted { hash: tx_hash })
        }
    }

    /// The replacement Approve action after an [`OrchestratorError::ApprovalRequired`].
    pub fn approval_for(&self, error: &OrchestratorError) -> Option<PendingAction> {
        match error {
            OrchestratorError::ApprovalRequired { token, spender } => {
                let requirement = approval::ApprovalRequirement {
                    token: *token,
                    spender: *spender,
                    amount: U256::MAX,
                };
                Some(approval::approve_action(
                    &requirement,
                    self.settings.max_approve,
                    self.decimals_of(*token),
                ))
            }
            _ => None,
        }
    }

    fn action_amount(
        &self,
        action: &PendingAction,
        decimals: u8,
    ) -> Result<U256, OrchestratorError> {
        if !action.kind.takes_amount() {
            return Ok(U256::ZERO);
        }
        // Approve in max mode grants everything regardless of the typed value.
        if matches!(action.kind, ActionKind::Approve { .. }) && self.settings.max_approve {
            return Ok(U256::MAX);
        }
        let raw = action
            .amount
            .as_deref()
            .ok_or(ValidationError::InvalidAmount)?;
        parse_amount(raw, decimals).map_err(|_| ValidationError::InvalidAmount.into())
    }

    async fn build_call(
        &self,
        action: &PendingAction,
        amount: U256,
        state: &DynamicState,
        account: &Account,
    ) -> Result<WriteCall, OrchestratorError> {
        let batch = U256::from(self.settings.withdraw_batch_limit);
        Ok(match action.kind {
            ActionKind::Approve { token, spender } => WriteCall::Approve {
                token,
                spender,
                value: amount,
            },
            ActionKind::Migrate(MigrationPhase::Thor10M) => WriteCall::MigrateThor10m { amount },
            ActionKind::Migrate(MigrationPhase::Thor3M) => WriteCall::MigrateThor3m { amount },
            ActionKind::Migrate(MigrationPhase::YThor) => WriteCall::MigrateYThor { amount },
            ActionKind::Stake { contributor } => {
                if contributor && state.is_contributor {
                    WriteCall::StakeContributor { amount }
                } else {
                    WriteCall::Stake { amount }
                }
            }
            ActionKind::Unstake => WriteCall::RequestUnstake { amount },
            ActionKind::Withdraw(WithdrawKind::Normal) => WriteCall::Withdraw {
                max_requests: batch,
            },
            ActionKind::Withdraw(WithdrawKind::Thor) => {
                WriteCall::WithdrawUnlockedThor { max_locks: batch }
            }
            ActionKind::Withdraw(WithdrawKind::YThor) => {
                WriteCall::WithdrawUnlockedYThor { max_locks: batch }
            }
            ActionKind::Withdraw(WithdrawKind::Contributor) => {
                WriteCall::WithdrawUnlockedContributor {
                    max_schedules: batch,
                }
            }
            ActionKind::Claim => WriteCall::ClaimRewards,
            ActionKind::Autocompound => {
                let swap_data = self.autocompound_swap_data()?;
                // Simulate first to price the swap, then floor the output by
                // the slippage tolerance.
                let estimated = match self
                    .estimator
                    .estimate_autocompound(account, swap_data.clone())
                    .await
                {
                    EstimationOutcome::Ready(result) => result.output,
                    _ => return Err(OrchestratorError::EstimationFailed),
                };
                WriteCall::Autocompound {
                    min_amount_out: apply_slippage(estimated, self.settings.slippage_bps),
                    swap_data,
                }
            }
            ActionKind::SetAutocompound(true) => WriteCall::EnableAutocompound,
            ActionKind::SetAutocompound(false) => WriteCall::DisableAutocompound,
        })
    }

    fn autocompound_swap_data(&self) -> Result<Bytes, OrchestratorError> {
        swap::encode_v3(
            &[self.tokens.reward.address, self.tokens.metro.address],
            &[AUTOCOMPOUND_FEE],
        )
        .map_err(|e| {
            tracing::error!(error = %e, "Autocompound swap path encoding failed");
            OrchestratorError::EstimationFailed
        })
    }

    fn success_message(&self, action: &PendingAction) -> String {
        let amount = action.amount.as_deref().unwrap_or_default();
        match action.kind {
            ActionKind::Approve { .. } => "Approval confirmed".to_string(),
            ActionKind::Migrate(MigrationPhase::YThor) => {
                format!("Successfully migrated {} yTHOR to METRO", amount)
            }
            ActionKind::Migrate(_) => format!("Successfully migrated {} THOR to METRO", amount),
            ActionKind::Stake { .. } => format!("Successfully staked {} METRO", amount),
            ActionKind::Unstake => {
                format!("Successfully requested unstake of {} xMETRO", amount)
            }
            ActionKind::Withdraw(kind) => {
                format!("Successfully withdrew METRO ({})", kind.label())
            }
            ActionKind::Claim => "Successfully claimed rewards".to_string(),
            ActionKind::Autocompound => "Successfully autocompounded rewards".to_string(),
            ActionKind::SetAutocompound(true) => {
                "Auto compound has been successfully enabled".to_string()
            }
            ActionKind::SetAutocompound(false) => {
                "Auto compound has been successfully disabled".to_string()
            }
        }
    }

    fn fail(
        &self,
        guard: &mut SlotGuard,
        label: &'static str,
        reason: FailureReason,
        message: String,
    ) {
        self.sink.notify(Notification::Failure {
            action: label,
            reason,
            message,
        });
        guard.finish(match reason {
            FailureReason::UserRejected => TerminalKind::Rejected,
            _ => TerminalKind::Failed,
        });
    }

    /// Split submission errors into a user declining versus everything else.
    fn classify(
        &self,
        guard: &mut SlotGuard,
        label: &'static str,
        error: ChainError,
    ) -> OrchestratorError {
        if is_user_rejection(&error) {
            self.fail(
                guard,
                label,
                FailureReason::UserRejected,
                "User rejected transaction".to_string(),
            );
            OrchestratorError::UserRejected
        } else {
            self.fail(
                guard,
                label,
                FailureReason::TransactionFailed,
                error.to_string(),
            );
            OrchestratorError::Chain(error)
        }
    }

    #[cfg(test)]
    pub(crate) fn slots(&self) -> &SlotRegistry {
        &self.slots
    }
}

/// Floor an amount by a basis-point slippage tolerance.
fn apply_slippage(amount: U256, bps: u64) -> U256 {
    amount * U256::from(10_000u64.saturating_sub(bps)) / U256::from(10_000u64)
}
