//! User-facing progress notifications.
//!
//! The sink is an external collaborator (a toast system, a TUI, a log);
//! this layer only decides *what* to surface and when.

use alloy::primitives::TxHash;

/// Why a failure notification was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    /// No connected account, or wrong network.
    NotConnected,
    /// Local validation rejected the action.
    Validation,
    /// The user declined to sign.
    UserRejected,
    /// Submission or confirmation failed, or the receipt reported revert.
    TransactionFailed,
}

/// One progress event for one action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// The transaction is about to be signed and broadcast.
    Pending { action: &'static str },
    /// Confirmed on-chain.
    Success {
        action: &'static str,
        message: String,
        tx_hash: TxHash,
    },
    /// Terminal failure.
    Failure {
        action: &'static str,
        reason: FailureReason,
        message: String,
    },
}

/// Where progress events go.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Default sink: structured logs.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&self, notification: Notification) {
        match notification {
            Notification::Pending { action } => {
                tracing::info!(action, "Confirm the transaction in your wallet");
            }
            Notification::Success {
                action,
                message,
                tx_hash,
            } => {
                tracing::info!(action, tx_hash = %tx_hash, "{}", message);
            }
            Notification::Failure {
                action,
                reason,
                message,
            } => match reason {
                // Rejection is a user decision, not an alarm.
                FailureReason::UserRejected => {
                    tracing::info!(action, "{}", message);
                }
                _ => {
                    tracing::warn!(action, ?reason, "{}", message);
                }
            },
        }
    }
}
