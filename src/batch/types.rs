//! Batch outcome types.

use serde::Serialize;
use uuid::Uuid;

use crate::entity::types::Entity;
use crate::ledger::types::WriteReceipt;

/// Result of one account's create-and-verify cycle.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum AccountOutcome {
    Success {
        receipt: WriteReceipt,
        entity: Entity,
    },
    Failure {
        error: String,
    },
}

impl AccountOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, AccountOutcome::Success { .. })
    }

    pub fn label(&self) -> &'static str {
        match self {
            AccountOutcome::Success { .. } => "success",
            AccountOutcome::Failure { .. } => "failure",
        }
    }
}

/// Outcome for the account at `index` of the input.
#[derive(Debug, Clone, Serialize)]
pub struct AccountReport {
    pub index: usize,
    pub address: String,
    #[serde(flatten)]
    pub outcome: AccountOutcome,
}

/// Per-account outcomes in input order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResult {
    pub run_id: Uuid,
    pub accounts: Vec<AccountReport>,
}

impl BatchResult {
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    pub fn succeeded(&self) -> usize {
        self.accounts.iter().filter(|a| a.outcome.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.len() - self.succeeded()
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed() == 0
    }
}
