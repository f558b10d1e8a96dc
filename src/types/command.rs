//! Ledger commands
//!
//! A [`LedgerCommand`] is one request against the ledger, as produced by an
//! input adapter (CSV replay, terminal, HTTP, ...). The processor routes each
//! variant to the matching operation.

use crate::types::account::{AccountNumber, AccountStatus, AccountType};
use rust_decimal::Decimal;

/// Request to open an account
#[derive(Debug, Clone, PartialEq)]
pub struct OpenAccount {
    pub number: AccountNumber,
    pub holder_name: String,
    pub account_type: AccountType,
    pub pin: String,
    pub initial_deposit: Decimal,
}

/// One request against the ledger
#[derive(Clone, PartialEq)]
pub enum LedgerCommand {
    Open(OpenAccount),
    Deposit {
        account: AccountNumber,
        amount: Decimal,
        description: Option<String>,
    },
    Withdraw {
        account: AccountNumber,
        pin: String,
        amount: Decimal,
        description: Option<String>,
    },
    Transfer {
        from: AccountNumber,
        pin: String,
        to: AccountNumber,
        amount: Decimal,
        description: Option<String>,
    },
    SetStatus {
        account: AccountNumber,
        status: AccountStatus,
    },
    ApplyInterest {
        account: AccountNumber,
    },
}

impl LedgerCommand {
    /// Account numbers the command reads or writes
    ///
    /// Used to group commands that must be replayed in order.
    pub fn accounts(&self) -> Vec<&str> {
        match self {
            LedgerCommand::Open(open) => vec![open.number.as_str()],
            LedgerCommand::Deposit { account, .. }
            | LedgerCommand::Withdraw { account, .. }
            | LedgerCommand::SetStatus { account, .. }
            | LedgerCommand::ApplyInterest { account } => vec![account.as_str()],
            LedgerCommand::Transfer { from, to, .. } => vec![from.as_str(), to.as_str()],
        }
    }

    /// Short operation name, as used in the CSV `op` column
    pub fn name(&self) -> &'static str {
        match self {
            LedgerCommand::Open(_) => "open",
            LedgerCommand::Deposit { .. } => "deposit",
            LedgerCommand::Withdraw { .. } => "withdraw",
            LedgerCommand::Transfer { .. } => "transfer",
            LedgerCommand::SetStatus { .. } => "status",
            LedgerCommand::ApplyInterest { .. } => "interest",
        }
    }
}

// PINs stay out of Debug output
impl std::fmt::Debug for LedgerCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LedgerCommand::Open(open) => f
                .debug_struct("Open")
                .field("number", &open.number)
                .field("holder_name", &open.holder_name)
                .field("account_type", &open.account_type)
                .field("initial_deposit", &open.initial_deposit)
                .finish_non_exhaustive(),
            LedgerCommand::Deposit {
                account, amount, ..
            } => f
                .debug_struct("Deposit")
                .field("account", account)
                .field("amount", amount)
                .finish_non_exhaustive(),
            LedgerCommand::Withdraw {
                account, amount, ..
            } => f
                .debug_struct("Withdraw")
                .field("account", account)
                .field("amount", amount)
                .finish_non_exhaustive(),
            LedgerCommand::Transfer {
                from, to, amount, ..
            } => f
                .debug_struct("Transfer")
                .field("from", from)
                .field("to", to)
                .field("amount", amount)
                .finish_non_exhaustive(),
            LedgerCommand::SetStatus { account, status } => f
                .debug_struct("SetStatus")
                .field("account", account)
                .field("status", status)
                .finish(),
            LedgerCommand::ApplyInterest { account } => f
                .debug_struct("ApplyInterest")
                .field("account", account)
                .finish(),
        }
    }
}
