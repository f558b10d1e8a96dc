//! Ledger configuration
//!
//! Terms applied when an account is opened, and the fee schedule. The
//! defaults reproduce the bank's standard products:
//!
//! | Type     | Daily withdrawal | Daily transfer | Interest | Minimum balance |
//! |----------|------------------|----------------|----------|-----------------|
//! | Savings  | 5,000.00         | 10,000.00      | 2.5 %    | 100.00          |
//! | Checking | 10,000.00        | 50,000.00      | -        | -               |

use crate::core::FeePolicy;
use crate::types::{AccountKind, AccountType};
use rust_decimal::Decimal;

/// Terms attached to a newly opened account
#[derive(Debug, Clone, PartialEq)]
pub struct AccountTerms {
    pub daily_withdrawal_limit: Decimal,
    pub daily_transfer_limit: Decimal,
    /// Annual rate in percent; ignored for checking accounts
    pub interest_rate: Decimal,
    /// Advisory only; ignored for checking accounts
    pub minimum_balance: Decimal,
}

impl AccountTerms {
    pub fn savings() -> Self {
        Self {
            daily_withdrawal_limit: Decimal::new(500000, 2),
            daily_transfer_limit: Decimal::new(1000000, 2),
            interest_rate: Decimal::new(25, 1),
            minimum_balance: Decimal::new(10000, 2),
        }
    }

    pub fn checking() -> Self {
        Self {
            daily_withdrawal_limit: Decimal::new(1000000, 2),
            daily_transfer_limit: Decimal::new(5000000, 2),
            interest_rate: Decimal::ZERO,
            minimum_balance: Decimal::ZERO,
        }
    }
}

/// Configuration of a [`TransactionProcessor`](crate::core::TransactionProcessor)
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerConfig {
    pub savings: AccountTerms,
    pub checking: AccountTerms,
    pub fees: FeePolicy,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            savings: AccountTerms::savings(),
            checking: AccountTerms::checking(),
            fees: FeePolicy::default(),
        }
    }
}

impl LedgerConfig {
    /// Terms for the given account type
    pub fn terms_for(&self, account_type: AccountType) -> &AccountTerms {
        match account_type {
            AccountType::Savings => &self.savings,
            AccountType::Checking => &self.checking,
        }
    }

    /// Tagged account kind for the given type, carrying its terms
    pub fn kind_for(&self, account_type: AccountType) -> AccountKind {
        match account_type {
            AccountType::Savings => AccountKind::Savings {
                interest_rate: self.savings.interest_rate,
                minimum_balance: self.savings.minimum_balance,
            },
            AccountType::Checking => AccountKind::Checking,
        }
    }
}
