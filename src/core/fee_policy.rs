//! Fee computation
//!
//! Fees are a percentage of the requested amount, clamped to a `[min, max]`
//! band and rounded half-up to cents:
//!
//! | Operation  | Rate  | Min  | Max   |
//! |------------|-------|------|-------|
//! | Withdrawal | 1 %   | 1.00 | 10.00 |
//! | Transfer   | 0.5 % | 0.50 | 5.00  |
//! | Deposit    | -     | 0    | 0     |

use crate::types::TransactionKind;
use rust_decimal::{Decimal, RoundingStrategy};

/// Percentage fee with a floor and a ceiling
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeeBand {
    /// Fraction of the amount (`0.01` = 1 %)
    pub rate: Decimal,
    pub min: Decimal,
    pub max: Decimal,
}

impl FeeBand {
    /// Fee for `amount`: clamp(amount × rate, min, max), rounded half-up to 2 places
    pub fn apply(&self, amount: Decimal) -> Decimal {
        (amount * self.rate)
            .clamp(self.min, self.max)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }
}

/// Fee schedule per operation kind
///
/// Pure and side-effect free; the same amount always yields the same fee.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeePolicy {
    pub withdrawal: FeeBand,
    pub transfer: FeeBand,
}

impl Default for FeePolicy {
    fn default() -> Self {
        Self {
            withdrawal: FeeBand {
                rate: Decimal::new(1, 2),
                min: Decimal::new(100, 2),
                max: Decimal::new(1000, 2),
            },
            transfer: FeeBand {
                rate: Decimal::new(5, 3),
                min: Decimal::new(50, 2),
                max: Decimal::new(500, 2),
            },
        }
    }
}

impl FeePolicy {
    pub fn withdrawal_fee(&self, amount: Decimal) -> Decimal {
        self.withdrawal.apply(amount)
    }

    pub fn transfer_fee(&self, amount: Decimal) -> Decimal {
        self.transfer.apply(amount)
    }

    /// Fee for an operation of the given kind
    pub fn fee_for(&self, kind: TransactionKind, amount: Decimal) -> Decimal {
        match kind {
            TransactionKind::Deposit => Decimal::ZERO,
            TransactionKind::Withdrawal => self.withdrawal_fee(amount),
            TransactionKind::Transfer => self.transfer_fee(amount),
        }
    }
}
