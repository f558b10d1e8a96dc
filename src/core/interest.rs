//! Interest calculation for savings accounts
//!
//! Monthly interest = balance × annual rate / 100 / 12. The percentage step
//! is rounded half-up to 4 places, the monthly figure to cents. Only active
//! savings accounts with a positive rate earn interest. A balance too large
//! to multiply by the rate yields `ArithmeticOverflow`.

use crate::types::{Account, LedgerError};
use rust_decimal::{Decimal, RoundingStrategy};

pub struct InterestCalculator;

impl InterestCalculator {
    /// Interest due for one month, zero if the account does not earn any
    pub fn monthly_interest(account: &Account) -> Result<Decimal, LedgerError> {
        let rate = account.kind.interest_rate();
        if !account.is_savings() || !account.is_active() || rate <= Decimal::ZERO {
            return Ok(Decimal::ZERO);
        }

        let yearly = account
            .balance
            .checked_mul(rate)
            .ok_or_else(|| LedgerError::arithmetic_overflow("interest", &account.number))?
            / Decimal::ONE_HUNDRED;
        let yearly = yearly.round_dp_with_strategy(4, RoundingStrategy::MidpointAwayFromZero);
        Ok((yearly / Decimal::from(12))
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
    }

    /// Interest over `months` months at the current balance (no compounding)
    pub fn interest_for_period(account: &Account, months: u32) -> Result<Decimal, LedgerError> {
        Self::monthly_interest(account)?
            .checked_mul(Decimal::from(months))
            .ok_or_else(|| LedgerError::arithmetic_overflow("interest", &account.number))
    }
}
