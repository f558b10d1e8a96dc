//! CSV format handling for ledger commands and output
//!
//! This module centralizes all CSV format concerns, providing:
//! - CsvRecord structure for deserialization of command rows
//! - Conversion from CSV records to [`LedgerCommand`]s
//! - Account and audit-log serialization
//!
//! # Input format
//!
//! ```text
//! op,account,to,amount,pin,kind,holder,status,description
//! open,SAV-1,,1000.00,1234,savings,Ada Lovelace,,
//! withdraw,SAV-1,,200.00,1234,,,,rent
//! transfer,SAV-1,CHK-1,50.00,1234,,,,
//! status,CHK-1,,,,,,suspended,
//! interest,SAV-1,,,,,,,
//! ```
//!
//! Columns a command does not use are left empty.
//!
//! All functions are pure (no file handling) for easy testing.

use crate::types::{
    Account, AccountStatus, AccountType, LedgerCommand, OpenAccount, Outcome, Transaction,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Write;
use std::str::FromStr;

/// Raw CSV row representation
///
/// Only `op` and `account` are required for every row; the other columns
/// depend on the operation.
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct CsvRecord {
    pub op: String,
    pub account: String,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub amount: Option<String>,
    #[serde(default)]
    pub pin: Option<String>,
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub holder: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_amount(record: &CsvRecord) -> Result<Option<Decimal>, String> {
    match record.amount.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => Decimal::from_str(raw)
            .map(Some)
            .map_err(|_| format!("Invalid amount '{}' for account {}", raw, record.account)),
        _ => Ok(None),
    }
}

fn require_amount(record: &CsvRecord) -> Result<Decimal, String> {
    parse_amount(record)?.ok_or_else(|| {
        format!(
            "{} on account {} requires an amount",
            record.op, record.account
        )
    })
}

/// Convert a CSV row into a ledger command
///
/// The operation name is matched case-insensitively. Business validation
/// (amount sign, PIN format, ...) is left to the processor, so that rejected
/// requests still reach the ledger; only rows that cannot form a command at
/// all are refused here.
///
/// # Errors
///
/// Returns a message for unknown operations, missing required columns and
/// unparseable amounts, account types or statuses.
pub fn convert_csv_record(record: CsvRecord) -> Result<LedgerCommand, String> {
    let amount = parse_amount(&record)?;
    let account = record.account.trim().to_string();
    let pin = record.pin.clone().unwrap_or_default();
    let description = non_empty(record.description.clone());

    let command = match record.op.to_lowercase().as_str() {
        "open" => {
            let kind = non_empty(record.kind.clone())
                .ok_or_else(|| format!("open of account {} requires a kind", account))?;
            let account_type = match kind.to_lowercase().as_str() {
                "savings" => AccountType::Savings,
                "checking" => AccountType::Checking,
                other => return Err(format!("Invalid account kind '{}'", other)),
            };
            LedgerCommand::Open(OpenAccount {
                number: account,
                holder_name: record.holder.clone().unwrap_or_default(),
                account_type,
                pin,
                initial_deposit: amount.unwrap_or(Decimal::ZERO),
            })
        }
        "deposit" => LedgerCommand::Deposit {
            amount: require_amount(&record)?,
            account,
            description,
        },
        "withdraw" | "withdrawal" => LedgerCommand::Withdraw {
            amount: require_amount(&record)?,
            account,
            pin,
            description,
        },
        "transfer" => {
            let to = non_empty(record.to.clone())
                .ok_or_else(|| format!("transfer from {} requires a destination", account))?;
            LedgerCommand::Transfer {
                amount: require_amount(&record)?,
                from: account,
                pin,
                to: to.trim().to_string(),
                description,
            }
        }
        "status" => {
            let status = non_empty(record.status.clone())
                .ok_or_else(|| format!("status change of {} requires a status", account))?;
            let status = match status.to_lowercase().as_str() {
                "active" => AccountStatus::Active,
                "suspended" => AccountStatus::Suspended,
                "closed" => AccountStatus::Closed,
                other => return Err(format!("Invalid account status '{}'", other)),
            };
            LedgerCommand::SetStatus { account, status }
        }
        "interest" => LedgerCommand::ApplyInterest { account },
        _ => return Err(format!("Invalid operation: '{}'", record.op)),
    };

    Ok(command)
}

/// Write account states as CSV, sorted by account number
///
/// Money columns are printed with two decimals.
pub fn write_accounts_csv(accounts: &[Account], output: &mut dyn Write) -> Result<(), String> {
    use csv::Writer;

    let mut writer = Writer::from_writer(output);

    writer
        .write_record([
            "account",
            "holder",
            "kind",
            "status",
            "balance",
            "withdrawn_today",
            "transferred_today",
        ])
        .map_err(|e| format!("Failed to write CSV header: {}", e))?;

    let mut sorted_accounts = accounts.to_vec();
    sorted_accounts.sort_by(|a, b| a.number.cmp(&b.number));

    for account in sorted_accounts {
        writer
            .write_record(&[
                account.number.clone(),
                account.holder_name.clone(),
                account.account_type().to_string(),
                account.status.to_string(),
                format!("{:.2}", account.balance),
                format!("{:.2}", account.withdrawn_today),
                format!("{:.2}", account.transferred_today),
            ])
            .map_err(|e| format!("Failed to write account record: {}", e))?;
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))?;

    Ok(())
}

/// Write the audit log as CSV, in ledger order
pub fn write_ledger_csv(
    transactions: &[Transaction],
    output: &mut dyn Write,
) -> Result<(), String> {
    use csv::Writer;

    let mut writer = Writer::from_writer(output);

    writer
        .write_record([
            "id",
            "timestamp",
            "kind",
            "amount",
            "fee",
            "from",
            "to",
            "outcome",
            "reason",
            "description",
        ])
        .map_err(|e| format!("Failed to write CSV header: {}", e))?;

    for tx in transactions {
        let (outcome, reason) = match &tx.outcome {
            Outcome::Successful => ("successful", String::new()),
            Outcome::Failed(reason) => ("failed", reason.to_string()),
        };
        writer
            .write_record(&[
                tx.id.to_string(),
                tx.timestamp.to_rfc3339(),
                tx.kind.to_string(),
                tx.amount.to_string(),
                format!("{:.2}", tx.fee),
                tx.from.clone().unwrap_or_default(),
                tx.to.clone().unwrap_or_default(),
                outcome.to_string(),
                reason,
                tx.description.clone(),
            ])
            .map_err(|e| format!("Failed to write ledger record: {}", e))?;
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))?;

    Ok(())
}
