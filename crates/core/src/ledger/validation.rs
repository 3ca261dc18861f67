//! Business rule validation for posting requests.

use kodi_shared::types::round_money;
use rust_decimal::Decimal;

use super::error::LedgerError;
use super::types::{PostingLine, PostingRequest, PostingTotals};

/// Validates the shape of a single line and returns it with rounded amounts.
///
/// # Errors
///
/// Returns `InvalidLine` if an amount is negative, both sides are set,
/// or both sides round to zero.
pub fn validate_line(index: usize, line: &PostingLine) -> Result<(Decimal, Decimal), LedgerError> {
    let invalid = |reason: &str| LedgerError::InvalidLine {
        index,
        reason: reason.to_string(),
    };

    if line.debit < Decimal::ZERO || line.credit < Decimal::ZERO {
        return Err(invalid("amounts must not be negative"));
    }

    let debit = round_money(line.debit);
    let credit = round_money(line.credit);

    match (debit.is_zero(), credit.is_zero()) {
        (true, true) => Err(invalid("either debit or credit must be non-zero")),
        (false, false) => Err(invalid("line must not carry both debit and credit")),
        _ => Ok((debit, credit)),
    }
}

/// Validates a posting request without touching storage.
///
/// Returns the rounded `(debit, credit)` pair of every line together with
/// the entry totals. Lines are rounded before summing, so the balance check
/// runs on the amounts that get stored.
///
/// # Errors
///
/// Returns the first validation failure found.
pub fn validate_request(
    request: &PostingRequest,
) -> Result<(Vec<(Decimal, Decimal)>, PostingTotals), LedgerError> {
    if request.correlation_id.trim().is_empty() {
        return Err(LedgerError::MissingCorrelationId);
    }
    if request.lines.is_empty() {
        return Err(LedgerError::NoLines);
    }

    let amounts = request
        .lines
        .iter()
        .enumerate()
        .map(|(index, line)| validate_line(index, line))
        .collect::<Result<Vec<_>, _>>()?;

    let totals = PostingTotals::new(
        amounts.iter().map(|(d, _)| *d).sum(),
        amounts.iter().map(|(_, c)| *c).sum(),
    );

    if !totals.is_balanced {
        return Err(LedgerError::UnbalancedEntry {
            debit: totals.debit,
            credit: totals.credit,
        });
    }

    Ok((amounts, totals))
}
