//! Normalized record types for both feeds
//!
//! Records are created by the normalizers in `core` and live only for the
//! duration of one reconciliation run.

use super::error::ReconcileError;
use super::sheet::CellValue;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::fmt;

/// Partner identifier shared by both feeds
pub type PartnerPin = String;

/// Source columns carried forward verbatim, keyed by header name
pub type Fields = BTreeMap<String, CellValue>;

/// The two datasets being reconciled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Feed {
    Statement,
    Settlement,
}

impl fmt::Display for Feed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Feed::Statement => write!(f, "statement"),
            Feed::Settlement => write!(f, "settlement"),
        }
    }
}

/// A Statement row after normalization
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedStatementRecord {
    /// Partner PIN extracted from column D
    pub partner_pin: PartnerPin,

    /// 1-based row in the original sheet
    pub source_row: usize,

    /// Settled amount from column L ("Settle.Amt"), when numeric
    pub settle_amount: Option<Decimal>,

    /// Every source column, keyed by the header row's names
    pub fields: Fields,

    /// Set by the duplicate tagger when the PIN repeats within the Statement feed
    pub is_duplicate: bool,
}

/// A Settlement row after normalization
///
/// `amount_usd` is derived once from `payout_round_amt / api_rate` in
/// [`NormalizedSettlementRecord::new`]; the three amounts are read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedSettlementRecord {
    /// Partner PIN read from the PIN column
    pub partner_pin: PartnerPin,

    /// 1-based row in the original sheet
    pub source_row: usize,

    /// Every source column, keyed by header name
    pub fields: Fields,

    /// Set by the duplicate tagger when the PIN repeats within the Settlement feed
    pub is_duplicate: bool,

    payout_round_amt: Decimal,
    api_rate: Decimal,
    amount_usd: Decimal,
}

impl NormalizedSettlementRecord {
    /// Create a record, deriving `amount_usd`
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::Computation`] when `api_rate` is zero or the
    /// division overflows.
    pub fn new(
        partner_pin: PartnerPin,
        source_row: usize,
        payout_round_amt: Decimal,
        api_rate: Decimal,
        fields: Fields,
    ) -> Result<Self, ReconcileError> {
        if api_rate.is_zero() {
            return Err(ReconcileError::computation(source_row, "APIRate is zero"));
        }
        let amount_usd = payout_round_amt.checked_div(api_rate).ok_or_else(|| {
            ReconcileError::computation(
                source_row,
                &format!("PayoutRoundAmt {} / APIRate {} overflows", payout_round_amt, api_rate),
            )
        })?;

        Ok(Self {
            partner_pin,
            source_row,
            fields,
            is_duplicate: false,
            payout_round_amt,
            api_rate,
            amount_usd,
        })
    }

    pub fn payout_round_amt(&self) -> Decimal {
        self.payout_round_amt
    }

    pub fn api_rate(&self) -> Decimal {
        self.api_rate
    }

    /// `payout_round_amt / api_rate`
    pub fn amount_usd(&self) -> Decimal {
        self.amount_usd
    }
}
