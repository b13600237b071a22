//! Pairwise settlement aggregation shared by every format.
//!
//! Each format only says what one ordered pair owes each other, as signed line
//! items. [`settle_pairs`] turns those into payer/payee records, so every
//! format gets the zero-sum property from the same place.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::player::{PlayerId, unordered_pairs};

/// Amounts smaller than this are treated as zero.
pub const MONEY_EPSILON: f64 = 1e-9;

/// One contribution to a settlement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub label: String,
    pub amount: f64,
}

/// Net money owed from one player to another for a round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    pub payer: PlayerId,
    pub payee: PlayerId,
    /// Always positive.
    pub amount: f64,
    /// Contributions signed from the payee's side; they sum to `amount`.
    pub breakdown: Vec<LineItem>,
}

/// Signed contributions between an ordered pair. Positive amounts are owed
/// to the first player of the pair.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PairLedger {
    items: Vec<LineItem>,
}

impl PairLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a contribution; zero amounts are dropped.
    pub fn push(&mut self, label: impl Into<String>, amount: f64) {
        if amount.abs() >= MONEY_EPSILON {
            self.items.push(LineItem {
                label: label.into(),
                amount,
            });
        }
    }

    pub fn net(&self) -> f64 {
        self.items.iter().map(|item| item.amount).sum()
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }
}

/// Build one settlement per pair whose ledger nets to a non-zero amount.
///
/// `ledger_for(a, b)` is called once for every unordered pair in `ids` order.
pub fn settle_pairs<F>(ids: &[PlayerId], mut ledger_for: F) -> Vec<Settlement>
where
    F: FnMut(PlayerId, PlayerId) -> PairLedger,
{
    let mut settlements = Vec::new();
    for (first, second) in unordered_pairs(ids) {
        let ledger = ledger_for(first, second);
        let net = ledger.net();
        if net.abs() < MONEY_EPSILON {
            continue;
        }
        let (payer, payee, sign) = if net > 0.0 {
            (second, first, 1.0)
        } else {
            (first, second, -1.0)
        };
        settlements.push(Settlement {
            payer,
            payee,
            amount: net.abs(),
            breakdown: ledger
                .items
                .into_iter()
                .map(|item| LineItem {
                    label: item.label,
                    amount: item.amount * sign,
                })
                .collect(),
        });
    }
    tracing::debug!(count = settlements.len(), "settled pairs");
    settlements
}

/// Settle running totals pairwise: `(total_a - total_b) * unit_value`.
pub fn settle_by_totals(
    ids: &[PlayerId],
    totals: &BTreeMap<PlayerId, f64>,
    unit_value: f64,
    label: impl Fn(f64, f64) -> String,
) -> Vec<Settlement> {
    settle_pairs(ids, |a, b| {
        let total_a = totals.get(&a).copied().unwrap_or(0.0);
        let total_b = totals.get(&b).copied().unwrap_or(0.0);
        let mut ledger = PairLedger::new();
        ledger.push(label(total_a, total_b), (total_a - total_b) * unit_value);
        ledger
    })
}

/// Each player's net result: received minus paid.
pub fn net_positions(settlements: &[Settlement]) -> BTreeMap<PlayerId, f64> {
    let mut positions = BTreeMap::new();
    for settlement in settlements {
        *positions.entry(settlement.payee).or_insert(0.0) += settlement.amount;
        *positions.entry(settlement.payer).or_insert(0.0) -= settlement.amount;
    }
    positions
}
