use chrono::Utc;

use crate::errors::CoreError;
use crate::models::holding::{Holding, Transaction, TransactionKind};
use crate::services::alert_service::AlertEvaluator;

/// Maintains a holding's position size and cost basis as a pure function
/// of its append-only transaction log.
///
/// Every mutation appends to the log and replays it from the start, so a
/// recomputation from scratch always matches the stored `quantity` and
/// `average_cost` — there is no incremental update that could drift.
pub struct LedgerService {
    alert_evaluator: AlertEvaluator,
}

impl LedgerService {
    pub fn new() -> Self {
        Self {
            alert_evaluator: AlertEvaluator::new(),
        }
    }

    /// Append a transaction and recompute the derived position.
    ///
    /// The facade validates user input one layer up; this keeps a defensive
    /// check so a sell that exceeds the running position can never corrupt
    /// `quantity` to a negative value.
    pub fn add_transaction(
        &self,
        holding: &mut Holding,
        transaction: Transaction,
    ) -> Result<(), CoreError> {
        if transaction.quantity <= 0.0 {
            return Err(CoreError::InvalidTransaction(
                "quantity must be positive".into(),
            ));
        }
        if transaction.price <= 0.0 {
            return Err(CoreError::InvalidTransaction(
                "price must be positive".into(),
            ));
        }
        if transaction.fees < 0.0 {
            return Err(CoreError::InvalidTransaction(
                "fees must not be negative".into(),
            ));
        }
        if transaction.kind == TransactionKind::Sell && transaction.quantity > holding.quantity {
            return Err(CoreError::InvalidTransaction(format!(
                "cannot sell {} units of {} — only {} held",
                transaction.quantity, holding.symbol, holding.quantity
            )));
        }

        holding.transactions.push(transaction);
        self.recompute_averages(holding);
        holding.last_updated = Utc::now();
        Ok(())
    }

    /// Replay the full transaction log in insertion order and write the
    /// resulting `quantity` and `average_cost` back onto the holding.
    pub fn recompute_averages(&self, holding: &mut Holding) {
        let (quantity, average_cost) = Self::replay(&holding.transactions);
        holding.quantity = quantity;
        holding.average_cost = average_cost;
    }

    /// Fold a transaction log into `(quantity, average_cost)`.
    ///
    /// Buys add `quantity * price + fees` to the running investment. Sells
    /// deplete the running investment proportionally: the ratio is the sold
    /// quantity over the quantity held just before this sell *at this point
    /// in the replay* — simplified average-cost depletion, not FIFO/LIFO
    /// lot tracking. The result therefore depends on insertion order, and
    /// insertion order is the authoritative replay order.
    pub fn replay(transactions: &[Transaction]) -> (f64, f64) {
        let mut total_quantity = 0.0_f64;
        let mut total_investment = 0.0_f64;

        for tx in transactions {
            match tx.kind {
                TransactionKind::Buy => {
                    total_quantity += tx.quantity;
                    total_investment += tx.quantity * tx.price + tx.fees;
                }
                TransactionKind::Sell => {
                    // Pre-sell quantity at this point in the replay. Guarded:
                    // a sell from a flat position depletes nothing instead of
                    // dividing by zero (such a log is rejected upstream).
                    let sell_ratio = if total_quantity > 0.0 {
                        tx.quantity / total_quantity
                    } else {
                        0.0
                    };
                    total_investment -= total_investment * sell_ratio;
                    total_quantity -= tx.quantity;
                }
            }
        }

        let average_cost = if total_quantity > 0.0 {
            total_investment / total_quantity
        } else {
            0.0
        };
        (total_quantity, average_cost)
    }

    /// Record a new market price, then sweep the holding's alerts against
    /// it. Returns how many alerts fired.
    pub fn update_price(&self, holding: &mut Holding, new_price: f64) -> usize {
        holding.current_price = Some(new_price);
        holding.last_updated = Utc::now();
        self.alert_evaluator.evaluate(&mut holding.alerts, new_price)
    }
}

impl Default for LedgerService {
    fn default() -> Self {
        Self::new()
    }
}
