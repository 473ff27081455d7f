//! Session performance summary.

use super::matcher::TradeRecord;

#[derive(Debug, Clone, PartialEq)]
pub struct SessionMetrics {
    pub total_pnl: f64,
    pub total_return: f64,
    pub total_trades: usize,
    pub trades_won: usize,
    pub trades_lost: usize,
    pub trades_breakeven: usize,
    pub win_rate: f64,
    pub profit_factor: f64,
    pub avg_win: f64,
    pub avg_loss: f64,
    pub largest_win: f64,
    pub largest_loss: f64,
    pub max_drawdown: f64,
}

impl SessionMetrics {
    pub fn compute(notional: f64, trades: &[TradeRecord]) -> Self {
        let mut trades_won = 0usize;
        let mut trades_lost = 0usize;
        let mut trades_breakeven = 0usize;
        let mut total_wins = 0.0_f64;
        let mut total_losses = 0.0_f64;
        let mut largest_win = 0.0_f64;
        let mut largest_loss = 0.0_f64;

        for trade in trades {
            let pnl = trade.profit;
            if trade.is_win() {
                trades_won += 1;
                total_wins += pnl;
                largest_win = largest_win.max(pnl);
            } else if pnl < 0.0 {
                trades_lost += 1;
                total_losses += pnl.abs();
                largest_loss = largest_loss.max(pnl.abs());
            } else {
                trades_breakeven += 1;
            }
        }

        let total_trades = trades.len();
        let final_balance = trades.last().map(|t| t.balance_after).unwrap_or(notional);
        let total_pnl = final_balance - notional;
        let total_return = if notional > 0.0 {
            total_pnl / notional
        } else {
            0.0
        };

        let win_rate = if total_trades > 0 {
            trades_won as f64 / total_trades as f64
        } else {
            0.0
        };

        let profit_factor = if total_losses > 0.0 {
            total_wins / total_losses
        } else if total_wins > 0.0 {
            f64::INFINITY
        } else {
            0.0
        };

        let avg_win = if trades_won > 0 {
            total_wins / trades_won as f64
        } else {
            0.0
        };
        let avg_loss = if trades_lost > 0 {
            total_losses / trades_lost as f64
        } else {
            0.0
        };

        SessionMetrics {
            total_pnl,
            total_return,
            total_trades,
            trades_won,
            trades_lost,
            trades_breakeven,
            win_rate,
            profit_factor,
            avg_win,
            avg_loss,
            largest_win,
            largest_loss,
            max_drawdown: compute_drawdown(notional, trades),
        }
    }
}

/// Largest peak-to-trough fall of the realized balance, as a fraction of the peak.
fn compute_drawdown(notional: f64, trades: &[TradeRecord]) -> f64 {
    let mut peak = notional;
    let mut max_dd = 0.0_f64;
    for balance in trades.iter().map(|t| t.balance_after) {
        if balance > peak {
            peak = balance;
        } else if peak > 0.0 {
            max_dd = max_dd.max((peak - balance) / peak);
        }
    }
    max_dd
}
