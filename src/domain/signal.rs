//! Operator quotes, moving-average features and Buy/Sell signals.

use std::fmt;

use crate::domain::error::FxTraderError;
use crate::ports::predictor_port::Predictor;

/// The three moving averages the predictor is trained on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Features {
    pub sma3: f64,
    pub sma5: f64,
    pub sma15: f64,
}

impl Features {
    pub fn as_array(&self) -> [f64; 3] {
        [self.sma3, self.sma5, self.sma15]
    }

    /// Approximate the averages from a single OHLC quote.
    ///
    /// sma3 = (open + high + low) / 3, sma5 = sma15 = (open + high + low + close) / 4.
    /// sma15 has no longer history to draw on and repeats sma5.
    pub fn from_quote(quote: &Quote) -> Self {
        let sma3 = (quote.open + quote.high + quote.low) / 3.0;
        let sma4 = (quote.open + quote.high + quote.low + quote.close) / 4.0;
        Self {
            sma3,
            sma5: sma4,
            sma15: sma4,
        }
    }
}

/// A manually entered quote: `PAIR,Open,High,Low,Close`.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub pair: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Quote {
    pub fn parse(input: &str) -> Result<Self, FxTraderError> {
        let parts: Vec<&str> = input.trim().split(',').collect();
        if parts.len() != 5 {
            return Err(FxTraderError::InputFormat {
                reason: format!("expected 5 comma-separated fields, got {}", parts.len()),
            });
        }

        let field = |idx: usize, name: &str| -> Result<f64, FxTraderError> {
            let raw = parts[idx].trim();
            match raw.parse::<f64>() {
                Ok(v) if v.is_finite() => Ok(v),
                Ok(_) => Err(FxTraderError::InputFormat {
                    reason: format!("{} must be a finite number, got '{}'", name, raw),
                }),
                Err(e) => Err(FxTraderError::InputFormat {
                    reason: format!("invalid {} value '{}': {}", name, raw, e),
                }),
            }
        };

        Ok(Quote {
            pair: parts[0].trim().to_string(),
            open: field(1, "open")?,
            high: field(2, "high")?,
            low: field(3, "low")?,
            close: field(4, "close")?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Buy,
    Sell,
}

impl Signal {
    /// Buy when the predicted rate is strictly above the current close.
    pub fn from_prediction(predicted_rate: f64, close: f64) -> Self {
        if predicted_rate > close {
            Signal::Buy
        } else {
            Signal::Sell
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Buy => write!(f, "BUY"),
            Signal::Sell => write!(f, "SELL"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub quote: Quote,
    pub features: Features,
    pub predicted_rate: f64,
    pub signal: Signal,
}

/// Parse an operator line and ask the predictor for a signal. A malformed
/// line fails before the predictor is consulted.
pub fn evaluate_quote(input: &str, predictor: &dyn Predictor) -> Result<Prediction, FxTraderError> {
    Ok(predict_quote(Quote::parse(input)?, predictor))
}

pub fn predict_quote(quote: Quote, predictor: &dyn Predictor) -> Prediction {
    let features = Features::from_quote(&quote);
    let predicted_rate = predictor.predict(&features);
    let signal = Signal::from_prediction(predicted_rate, quote.close);
    Prediction {
        quote,
        features,
        predicted_rate,
        signal,
    }
}
