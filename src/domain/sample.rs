//! Price series sample.

/// One observation of the traded rate. Samples are replayed in the order
/// they were read.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub timestamp: String,
    pub price: f64,
}

impl Sample {
    pub fn new(timestamp: impl Into<String>, price: f64) -> Self {
        Self {
            timestamp: timestamp.into(),
            price,
        }
    }
}

/// Build samples from bare prices, using the row index as the timestamp.
pub fn indexed_samples(prices: &[f64]) -> Vec<Sample> {
    prices
        .iter()
        .enumerate()
        .map(|(i, &price)| Sample::new(i.to_string(), price))
        .collect()
}
