//! Action policies: what to do with each incoming sample.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::sample::Sample;
use super::signal::{Features, Signal};
use crate::ports::predictor_port::Predictor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Open,
    Close,
    Hold,
}

/// Strategy slot consulted once per sample by the session.
pub trait ActionPolicy {
    fn decide(&mut self, sample: &Sample) -> Action;
}

/// Uniform draw among open, close and hold. Ignores price, balance and history.
pub struct RandomPolicy<R: Rng = StdRng> {
    rng: R,
}

impl RandomPolicy<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl<R: Rng> RandomPolicy<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> ActionPolicy for RandomPolicy<R> {
    fn decide(&mut self, _sample: &Sample) -> Action {
        match self.rng.gen_range(0..3) {
            0 => Action::Open,
            1 => Action::Close,
            _ => Action::Hold,
        }
    }
}

/// Replays a fixed sequence of actions, then holds.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPolicy {
    actions: VecDeque<Action>,
}

impl ScriptedPolicy {
    pub fn new(actions: impl IntoIterator<Item = Action>) -> Self {
        Self {
            actions: actions.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.actions.len()
    }
}

impl ActionPolicy for ScriptedPolicy {
    fn decide(&mut self, _sample: &Sample) -> Action {
        self.actions.pop_front().unwrap_or(Action::Hold)
    }
}

const LONGEST_WINDOW: usize = 15;

/// Opens on a Buy signal and closes on a Sell signal from the predictor,
/// fed with moving averages of the trailing prices. Holds until a full
/// 15-sample window is available.
pub struct PredictorPolicy<P: Predictor> {
    predictor: P,
    window: VecDeque<f64>,
}

impl<P: Predictor> PredictorPolicy<P> {
    pub fn new(predictor: P) -> Self {
        Self {
            predictor,
            window: VecDeque::with_capacity(LONGEST_WINDOW),
        }
    }

    fn sma(&self, period: usize) -> f64 {
        self.window.iter().rev().take(period).sum::<f64>() / period as f64
    }

    fn features(&self) -> Option<Features> {
        if self.window.len() < LONGEST_WINDOW {
            return None;
        }
        Some(Features {
            sma3: self.sma(3),
            sma5: self.sma(5),
            sma15: self.sma(15),
        })
    }
}

impl<P: Predictor> ActionPolicy for PredictorPolicy<P> {
    fn decide(&mut self, sample: &Sample) -> Action {
        if self.window.len() == LONGEST_WINDOW {
            self.window.pop_front();
        }
        self.window.push_back(sample.price);

        match self.features() {
            Some(features) => {
                let predicted = self.predictor.predict(&features);
                match Signal::from_prediction(predicted, sample.price) {
                    Signal::Buy => Action::Open,
                    Signal::Sell => Action::Close,
                }
            }
            None => Action::Hold,
        }
    }
}
