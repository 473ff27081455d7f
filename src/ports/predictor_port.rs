//! Predictor port: anything that maps moving-average features to a rate.

use crate::domain::signal::Features;

pub trait Predictor {
    fn predict(&self, features: &Features) -> f64;
}

impl<P: Predictor + ?Sized> Predictor for &P {
    fn predict(&self, features: &Features) -> f64 {
        (**self).predict(features)
    }
}
