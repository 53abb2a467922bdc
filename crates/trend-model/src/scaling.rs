/// Min-max scaler fit on a single price window. Maps the window into [0, 1]
/// and inverts model output back to price space.
#[derive(Debug, Clone, Copy)]
pub struct MinMaxScaler {
    min: f64,
    max: f64,
}

impl MinMaxScaler {
    pub fn fit(values: &[f64]) -> Option<Self> {
        if values.is_empty() || values.iter().any(|v| !v.is_finite()) {
            return None;
        }

        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Some(Self { min, max })
    }

    pub fn transform(&self, value: f64) -> f64 {
        let range = self.max - self.min;
        if range == 0.0 {
            // Constant window: every point maps to the low end
            return 0.0;
        }
        (value - self.min) / range
    }

    pub fn inverse(&self, scaled: f64) -> f64 {
        let range = self.max - self.min;
        if range == 0.0 {
            return self.min;
        }
        self.min + scaled * range
    }

    pub fn transform_all(&self, values: &[f64]) -> Vec<f64> {
        values.iter().map(|&v| self.transform(v)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scales_window_into_unit_interval() {
        let scaler = MinMaxScaler::fit(&[100.0, 105.0, 110.0]).unwrap();
        assert_eq!(scaler.transform(100.0), 0.0);
        assert_eq!(scaler.transform(110.0), 1.0);
        assert!((scaler.transform(105.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn inverse_recovers_prices() {
        let scaler = MinMaxScaler::fit(&[80.0, 120.0]).unwrap();
        let scaled = scaler.transform(95.0);
        assert!((scaler.inverse(scaled) - 95.0).abs() < 1e-9);
    }

    #[test]
    fn constant_window_round_trips_to_the_constant() {
        let scaler = MinMaxScaler::fit(&[42.0, 42.0, 42.0]).unwrap();
        assert_eq!(scaler.transform(42.0), 0.0);
        assert_eq!(scaler.inverse(0.7), 42.0);
    }

    #[test]
    fn refuses_non_finite_input() {
        assert!(MinMaxScaler::fit(&[]).is_none());
        assert!(MinMaxScaler::fit(&[1.0, f64::NAN]).is_none());
    }
}
