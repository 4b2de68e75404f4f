/// Computes the arithmetic mean of a slice of values. Returns 0.0 for empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// `part` as a fraction of `total`. Returns 0.0 when `total` is zero.
pub fn share(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64
    }
}

/// Running test-count-weighted mean.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Weighted {
    pub weight: u64,
    pub sum: f64,
}

impl Weighted {
    /// Adds `value` with `weight`. The total weight saturates at `u64::MAX`.
    pub fn add(&mut self, value: f64, weight: u64) {
        self.sum += value * weight as f64;
        self.weight = self.weight.saturating_add(weight);
    }

    /// Returns 0.0 when nothing has been weighted in.
    pub fn mean(&self) -> f64 {
        if self.weight == 0 {
            0.0
        } else {
            self.sum / self.weight as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(mean(&[1.0, 2.0, 6.0]), 3.0);
    }

    #[test]
    fn test_share_with_zero_total() {
        assert_eq!(share(10, 0), 0.0);
        assert_eq!(share(1, 4), 0.25);
    }

    #[test]
    fn test_weighted_mean() {
        let mut w = Weighted::default();
        assert_eq!(w.mean(), 0.0);

        w.add(10.0, 1);
        w.add(40.0, 3);
        assert_eq!(w.weight, 4);
        assert_eq!(w.mean(), 32.5);
    }

    #[test]
    fn test_zero_weight_contributes_nothing() {
        let mut w = Weighted::default();
        w.add(1000.0, 0);
        w.add(20.0, 5);
        assert_eq!(w.mean(), 20.0);
    }

    #[test]
    fn test_weighted_saturates() {
        let mut w = Weighted::default();
        w.add(10.0, u64::MAX);
        w.add(20.0, u64::MAX);
        assert_eq!(w.weight, u64::MAX);
        assert!(w.mean().is_finite());
    }
}
