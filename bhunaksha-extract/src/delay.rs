//! Délai de politesse entre deux requêtes de parcelle

use std::time::Duration;

use rand::Rng;

use crate::error::ExtractError;

/// Fournit la pause à observer après chaque parcelle tentée
pub trait DelayPolicy {
    fn next_delay(&self) -> Duration;
}

/// Pause tirée uniformément dans `[min, max]` secondes
#[derive(Debug, Clone, Copy)]
pub struct UniformDelay {
    min_secs: f64,
    max_secs: f64,
}

impl UniformDelay {
    pub fn new(min_secs: f64, max_secs: f64) -> Result<Self, ExtractError> {
        if !min_secs.is_finite()
            || min_secs < 0.0
            || min_secs > max_secs
            || Duration::try_from_secs_f64(max_secs).is_err()
        {
            return Err(ExtractError::InvalidConfig(format!(
                "invalid delay range [{}, {}]",
                min_secs, max_secs
            )));
        }
        Ok(Self { min_secs, max_secs })
    }
}

impl DelayPolicy for UniformDelay {
    fn next_delay(&self) -> Duration {
        let secs = if self.min_secs == self.max_secs {
            self.min_secs
        } else {
            rand::rng().random_range(self.min_secs..=self.max_secs)
        };
        Duration::from_secs_f64(secs)
    }
}

/// Aucune pause (tests, rejouage local)
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

impl DelayPolicy for NoDelay {
    fn next_delay(&self) -> Duration {
        Duration::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_bounds() {
        let delay = UniformDelay::new(1.0, 3.0).unwrap();
        for _ in 0..200 {
            let d = delay.next_delay();
            assert!(d >= Duration::from_secs(1) && d <= Duration::from_secs(3), "{:?}", d);
        }
    }

    #[test]
    fn test_fixed_delay() {
        let delay = UniformDelay::new(0.5, 0.5).unwrap();
        assert_eq!(delay.next_delay(), Duration::from_millis(500));
    }

    #[test]
    fn test_invalid_ranges() {
        assert!(UniformDelay::new(3.0, 1.0).is_err());
        assert!(UniformDelay::new(-1.0, 1.0).is_err());
        assert!(UniformDelay::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_rejects_unrepresentable_delay() {
        assert!(matches!(
            UniformDelay::new(0.0, 1e20),
            Err(ExtractError::InvalidConfig(_))
        ));
        assert!(UniformDelay::new(1e20, 1e20).is_err());

        let delay = UniformDelay::new(0.0, 86_400.0).unwrap();
        assert!(delay.next_delay() <= Duration::from_secs(86_400));
    }

    #[test]
    fn test_no_delay() {
        assert_eq!(NoDelay.next_delay(), Duration::ZERO);
    }
}
