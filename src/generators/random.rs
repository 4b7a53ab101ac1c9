use std::collections::VecDeque;
use std::str::FromStr;

use rand::Rng;
use serde::Serialize;

use crate::constants::random::{HISTORY_SIZE, MAX_QUANTITY};
use crate::error::{invalid, Error, Result};

/// Range and quantity of a random integer batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RandomSettings {
    pub min: i64,
    pub max: i64,
    pub quantity: usize,
}

impl Default for RandomSettings {
    fn default() -> Self {
        Self {
            min: 1,
            max: 100,
            quantity: 1,
        }
    }
}

impl RandomSettings {
    pub fn validate(&self) -> Result<()> {
        if self.min >= self.max {
            return Err(invalid("max value must be greater than min value"));
        }
        if !(1..=MAX_QUANTITY).contains(&self.quantity) {
            return Err(invalid(format!(
                "quantity must be between 1 and {}",
                MAX_QUANTITY
            )));
        }
        Ok(())
    }
}

/// Parses settings stored as `min,max,quantity`
impl FromStr for RandomSettings {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let fields: Vec<&str> = s.trim().split(',').map(|f| f.trim()).collect();
        let malformed = || invalid(format!("expected \"min,max,quantity\", got \"{}\"", s.trim()));
        match fields.as_slice() {
            [min, max, quantity] => Ok(RandomSettings {
                min: min.parse().map_err(|_| malformed())?,
                max: max.parse().map_err(|_| malformed())?,
                quantity: quantity.parse().map_err(|_| malformed())?,
            }),
            _ => Err(malformed()),
        }
    }
}

/// Summary shown for batches of more than one number
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BatchSummary {
    pub min: i64,
    pub max: i64,
    pub average: f64,
}

impl BatchSummary {
    pub fn of(numbers: &[i64]) -> Option<Self> {
        let min = *numbers.iter().min()?;
        let max = *numbers.iter().max()?;
        let sum: i128 = numbers.iter().map(|&n| n as i128).sum();
        Some(BatchSummary {
            min,
            max,
            average: sum as f64 / numbers.len() as f64,
        })
    }
}

/// Generates `quantity` integers uniformly distributed over `min..=max`
pub fn generate(settings: RandomSettings) -> Result<Vec<i64>> {
    generate_with(&mut rand::thread_rng(), settings)
}

pub fn generate_with<R: Rng + ?Sized>(rng: &mut R, settings: RandomSettings) -> Result<Vec<i64>> {
    settings.validate()?;
    Ok((0..settings.quantity)
        .map(|_| rng.gen_range(settings.min..=settings.max))
        .collect())
}

/// The most recent batches, newest first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RandomHistory {
    batches: VecDeque<Vec<i64>>,
}

impl RandomHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, batch: Vec<i64>) {
        self.batches.push_front(batch);
        self.batches.truncate(HISTORY_SIZE);
    }

    pub fn batches(&self) -> impl Iterator<Item = &Vec<i64>> {
        self.batches.iter()
    }

    pub fn len(&self) -> usize {
        self.batches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_numbers_stay_in_range() {
        let settings = RandomSettings {
            min: -5,
            max: 5,
            quantity: 1000,
        };
        let numbers = generate(settings).unwrap();
        assert_eq!(numbers.len(), 1000);
        assert!(numbers.iter().all(|n| (-5..=5).contains(n)));
        assert!(numbers.contains(&-5) && numbers.contains(&5));
    }

    #[test]
    fn test_invalid_settings() {
        let mut settings = RandomSettings {
            min: 10,
            max: 10,
            quantity: 1,
        };
        assert!(matches!(generate(settings), Err(Error::ValidationError(_))));
        settings.max = 20;
        settings.quantity = 0;
        assert!(generate(settings).is_err());
        settings.quantity = MAX_QUANTITY + 1;
        assert!(generate(settings).is_err());
    }

    #[test]
    fn test_seeded_generation() {
        let settings = RandomSettings::default();
        let a = generate_with(&mut StdRng::seed_from_u64(3), settings).unwrap();
        let b = generate_with(&mut StdRng::seed_from_u64(3), settings).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_parse_settings() {
        let settings: RandomSettings = " 1, 6 ,3\n".parse().unwrap();
        assert_eq!(
            settings,
            RandomSettings {
                min: 1,
                max: 6,
                quantity: 3
            }
        );
        assert!("1,6".parse::<RandomSettings>().is_err());
        assert!("a,b,c".parse::<RandomSettings>().is_err());
    }

    #[test]
    fn test_history_keeps_latest_batches() {
        let mut history = RandomHistory::new();
        for i in 0..8 {
            history.push(vec![i]);
        }
        assert_eq!(history.len(), HISTORY_SIZE);
        let firsts: Vec<i64> = history.batches().map(|b| b[0]).collect();
        assert_eq!(firsts, vec![7, 6, 5, 4, 3]);
    }

    #[test]
    fn test_summary() {
        let summary = BatchSummary::of(&[1, 2, 3, 6]).unwrap();
        assert_eq!(summary.min, 1);
        assert_eq!(summary.max, 6);
        assert_eq!(summary.average, 3.0);
        assert!(BatchSummary::of(&[]).is_none());
    }
}
