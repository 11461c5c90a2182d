//! Running rating aggregates per laptop
use super::error::Result;
use dashmap::DashMap;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rating {
    pub count: u32,
    pub sum: f64,
}

impl Rating {
    pub fn average(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.sum / f64::from(self.count)
    }
}

pub trait RatingStore: Send + Sync {
    /// Fold `score` into the laptop's aggregate and return the new value
    fn add(&self, laptop_id: &str, score: f64) -> Result<Rating>;
}

#[derive(Debug, Default)]
pub struct InMemoryRatingStore {
    ratings: DashMap<String, Rating>,
}

impl InMemoryRatingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, laptop_id: &str) -> Option<Rating> {
        self.ratings.get(laptop_id).map(|entry| *entry)
    }
}

impl RatingStore for InMemoryRatingStore {
    fn add(&self, laptop_id: &str, score: f64) -> Result<Rating> {
        // The entry guard holds the shard lock for the whole update
        let mut rating = self.ratings.entry(laptop_id.to_string()).or_default();
        rating.count += 1;
        rating.sum += score;
        Ok(*rating)
    }
}
