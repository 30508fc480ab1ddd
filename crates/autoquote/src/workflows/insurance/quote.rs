use rand::Rng;
use serde::{Deserialize, Serialize};

use super::domain::ApplicationId;
use crate::config::QuoteConfig;

pub const DEFAULT_MIN_PREMIUM: u32 = 600;
pub const DEFAULT_MAX_PREMIUM: u32 = 2000;

/// Placeholder premium generator. No rating logic: the premium is drawn uniformly from
/// `[min_premium, max_premium)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuoteEstimator {
    min_premium: u32,
    max_premium: u32,
}

impl QuoteEstimator {
    /// Falls back to the default range when `min_premium >= max_premium`.
    pub fn new(min_premium: u32, max_premium: u32) -> Self {
        if min_premium < max_premium {
            Self {
                min_premium,
                max_premium,
            }
        } else {
            Self::default()
        }
    }

    pub fn range(&self) -> (u32, u32) {
        (self.min_premium, self.max_premium)
    }

    pub fn estimate(&self, application_id: ApplicationId) -> QuoteConfirmation {
        let six_month_premium = rand::thread_rng().gen_range(self.min_premium..self.max_premium);
        QuoteConfirmation {
            application_id,
            six_month_premium,
            message: format!(
                "Thank you for your application. Your auto insurance quote is ${six_month_premium} per every six months."
            ),
        }
    }
}

impl Default for QuoteEstimator {
    fn default() -> Self {
        Self {
            min_premium: DEFAULT_MIN_PREMIUM,
            max_premium: DEFAULT_MAX_PREMIUM,
        }
    }
}

impl From<&QuoteConfig> for QuoteEstimator {
    fn from(config: &QuoteConfig) -> Self {
        Self::new(config.min_premium, config.max_premium)
    }
}

/// Response body of a successful final submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteConfirmation {
    pub application_id: ApplicationId,
    pub six_month_premium: u32,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn premium_stays_within_configured_range() {
        let estimator = QuoteEstimator::new(700, 710);
        let id = ApplicationId::new_v4();
        for _ in 0..50 {
            let quote = estimator.estimate(id);
            assert!((700..710).contains(&quote.six_month_premium));
            assert_eq!(quote.application_id, id);
            assert!(quote
                .message
                .ends_with(&format!("${} per every six months.", quote.six_month_premium)));
        }
    }

    #[test]
    fn inverted_range_falls_back_to_default() {
        assert_eq!(QuoteEstimator::new(2000, 600).range(), (600, 2000));
        assert_eq!(QuoteEstimator::new(800, 800), QuoteEstimator::default());
    }
}
