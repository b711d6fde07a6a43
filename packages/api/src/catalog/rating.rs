use serde::Serialize;

/// Review aggregate for one product. Recomputed on every read, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct RatingSummary {
    pub average_rating: f64,
    pub total_reviews: u64,
}

impl RatingSummary {
    pub fn from_ratings<I>(ratings: I) -> Self
    where
        I: IntoIterator<Item = i32>,
    {
        let (sum, count) = ratings
            .into_iter()
            .fold((0i64, 0u64), |(sum, count), r| (sum + r as i64, count + 1));

        if count == 0 {
            return Self::default();
        }

        let mean = sum as f64 / count as f64;
        Self {
            average_rating: (mean * 10.0).round() / 10.0,
            total_reviews: count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_reviews_means_zero() {
        let summary = RatingSummary::from_ratings(Vec::new());
        assert_eq!(summary.average_rating, 0.0);
        assert_eq!(summary.total_reviews, 0);
    }

    #[test]
    fn mean_is_rounded_to_one_decimal() {
        let summary = RatingSummary::from_ratings([5, 4, 4]);
        assert_eq!(summary.average_rating, 4.3);
        assert_eq!(summary.total_reviews, 3);

        assert_eq!(RatingSummary::from_ratings([1, 2]).average_rating, 1.5);
        assert_eq!(RatingSummary::from_ratings([5, 5, 4]).average_rating, 4.7);
        assert_eq!(RatingSummary::from_ratings([3]).average_rating, 3.0);
    }
}
