//! Review statistics and author-gated review mutations.

use crate::api::BrokerageApi;
use crate::error::ApiError;
use crate::models::{NewReview, Review, Role};
use crate::session::Session;
use thiserror::Error;
use tracing::{info, warn};

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

/// Aggregate figures over a set of reviews
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ReviewStats {
    pub total: usize,
    /// Mean of `overall`, 0 for an empty set
    pub average_rating: f64,
    /// Reviews per star, index 0 holding one-star reviews
    pub histogram: [usize; 5],
}

impl ReviewStats {
    pub fn from_reviews(reviews: &[Review]) -> Self {
        if reviews.is_empty() {
            return Self::default();
        }

        let mut histogram = [0usize; 5];
        for review in reviews {
            if (MIN_RATING..=MAX_RATING).contains(&review.overall) {
                histogram[usize::from(review.overall - MIN_RATING)] += 1;
            }
        }

        let sum: u64 = reviews.iter().map(|r| u64::from(r.overall)).sum();
        Self {
            total: reviews.len(),
            average_rating: sum as f64 / reviews.len() as f64,
            histogram,
        }
    }

    pub fn count(&self, stars: u8) -> usize {
        if (MIN_RATING..=MAX_RATING).contains(&stars) {
            self.histogram[usize::from(stars - MIN_RATING)]
        } else {
            0
        }
    }

    /// Rounded share of reviews with exactly `stars`, 0 for an empty set
    pub fn percentage(&self, stars: u8) -> u32 {
        if self.total == 0 {
            return 0;
        }
        (100.0 * self.count(stars) as f64 / self.total as f64).round() as u32
    }

    pub fn five_star_percentage(&self) -> u32 {
        self.percentage(MAX_RATING)
    }
}

#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("sign in to manage reviews")]
    NotAuthenticated,

    #[error("only clients can write reviews")]
    NotAClient,

    #[error("review {review_id} belongs to another author")]
    NotAuthor { review_id: i64 },

    #[error("rating must be between 1 and 5, got {0}")]
    InvalidRating(u8),

    #[error(transparent)]
    Api(#[from] ApiError),
}

fn require_author<'a>(session: Option<&'a Session>, review: &Review) -> Result<&'a Session, ReviewError> {
    let session = session.ok_or(ReviewError::NotAuthenticated)?;
    if session.user.id != review.author_client_id {
        return Err(ReviewError::NotAuthor {
            review_id: review.id,
        });
    }
    Ok(session)
}

fn validate_rating(overall: u8) -> Result<(), ReviewError> {
    if !(MIN_RATING..=MAX_RATING).contains(&overall) {
        return Err(ReviewError::InvalidRating(overall));
    }
    Ok(())
}

/// Post a review for `realtor_id` as the signed-in client
pub async fn create_review(
    api: &dyn BrokerageApi,
    session: Option<&Session>,
    realtor_id: i64,
    overall: u8,
    text: String,
) -> Result<Review, ReviewError> {
    let session = session.ok_or(ReviewError::NotAuthenticated)?;
    if session.role() != Role::Client {
        return Err(ReviewError::NotAClient);
    }
    validate_rating(overall)?;

    let review = NewReview {
        overall,
        text,
        realtor_id,
        author_client_id: session.user.id,
    };
    let created = api.create_review(&review).await.map_err(|e| {
        warn!("Failed to create review: {}", e);
        e
    })?;
    info!("Created review {} for agent {}", created.id, realtor_id);
    Ok(created)
}

/// Save an edited review; only its author may do so
pub async fn update_review(
    api: &dyn BrokerageApi,
    session: Option<&Session>,
    review: &Review,
) -> Result<Review, ReviewError> {
    require_author(session, review)?;
    validate_rating(review.overall)?;

    let saved = api.update_review(review).await.map_err(|e| {
        warn!("Failed to update review {}: {}", review.id, e);
        e
    })?;
    info!("Updated review {}", saved.id);
    Ok(saved)
}

/// Delete a review; only its author may do so
pub async fn delete_review(
    api: &dyn BrokerageApi,
    session: Option<&Session>,
    review: &Review,
) -> Result<(), ReviewError> {
    require_author(session, review)?;

    api.delete_review(review.id).await.map_err(|e| {
        warn!("Failed to delete review {}: {}", review.id, e);
        e
    })?;
    info!("Deleted review {}", review.id);
    Ok(())
}
