//! Boundary checks for records headed into the store.
//!
//! The store trusts every draft it receives. These checks belong to the
//! code collecting user input, which runs them before dispatching.

use crate::types::{SwapRequestDraft, TicketDraft, TicketId};
use thiserror::Error;

/// Highest seller rating a listing may carry
pub const MAX_RATING: f64 = 5.0;

/// Reasons a draft is not fit to be stored
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A required text field is empty or only whitespace
    #[error("{0} is required")]
    MissingField(&'static str),

    /// Seller rating is not a number between 0 and 5
    #[error("seller rating {0} is outside 0..=5")]
    RatingOutOfRange(f64),

    /// The ticket a swap was requested for does not exist
    #[error("ticket {0} not found")]
    TicketNotFound(TicketId),
}

fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(())
}

impl TicketDraft {
    /// Checks the draft the way the posting form does
    ///
    /// # Errors
    ///
    /// Returns the first problem found: a blank text field, or a seller
    /// rating that is not finite or outside `0.0..=5.0`.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("title", &self.title)?;
        require("venue", &self.venue)?;
        require("location", &self.location)?;
        require("description", &self.description)?;
        require("seller name", &self.seller.name)?;

        let rating = self.seller.rating;
        if !rating.is_finite() || !(0.0..=MAX_RATING).contains(&rating) {
            return Err(ValidationError::RatingOutOfRange(rating));
        }

        Ok(())
    }
}

impl SwapRequestDraft {
    /// Checks the draft the way the swap dialog does
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingField`] for a blank message.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("message", &self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Money, SellerSnapshot, TicketType, UserId};
    use chrono::{NaiveDate, NaiveTime};

    fn draft() -> TicketDraft {
        TicketDraft {
            title: "Dune: Part Two".to_string(),
            ticket_type: TicketType::Movie,
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            time: NaiveTime::from_hms_opt(20, 0, 0).unwrap(),
            venue: "Alamo Drafthouse".to_string(),
            location: "Austin, TX".to_string(),
            price: Money::from_cents(1_500),
            original_price: Money::from_cents(1_800),
            description: "Two seats, row F".to_string(),
            image: String::new(),
            seller: SellerSnapshot {
                id: UserId::new(1),
                name: "John Doe".to_string(),
                avatar: String::new(),
                rating: 4.8,
            },
        }
    }

    #[test]
    fn complete_ticket_draft_passes() {
        assert_eq!(draft().validate(), Ok(()));
    }

    #[test]
    fn blank_venue_is_rejected() {
        let mut draft = draft();
        draft.venue = "   ".to_string();
        assert_eq!(draft.validate(), Err(ValidationError::MissingField("venue")));
    }

    #[test]
    fn rating_must_be_in_range() {
        let mut draft = draft();
        draft.seller.rating = 5.5;
        assert_eq!(draft.validate(), Err(ValidationError::RatingOutOfRange(5.5)));

        draft.seller.rating = f64::NAN;
        assert!(matches!(
            draft.validate(),
            Err(ValidationError::RatingOutOfRange(_))
        ));
    }

    #[test]
    fn swap_message_is_required() {
        let request = SwapRequestDraft {
            ticket_id: TicketId::new(1),
            requester_id: UserId::new(5),
            requester_name: "Alex".to_string(),
            requester_avatar: String::new(),
            seller_id: UserId::new(2),
            message: "\n".to_string(),
            offer: None,
        };
        assert_eq!(
            request.validate(),
            Err(ValidationError::MissingField("message"))
        );
    }
}
