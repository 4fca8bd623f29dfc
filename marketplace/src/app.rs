//! The marketplace as the UI layer sees it.
//!
//! [`Marketplace`] owns the store for the lifetime of the application and
//! exposes the five mutations, each returning the snapshot every later
//! read must use. Reads go through [`crate::query`] against a snapshot.

use crate::config::{Config, ListingConfig};
use crate::query::{self, TicketQuery};
use crate::reducer::{MarketAction, MarketEnvironment, MarketReducer};
use crate::seed::{self, SeedError};
use crate::types::{
    CurrentUser, MarketState, Money, SellerSnapshot, SwapRequest, SwapRequestDraft, SwapRequestId,
    SwapStatus, Ticket, TicketDraft, TicketId, TicketType,
};
use crate::validation::ValidationError;
use chrono::{NaiveDate, NaiveTime};
use std::sync::Arc;
use swapmarket_runtime::Store;

/// An immutable view of both collections at one point in time
pub type Snapshot = Arc<MarketState>;

/// The store type backing the marketplace
pub type MarketStore = Store<MarketState, MarketAction, MarketEnvironment, MarketReducer>;

/// Image used when the poster does not supply one
pub const DEFAULT_TICKET_IMAGE: &str =
    "https://images.unsplash.com/photo-1489599804150-0b0b0b0b0b0b?w=400&h=300&fit=crop&auto=format";

/// What the "post a ticket" form collects
///
/// The seller is not part of the form; it is the current user.
#[derive(Clone, Debug, PartialEq)]
pub struct TicketForm {
    /// Listing headline
    pub title: String,
    /// Movie or event
    pub ticket_type: TicketType,
    /// Day of the screening or event
    pub date: NaiveDate,
    /// Start time
    pub time: NaiveTime,
    /// Venue name
    pub venue: String,
    /// City / region
    pub location: String,
    /// Asking price
    pub price: Money,
    /// Face value
    pub original_price: Money,
    /// Free-text details
    pub description: String,
    /// Display image URL; blank means [`DEFAULT_TICKET_IMAGE`]
    pub image: String,
}

impl TicketForm {
    /// The draft this form lists on behalf of `seller`
    #[must_use]
    pub fn into_draft(self, seller: SellerSnapshot) -> TicketDraft {
        let image = if self.image.trim().is_empty() {
            DEFAULT_TICKET_IMAGE.to_string()
        } else {
            self.image
        };

        TicketDraft {
            title: self.title,
            ticket_type: self.ticket_type,
            date: self.date,
            time: self.time,
            venue: self.venue,
            location: self.location,
            price: self.price,
            original_price: self.original_price,
            description: self.description,
            image,
            seller,
        }
    }
}

/// The ticket swap marketplace
#[derive(Debug)]
pub struct Marketplace {
    store: MarketStore,
    current_user: CurrentUser,
    listing: ListingConfig,
}

impl Marketplace {
    /// Creates a marketplace over `initial` state
    #[must_use]
    pub fn new(initial: MarketState, environment: MarketEnvironment, config: &Config) -> Self {
        Self {
            store: Store::new(initial, MarketReducer::new(), environment),
            current_user: config.current_user.clone(),
            listing: config.listing.clone(),
        }
    }

    /// Seeds a marketplace as `config` describes, with production clock and ids
    ///
    /// # Errors
    ///
    /// Returns a [`SeedError`] if the seed listings cannot be loaded.
    pub fn from_config(config: &Config) -> Result<Self, SeedError> {
        let initial = seed::load(&config.seed)?;
        Ok(Self::new(initial, MarketEnvironment::production(), config))
    }

    /// The latest snapshot
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.store.snapshot()
    }

    /// Increases with every mutation; pairs with query criteria as a cache key
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.store.version()
    }

    /// The signed-in user
    #[must_use]
    pub const fn current_user(&self) -> &CurrentUser {
        &self.current_user
    }

    /// The home page's featured listings from `snapshot`
    #[must_use]
    pub fn featured<'a>(&self, snapshot: &'a MarketState) -> Vec<&'a Ticket> {
        query::featured(&snapshot.tickets, self.listing.featured_count)
    }

    /// The criteria the listing page opens with
    #[must_use]
    pub fn default_query(&self) -> TicketQuery {
        TicketQuery::listing(self.listing.price_ceiling)
    }

    fn next_ticket_id(&self) -> TicketId {
        let ids = &self.store.environment().ids;
        loop {
            let id = TicketId::new(ids.next_id());
            if !self.store.state(|s| s.has_ticket(id)) {
                return id;
            }
        }
    }

    fn next_swap_request_id(&self) -> SwapRequestId {
        let ids = &self.store.environment().ids;
        loop {
            let id = SwapRequestId::new(ids.next_id());
            if !self.store.state(|s| s.has_swap_request(id)) {
                return id;
            }
        }
    }

    // ========== Store operations ==========

    /// Lists a ticket, stamping a fresh id, `Available` status and the creation time
    pub fn create_ticket(&mut self, draft: TicketDraft) -> (Snapshot, TicketId) {
        let id = self.next_ticket_id();
        let snapshot = self.store.send(MarketAction::CreateTicket { id, draft });
        (snapshot, id)
    }

    /// Replaces the listing with the same id; unknown ids change nothing
    pub fn update_ticket(&mut self, ticket: Ticket) -> Snapshot {
        self.store.send(MarketAction::UpdateTicket { ticket })
    }

    /// Removes a listing; unknown ids change nothing
    ///
    /// Swap requests for the listing are kept.
    pub fn delete_ticket(&mut self, id: TicketId) -> Snapshot {
        self.store.send(MarketAction::DeleteTicket { id })
    }

    /// Records a swap request, stamping a fresh id, `Pending` status and the creation time
    pub fn create_swap_request(&mut self, draft: SwapRequestDraft) -> (Snapshot, SwapRequestId) {
        let id = self.next_swap_request_id();
        let snapshot = self.store.send(MarketAction::CreateSwapRequest { id, draft });
        (snapshot, id)
    }

    /// Replaces the swap request with the same id; unknown ids change nothing
    pub fn update_swap_request(&mut self, request: SwapRequest) -> Snapshot {
        self.store.send(MarketAction::UpdateSwapRequest { request })
    }

    // ========== Page actions ==========

    /// Posts a ticket from the form on behalf of the current user
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if a required field is blank.
    pub fn post_ticket(
        &mut self,
        form: TicketForm,
    ) -> Result<(Snapshot, TicketId), ValidationError> {
        let seller = self.current_user.as_seller(self.listing.default_seller_rating);
        let draft = form.into_draft(seller);
        draft.validate()?;

        Ok(self.create_ticket(draft))
    }

    /// Asks the seller of `ticket_id` for a swap on behalf of the current user
    ///
    /// A blank `offer` is recorded as no offer.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::TicketNotFound`] if the ticket is no longer
    /// listed, or [`ValidationError::MissingField`] for a blank message.
    pub fn request_swap(
        &mut self,
        ticket_id: TicketId,
        message: impl Into<String>,
        offer: Option<String>,
    ) -> Result<(Snapshot, SwapRequestId), ValidationError> {
        let seller_id = self
            .store
            .state(|s| s.ticket(ticket_id).map(|t| t.seller.id))
            .ok_or(ValidationError::TicketNotFound(ticket_id))?;

        let draft = SwapRequestDraft {
            ticket_id,
            requester_id: self.current_user.id,
            requester_name: self.current_user.name.clone(),
            requester_avatar: self.current_user.avatar.clone(),
            seller_id,
            message: message.into(),
            offer: offer.filter(|o| !o.trim().is_empty()),
        };
        draft.validate()?;

        Ok(self.create_swap_request(draft))
    }

    /// Marks a swap request accepted
    pub fn accept_swap(&mut self, id: SwapRequestId) -> Snapshot {
        self.answer_swap(id, SwapStatus::Accepted)
    }

    /// Marks a swap request declined
    pub fn decline_swap(&mut self, id: SwapRequestId) -> Snapshot {
        self.answer_swap(id, SwapStatus::Declined)
    }

    fn answer_swap(&mut self, id: SwapRequestId, status: SwapStatus) -> Snapshot {
        match self.store.state(|s| s.swap_request(id).map(|r| r.with_status(status))) {
            Some(request) => self.update_swap_request(request),
            None => {
                tracing::debug!(request_id = %id, "Answer for unknown swap request ignored");
                self.snapshot()
            },
        }
    }

    /// The listing a swap request points at, if it is still listed
    #[must_use]
    pub fn ticket_for_request<'a>(
        snapshot: &'a MarketState,
        request: &SwapRequest,
    ) -> Option<&'a Ticket> {
        snapshot.ticket(request.ticket_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::SeedSource;
    use swapmarket_testing::{SequentialIdGenerator, test_clock};

    fn market_with(initial: MarketState) -> Marketplace {
        let env = MarketEnvironment::new(
            Arc::new(test_clock()),
            Arc::new(SequentialIdGenerator::starting_at(1)),
        );
        Marketplace::new(initial, env, &Config::default())
    }

    fn form() -> TicketForm {
        TicketForm {
            title: "Oppenheimer 70mm".to_string(),
            ticket_type: TicketType::Movie,
            date: NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
            time: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
            venue: "Lincoln Square".to_string(),
            location: "New York, NY".to_string(),
            price: Money::from_cents(2_000),
            original_price: Money::from_cents(2_400),
            description: "Aisle seat".to_string(),
            image: String::new(),
        }
    }

    #[test]
    fn fresh_ids_skip_seeded_ones() {
        let initial = seed::load(&SeedSource::Builtin).unwrap();
        let mut market = market_with(initial);

        let seller = market.current_user().as_seller(4.8);
        let (snapshot, id) = market.create_ticket(form().into_draft(seller));

        assert_eq!(id, TicketId::new(5));
        assert_eq!(snapshot.tickets.len(), 5);
        assert_eq!(snapshot.tickets.last().map(|t| t.id), Some(id));
    }

    #[test]
    fn featured_takes_configured_count_in_listing_order() {
        let market = market_with(seed::load(&SeedSource::Builtin).unwrap());
        let snapshot = market.snapshot();

        let featured: Vec<u64> = market
            .featured(&snapshot)
            .iter()
            .map(|t| t.id.value())
            .collect();
        assert_eq!(featured, [1, 2, 3]);
    }

    #[test]
    fn post_ticket_uses_current_user_as_seller() {
        let mut market = market_with(MarketState::new());
        let (snapshot, id) = market.post_ticket(form()).unwrap();

        let ticket = snapshot.ticket(id).unwrap();
        assert_eq!(ticket.seller.id, market.current_user().id);
        assert_eq!(ticket.seller.name, "John Doe");
        assert!((ticket.seller.rating - 4.8).abs() < f64::EPSILON);
        assert_eq!(ticket.image, DEFAULT_TICKET_IMAGE);
    }

    #[test]
    fn post_ticket_rejects_blank_title() {
        let mut market = market_with(MarketState::new());
        let mut blank = form();
        blank.title = "  ".to_string();

        assert_eq!(
            market.post_ticket(blank),
            Err(ValidationError::MissingField("title"))
        );
        assert!(market.snapshot().tickets.is_empty());
        assert_eq!(market.version(), 0);
    }

    #[test]
    fn request_swap_copies_seller_from_ticket() {
        let initial = seed::load(&SeedSource::Builtin).unwrap();
        let mut market = market_with(initial);

        let (snapshot, id) = market
            .request_swap(TicketId::new(2), "Would you swap?", Some("   ".to_string()))
            .unwrap();

        let request = snapshot.swap_request(id).unwrap();
        assert_eq!(request.seller_id.value(), 3);
        assert_eq!(request.requester_id, market.current_user().id);
        assert_eq!(request.status, SwapStatus::Pending);
        assert_eq!(request.offer, None);
    }

    #[test]
    fn request_swap_for_missing_ticket_fails() {
        let mut market = market_with(MarketState::new());
        assert_eq!(
            market.request_swap(TicketId::new(8), "hi", None),
            Err(ValidationError::TicketNotFound(TicketId::new(8)))
        );
    }

    #[test]
    fn request_swap_needs_a_message() {
        let initial = seed::load(&SeedSource::Builtin).unwrap();
        let mut market = market_with(initial);
        assert_eq!(
            market.request_swap(TicketId::new(1), " ", None),
            Err(ValidationError::MissingField("message"))
        );
        assert!(market.snapshot().swap_requests.is_empty());
    }

    #[test]
    fn decline_then_accept_stays_declined() {
        let initial = seed::load(&SeedSource::Builtin).unwrap();
        let mut market = market_with(initial);
        let (_, id) = market.request_swap(TicketId::new(1), "hi", None).unwrap();

        market.decline_swap(id);
        let snapshot = market.accept_swap(id);

        assert_eq!(
            snapshot.swap_request(id).map(|r| r.status),
            Some(SwapStatus::Declined)
        );
    }

    #[test]
    fn answering_unknown_request_changes_nothing() {
        let mut market = market_with(MarketState::new());
        let before = market.snapshot();
        let after = market.accept_swap(SwapRequestId::new(77));
        assert_eq!(before, after);
        assert_eq!(market.version(), 0);
    }

    #[test]
    fn orphaned_request_has_no_ticket() {
        let initial = seed::load(&SeedSource::Builtin).unwrap();
        let mut market = market_with(initial);
        let (_, id) = market.request_swap(TicketId::new(4), "hi", None).unwrap();

        let snapshot = market.delete_ticket(TicketId::new(4));
        let request = snapshot.swap_request(id).unwrap();
        assert!(Marketplace::ticket_for_request(&snapshot, request).is_none());
    }
}
