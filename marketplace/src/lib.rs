//! Ticket swap marketplace built on the swap market reducer runtime.
//!
//! Users list movie and event tickets, browse and filter listings, and ask
//! sellers for swaps. All state lives in one store driven by five actions:
//!
//! - Create, update and delete a ticket listing
//! - Create and update a swap request
//!
//! Every mutation yields an immutable [`Snapshot`]. The functions in
//! [`query`] are pure and read only from a snapshot, so any page can derive
//! its view (search, type and price filters, sort order, a user's profile)
//! without touching the store.
//!
//! # Quick Start
//!
//! ```no_run
//! use marketplace::{Config, Marketplace, TicketId};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::from_env();
//! let mut market = Marketplace::from_config(&config)?;
//!
//! // Browse the listing page
//! let snapshot = market.snapshot();
//! let query = market.default_query().with_term("madison");
//! for ticket in query.apply(&snapshot.tickets) {
//!     println!("{} at {}: {}", ticket.title, ticket.venue, ticket.price);
//! }
//!
//! // Ask the seller for a swap
//! let (snapshot, request_id) =
//!     market.request_swap(TicketId::new(2), "Would you swap for two floor seats?", None)?;
//! println!("{} requests", snapshot.swap_requests.len());
//! market.accept_swap(request_id);
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod config;
pub mod query;
pub mod reducer;
pub mod seed;
pub mod types;
pub mod validation;

// Re-export commonly used types
pub use app::{DEFAULT_TICKET_IMAGE, MarketStore, Marketplace, Snapshot, TicketForm};
pub use config::{Config, ListingConfig};
pub use query::{PriceRange, ProfileView, SortKey, TicketQuery, TypeFilter};
pub use reducer::{MarketAction, MarketEnvironment, MarketReducer};
pub use seed::{SeedError, SeedSource};
pub use types::{
    CurrentUser, MarketState, Money, SellerSnapshot, SwapRequest, SwapRequestDraft, SwapRequestId,
    SwapStatus, Ticket, TicketDraft, TicketId, TicketStatus, TicketType, UserId,
};
pub use validation::ValidationError;
