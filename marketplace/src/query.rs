//! Read-only views over a marketplace snapshot.
//!
//! Every function here borrows from a snapshot and returns the matching
//! records in a defined order. Nothing in this module mutates state or
//! fails: malformed criteria fall back to the unfiltered, unsorted view.
//!
//! Filters compose in any order with the same result. Sorting always comes
//! last, over the already filtered set.

use crate::types::{MarketState, Money, SwapRequest, Ticket, TicketId, TicketType, UserId};
use std::cmp::Reverse;
use std::fmt;

// ============================================================================
// Criteria
// ============================================================================

/// Category filter for the listing page
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TypeFilter {
    /// Every ticket type
    #[default]
    All,
    /// A single ticket type
    Only(TicketType),
}

impl TypeFilter {
    /// Parses `"all"`, `"movie"` or `"event"`
    ///
    /// Anything unrecognised means `All`.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        TicketType::parse(value).map_or(Self::All, Self::Only)
    }

    /// Returns true if `ticket` passes the filter
    #[must_use]
    pub fn matches(&self, ticket: &Ticket) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => ticket.ticket_type == *wanted,
        }
    }
}

impl fmt::Display for TypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(ticket_type) => fmt::Display::fmt(ticket_type, f),
        }
    }
}

/// Inclusive asking-price bounds
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PriceRange {
    /// Lowest accepted price
    pub min: Money,
    /// Highest accepted price
    pub max: Money,
}

impl PriceRange {
    /// Creates a range from `min` to `max`, both inclusive
    ///
    /// A range with `min > max` contains nothing.
    #[must_use]
    pub const fn new(min: Money, max: Money) -> Self {
        Self { min, max }
    }

    /// From zero up to and including `max`
    #[must_use]
    pub const fn up_to(max: Money) -> Self {
        Self::new(Money::from_cents(0), max)
    }

    /// Every representable price
    #[must_use]
    pub const fn any() -> Self {
        Self::up_to(Money::from_cents(u64::MAX))
    }

    /// Returns true if `price` lies within the range
    #[must_use]
    pub fn contains(&self, price: Money) -> bool {
        self.min <= price && price <= self.max
    }
}

impl Default for PriceRange {
    fn default() -> Self {
        Self::any()
    }
}

/// Ordering for the listing page
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortKey {
    /// Earliest event date first
    #[default]
    Date,
    /// Cheapest first
    PriceLow,
    /// Most expensive first
    PriceHigh,
    /// Best-rated seller first
    Rating,
    /// Listing order, untouched
    Listed,
}

impl SortKey {
    /// Parses `"date"`, `"price-low"`, `"price-high"` or `"rating"`
    ///
    /// Anything unrecognised means `Listed`.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "date" => Self::Date,
            "price-low" => Self::PriceLow,
            "price-high" => Self::PriceHigh,
            "rating" => Self::Rating,
            _ => Self::Listed,
        }
    }

    /// The name accepted by [`SortKey::parse`]
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::PriceLow => "price-low",
            Self::PriceHigh => "price-high",
            Self::Rating => "rating",
            Self::Listed => "listed",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Ticket views
// ============================================================================

/// The lowercased term to look for, or `None` when every ticket matches
///
/// Only blankness is judged on the trimmed term; surrounding whitespace in
/// a non-blank term is part of what must match.
fn search_needle(term: &str) -> Option<String> {
    (!term.trim().is_empty()).then(|| term.to_lowercase())
}

fn matches_term(ticket: &Ticket, needle: Option<&str>) -> bool {
    needle.is_none_or(|needle| {
        [&ticket.title, &ticket.venue, &ticket.location]
            .into_iter()
            .any(|field| field.to_lowercase().contains(needle))
    })
}

/// Tickets whose title, venue, or location contains `term`, ignoring case
///
/// A blank term matches every ticket.
pub fn search<'a, I>(tickets: I, term: &str) -> Vec<&'a Ticket>
where
    I: IntoIterator<Item = &'a Ticket>,
{
    let needle = search_needle(term);
    tickets
        .into_iter()
        .filter(|ticket| matches_term(ticket, needle.as_deref()))
        .collect()
}

/// Tickets passing the category filter
pub fn filter_by_type<'a, I>(tickets: I, filter: TypeFilter) -> Vec<&'a Ticket>
where
    I: IntoIterator<Item = &'a Ticket>,
{
    tickets
        .into_iter()
        .filter(|ticket| filter.matches(ticket))
        .collect()
}

/// Tickets whose asking price lies within `range`, bounds included
pub fn filter_by_price_range<'a, I>(tickets: I, range: PriceRange) -> Vec<&'a Ticket>
where
    I: IntoIterator<Item = &'a Ticket>,
{
    tickets
        .into_iter()
        .filter(|ticket| range.contains(ticket.price))
        .collect()
}

/// Tickets matching the search term, the category, and the price range
pub fn combined_filter<'a, I>(
    tickets: I,
    term: &str,
    filter: TypeFilter,
    range: PriceRange,
) -> Vec<&'a Ticket>
where
    I: IntoIterator<Item = &'a Ticket>,
{
    let needle = search_needle(term);
    tickets
        .into_iter()
        .filter(|ticket| {
            matches_term(ticket, needle.as_deref())
                && filter.matches(ticket)
                && range.contains(ticket.price)
        })
        .collect()
}

/// Seller rating with `-0.0` folded into `0.0`, so equal ratings tie under `total_cmp`
fn rating_key(ticket: &Ticket) -> f64 {
    ticket.seller.rating + 0.0
}

/// Tickets ordered by `key`
///
/// The sort is stable: tickets with equal keys keep their input order.
pub fn sort<'a, I>(tickets: I, key: SortKey) -> Vec<&'a Ticket>
where
    I: IntoIterator<Item = &'a Ticket>,
{
    let mut sorted: Vec<&Ticket> = tickets.into_iter().collect();
    match key {
        SortKey::Date => sorted.sort_by_key(|ticket| ticket.date),
        SortKey::PriceLow => sorted.sort_by_key(|ticket| ticket.price),
        SortKey::PriceHigh => sorted.sort_by_key(|ticket| Reverse(ticket.price)),
        SortKey::Rating => {
            sorted.sort_by(|a, b| rating_key(b).total_cmp(&rating_key(a)));
        },
        SortKey::Listed => {},
    }
    sorted
}

/// Tickets listed by `seller`, in listing order
pub fn tickets_by_seller<'a, I>(tickets: I, seller: UserId) -> Vec<&'a Ticket>
where
    I: IntoIterator<Item = &'a Ticket>,
{
    tickets
        .into_iter()
        .filter(|ticket| ticket.seller.id == seller)
        .collect()
}

/// The ticket with `id`, if it is still listed
pub fn find_ticket<'a, I>(tickets: I, id: TicketId) -> Option<&'a Ticket>
where
    I: IntoIterator<Item = &'a Ticket>,
{
    tickets.into_iter().find(|ticket| ticket.id == id)
}

/// The first `count` tickets in listing order
pub fn featured<'a, I>(tickets: I, count: usize) -> Vec<&'a Ticket>
where
    I: IntoIterator<Item = &'a Ticket>,
{
    tickets.into_iter().take(count).collect()
}

// ============================================================================
// Swap request views
// ============================================================================

/// Swap requests `user` made or received, in the order they were made
pub fn swap_requests_for_user<'a, I>(requests: I, user: UserId) -> Vec<&'a SwapRequest>
where
    I: IntoIterator<Item = &'a SwapRequest>,
{
    requests
        .into_iter()
        .filter(|request| request.involves(user))
        .collect()
}

// ============================================================================
// Page-level bundles
// ============================================================================

/// Everything the listing page filters and sorts by
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TicketQuery {
    /// Free-text search over title, venue, and location
    pub term: String,
    /// Category
    pub type_filter: TypeFilter,
    /// Asking price bounds
    pub price_range: PriceRange,
    /// Result order
    pub sort: SortKey,
}

impl TicketQuery {
    /// The listing page's initial criteria: everything up to `ceiling`, by date
    #[must_use]
    pub fn listing(ceiling: Money) -> Self {
        Self {
            price_range: PriceRange::up_to(ceiling),
            ..Self::default()
        }
    }

    /// Sets the search term
    #[must_use]
    pub fn with_term(mut self, term: impl Into<String>) -> Self {
        self.term = term.into();
        self
    }

    /// Sets the category
    #[must_use]
    pub const fn with_type(mut self, filter: TypeFilter) -> Self {
        self.type_filter = filter;
        self
    }

    /// Sets the price bounds
    #[must_use]
    pub const fn with_price_range(mut self, range: PriceRange) -> Self {
        self.price_range = range;
        self
    }

    /// Sets the order
    #[must_use]
    pub const fn sorted_by(mut self, key: SortKey) -> Self {
        self.sort = key;
        self
    }

    /// Filters, then sorts
    pub fn apply<'a, I>(&self, tickets: I) -> Vec<&'a Ticket>
    where
        I: IntoIterator<Item = &'a Ticket>,
    {
        let filtered = combined_filter(tickets, &self.term, self.type_filter, self.price_range);
        sort(filtered, self.sort)
    }
}

/// What the profile page shows for one user
#[derive(Clone, Debug, PartialEq)]
pub struct ProfileView<'a> {
    /// Tickets the user is selling
    pub tickets: Vec<&'a Ticket>,
    /// Swap requests the user made or received
    pub swap_requests: Vec<&'a SwapRequest>,
}

impl<'a> ProfileView<'a> {
    /// Builds the profile of `user` from `state`
    #[must_use]
    pub fn for_user(state: &'a MarketState, user: UserId) -> Self {
        Self {
            tickets: tickets_by_seller(&state.tickets, user),
            swap_requests: swap_requests_for_user(&state.swap_requests, user),
        }
    }

    /// Requests still waiting for an answer
    #[must_use]
    pub fn pending_requests(&self) -> usize {
        self.swap_requests
            .iter()
            .filter(|request| !request.status.is_terminal())
            .count()
    }
}
