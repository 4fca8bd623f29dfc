//! Domain types for the ticket swap marketplace.
//!
//! This module contains the value objects, entities, drafts, and state of the
//! marketplace: tickets listed for sale or swap, and swap requests made
//! against them.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// ============================================================================
// Identifiers
// ============================================================================

/// Unique identifier for a ticket listing
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketId(u64);

impl TicketId {
    /// Creates a `TicketId` from its numeric value
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the numeric value
    #[must_use]
    pub const fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a swap request
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SwapRequestId(u64);

impl SwapRequestId {
    /// Creates a `SwapRequestId` from its numeric value
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the numeric value
    #[must_use]
    pub const fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SwapRequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a marketplace user (buyer, seller, or requester)
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(u64);

impl UserId {
    /// Creates a `UserId` from its numeric value
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the numeric value
    #[must_use]
    pub const fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Money Value Object (cents-based to avoid floating point errors)
// ============================================================================

/// Errors from parsing a money amount typed by a user
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoneyError {
    /// Nothing was entered
    #[error("amount is empty")]
    Empty,

    /// Not a non-negative decimal number
    #[error("'{0}' is not a valid amount")]
    Invalid(String),

    /// More than two digits after the decimal point
    #[error("'{0}' has more than two decimal places")]
    TooPrecise(String),

    /// Does not fit in the representable range
    #[error("'{0}' is too large")]
    Overflow(String),
}

/// A non-negative amount of money, held in cents
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(u64);

impl Money {
    /// Creates a `Money` value from cents
    #[must_use]
    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    /// Returns the amount in cents
    #[must_use]
    pub const fn cents(&self) -> u64 {
        self.0
    }

    /// Returns the amount in dollars (rounded down)
    #[must_use]
    pub const fn dollars(&self) -> u64 {
        self.0 / 100
    }

    /// The signed difference `self - other`, in cents
    #[must_use]
    pub fn signed_difference(self, other: Self) -> i128 {
        i128::from(self.0) - i128::from(other.0)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}.{:02}", self.dollars(), self.0 % 100)
    }
}

impl FromStr for Money {
    type Err = MoneyError;

    /// Parses `"25"`, `"25.5"`, `"25.50"` or `"$25.50"`
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        let digits = trimmed.strip_prefix('$').unwrap_or(trimmed);
        if digits.is_empty() {
            return Err(MoneyError::Empty);
        }

        let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));
        let is_numeric = |part: &str| part.chars().all(|c| c.is_ascii_digit());
        if whole.is_empty() || !is_numeric(whole) || !is_numeric(fraction) {
            return Err(MoneyError::Invalid(input.to_string()));
        }
        if fraction.len() > 2 {
            return Err(MoneyError::TooPrecise(input.to_string()));
        }

        let overflow = || MoneyError::Overflow(input.to_string());
        let dollars: u64 = whole.parse().map_err(|_| overflow())?;
        let cents: u64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<u64>().map_err(|_| overflow())? * 10,
            _ => fraction.parse().map_err(|_| overflow())?,
        };

        dollars
            .checked_mul(100)
            .and_then(|c| c.checked_add(cents))
            .map(Self)
            .ok_or_else(overflow)
    }
}

// ============================================================================
// Enumerations
// ============================================================================

/// What kind of admission a ticket grants
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketType {
    /// A cinema screening
    Movie,
    /// A concert, show, or other live event
    Event,
}

impl TicketType {
    /// The lowercase name used in URLs and filters
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Event => "event",
        }
    }

    /// Parses `"movie"` or `"event"`, ignoring case and surrounding space
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "movie" => Some(Self::Movie),
            "event" => Some(Self::Event),
            _ => None,
        }
    }
}

impl fmt::Display for TicketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sale status of a listing
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketStatus {
    /// Open for purchase or swap
    #[default]
    Available,
    /// No longer on offer
    Sold,
}

/// Lifecycle of a swap request
///
/// `Pending` may move to `Accepted` or `Declined`; both are terminal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwapStatus {
    /// Awaiting the seller's answer
    #[default]
    Pending,
    /// The seller agreed
    Accepted,
    /// The seller refused
    Declined,
}

impl SwapStatus {
    /// Returns true once the seller has answered
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Accepted | Self::Declined)
    }

    /// Whether a request in this status may be recorded as `next`
    #[must_use]
    pub fn can_become(self, next: Self) -> bool {
        self == next || !self.is_terminal()
    }
}

// ============================================================================
// People
// ============================================================================

/// The signed-in user, supplied by the host application and trusted as-is
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User identifier
    pub id: UserId,
    /// Display name
    pub name: String,
    /// Contact email
    pub email: String,
    /// Avatar image URL
    pub avatar: String,
}

impl CurrentUser {
    /// The seller snapshot to embed in a listing posted by this user
    #[must_use]
    pub fn as_seller(&self, rating: f64) -> SellerSnapshot {
        SellerSnapshot {
            id: self.id,
            name: self.name.clone(),
            avatar: self.avatar.clone(),
            rating,
        }
    }
}

/// Seller details copied into a listing when it is created
///
/// Not a live link: later profile changes do not reach existing listings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SellerSnapshot {
    /// Seller's user id
    pub id: UserId,
    /// Seller's display name at listing time
    pub name: String,
    /// Seller's avatar URL at listing time
    pub avatar: String,
    /// Seller rating, 0.0 to 5.0
    pub rating: f64,
}

// ============================================================================
// Tickets
// ============================================================================

/// Everything needed to list a ticket, minus what the store assigns
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketDraft {
    /// Listing headline
    pub title: String,
    /// Movie or event
    #[serde(rename = "type")]
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
    /// Free-text details from the seller
    pub description: String,
    /// Display image URL
    pub image: String,
    /// Seller snapshot
    pub seller: SellerSnapshot,
}

/// A ticket listed on the marketplace
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    /// Store-assigned identity
    pub id: TicketId,
    /// Listing headline
    pub title: String,
    /// Movie or event
    #[serde(rename = "type")]
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
    /// Free-text details from the seller
    pub description: String,
    /// Display image URL
    pub image: String,
    /// Seller snapshot taken at listing time
    pub seller: SellerSnapshot,
    /// Sale status
    pub status: TicketStatus,
    /// When the listing was created
    pub created_at: DateTime<Utc>,
}

impl Ticket {
    /// Builds a newly listed ticket from a draft
    #[must_use]
    pub fn from_draft(id: TicketId, draft: TicketDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title: draft.title,
            ticket_type: draft.ticket_type,
            date: draft.date,
            time: draft.time,
            venue: draft.venue,
            location: draft.location,
            price: draft.price,
            original_price: draft.original_price,
            description: draft.description,
            image: draft.image,
            seller: draft.seller,
            status: TicketStatus::Available,
            created_at,
        }
    }

    /// Face value minus asking price, in cents
    ///
    /// Negative when the seller asks more than face value.
    #[must_use]
    pub fn savings(&self) -> i128 {
        self.original_price.signed_difference(self.price)
    }

    /// Returns true while the ticket can still be bought or swapped
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.status == TicketStatus::Available
    }
}

// ============================================================================
// Swap Requests
// ============================================================================

/// A swap proposal as submitted, minus what the store assigns
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapRequestDraft {
    /// Ticket being asked for
    pub ticket_id: TicketId,
    /// Who is asking
    pub requester_id: UserId,
    /// Requester display name at request time
    pub requester_name: String,
    /// Requester avatar at request time
    pub requester_avatar: String,
    /// Seller of the ticket at request time
    pub seller_id: UserId,
    /// Note to the seller (required)
    pub message: String,
    /// What the requester offers in exchange
    pub offer: Option<String>,
}

/// A proposal to swap for, or acquire, another user's ticket
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapRequest {
    /// Store-assigned identity
    pub id: SwapRequestId,
    /// Ticket being asked for; may no longer exist
    pub ticket_id: TicketId,
    /// Who is asking
    pub requester_id: UserId,
    /// Requester display name at request time
    pub requester_name: String,
    /// Requester avatar at request time
    pub requester_avatar: String,
    /// Seller of the ticket at request time
    pub seller_id: UserId,
    /// Note to the seller
    pub message: String,
    /// What the requester offers in exchange
    pub offer: Option<String>,
    /// Where the request is in its lifecycle
    pub status: SwapStatus,
    /// When the request was made
    pub created_at: DateTime<Utc>,
}

impl SwapRequest {
    /// Builds a new pending request from a draft
    #[must_use]
    pub fn from_draft(
        id: SwapRequestId,
        draft: SwapRequestDraft,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            ticket_id: draft.ticket_id,
            requester_id: draft.requester_id,
            requester_name: draft.requester_name,
            requester_avatar: draft.requester_avatar,
            seller_id: draft.seller_id,
            message: draft.message,
            offer: draft.offer,
            status: SwapStatus::Pending,
            created_at,
        }
    }

    /// Returns true if `user` made or received this request
    #[must_use]
    pub fn involves(&self, user: UserId) -> bool {
        self.requester_id == user || self.seller_id == user
    }

    /// The same request with a new status, every other field kept
    #[must_use]
    pub fn with_status(&self, status: SwapStatus) -> Self {
        Self {
            status,
            ..self.clone()
        }
    }
}

// ============================================================================
// State
// ============================================================================

/// The complete marketplace state: one snapshot of both collections
///
/// Both collections keep insertion order and never hold two records with
/// the same id.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketState {
    /// Listings in the order they were created
    pub tickets: Vec<Ticket>,
    /// Swap requests in the order they were made
    pub swap_requests: Vec<SwapRequest>,
}

impl MarketState {
    /// Creates an empty marketplace
    #[must_use]
    pub const fn new() -> Self {
        Self {
            tickets: Vec::new(),
            swap_requests: Vec::new(),
        }
    }

    /// A marketplace pre-populated with `tickets`
    #[must_use]
    pub const fn with_tickets(tickets: Vec<Ticket>) -> Self {
        Self {
            tickets,
            swap_requests: Vec::new(),
        }
    }

    /// Returns a ticket by ID
    #[must_use]
    pub fn ticket(&self, id: TicketId) -> Option<&Ticket> {
        self.tickets.iter().find(|t| t.id == id)
    }

    /// Returns a swap request by ID
    #[must_use]
    pub fn swap_request(&self, id: SwapRequestId) -> Option<&SwapRequest> {
        self.swap_requests.iter().find(|r| r.id == id)
    }

    /// Checks if a ticket exists
    #[must_use]
    pub fn has_ticket(&self, id: TicketId) -> bool {
        self.ticket(id).is_some()
    }

    /// Checks if a swap request exists
    #[must_use]
    pub fn has_swap_request(&self, id: SwapRequestId) -> bool {
        self.swap_request(id).is_some()
    }

    /// Swap requests whose ticket has since been deleted
    #[must_use]
    pub fn orphaned_swap_requests(&self) -> Vec<&SwapRequest> {
        self.swap_requests
            .iter()
            .filter(|r| !self.has_ticket(r.ticket_id))
            .collect()
    }
}
