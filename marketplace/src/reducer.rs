//! Reducer logic for the marketplace.
//!
//! Every action maps to exactly one state transition. Drafts are trusted,
//! and updates or deletes aimed at a record that does not exist leave the
//! state untouched.
//!
//! Transitions complete inside `reduce`; the marketplace returns no effects,
//! so the Store's feedback loop never runs for it.

use crate::types::{
    MarketState, SwapRequest, SwapRequestDraft, SwapRequestId, Ticket, TicketDraft, TicketId,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use swapmarket_core::{
    SmallVec,
    effect::Effect,
    environment::{Clock, IdGenerator, MonotonicIdGenerator, SystemClock},
    reducer::Reducer,
};

/// The closed set of marketplace mutations
///
/// Identities on the create variants are allocated by the caller from
/// [`MarketEnvironment::ids`]; see [`crate::Marketplace`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum MarketAction {
    /// List a new ticket
    CreateTicket {
        /// Identity for the new listing
        id: TicketId,
        /// Listing contents
        draft: TicketDraft,
    },

    /// Replace a listing, matched by id
    UpdateTicket {
        /// Full replacement record
        ticket: Ticket,
    },

    /// Remove a listing
    DeleteTicket {
        /// Listing to remove
        id: TicketId,
    },

    /// Record a new swap request
    CreateSwapRequest {
        /// Identity for the new request
        id: SwapRequestId,
        /// Request contents
        draft: SwapRequestDraft,
    },

    /// Replace a swap request, matched by id
    UpdateSwapRequest {
        /// Full replacement record
        request: SwapRequest,
    },
}

/// Environment dependencies for the marketplace reducer
#[derive(Clone)]
pub struct MarketEnvironment {
    /// Clock for creation timestamps
    pub clock: Arc<dyn Clock>,
    /// Source of ticket and swap request identities
    pub ids: Arc<dyn IdGenerator>,
}

impl MarketEnvironment {
    /// Creates a new `MarketEnvironment`
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, ids: Arc<dyn IdGenerator>) -> Self {
        Self { clock, ids }
    }

    /// System clock and timestamp-derived ids
    #[must_use]
    pub fn production() -> Self {
        Self::new(Arc::new(SystemClock), Arc::new(MonotonicIdGenerator::new()))
    }
}

impl std::fmt::Debug for MarketEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarketEnvironment").finish_non_exhaustive()
    }
}

/// Reducer for the marketplace
#[derive(Clone, Debug)]
pub struct MarketReducer;

impl MarketReducer {
    /// Creates a new `MarketReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn create_ticket(
        state: &mut MarketState,
        id: TicketId,
        draft: TicketDraft,
        env: &MarketEnvironment,
    ) {
        if state.has_ticket(id) {
            tracing::warn!(ticket_id = %id, "Ticket id already taken, listing ignored");
            return;
        }

        let ticket = Ticket::from_draft(id, draft, env.clock.now());
        tracing::debug!(ticket_id = %id, seller_id = %ticket.seller.id, "Ticket listed");
        state.tickets.push(ticket);
    }

    fn update_ticket(state: &mut MarketState, ticket: Ticket) {
        let Some(slot) = state.tickets.iter_mut().find(|t| t.id == ticket.id) else {
            tracing::debug!(ticket_id = %ticket.id, "Update for unknown ticket ignored");
            return;
        };

        let created_at = slot.created_at;
        *slot = Ticket {
            created_at,
            ..ticket
        };
        tracing::debug!(ticket_id = %slot.id, "Ticket updated");
    }

    fn delete_ticket(state: &mut MarketState, id: TicketId) {
        let before = state.tickets.len();
        state.tickets.retain(|t| t.id != id);

        if state.tickets.len() == before {
            tracing::debug!(ticket_id = %id, "Delete for unknown ticket ignored");
        } else {
            tracing::debug!(ticket_id = %id, "Ticket deleted");
        }
    }

    fn create_swap_request(
        state: &mut MarketState,
        id: SwapRequestId,
        draft: SwapRequestDraft,
        env: &MarketEnvironment,
    ) {
        if state.has_swap_request(id) {
            tracing::warn!(request_id = %id, "Swap request id already taken, request ignored");
            return;
        }

        let request = SwapRequest::from_draft(id, draft, env.clock.now());
        tracing::debug!(
            request_id = %id,
            ticket_id = %request.ticket_id,
            requester_id = %request.requester_id,
            "Swap requested"
        );
        state.swap_requests.push(request);
    }

    fn update_swap_request(state: &mut MarketState, request: SwapRequest) {
        let Some(slot) = state.swap_requests.iter_mut().find(|r| r.id == request.id) else {
            tracing::debug!(request_id = %request.id, "Update for unknown swap request ignored");
            return;
        };

        if !slot.status.can_become(request.status) {
            tracing::warn!(
                request_id = %request.id,
                from = ?slot.status,
                to = ?request.status,
                "Swap request already answered, update ignored"
            );
            return;
        }

        let created_at = slot.created_at;
        *slot = SwapRequest {
            created_at,
            ..request
        };
        tracing::debug!(request_id = %slot.id, status = ?slot.status, "Swap request updated");
    }
}

impl Default for MarketReducer {
    fn default() -> Self {
        Self::new()
    }
}

impl Reducer for MarketReducer {
    type State = MarketState;
    type Action = MarketAction;
    type Environment = MarketEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            MarketAction::CreateTicket { id, draft } => {
                Self::create_ticket(state, id, draft, env);
            },
            MarketAction::UpdateTicket { ticket } => Self::update_ticket(state, ticket),
            MarketAction::DeleteTicket { id } => Self::delete_ticket(state, id),
            MarketAction::CreateSwapRequest { id, draft } => {
                Self::create_swap_request(state, id, draft, env);
            },
            MarketAction::UpdateSwapRequest { request } => {
                Self::update_swap_request(state, request);
            },
        }

        SmallVec::new()
    }
}
