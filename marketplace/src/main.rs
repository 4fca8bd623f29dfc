//! Scripted walkthrough of the ticket swap marketplace.
//!
//! Seeds the store, browses the listing page, posts a ticket, trades swap
//! requests and prints each user's profile along the way.
//!
//! # Usage
//!
//! ```bash
//! MARKET_LOG_LEVEL=debug cargo run --bin marketplace
//! ```

use chrono::{NaiveDate, NaiveTime};
use marketplace::config::DEFAULT_LOG_FILTER;
use marketplace::{
    Config, Marketplace, Money, PriceRange, ProfileView, SortKey, TicketForm, TicketId,
    TicketType, TypeFilter, query,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .or_else(|_| tracing_subscriber::EnvFilter::try_new(&config.log_level))
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("\n🎟️  ============================================");
    println!("   Ticket Swap Marketplace - Walkthrough");
    println!("============================================\n");

    let mut market = Marketplace::from_config(&config)?;
    let me = market.current_user().clone();
    println!("Signed in as {} ({})\n", me.name, me.email);

    // ========== Home page ==========

    let snapshot = market.snapshot();
    println!("1️⃣  Featured listings:");
    for ticket in market.featured(&snapshot) {
        println!("   - {} | {} | {}", ticket.title, ticket.venue, ticket.price);
    }

    // ========== Listing page ==========

    println!("\n2️⃣  Events under $130, cheapest first:");
    let events = market
        .default_query()
        .with_type(TypeFilter::Only(TicketType::Event))
        .with_price_range(PriceRange::up_to(Money::from_cents(13_000)))
        .sorted_by(SortKey::PriceLow)
        .apply(&snapshot.tickets);
    for ticket in &events {
        println!(
            "   - {} | {} (face value {})",
            ticket.title, ticket.price, ticket.original_price
        );
    }
    if events.is_empty() {
        println!("   (none)");
    }

    println!("\n   Search \"madison\":");
    for ticket in query::search(&snapshot.tickets, "madison") {
        println!("   - {} at {}", ticket.title, ticket.venue);
    }

    // ========== Post a ticket ==========

    println!("\n3️⃣  Posting a ticket...");
    let form = TicketForm {
        title: "Dune: Part Two IMAX".to_string(),
        ticket_type: TicketType::Movie,
        date: NaiveDate::from_ymd_opt(2024, 3, 9).ok_or("invalid date")?,
        time: NaiveTime::from_hms_opt(21, 15, 0).ok_or("invalid time")?,
        venue: "AMC Lincoln Square".to_string(),
        location: "New York, NY".to_string(),
        price: "22".parse()?,
        original_price: "27.50".parse()?,
        description: "Center seat, row H".to_string(),
        image: String::new(),
    };
    let (snapshot, posted) = market.post_ticket(form)?;
    println!("   ✓ Listed ticket {posted} ({} listings total)", snapshot.tickets.len());

    // ========== Swap requests ==========

    println!("\n4️⃣  Requesting a swap for ticket 2...");
    let (snapshot, request_id) = market.request_swap(
        TicketId::new(2),
        "Would you swap for two Broadway seats?",
        Some("Hamilton, Saturday matinee".to_string()),
    )?;
    if let Some(request) = snapshot.swap_request(request_id) {
        let ticket = Marketplace::ticket_for_request(&snapshot, request)
            .map_or("(deleted listing)", |t| t.title.as_str());
        println!("   ✓ Request {request_id} for \"{ticket}\" is {:?}", request.status);
    }

    println!("\n5️⃣  Seller accepts...");
    let snapshot = market.accept_swap(request_id);
    if let Some(request) = snapshot.swap_request(request_id) {
        println!("   ✓ Request {request_id} is now {:?}", request.status);
    }

    // ========== Profiles ==========

    println!("\n6️⃣  Profiles:");
    let seller = snapshot
        .ticket(TicketId::new(2))
        .map(|t| t.seller.clone())
        .ok_or("seed listing 2 missing")?;
    for (name, id) in [(me.name.as_str(), me.id), (seller.name.as_str(), seller.id)] {
        let profile = ProfileView::for_user(&snapshot, id);
        println!(
            "   {name}: {} listings, {} swap requests ({} pending)",
            profile.tickets.len(),
            profile.swap_requests.len(),
            profile.pending_requests()
        );
    }

    // ========== Delete ==========

    println!("\n7️⃣  Deleting ticket 2...");
    let snapshot = market.delete_ticket(TicketId::new(2));
    println!(
        "   ✓ {} listings left, {} swap request(s) now point at a removed listing",
        snapshot.tickets.len(),
        snapshot.orphaned_swap_requests().len()
    );

    println!("\nStore version: {}", market.version());
    println!("\n============================================\n");

    Ok(())
}
