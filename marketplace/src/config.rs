//! Configuration management for the marketplace.
//!
//! Loads configuration from environment variables with sensible defaults.

use crate::seed::SeedSource;
use crate::types::{CurrentUser, Money, UserId};
use std::env;

/// Log filter used when `RUST_LOG` and `MARKET_LOG_LEVEL` are unset
pub const DEFAULT_LOG_FILTER: &str = "info,marketplace=debug";

/// Rating given to listings posted by the current user
pub const DEFAULT_SELLER_RATING: f64 = 4.8;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// `EnvFilter` directive, e.g. `info` or `info,marketplace=debug`
    pub log_level: String,
    /// Where initial listings come from
    pub seed: SeedSource,
    /// The signed-in user
    pub current_user: CurrentUser,
    /// Listing and home page settings
    pub listing: ListingConfig,
}

/// Listing and home page settings
#[derive(Debug, Clone, PartialEq)]
pub struct ListingConfig {
    /// Upper bound of the listing page's price filter
    pub price_ceiling: Money,
    /// How many listings the home page features
    pub featured_count: usize,
    /// Rating stamped on listings posted by the current user
    pub default_seller_rating: f64,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            price_ceiling: Money::from_cents(50_000),
            featured_count: 3,
            default_seller_rating: DEFAULT_SELLER_RATING,
        }
    }
}

fn default_user() -> CurrentUser {
    CurrentUser {
        id: UserId::new(1),
        name: "John Doe".to_string(),
        email: "john@example.com".to_string(),
        avatar: "https://images.unsplash.com/photo-1472099645785-5658abf4ff4e?w=100&h=100&fit=crop&crop=face"
            .to_string(),
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_FILTER.to_string(),
            seed: SeedSource::Builtin,
            current_user: default_user(),
            listing: ListingConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Unset or unparsable variables fall back to their defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key/value source.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let user = defaults.current_user;
        let listing = defaults.listing;

        Self {
            log_level: lookup("MARKET_LOG_LEVEL").unwrap_or(defaults.log_level),
            seed: lookup("MARKET_SEED")
                .map(|s| SeedSource::parse(&s))
                .unwrap_or(defaults.seed),
            current_user: CurrentUser {
                id: lookup("MARKET_USER_ID")
                    .and_then(|s| s.parse().ok())
                    .map_or(user.id, UserId::new),
                name: lookup("MARKET_USER_NAME").unwrap_or(user.name),
                email: lookup("MARKET_USER_EMAIL").unwrap_or(user.email),
                avatar: lookup("MARKET_USER_AVATAR").unwrap_or(user.avatar),
            },
            listing: ListingConfig {
                price_ceiling: lookup("MARKET_PRICE_CEILING")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(listing.price_ceiling),
                featured_count: lookup("MARKET_FEATURED_COUNT")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(listing.featured_count),
                default_seller_rating: lookup("MARKET_DEFAULT_SELLER_RATING")
                    .and_then(|s| s.parse().ok())
                    .filter(|rating: &f64| rating.is_finite())
                    .unwrap_or(listing.default_seller_rating),
            },
        }
    }
}
