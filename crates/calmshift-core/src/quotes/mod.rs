//! Motivational quote slice.
//!
//! Holds one "daily" quote drawn at random from a fixed pool and a list of
//! favorites deduplicated by `(text, author)`.

mod pool;

use chrono::{DateTime, Local, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

pub use pool::builtin_quotes;

const REFRESH_FAILED: &str = "Failed to refresh quote";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Quote {
    pub text: String,
    pub author: String,
}

impl Quote {
    pub fn new(text: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            author: author.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteState {
    daily_quote: Option<Quote>,
    #[serde(default)]
    favorite_quotes: Vec<Quote>,
    #[serde(default)]
    last_refresh_date: Option<DateTime<Utc>>,
    #[serde(default)]
    is_loading: bool,
    #[serde(default)]
    error: Option<String>,
}

impl QuoteState {
    /// Fresh state with a daily quote already drawn from `pool`.
    ///
    /// The initial draw does not count as a refresh.
    pub fn seeded<R: Rng + ?Sized>(pool: &[Quote], rng: &mut R) -> Self {
        Self {
            daily_quote: pool.choose(rng).cloned(),
            ..Default::default()
        }
    }

    pub fn daily_quote(&self) -> Option<&Quote> {
        self.daily_quote.as_ref()
    }

    pub fn favorite_quotes(&self) -> &[Quote] {
        &self.favorite_quotes
    }

    pub fn last_refresh_date(&self) -> Option<DateTime<Utc>> {
        self.last_refresh_date
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_favorite(&self, quote: &Quote) -> bool {
        self.favorite_quotes.contains(quote)
    }

    /// Replace the daily quote with a uniform draw from `pool`.
    ///
    /// An empty pool leaves the previous quote in place and records the
    /// failure in the `error` slot.
    pub fn refresh_daily_quote<R: Rng + ?Sized>(
        &mut self,
        pool: &[Quote],
        rng: &mut R,
        now: DateTime<Utc>,
    ) {
        self.is_loading = true;
        self.error = None;
        match pool.choose(rng) {
            Some(quote) => {
                self.daily_quote = Some(quote.clone());
                self.last_refresh_date = Some(now);
            }
            None => {
                tracing::warn!("quote pool is empty, keeping previous daily quote");
                self.error = Some(REFRESH_FAILED.to_string());
            }
        }
        self.is_loading = false;
    }

    /// True when no refresh has happened yet on the local calendar day of `now`.
    pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
        let today = now.with_timezone(&Local).date_naive();
        match self.last_refresh_date {
            Some(last) => last.with_timezone(&Local).date_naive() < today,
            None => true,
        }
    }

    /// Refresh only on the first call of a new day. Returns whether a draw
    /// was attempted.
    pub fn refresh_if_stale<R: Rng + ?Sized>(
        &mut self,
        pool: &[Quote],
        rng: &mut R,
        now: DateTime<Utc>,
    ) -> bool {
        if !self.is_stale(now) {
            return false;
        }
        self.refresh_daily_quote(pool, rng, now);
        true
    }

    pub fn add_to_favorites(&mut self, quote: Quote) {
        if !self.is_favorite(&quote) {
            self.favorite_quotes.push(quote);
        }
    }

    pub fn remove_from_favorites(&mut self, quote: &Quote) {
        self.favorite_quotes.retain(|q| q != quote);
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }
}
