use clap::Subcommand;
use calmshift_core::{Action, Quote};

use crate::app::{print_json, App, CliResult};

#[derive(Subcommand)]
pub enum QuoteAction {
    /// Today's quote (draws a new one on the first call of the day)
    Today,
    /// Draw a new daily quote now
    Refresh,
    /// Save a quote to favorites (default: the daily quote)
    Favorite {
        #[arg(long, requires = "author")]
        text: Option<String>,
        #[arg(long, requires = "text")]
        author: Option<String>,
    },
    /// Remove a favorite by its position in `favorites`
    Unfavorite {
        /// 1-based position
        index: usize,
    },
    /// List favorites
    Favorites,
}

pub fn run(action: QuoteAction) -> CliResult {
    let mut app = App::open()?;

    match action {
        QuoteAction::Today => {
            let state = app.dispatch(Action::RefreshDailyQuoteIfStale);
            print_json(&state.quotes.daily_quote())?;
        }
        QuoteAction::Refresh => {
            let state = app.dispatch(Action::RefreshDailyQuote);
            if let Some(err) = state.quotes.error() {
                let message = err.to_string();
                app.dispatch(Action::ClearQuoteError);
                app.save()?;
                return Err(message.into());
            }
            print_json(&state.quotes.daily_quote())?;
        }
        QuoteAction::Favorite { text, author } => {
            let quote = match (text, author) {
                (Some(text), Some(author)) => Quote::new(text, author),
                _ => app
                    .state()
                    .quotes
                    .daily_quote()
                    .cloned()
                    .ok_or("no daily quote to save")?,
            };
            let state = app.dispatch(Action::AddToFavorites { quote });
            print_json(state.quotes.favorite_quotes())?;
        }
        QuoteAction::Unfavorite { index } => {
            let quote = index
                .checked_sub(1)
                .and_then(|i| app.state().quotes.favorite_quotes().get(i))
                .cloned()
                .ok_or_else(|| format!("no favorite at position {index}"))?;
            let state = app.dispatch(Action::RemoveFromFavorites { quote });
            print_json(state.quotes.favorite_quotes())?;
        }
        QuoteAction::Favorites => {
            print_json(app.state().quotes.favorite_quotes())?;
            return Ok(());
        }
    }

    app.save()
}
