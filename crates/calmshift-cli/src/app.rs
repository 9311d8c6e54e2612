//! Load-dispatch-save wrapper shared by the commands.

use std::sync::Arc;

use calmshift_core::{Action, AppState, Config, Persistor, SqliteStore, Store};

pub type CliResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// A store rehydrated from the data directory.
pub struct App {
    store: Store,
    persistor: Persistor<SqliteStore>,
}

impl App {
    pub fn open() -> CliResult<Self> {
        let config = Config::load()?;
        let persistor =
            Persistor::with_root_key(SqliteStore::open()?, config.storage.root_key.clone());
        let state = match persistor.rehydrate()? {
            Some(state) => state,
            None => {
                tracing::info!("no saved state, starting fresh");
                AppState::first_run(config.focus.clone())
            }
        };
        Ok(Self {
            store: Store::new(state),
            persistor,
        })
    }

    pub fn state(&self) -> &AppState {
        self.store.state()
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn dispatch(&mut self, action: Action) -> Arc<AppState> {
        self.store.dispatch(action)
    }

    pub fn tick(&mut self, elapsed_secs: u64) -> Arc<AppState> {
        self.store.tick(elapsed_secs)
    }

    pub fn save(&self) -> CliResult {
        self.persistor.persist(self.store.state())?;
        Ok(())
    }
}

pub fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Resolve a full id or a unique prefix of one.
pub fn resolve_id<'a, I>(ids: I, wanted: &str, what: &str) -> CliResult<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut matches = Vec::new();
    for id in ids {
        if id == wanted {
            return Ok(id.to_string());
        }
        if id.starts_with(wanted) {
            matches.push(id);
        }
    }
    match matches.as_slice() {
        [one] => Ok(one.to_string()),
        [] => Err(format!("{what} not found: {wanted}").into()),
        _ => Err(format!("ambiguous {what} id: {wanted}").into()),
    }
}
