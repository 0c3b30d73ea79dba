// src/state.rs

use axum::extract::FromRef;

use crate::{config::Config, services::ProgressService, store::DynStore};

#[derive(Clone)]
pub struct AppState {
    pub store: DynStore,
    pub progress: ProgressService,
    pub config: Config,
}

impl AppState {
    /// Wires the progress service onto the given store.
    pub fn new(store: DynStore, config: Config) -> Self {
        let progress = ProgressService::new(store.clone(), config.grading);
        Self {
            store,
            progress,
            config,
        }
    }
}

impl FromRef<AppState> for DynStore {
    fn from_ref(state: &AppState) -> Self {
        state.store.clone()
    }
}

impl FromRef<AppState> for ProgressService {
    fn from_ref(state: &AppState) -> Self {
        state.progress.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
