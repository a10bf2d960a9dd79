use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use super::ApiError;

/// Shared "ignore my result" marker for one in-flight load.
///
/// Cancelling does not abort the request; the response is simply dropped
/// when it arrives.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// Whether both handles belong to the same load.
    pub fn same_load(&self, other: &CancelFlag) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// What a panel shows for a remote collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState<T> {
    Idle,
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> Default for LoadState<T> {
    fn default() -> Self {
        Self::Idle
    }
}

impl<T> LoadState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// A remotely loaded value where the most recent request wins.
///
/// Each `begin` cancels the previous load's flag, so a slow response for a
/// superseded request can never overwrite newer state.
#[derive(Debug)]
pub struct Resource<T> {
    state: LoadState<T>,
    current: Option<CancelFlag>,
}

impl<T> Default for Resource<T> {
    fn default() -> Self {
        Self {
            state: LoadState::Idle,
            current: None,
        }
    }
}

impl<T> Resource<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &LoadState<T> {
        &self.state
    }

    /// Edit the committed value in place, starting from `T::default()` when
    /// nothing is committed yet. An in-flight load stays live.
    pub fn update(&mut self, edit: impl FnOnce(&mut T))
    where
        T: Default,
    {
        let mut value = match std::mem::take(&mut self.state) {
            LoadState::Ready(value) => value,
            _ => T::default(),
        };
        edit(&mut value);
        self.state = LoadState::Ready(value);
    }

    /// Start a load (or a manual retry) and hand back its flag.
    pub fn begin(&mut self) -> CancelFlag {
        if let Some(previous) = self.current.take() {
            previous.cancel();
        }
        let flag = CancelFlag::new();
        self.current = Some(flag.clone());
        self.state = LoadState::Loading;
        flag
    }

    /// Commit a result unless its load was superseded or was not started by
    /// this resource. Returns whether the state changed.
    pub fn finish(&mut self, flag: &CancelFlag, result: Result<T, ApiError>) -> bool {
        let is_current = self.current.as_ref().is_some_and(|c| c.same_load(flag));
        if flag.is_cancelled() || !is_current {
            log::debug!("Discarding stale response");
            return false;
        }
        self.state = match result {
            Ok(value) => LoadState::Ready(value),
            Err(e) => {
                log::error!("Load failed: {}", e);
                LoadState::Failed(e.to_string())
            }
        };
        self.current = None;
        true
    }

    /// Drop the value and ignore anything still in flight.
    pub fn reset(&mut self) {
        if let Some(previous) = self.current.take() {
            previous.cancel();
        }
        self.state = LoadState::Idle;
    }
}
