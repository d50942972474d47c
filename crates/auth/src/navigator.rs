use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::route::Route;

/// Shared navigation history.
///
/// Clones share the same history, so a redirect issued by the auth
/// controller is what the front end sees as the current screen.
#[derive(Debug, Clone)]
pub struct Navigator {
    entries: Arc<Mutex<Vec<Route>>>,
}

impl Navigator {
    pub fn new(initial: Route) -> Self {
        Self {
            entries: Arc::new(Mutex::new(vec![initial])),
        }
    }

    fn entries(&self) -> MutexGuard<'_, Vec<Route>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn current(&self) -> Route {
        self.entries()
            .last()
            .cloned()
            .unwrap_or(Route::Dashboard)
    }

    pub fn push(&self, route: Route) {
        debug!(%route, "navigate");
        self.entries().push(route);
    }

    /// Swap the current entry, so going back skips it.
    pub fn replace(&self, route: Route) {
        debug!(%route, "navigate (replace)");
        let mut entries = self.entries();
        entries.pop();
        entries.push(route);
    }

    /// Pop the current entry. Returns the new current route, or `None` when
    /// there is nothing to go back to.
    pub fn back(&self) -> Option<Route> {
        let mut entries = self.entries();
        if entries.len() < 2 {
            return None;
        }
        entries.pop();
        entries.last().cloned()
    }

    pub fn history(&self) -> Vec<Route> {
        self.entries().clone()
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(Route::Dashboard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replace_removes_the_entry_from_history() {
        let nav = Navigator::new(Route::Dashboard);
        nav.push(Route::Guests);
        nav.replace(Route::Login);

        assert_eq!(nav.current(), Route::Login);
        assert_eq!(nav.back(), Some(Route::Dashboard));
        assert_eq!(nav.back(), None);
    }

    #[test]
    fn clones_share_history() {
        let nav = Navigator::default();
        let other = nav.clone();
        other.push(Route::Rooms);
        assert_eq!(nav.current(), Route::Rooms);
        assert_eq!(nav.history(), vec![Route::Dashboard, Route::Rooms]);
    }
}
