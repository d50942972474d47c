//! Gate for protected screens.
//!
//! The guard never decides while startup verification is pending, so a
//! persisted token is never bounced to the login screen before the backend
//! has had a chance to accept it.

use frontdesk_session::{Session, SessionStatus, SessionStore};
use tokio::sync::watch;
use tracing::debug;

use crate::navigator::Navigator;
use crate::route::Route;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Authentication is still being resolved; show a placeholder.
    Loading,
    Render(Route),
    Redirect { to: Route, replace: bool },
}

impl GuardDecision {
    /// What `status` allows for `route`, without side effects.
    pub fn for_status(status: SessionStatus, route: &Route) -> Self {
        if !route.is_protected() {
            return GuardDecision::Render(route.clone());
        }
        match status {
            SessionStatus::Unknown | SessionStatus::Authenticating => GuardDecision::Loading,
            SessionStatus::Authenticated => GuardDecision::Render(route.clone()),
            SessionStatus::Unauthenticated => GuardDecision::Redirect {
                to: Route::Login,
                replace: true,
            },
        }
    }
}

pub struct RouteGuard {
    rx: watch::Receiver<Session>,
    navigator: Navigator,
    guarding: Option<Route>,
}

impl RouteGuard {
    pub fn new(session: &SessionStore, navigator: Navigator) -> Self {
        Self {
            rx: session.subscribe(),
            navigator,
            guarding: None,
        }
    }

    /// Decide for `route` and perform any redirect on the navigator.
    pub fn evaluate(&mut self, route: &Route) -> GuardDecision {
        let status = self.rx.borrow_and_update().status();
        self.guarding = Some(route.clone());
        let decision = GuardDecision::for_status(status, route);

        if let GuardDecision::Redirect { to, replace } = &decision {
            debug!(from = %route, to = %to, "redirecting unauthenticated visitor");
            if *replace {
                self.navigator.replace(to.clone());
            } else {
                self.navigator.push(to.clone());
            }
        }

        decision
    }

    /// Wait until the decision for `route` is no longer `Loading`.
    pub async fn settle(&mut self, route: &Route) -> GuardDecision {
        loop {
            let decision = self.evaluate(route);
            if decision != GuardDecision::Loading {
                return decision;
            }
            if self.rx.changed().await.is_err() {
                // writer gone: nothing will ever change again
                return decision;
            }
        }
    }

    /// Wait for the next session change and decide again for the route
    /// last evaluated (the navigator's current route if there is none).
    /// `None` once the session can no longer change.
    pub async fn next_decision(&mut self) -> Option<GuardDecision> {
        self.rx.changed().await.ok()?;
        let route = self
            .guarding
            .clone()
            .unwrap_or_else(|| self.navigator.current());
        Some(self.evaluate(&route))
    }
}
