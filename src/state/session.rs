//! Session store: the single writer of authentication state.
//!
//! SYSTEM CONTEXT
//! ==============
//! Provided to the component tree via context (see `app::App`). Guards and
//! views read snapshots or subscribe; only the operations here write.
//!
//! DESIGN
//! ======
//! Operations that talk to the API run their synchronous part eagerly and
//! hand back a future for the profile fetch. `login` callers spawn that
//! future and move on, so navigation never waits on the profile.
//!
//! Every fetch is stamped with the store epoch and the token it was issued
//! for. A settled fetch is applied only if both still match; otherwise the
//! result is discarded. A slow fetch therefore cannot resurrect a session
//! after `sign_out`, nor overwrite a newer login.
//!
//! ERROR HANDLING
//! ==============
//! Profile-fetch failures of any kind (network, 401, 5xx, decode) tear the
//! session down in one step: storage cleared, phase `Unauthenticated`. The
//! failure is logged here; user-facing surfacing belongs to views.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::auth::{AuthState, SessionPhase};
use super::storage::TokenStorage;
use crate::net::api::SessionApi;
use crate::net::types::User;

/// Callback invoked with the new state after every visible transition.
pub type SessionListener = Arc<dyn Fn(&AuthState) + Send + Sync>;

/// How a profile fetch settled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProfileSync {
    /// Profile applied; the session is `Authenticated`.
    Authenticated,
    /// Fetch failed; the session was torn down.
    SignedOut,
    /// A newer operation ran first; the result was dropped.
    Superseded,
    /// There was no token to fetch a profile for.
    NoSession,
}

#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Inner>,
}

struct Inner {
    api: Arc<dyn SessionApi>,
    tokens: Arc<dyn TokenStorage>,
    core: Mutex<Core>,
    listeners: Mutex<Vec<SessionListener>>,
}

#[derive(Default)]
struct Core {
    state: AuthState,
    epoch: u64,
}

/// Identity of one profile fetch.
struct FetchTicket {
    epoch: u64,
    token: String,
}

impl SessionStore {
    #[must_use]
    pub fn new(api: Arc<dyn SessionApi>, tokens: Arc<dyn TokenStorage>) -> Self {
        Self {
            inner: Arc::new(Inner {
                api,
                tokens,
                core: Mutex::new(Core::default()),
                listeners: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Current session snapshot.
    #[must_use]
    pub fn snapshot(&self) -> AuthState {
        self.inner.lock_core().state.clone()
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.inner.lock_core().state.is_admin()
    }

    /// Register a listener for state transitions. The listener is called
    /// immediately with the current state.
    pub fn subscribe(&self, listener: SessionListener) {
        let current = self.snapshot();
        listener(&current);
        self.inner
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(listener);
    }

    /// Resolve the persisted token at app start.
    ///
    /// Without a token the session settles to `Unauthenticated` before this
    /// returns and the future performs no network call.
    pub fn bootstrap(&self) -> impl Future<Output = ProfileSync> + 'static {
        let ticket = match self.inner.tokens.load() {
            Some(token) => {
                log::debug!("persisted token found; bootstrapping session");
                Some(self.inner.begin_fetch(SessionPhase::Bootstrapping { token: token.clone() }, token))
            }
            None => {
                self.inner.commit(|core| {
                    core.epoch += 1;
                    core.state = AuthState::new(SessionPhase::Unauthenticated);
                });
                None
            }
        };
        self.inner.clone().run(ticket)
    }

    /// Start a session from a freshly issued token.
    ///
    /// Persists the token and publishes `user` before returning. The returned
    /// future fetches the profile; `loading` is not touched.
    pub fn login(&self, token: impl Into<String>, user: User) -> impl Future<Output = ProfileSync> + 'static {
        let token = token.into();
        self.inner.tokens.save(&token);
        log::info!("login: session started for user {}", user.id);
        let ticket = self
            .inner
            .begin_fetch(SessionPhase::PartiallyAuthenticated { token: token.clone(), user }, token);
        self.inner.clone().run(Some(ticket))
    }

    /// Drop the session. Idempotent.
    pub fn sign_out(&self) {
        self.inner.tokens.clear();
        self.inner.commit(|core| {
            core.epoch += 1;
            core.state = AuthState::new(SessionPhase::Unauthenticated);
        });
    }

    /// Re-fetch the profile for the current token, e.g. after a plan change.
    ///
    /// The phase is left as-is while the fetch runs. Without a token the
    /// future resolves to [`ProfileSync::NoSession`].
    pub fn refresh_profile(&self) -> impl Future<Output = ProfileSync> + 'static {
        let ticket = {
            let mut core = self.inner.lock_core();
            core.state.token().map(str::to_owned).map(|token| {
                core.epoch += 1;
                FetchTicket { epoch: core.epoch, token }
            })
        };
        self.inner.clone().run(ticket)
    }
}

impl Inner {
    fn lock_core(&self) -> MutexGuard<'_, Core> {
        self.core.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply `f` to the core, then notify listeners if the visible state changed.
    fn commit<R>(&self, f: impl FnOnce(&mut Core) -> R) -> R {
        let (result, changed) = {
            let mut core = self.lock_core();
            let before = core.state.clone();
            let result = f(&mut core);
            let changed = (core.state != before).then(|| core.state.clone());
            (result, changed)
        };
        if let Some(state) = changed {
            self.notify(&state);
        }
        result
    }

    fn notify(&self, state: &AuthState) {
        let listeners = self
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for listener in listeners {
            listener(state);
        }
    }

    /// Move to `phase` and issue a ticket for fetching `token`'s profile.
    fn begin_fetch(&self, phase: SessionPhase, token: String) -> FetchTicket {
        self.commit(|core| {
            core.epoch += 1;
            core.state = AuthState::new(phase);
            FetchTicket { epoch: core.epoch, token }
        })
    }

    async fn run(self: Arc<Self>, ticket: Option<FetchTicket>) -> ProfileSync {
        match ticket {
            Some(ticket) => self.sync_profile(ticket).await,
            None => ProfileSync::NoSession,
        }
    }

    async fn sync_profile(&self, ticket: FetchTicket) -> ProfileSync {
        let result = self.api.fetch_profile(&ticket.token).await;

        self.commit(|core| {
            if core.epoch != ticket.epoch || core.state.token() != Some(ticket.token.as_str()) {
                log::debug!("discarding superseded profile fetch (epoch {})", ticket.epoch);
                return ProfileSync::Superseded;
            }
            match result {
                Ok(profile) => {
                    if let Some(optimistic) = core.state.user() {
                        if optimistic.id != profile.id {
                            log::warn!("profile id {} replaces login identity {}", profile.id, optimistic.id);
                        }
                    }
                    log::debug!("profile loaded for user {}", profile.id);
                    let user = profile.to_user();
                    core.state = AuthState::new(SessionPhase::Authenticated { token: ticket.token, user, profile });
                    ProfileSync::Authenticated
                }
                Err(err) => {
                    log::warn!("profile fetch failed ({}): {err}; signing out", err.error_code());
                    self.tokens.clear();
                    core.epoch += 1;
                    core.state = AuthState::new(SessionPhase::Unauthenticated);
                    ProfileSync::SignedOut
                }
            }
        })
    }
}
