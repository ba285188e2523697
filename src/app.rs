//! Root application component with routing and context providers.

use std::sync::Arc;

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Redirect, Route, Router, Routes},
};

use crate::components::notice_banner::NoticeBanner;
use crate::components::route_guard::{RequireAdmin, RequireAuth};
use crate::config::ClientConfig;
use crate::net::api::ApiClient;
use crate::net::error::ApiError;
use crate::pages::{
    admin::AdminPage, auth_callback::AuthCallbackPage, dashboard::DashboardPage, login::LoginPage,
    signup::SignupPage,
};
use crate::state::auth::AuthState;
use crate::state::notice::NoticeState;
use crate::state::session::SessionStore;
use crate::state::storage::{LocalTokenStorage, TokenStorage};
use crate::util::auth::LANDING_ROUTE;

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Load config for the current build flavour, falling back to defaults.
fn load_config() -> ClientConfig {
    #[cfg(feature = "hydrate")]
    let loaded = ClientConfig::from_build_env();
    #[cfg(not(feature = "hydrate"))]
    let loaded = ClientConfig::from_env();

    loaded.unwrap_or_else(|e| {
        log::error!("invalid client config, using defaults: {e}");
        ClientConfig::default()
    })
}

/// Wire the API client and session store around one token storage.
fn build_services(config: &ClientConfig) -> Result<(ApiClient, SessionStore), ApiError> {
    let tokens: Arc<dyn TokenStorage> = Arc::new(LocalTokenStorage::new(config.token_storage_key.clone()));
    let api = ApiClient::new(config, tokens.clone())?;
    let store = SessionStore::new(Arc::new(api.clone()), tokens);
    Ok((api, store))
}

/// Root application component.
///
/// Provides the session store, its reactive mirror, and the API client,
/// then starts the session bootstrap.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let config = load_config();
    let (api, store) = match build_services(&config) {
        Ok(services) => services,
        Err(e) => {
            log::error!("client startup failed: {e}");
            return view! {
                <Title text="PaySphere"/>
                <p class="startup-error">"PaySphere could not start. Please reload the page."</p>
            }
            .into_any();
        }
    };

    // Reactive mirror of the store; guards and views read this signal.
    let auth = RwSignal::new(AuthState::default());
    store.subscribe(Arc::new(move |state: &AuthState| auth.set(state.clone())));
    let notices = RwSignal::new(NoticeState::default());

    provide_context(auth);
    provide_context(notices);
    provide_context(api);
    provide_context(store.clone());

    // Deferred so the first client render matches the server's loading shell.
    #[cfg(feature = "hydrate")]
    leptos::task::spawn_local(async move {
        store.bootstrap().await;
    });
    #[cfg(not(feature = "hydrate"))]
    let _ = store;

    view! {
        <Stylesheet id="leptos" href="/pkg/paysphere-web.css"/>
        <Title text="PaySphere"/>
        <NoticeBanner/>

        <Router>
            <Routes fallback=|| "Page not found.".into_view()>
                <Route path=StaticSegment("") view=|| view! { <Redirect path=LANDING_ROUTE/> }/>
                <Route path=StaticSegment("login") view=LoginPage/>
                <Route path=StaticSegment("signup") view=SignupPage/>
                <Route path=(StaticSegment("auth"), StaticSegment("callback")) view=AuthCallbackPage/>
                <Route
                    path=StaticSegment("dashboard")
                    view=|| view! { <RequireAuth><DashboardPage/></RequireAuth> }
                />
                <Route
                    path=StaticSegment("admin")
                    view=|| view! { <RequireAdmin><AdminPage/></RequireAdmin> }
                />
            </Routes>
        </Router>
    }
    .into_any()
}
