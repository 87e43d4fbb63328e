//! Route surface: `entry → identify → overview → guide → complete`.
//!
//! Each route renders a serializable view model from the catalog and the
//! session. Rendering `entry` resets the session and `guide?chat=open` opens
//! the chat panel; every other route is read-only.

pub mod complete;
pub mod entry;
pub mod guide;
pub mod identify;
pub mod overview;

use serde::Serialize;
use shared::{Language, Product, TextDirection};
use thiserror::Error;

use crate::identify::IdentificationFlow;
use crate::state::SessionStore;

pub use complete::CompleteView;
pub use entry::EntryView;
pub use guide::{GuideView, StepMedia, IMAGE_PLACEHOLDER, VIDEO_PLACEHOLDER};
pub use identify::IdentifyView;
pub use overview::OverviewView;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown route '{0}'")]
pub struct UnknownRoute(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Entry,
    Identify,
    Overview,
    Guide { chat_open: bool },
    Complete,
}

impl Route {
    /// Parse a path such as `/guide?chat=open`. The leading slash is optional
    /// and `/` is the entry screen.
    pub fn parse(path: &str) -> Result<Route, UnknownRoute> {
        let path = path.trim();
        let (name, query) = match path.split_once('?') {
            Some((name, query)) => (name, query),
            None => (path, ""),
        };
        let chat_open = query
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .any(|(key, value)| key == "chat" && value == "open");

        match name.trim_matches('/') {
            "" | "entry" => Ok(Route::Entry),
            "identify" => Ok(Route::Identify),
            "overview" => Ok(Route::Overview),
            "guide" => Ok(Route::Guide { chat_open }),
            "complete" => Ok(Route::Complete),
            _ => Err(UnknownRoute(path.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Route::Entry => "entry",
            Route::Identify => "identify",
            Route::Overview => "overview",
            Route::Guide { .. } => "guide",
            Route::Complete => "complete",
        }
    }
}

/// Language and writing direction every view carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Locale {
    pub lang: Language,
    pub dir: TextDirection,
}

impl Locale {
    pub fn of(language: Language) -> Self {
        Self {
            lang: language,
            dir: language.direction(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "route", rename_all = "snake_case")]
pub enum View {
    Entry(EntryView),
    Identify(IdentifyView),
    Overview(OverviewView),
    Guide(GuideView),
    Complete(CompleteView),
}

/// Render a route against the session.
pub fn render(
    route: Route,
    store: &mut SessionStore,
    flow: &mut IdentificationFlow,
    product: &Product,
) -> View {
    tracing::debug!("Rendering {}", route.name());
    match route {
        Route::Entry => View::Entry(entry::render(store, flow)),
        Route::Identify => View::Identify(identify::render(store, flow, product)),
        Route::Overview => View::Overview(overview::render(store, product)),
        Route::Guide { chat_open } => View::Guide(guide::render(store, product, chat_open)),
        Route::Complete => View::Complete(complete::render(store, product)),
    }
}
