//! Navigation policy for links opened from inside the content.
//!
//! ```text
//!  scheme == app scheme ──▶ open_app_link   ──▶ Cancel
//!  user-activated link  ──▶ external/in-app ──▶ Cancel
//!  anything else        ──────────────────────▶ Allow
//! ```
//!
//! The surface itself only ever navigates within the widget; everything a
//! user taps on leaves it.

use log::{debug, warn};

use crate::app::ports::LinkPort;
use crate::config::LinkPolicy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationKind {
    /// The user tapped a link.
    LinkActivated,
    /// Redirects, form posts, script-driven loads.
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationAction {
    pub url: String,
    pub kind: NavigationKind,
}

impl NavigationAction {
    pub fn link(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            kind: NavigationKind::LinkActivated,
        }
    }

    pub fn other(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            kind: NavigationKind::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationDecision {
    Allow,
    Cancel,
}

/// Lower-cased scheme of `url`, if it has one.
fn scheme_of(url: &str) -> Option<String> {
    let (scheme, _) = url.split_once(':')?;
    let valid = !scheme.is_empty()
        && scheme
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'-' | b'.'));
    valid.then(|| scheme.to_ascii_lowercase())
}

fn is_web(scheme: Option<&str>) -> bool {
    matches!(scheme, Some("http" | "https"))
}

/// Decide what to do with a navigation request and dispatch the URL if it
/// leaves the surface.
pub fn decide(
    policy: &LinkPolicy,
    action: &NavigationAction,
    links: &mut impl LinkPort,
) -> NavigationDecision {
    let scheme = scheme_of(&action.url);

    if !policy.app_scheme.is_empty()
        && scheme.as_deref() == Some(policy.app_scheme.to_ascii_lowercase().as_str())
    {
        debug!("Links: deep link {}", action.url);
        links.open_app_link(&action.url);
        return NavigationDecision::Cancel;
    }

    if action.kind != NavigationKind::LinkActivated {
        return NavigationDecision::Allow;
    }

    if !links.can_open(&action.url) {
        warn!("Links: no handler for {}", action.url);
        return NavigationDecision::Cancel;
    }

    if is_web(scheme.as_deref()) && !policy.open_web_links_in_system_browser {
        links.open_in_app(&action.url);
    } else {
        links.open_external(&action.url);
    }
    NavigationDecision::Cancel
}
