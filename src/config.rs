//! Host configuration
//!
//! Identity and presentation options supplied once at construction.
//! Hosts may build it in code or deserialize it from JSON.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::HostError;

/// Name of the inbound message the content posts once it is ready.
pub const READY_MESSAGE: &str = "embedReady";

/// Transport-level timeout for the content load request.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u32 = 30;

const SUPPORT_DOMAIN: &str = "ada.support";
const WEBVIEW_PATH: &str = "/mobile-sdk-webview/";

/// How links activated inside the content are dispatched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkPolicy {
    /// Open web links in the system browser instead of an in-app browser.
    pub open_web_links_in_system_browser: bool,
    /// Custom URL scheme of the host app; matching links are deep links.
    pub app_scheme: String,
}

/// Immutable host configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostConfiguration {
    /// Target identity; first label of the routing host name.
    pub handle: String,
    /// Routing group; empty means the default cluster.
    #[serde(default)]
    pub cluster: String,
    #[serde(default)]
    pub language: String,
    /// Style override passed through to the content verbatim.
    #[serde(default)]
    pub styles: String,
    #[serde(default)]
    pub greeting: String,
    /// Metadata applied once the content is ready.
    #[serde(default)]
    pub metafields: BTreeMap<String, String>,
    #[serde(default)]
    pub links: LinkPolicy,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u32,
}

fn default_request_timeout() -> u32 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

impl HostConfiguration {
    pub fn new(handle: impl Into<String>) -> Self {
        Self {
            handle: handle.into(),
            cluster: String::new(),
            language: String::new(),
            styles: String::new(),
            greeting: String::new(),
            metafields: BTreeMap::new(),
            links: LinkPolicy::default(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }

    pub fn with_cluster(mut self, cluster: impl Into<String>) -> Self {
        self.cluster = cluster.into();
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_styles(mut self, styles: impl Into<String>) -> Self {
        self.styles = styles.into();
        self
    }

    pub fn with_greeting(mut self, greeting: impl Into<String>) -> Self {
        self.greeting = greeting.into();
        self
    }

    pub fn with_metafield(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metafields.insert(key.into(), value.into());
        self
    }

    pub fn with_link_policy(mut self, links: LinkPolicy) -> Self {
        self.links = links;
        self
    }

    pub fn with_app_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.links.app_scheme = scheme.into();
        self
    }

    /// Reject configurations that cannot produce a routable URL.
    pub fn validate(&self) -> Result<(), HostError> {
        if self.handle.is_empty() {
            return Err(HostError::InvalidConfig("handle must not be empty"));
        }
        if !is_host_label(&self.handle) {
            return Err(HostError::InvalidConfig(
                "handle must be ASCII letters, digits, '-' or '_'",
            ));
        }
        if !self.cluster.is_empty() && !is_host_label(&self.cluster) {
            return Err(HostError::InvalidConfig(
                "cluster must be ASCII letters, digits, '-' or '_'",
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(HostError::InvalidConfig("request timeout must be non-zero"));
        }
        Ok(())
    }

    /// `https://{handle}.{cluster.}ada.support/mobile-sdk-webview/`
    pub fn routing_url(&self) -> String {
        if self.cluster.is_empty() {
            format!("https://{}.{SUPPORT_DOMAIN}{WEBVIEW_PATH}", self.handle)
        } else {
            format!(
                "https://{}.{}.{SUPPORT_DOMAIN}{WEBVIEW_PATH}",
                self.handle, self.cluster
            )
        }
    }
}

fn is_host_label(s: &str) -> bool {
    !s.is_empty()
        && s.bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}
