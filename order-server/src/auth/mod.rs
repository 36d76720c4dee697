//! Caller identity
//!
//! Authentication happens upstream; the gateway forwards the acting user in
//! `x-actor-id`. Every mutating operation receives a [`RequestContext`].

mod extractor;

pub use extractor::{ACTOR_HEADER, FORWARDED_FOR_HEADER};

/// Who is acting, and from where
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub actor_id: String,
    pub client_ip: Option<String>,
}

impl RequestContext {
    pub fn new(actor_id: impl Into<String>) -> Self {
        Self {
            actor_id: actor_id.into(),
            client_ip: None,
        }
    }

    pub fn with_client_ip(mut self, ip: impl Into<String>) -> Self {
        self.client_ip = Some(ip.into());
        self
    }
}
