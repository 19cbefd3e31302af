//! Transient references to uploaded image bytes.
//!
//! An `ObjectUrl` stays valid until it is dropped or explicitly released.
//! The store releases by token and ignores tokens that are no longer live,
//! so a reference can never be freed twice.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug, Default)]
struct Registry {
    next_token: u64,
    live: HashMap<u64, Arc<[u8]>>,
    created: u64,
    released: u64,
}

#[derive(Clone, Debug, Default)]
pub struct ObjectUrlStore {
    registry: Rc<RefCell<Registry>>,
}

impl ObjectUrlStore {

    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&self, bytes: Arc<[u8]>) -> ObjectUrl {
        let mut registry = self.registry.borrow_mut();
        registry.next_token += 1;
        let token = registry.next_token;
        registry.live.insert(token, bytes);
        registry.created += 1;
        debug!(token, "created image reference");
        ObjectUrl {
            token,
            registry: Rc::downgrade(&self.registry),
        }
    }

    /// Bytes behind a live reference, `None` once released.
    pub fn resolve(&self, url: &ObjectUrl) -> Option<Arc<[u8]>> {
        self.registry.borrow().live.get(&url.token).cloned()
    }

    pub fn live_count(&self) -> usize {
        self.registry.borrow().live.len()
    }

    pub fn created_count(&self) -> u64 {
        self.registry.borrow().created
    }

    pub fn released_count(&self) -> u64 {
        self.registry.borrow().released
    }
}

fn release_token(registry: &RefCell<Registry>, token: u64) -> bool {
    let mut registry = registry.borrow_mut();
    if registry.live.remove(&token).is_some() {
        registry.released += 1;
        debug!(token, "released image reference");
        true
    } else {
        warn!(token, "image reference already released");
        false
    }
}

/// Owned handle to image bytes in an `ObjectUrlStore`. Dropping it releases
/// the bytes.
pub struct ObjectUrl {
    token: u64,
    registry: Weak<RefCell<Registry>>,
}

impl ObjectUrl {

    pub fn token(&self) -> u64 {
        self.token
    }

    /// Releases now instead of at drop. Returns false if the store is gone or
    /// the token was not live.
    pub fn release(mut self) -> bool {
        let registry = std::mem::take(&mut self.registry);
        match registry.upgrade() {
            Some(registry) => release_token(&registry, self.token),
            None => false,
        }
    }
}

impl Drop for ObjectUrl {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            release_token(&registry, self.token);
        }
    }
}

impl fmt::Display for ObjectUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "blob:chromatic/{}", self.token)
    }
}

impl fmt::Debug for ObjectUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectUrl({})", self.token)
    }
}
