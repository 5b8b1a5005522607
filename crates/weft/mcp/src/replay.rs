//! Replay protection.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// In-memory nonce store with TTL eviction.
///
/// Protects a single server instance against replayed requests. Multiple
/// instances would need a shared store instead. Internally locked so the
/// server can check nonces from concurrent requests.
#[derive(Debug)]
pub struct NonceStore {
    ttl: Duration,
    nonces: Mutex<HashMap<String, Instant>>,
}

impl NonceStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            nonces: Mutex::new(HashMap::new()),
        }
    }

    /// Returns true when the nonce was already seen inside the TTL window.
    /// Unseen nonces are recorded as a side effect.
    pub fn seen_recently(&self, nonce: &str) -> bool {
        let now = Instant::now();
        let mut nonces = self.nonces.lock().unwrap_or_else(|e| e.into_inner());

        nonces.retain(|_, first_seen| now.duration_since(*first_seen) < self.ttl);

        if nonces.contains_key(nonce) {
            return true;
        }
        nonces.insert(nonce.to_string(), now);
        false
    }
}
