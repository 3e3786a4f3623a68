//! Realm verification key resolution.
//!
//! A static key is used as-is. A JWKS is downloaded lazily and cached; it is
//! downloaded again when the cache expires or a token names an unknown `kid`,
//! but never more often than the configured minimum interval. Until a set has
//! been downloaded successfully every call tries again. The cache lock is
//! released before any network call, so concurrent first use may download
//! the set more than once.

use chrono::{DateTime, Utc};
use jsonwebtoken::DecodingKey;
use kc_crypto::{KeyFamily, SignatureAlgorithm};
use parking_lot::Mutex;
use std::sync::Arc;
use url::Url;

use crate::config::{KeyCachePolicy, KeySource};
use crate::error::{GrantResult, VerificationError};
use crate::jwks::JsonWebKeySet;
use crate::transport::TokenTransport;

#[derive(Debug, Default)]
struct KeyCache {
    keys: Option<Arc<JsonWebKeySet>>,
    fetched_at: Option<DateTime<Utc>>,
}

impl KeyCache {
    fn is_fresh(&self, now: DateTime<Utc>, policy: &KeyCachePolicy) -> bool {
        self.fetched_at.is_some_and(|at| now - at < policy.ttl)
    }

    /// The minimum interval only throttles refreshes of a set already held.
    fn may_fetch(&self, now: DateTime<Utc>, policy: &KeyCachePolicy) -> bool {
        match (&self.keys, self.fetched_at) {
            (Some(_), Some(at)) => now - at >= policy.min_refresh_interval,
            _ => true,
        }
    }
}

/// Resolves the key that verifies a realm token.
#[derive(Debug)]
pub struct RealmKeyResolver {
    source: KeySource,
    policy: KeyCachePolicy,
    cache: Mutex<KeyCache>,
}

impl RealmKeyResolver {
    /// Creates a resolver for the given key source.
    #[must_use]
    pub fn new(source: KeySource, policy: KeyCachePolicy) -> Self {
        Self {
            source,
            policy,
            cache: Mutex::new(KeyCache::default()),
        }
    }

    /// Resolves the verification key for a token header.
    ///
    /// # Errors
    ///
    /// Returns a verification error when no usable key exists and a
    /// transport error when the JWKS download fails.
    pub async fn resolve<T>(
        &self,
        transport: &T,
        kid: Option<&str>,
        algorithm: SignatureAlgorithm,
    ) -> GrantResult<DecodingKey>
    where
        T: TokenTransport + ?Sized,
    {
        self.resolve_at(transport, kid, algorithm, Utc::now()).await
    }

    pub(crate) async fn resolve_at<T>(
        &self,
        transport: &T,
        kid: Option<&str>,
        algorithm: SignatureAlgorithm,
        now: DateTime<Utc>,
    ) -> GrantResult<DecodingKey>
    where
        T: TokenTransport + ?Sized,
    {
        let url = match &self.source {
            KeySource::Static(key) => {
                let pem = key.to_pem().as_bytes();
                let decoding_key = match algorithm.key_family() {
                    KeyFamily::Rsa => DecodingKey::from_rsa_pem(pem),
                    KeyFamily::Ec => DecodingKey::from_ec_pem(pem),
                }
                .map_err(VerificationError::from)?;
                return Ok(decoding_key);
            }
            KeySource::Jwks(url) => url,
        };

        let (cached, fetch) = {
            let cache = self.cache.lock();
            let cached = cache.keys.clone();
            let hit = cache.is_fresh(now, &self.policy)
                && cached
                    .as_ref()
                    .is_some_and(|keys| keys.select(kid, algorithm).is_some());
            (cached, !hit && cache.may_fetch(now, &self.policy))
        };

        let keys = if fetch {
            let keys = Arc::new(self.fetch(transport, url).await?);
            let mut cache = self.cache.lock();
            cache.keys = Some(Arc::clone(&keys));
            cache.fetched_at = Some(now);
            Some(keys)
        } else {
            cached
        };

        let key = keys
            .as_deref()
            .and_then(|keys| keys.select(kid, algorithm))
            .ok_or_else(|| {
                tracing::warn!(kid = ?kid, algorithm = %algorithm, "no realm key matches token header");
                VerificationError::UnknownKey(kid.map(str::to_string))
            })?;

        Ok(key.decoding_key()?)
    }

    async fn fetch<T>(&self, transport: &T, url: &Url) -> GrantResult<JsonWebKeySet>
    where
        T: TokenTransport + ?Sized,
    {
        tracing::debug!(url = %url, "downloading realm JWKS");
        let keys: JsonWebKeySet = transport.get_json(url).await?.json()?;
        tracing::debug!(keys = keys.keys.len(), "realm JWKS downloaded");
        Ok(keys)
    }
}
