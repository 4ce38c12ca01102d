//! Key Codec Module
//!
//! Builds deterministic cache keys from a namespace, an identifier and an
//! optional parameter bag.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::cache::ttl;
use crate::error::CacheError;

/// Number of hex characters of the params digest kept in a key.
pub const PARAMS_DIGEST_LEN: usize = 8;

// == Namespace ==
/// Semantic domain a cached value belongs to.
///
/// The prefix of every key is the namespace's short name, so invalidating a
/// namespace is a prefix match on `"{prefix}:"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    Communication,
    User,
    Permission,
    Stats,
    Api,
    Announcements,
    Events,
    Resources,
}

impl Namespace {
    pub const ALL: [Namespace; 8] = [
        Namespace::Communication,
        Namespace::User,
        Namespace::Permission,
        Namespace::Stats,
        Namespace::Api,
        Namespace::Announcements,
        Namespace::Events,
        Namespace::Resources,
    ];

    /// Short name used as the key prefix.
    pub fn prefix(self) -> &'static str {
        match self {
            Namespace::Communication => "comm",
            Namespace::User => "user",
            Namespace::Permission => "perm",
            Namespace::Stats => "stats",
            Namespace::Api => "api",
            Namespace::Announcements => "announcements",
            Namespace::Events => "events",
            Namespace::Resources => "resources",
        }
    }

    /// TTL tier applied by namespace handles when the caller gives none.
    ///
    /// | namespace      | tier   |
    /// |----------------|--------|
    /// | communication  | medium |
    /// | user           | long   |
    /// | permission     | hour   |
    /// | stats          | short  |
    /// | api            | medium |
    /// | announcements  | medium |
    /// | events         | medium |
    /// | resources      | long   |
    pub fn default_ttl(self) -> Duration {
        match self {
            Namespace::Communication => ttl::MEDIUM,
            Namespace::User => ttl::LONG,
            Namespace::Permission => ttl::HOUR,
            Namespace::Stats => ttl::SHORT,
            Namespace::Api => ttl::MEDIUM,
            Namespace::Announcements => ttl::MEDIUM,
            Namespace::Events => ttl::MEDIUM,
            Namespace::Resources => ttl::LONG,
        }
    }

    /// Prefix including the separator, e.g. `"user:"`.
    pub fn key_prefix(self) -> String {
        format!("{}:", self.prefix())
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

impl FromStr for Namespace {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Namespace::ALL
            .into_iter()
            .find(|ns| ns.prefix() == s)
            .ok_or_else(|| CacheError::UnknownNamespace(s.to_string()))
    }
}

// == Encode Key ==
/// Renders `"{namespace}:{identifier}"`, followed by `":{digest}"` when
/// `params` carries anything.
///
/// Object properties are sorted before hashing at every depth, so two bags
/// with the same content in a different insertion order produce the same
/// key. Identifiers are used verbatim.
pub fn encode_key(namespace: Namespace, identifier: &str, params: Option<&Value>) -> String {
    let mut key = format!("{}:{}", namespace.prefix(), identifier);

    if let Some(params) = params.filter(|p| !is_empty_params(p)) {
        key.push(':');
        key.push_str(&params_digest(params));
    }

    key
}

/// Short hex digest of the canonical JSON form of `params`.
pub fn params_digest(params: &Value) -> String {
    let canonical = canonicalize(params).to_string();
    let digest = Sha256::digest(canonical.as_bytes());
    let mut hex = hex::encode(digest);
    hex.truncate(PARAMS_DIGEST_LEN);
    hex
}

fn is_empty_params(params: &Value) -> bool {
    match params {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Rebuilds `value` with every object's properties in lexicographic order.
fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let sorted: BTreeMap<&String, Value> =
                map.iter().map(|(k, v)| (k, canonicalize(v))).collect();
            Value::Object(
                sorted
                    .into_iter()
                    .map(|(k, v)| (k.clone(), v))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}
