//! Public-route allow-list.
//!
//! Classifies a request path as public (no token needed) or private.
//! Each pattern is a regular expression searched against the full path, so
//! `/auth/login` also matches `/api/v1/auth/login`; write `^...$` to pin a
//! pattern to the whole path.

use regex::{Regex, RegexSet};
use thiserror::Error;

/// Routes that never require a token unless `PUBLIC_PATHS` overrides them.
pub const DEFAULT_PUBLIC_PATHS: [&str; 5] = [
    "/auth/login",
    "/auth/register",
    "/auth/forgot",
    "/auth/reset",
    "/user/by-token",
];

#[derive(Debug, Error)]
pub enum RouteError {
    #[error("malformed public path pattern `{pattern}`")]
    MalformedPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Immutable, compiled allow-list shared by every gate evaluation.
#[derive(Debug, Clone)]
pub struct PublicRoutes {
    set: RegexSet,
}

impl PublicRoutes {
    /// Compiles every pattern; the first malformed one aborts construction.
    pub fn new<I, S>(patterns: I) -> Result<Self, RouteError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| {
                let p = p.as_ref();
                Regex::new(p)
                    .map(|_| p.to_string())
                    .map_err(|source| RouteError::MalformedPattern {
                        pattern: p.to_string(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::from_valid(patterns)
    }

    /// Lenient mode: a malformed pattern is logged and never matches.
    pub fn lenient<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let valid = patterns
            .into_iter()
            .filter_map(|p| {
                let p = p.as_ref();
                match Regex::new(p) {
                    Ok(_) => Some(p.to_string()),
                    Err(err) => {
                        tracing::warn!(pattern = p, error = %err, "skipping malformed public path pattern");
                        None
                    }
                }
            })
            .collect::<Vec<_>>();

        // Every pattern compiled on its own above, so the set cannot fail short of size limits.
        Self::from_valid(valid).unwrap_or_else(|err| {
            tracing::warn!(error = %err, "public path set rejected; treating every path as private");
            Self {
                set: RegexSet::empty(),
            }
        })
    }

    fn from_valid(patterns: Vec<String>) -> Result<Self, RouteError> {
        let set = RegexSet::new(&patterns).map_err(|source| RouteError::MalformedPattern {
            pattern: patterns.join(","),
            source,
        })?;
        Ok(Self { set })
    }

    pub fn is_public(&self, path: &str) -> bool {
        self.set.is_match(path)
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }
}
