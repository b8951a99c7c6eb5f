//! Logical resource requests
//!
//! A `ResourceRequest` is the typed ask handed to the resolver. It knows its
//! own cache key and how to phrase itself as a D6 call, so the resolver never
//! inspects parameters.

use crate::upstream::UpstreamCall;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix shared by every resolver cache key
pub const CACHE_NAMESPACE: &str = "d6";

/// Default page size for learner listings
pub const DEFAULT_PAGE_LIMIT: u32 = 50;

/// Resource families served by the resolver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Schools,
    Learners,
    Staff,
    Parents,
    Marks,
    Lookup,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 6] = [
        ResourceKind::Schools,
        ResourceKind::Learners,
        ResourceKind::Staff,
        ResourceKind::Parents,
        ResourceKind::Marks,
        ResourceKind::Lookup,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Schools => "schools",
            ResourceKind::Learners => "learners",
            ResourceKind::Staff => "staff",
            ResourceKind::Parents => "parents",
            ResourceKind::Marks => "marks",
            ResourceKind::Lookup => "lookup",
        }
    }

    /// Cache key prefix covering every entry of this kind
    pub fn cache_prefix(&self) -> String {
        format!("{}:{}:", CACHE_NAMESPACE, self.as_str())
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pagination window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub limit: u32,
    pub offset: u32,
}

impl Page {
    pub fn new(limit: u32, offset: u32) -> Self {
        Self { limit, offset }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_LIMIT,
            offset: 0,
        }
    }
}

/// Optional narrowing of a learner's marks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkFilter {
    pub term: Option<u8>,
    pub year: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceRequest {
    Schools,
    Learners { school_id: u32, page: Page },
    Staff { school_id: u32 },
    Parents { school_id: u32 },
    Marks { learner_id: u64, filter: MarkFilter },
    Lookup { lookup_type: String },
}

fn opt<T: fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "any".to_string(), |v| v.to_string())
}

/// Lookup types are case-insensitive
fn normalize_lookup(lookup_type: &str) -> String {
    lookup_type.trim().to_ascii_lowercase()
}

/// Lookup types become a URL path segment and part of the cache key, so
/// only `[a-z0-9_-]` is accepted after normalization
pub fn is_valid_lookup_type(lookup_type: &str) -> bool {
    let normalized = normalize_lookup(lookup_type);
    !normalized.is_empty()
        && normalized
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_' || b == b'-')
}

impl ResourceRequest {
    pub fn lookup(lookup_type: &str) -> Self {
        ResourceRequest::Lookup {
            lookup_type: normalize_lookup(lookup_type),
        }
    }

    pub fn kind(&self) -> ResourceKind {
        match self {
            ResourceRequest::Schools => ResourceKind::Schools,
            ResourceRequest::Learners { .. } => ResourceKind::Learners,
            ResourceRequest::Staff { .. } => ResourceKind::Staff,
            ResourceRequest::Parents { .. } => ResourceKind::Parents,
            ResourceRequest::Marks { .. } => ResourceKind::Marks,
            ResourceRequest::Lookup { .. } => ResourceKind::Lookup,
        }
    }

    /// Deterministic key: kind plus every parameter in a fixed order
    pub fn cache_key(&self) -> String {
        let params = match self {
            ResourceRequest::Schools => "all".to_string(),
            ResourceRequest::Learners { school_id, page } => format!(
                "school={}:limit={}:offset={}",
                school_id, page.limit, page.offset
            ),
            ResourceRequest::Staff { school_id } | ResourceRequest::Parents { school_id } => {
                format!("school={}", school_id)
            }
            ResourceRequest::Marks { learner_id, filter } => format!(
                "learner={}:term={}:year={}",
                learner_id,
                opt(filter.term),
                opt(filter.year)
            ),
            ResourceRequest::Lookup { lookup_type } => normalize_lookup(lookup_type),
        };
        format!("{}{}", self.kind().cache_prefix(), params)
    }

    /// The GET that serves this request on either API version
    pub fn upstream_call(&self) -> UpstreamCall {
        match self {
            ResourceRequest::Schools => UpstreamCall::new("/settings/clients"),
            ResourceRequest::Learners { school_id, page } => {
                UpstreamCall::new("/adminplus/learners")
                    .with_query("school_id", school_id)
                    .with_query("limit", page.limit)
                    .with_query("offset", page.offset)
            }
            ResourceRequest::Staff { school_id } => {
                UpstreamCall::new("/adminplus/staffmembers").with_query("school_id", school_id)
            }
            ResourceRequest::Parents { school_id } => {
                UpstreamCall::new("/adminplus/parents").with_query("school_id", school_id)
            }
            ResourceRequest::Marks { learner_id, filter } => {
                let mut call =
                    UpstreamCall::new("/adminplus/marks").with_query("learner_id", learner_id);
                if let Some(term) = filter.term {
                    call = call.with_query("term", term);
                }
                if let Some(year) = filter.year {
                    call = call.with_query("year", year);
                }
                call
            }
            ResourceRequest::Lookup { lookup_type } => {
                UpstreamCall::new(format!("/adminplus/lookup/{}", normalize_lookup(lookup_type)))
            }
        }
    }
}

impl fmt::Display for ResourceRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceRequest::Schools => write!(f, "schools"),
            ResourceRequest::Learners { school_id, .. } => {
                write!(f, "learners of school {}", school_id)
            }
            ResourceRequest::Staff { school_id } => write!(f, "staff of school {}", school_id),
            ResourceRequest::Parents { school_id } => {
                write!(f, "parents of school {}", school_id)
            }
            ResourceRequest::Marks { learner_id, .. } => {
                write!(f, "marks of learner {}", learner_id)
            }
            ResourceRequest::Lookup { lookup_type } => write!(f, "lookup '{}'", lookup_type),
        }
    }
}
