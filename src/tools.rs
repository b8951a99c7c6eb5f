//! Tool-call surface
//!
//! Maps assistant tool names onto typed resolver requests. Parameter
//! validation lives here; the resolver trusts every `ResourceRequest` it
//! receives.

use crate::error::{BridgeError, BridgeResult};
use crate::resolver::{
    is_valid_lookup_type, Freshness, HybridResolver, MarkFilter, Page, ResolvedResult,
    ResourceKind, ResourceRequest, DEFAULT_PAGE_LIMIT,
};
use serde_json::{json, Map, Value};
use std::fmt;
use std::str::FromStr;

/// Largest page a caller may request
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Accepted academic years
pub const YEAR_RANGE: std::ops::RangeInclusive<i64> = 2000..=2100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolName {
    GetSchools,
    GetLearners,
    GetStaff,
    GetParents,
    GetLearnerMarks,
    GetLookupData,
}

impl ToolName {
    pub const ALL: [ToolName; 6] = [
        ToolName::GetSchools,
        ToolName::GetLearners,
        ToolName::GetStaff,
        ToolName::GetParents,
        ToolName::GetLearnerMarks,
        ToolName::GetLookupData,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ToolName::GetSchools => "get_schools",
            ToolName::GetLearners => "get_learners",
            ToolName::GetStaff => "get_staff",
            ToolName::GetParents => "get_parents",
            ToolName::GetLearnerMarks => "get_learner_marks",
            ToolName::GetLookupData => "get_lookup_data",
        }
    }

    pub fn kind(&self) -> ResourceKind {
        match self {
            ToolName::GetSchools => ResourceKind::Schools,
            ToolName::GetLearners => ResourceKind::Learners,
            ToolName::GetStaff => ResourceKind::Staff,
            ToolName::GetParents => ResourceKind::Parents,
            ToolName::GetLearnerMarks => ResourceKind::Marks,
            ToolName::GetLookupData => ResourceKind::Lookup,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ToolName::GetSchools => "List the schools this integration can access",
            ToolName::GetLearners => "List learners enrolled at a school, one page at a time",
            ToolName::GetStaff => "List staff members employed at a school",
            ToolName::GetParents => "List parents and guardians linked to a school's learners",
            ToolName::GetLearnerMarks => "Get a learner's subject marks, optionally for one term or year",
            ToolName::GetLookupData => {
                "Get a reference table (genders, grades, races, languages, subjects, relationships)"
            }
        }
    }

    /// JSON Schema for the tool's parameters
    pub fn input_schema(&self) -> Value {
        let school_id = json!({"type": "integer", "minimum": 1, "description": "D6 school id"});
        match self {
            ToolName::GetSchools => json!({"type": "object", "properties": {}}),
            ToolName::GetLearners => json!({
                "type": "object",
                "properties": {
                    "school_id": school_id,
                    "limit": {"type": "integer", "minimum": 1, "maximum": MAX_PAGE_LIMIT, "default": DEFAULT_PAGE_LIMIT},
                    "offset": {"type": "integer", "minimum": 0, "default": 0}
                },
                "required": ["school_id"]
            }),
            ToolName::GetStaff | ToolName::GetParents => json!({
                "type": "object",
                "properties": {"school_id": school_id},
                "required": ["school_id"]
            }),
            ToolName::GetLearnerMarks => json!({
                "type": "object",
                "properties": {
                    "learner_id": {"type": "integer", "minimum": 1},
                    "term": {"type": "integer", "minimum": 1, "maximum": 4},
                    "year": {"type": "integer", "minimum": YEAR_RANGE.start(), "maximum": YEAR_RANGE.end()}
                },
                "required": ["learner_id"]
            }),
            ToolName::GetLookupData => json!({
                "type": "object",
                "properties": {
                    "type": {"type": "string", "pattern": "^[A-Za-z0-9_-]+$", "description": "Lookup table name, e.g. genders"}
                },
                "required": ["type"]
            }),
        }
    }

    /// Catalogue entry as served to assistants
    pub fn descriptor(&self) -> Value {
        json!({
            "name": self.as_str(),
            "description": self.description(),
            "inputSchema": self.input_schema(),
        })
    }
}

impl FromStr for ToolName {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ToolName::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| BridgeError::UnknownTool(s.to_string()))
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameter bag with snake_case names and camelCase aliases
struct Params<'a> {
    tool: ToolName,
    map: Option<&'a Map<String, Value>>,
}

impl<'a> Params<'a> {
    fn new(tool: ToolName, params: &'a Value) -> BridgeResult<Self> {
        match params {
            Value::Null => Ok(Self { tool, map: None }),
            Value::Object(map) => Ok(Self {
                tool,
                map: Some(map),
            }),
            _ => Err(BridgeError::InvalidRequest(format!(
                "{}: parameters must be a JSON object",
                tool
            ))),
        }
    }

    fn raw(&self, names: &[&str]) -> Option<&'a Value> {
        let map = self.map?;
        names
            .iter()
            .find_map(|n| map.get(*n))
            .filter(|v| !v.is_null())
    }

    fn invalid(&self, message: String) -> BridgeError {
        BridgeError::InvalidRequest(format!("{}: {}", self.tool, message))
    }

    /// Integers may arrive as JSON numbers or numeric strings
    fn int(&self, names: &[&str]) -> BridgeResult<Option<i64>> {
        let Some(value) = self.raw(names) else {
            return Ok(None);
        };
        let parsed = match value {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        };
        parsed
            .map(Some)
            .ok_or_else(|| self.invalid(format!("'{}' must be an integer", names[0])))
    }

    fn bounded(
        &self,
        names: &[&str],
        range: std::ops::RangeInclusive<i64>,
    ) -> BridgeResult<Option<i64>> {
        match self.int(names)? {
            Some(v) if !range.contains(&v) => Err(self.invalid(format!(
                "'{}' must be between {} and {}, got {}",
                names[0],
                range.start(),
                range.end(),
                v
            ))),
            other => Ok(other),
        }
    }

    fn required(
        &self,
        names: &[&str],
        range: std::ops::RangeInclusive<i64>,
    ) -> BridgeResult<i64> {
        self.bounded(names, range)?
            .ok_or_else(|| self.invalid(format!("'{}' is required", names[0])))
    }

    fn school_id(&self) -> BridgeResult<u32> {
        let id = self.required(&["school_id", "schoolId"], 1..=i64::from(u32::MAX))?;
        Ok(id as u32)
    }

    fn string(&self, names: &[&str]) -> BridgeResult<String> {
        match self.raw(names) {
            Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.trim().to_string()),
            Some(Value::String(_)) | None => {
                Err(self.invalid(format!("'{}' is required", names[0])))
            }
            Some(_) => Err(self.invalid(format!("'{}' must be a string", names[0]))),
        }
    }
}

/// A validated tool invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCall {
    pub tool: ToolName,
    pub request: ResourceRequest,
    pub freshness: Freshness,
}

impl ToolCall {
    /// Validate `params` for the named tool
    pub fn parse(name: &str, params: &Value) -> BridgeResult<Self> {
        let tool: ToolName = name.parse()?;
        let p = Params::new(tool, params)?;

        let request = match tool {
            ToolName::GetSchools => ResourceRequest::Schools,
            ToolName::GetLearners => {
                let school_id = p.school_id()?;
                let limit = p
                    .bounded(&["limit"], 1..=i64::from(MAX_PAGE_LIMIT))?
                    .unwrap_or(i64::from(DEFAULT_PAGE_LIMIT));
                let offset = p
                    .bounded(&["offset"], 0..=i64::from(u32::MAX))?
                    .unwrap_or(0);
                ResourceRequest::Learners {
                    school_id,
                    page: Page::new(limit as u32, offset as u32),
                }
            }
            ToolName::GetStaff => ResourceRequest::Staff {
                school_id: p.school_id()?,
            },
            ToolName::GetParents => ResourceRequest::Parents {
                school_id: p.school_id()?,
            },
            ToolName::GetLearnerMarks => {
                let learner_id = p.required(&["learner_id", "learnerId"], 1..=i64::MAX)?;
                let term = p.bounded(&["term"], 1..=4)?;
                let year = p.bounded(&["year"], YEAR_RANGE)?;
                ResourceRequest::Marks {
                    learner_id: learner_id as u64,
                    filter: MarkFilter {
                        term: term.map(|t| t as u8),
                        year: year.map(|y| y as i32),
                    },
                }
            }
            ToolName::GetLookupData => {
                let lookup_type = p.string(&["type", "lookup_type", "lookupType"])?;
                if !is_valid_lookup_type(&lookup_type) {
                    return Err(p.invalid(format!(
                        "'type' may only contain letters, digits, '_' and '-' (got '{}')",
                        lookup_type
                    )));
                }
                ResourceRequest::lookup(&lookup_type)
            }
        };

        Ok(Self {
            tool,
            request,
            freshness: Freshness::Cached,
        })
    }

    pub fn with_freshness(mut self, freshness: Freshness) -> Self {
        self.freshness = freshness;
        self
    }

    pub async fn execute(&self, resolver: &HybridResolver) -> BridgeResult<ResolvedResult<Value>> {
        resolver.resolve(&self.request, self.freshness).await
    }
}
