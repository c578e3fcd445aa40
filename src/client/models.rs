//! Typed upstream resources.
//!
//! Only the fields the client reads are modelled; everything else in the
//! upstream payload is ignored. Reference fields that the upstream returns
//! either as a bare id or as an expanded object (depending on `expand`) are
//! untagged enums.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A user, as an id or as an expanded object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserRef {
    Id(String),
    Expanded(User),
}

impl UserRef {
    pub fn id(&self) -> Option<&str> {
        match self {
            UserRef::Id(id) => Some(id),
            UserRef::Expanded(user) => Some(&user.id),
        }
    }

    /// Display name; only known for expanded references.
    pub fn name(&self) -> Option<&str> {
        match self {
            UserRef::Id(_) => None,
            UserRef::Expanded(user) => user.name.as_deref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// A pipeline stage, as an id or as an expanded object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StageRef {
    Id(String),
    Expanded {
        #[serde(default)]
        id: Option<String>,
        text: String,
    },
}

impl StageRef {
    pub fn id(&self) -> Option<&str> {
        match self {
            StageRef::Id(id) => Some(id),
            StageRef::Expanded { id, .. } => id.as_deref(),
        }
    }
}

/// A posting, as an id or as an expanded object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PostingRef {
    Id(String),
    Expanded {
        #[serde(default)]
        id: Option<String>,
        text: String,
    },
}

/// A candidate in a hiring pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Opportunity {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub headline: Option<String>,
    #[serde(default)]
    pub emails: Vec<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub stage: Option<StageRef>,
    #[serde(default)]
    pub owner: Option<UserRef>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(default)]
    pub origin: Option<String>,
    #[serde(default)]
    pub applications: Vec<String>,
    /// Archive details; `null` for active candidates.
    #[serde(default)]
    pub archived: Option<Value>,
    #[serde(default)]
    pub created_at: Option<i64>,
    #[serde(default)]
    pub updated_at: Option<i64>,
}

impl Opportunity {
    pub fn is_archived(&self) -> bool {
        matches!(&self.archived, Some(value) if !value.is_null())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostingCategories {
    #[serde(default)]
    pub team: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub commitment: Option<String>,
    #[serde(default)]
    pub level: Option<String>,
}

/// A job posting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Posting {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub owner: Option<UserRef>,
    #[serde(default)]
    pub hiring_manager: Option<UserRef>,
    #[serde(default)]
    pub categories: Option<PostingCategories>,
    #[serde(default)]
    pub confidentiality: Option<String>,
    #[serde(default)]
    pub req_code: Option<String>,
    #[serde(default)]
    pub requisition_codes: Vec<String>,
    #[serde(default)]
    pub created_at: Option<i64>,
    #[serde(default)]
    pub updated_at: Option<i64>,
}

impl Posting {
    /// Case-insensitive partial match on the expanded owner name.
    pub fn owner_name_contains(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.owner
            .as_ref()
            .and_then(UserRef::name)
            .is_some_and(|name| name.to_lowercase().contains(&needle))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    pub id: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchiveReason {
    pub id: String,
    pub text: String,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Requisition {
    pub id: String,
    #[serde(default)]
    pub requisition_code: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub headcount_total: Option<Value>,
    #[serde(default)]
    pub headcount_hired: Option<u32>,
    #[serde(default)]
    pub owner: Option<UserRef>,
    #[serde(default)]
    pub hiring_manager: Option<UserRef>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub team: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub confidentiality: Option<String>,
    #[serde(default)]
    pub created_at: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interviewer {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback_template: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interview {
    pub id: String,
    #[serde(default)]
    pub panel: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub interviewers: Vec<Interviewer>,
    #[serde(default)]
    pub timezone: Option<String>,
    /// Start, in epoch milliseconds.
    #[serde(default)]
    pub date: Option<i64>,
    /// Length, in minutes.
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub created_at: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Panel {
    pub id: String,
    #[serde(default)]
    pub applications: Vec<String>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub external_url: Option<String>,
    #[serde(default)]
    pub interviews: Vec<Interview>,
    #[serde(default)]
    pub start: Option<i64>,
    #[serde(default)]
    pub end: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: String,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub posting: Option<PostingRef>,
    #[serde(default)]
    pub opportunity_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub user: Option<UserRef>,
    #[serde(default)]
    pub created_at: Option<i64>,
}
