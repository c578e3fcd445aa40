//! Typed list filters and mutation payloads.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::pagination::PageQuery;

/// Query parameters for `/opportunities`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpportunityFilter {
    pub stage_ids: Vec<String>,
    pub posting_id: Option<String>,
    pub email: Option<String>,
    pub tags: Vec<String>,
    pub origin: Option<String>,
    pub expand: Vec<String>,
}

impl OpportunityFilter {
    pub fn to_query(&self) -> PageQuery {
        PageQuery::new("/opportunities")
            .param_all("stage_id", &self.stage_ids)
            .param_opt("posting_id", self.posting_id.as_ref())
            .param_opt("email", self.email.as_ref())
            .param_all("tag", &self.tags)
            .param_opt("origin", self.origin.as_ref())
            .param_all("expand", &self.expand)
    }
}

/// Query parameters for archived candidates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchivedFilter {
    pub posting_id: Option<String>,
    /// Epoch milliseconds.
    pub archived_at_start: Option<i64>,
    /// Epoch milliseconds.
    pub archived_at_end: Option<i64>,
    pub archive_reason_id: Option<String>,
}

impl ArchivedFilter {
    pub fn to_query(&self) -> PageQuery {
        PageQuery::new("/opportunities")
            .param("archived", true)
            .param_opt("archived_at_start", self.archived_at_start)
            .param_opt("archived_at_end", self.archived_at_end)
            .param_opt("posting_id", self.posting_id.as_ref())
            .param_opt("archive_reason_id", self.archive_reason_id.as_ref())
            .param_all("expand", ["owner", "posting"])
    }
}

/// Query parameters for `/postings`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostingFilter {
    pub state: Option<String>,
    pub team: Option<String>,
    pub department: Option<String>,
    pub expand: Vec<String>,
    pub include: Vec<String>,
}

impl Default for PostingFilter {
    fn default() -> Self {
        PostingFilter {
            state: Some("published".to_string()),
            team: None,
            department: None,
            expand: Vec::new(),
            include: Vec::new(),
        }
    }
}

impl PostingFilter {
    pub fn to_query(&self) -> PageQuery {
        PageQuery::new("/postings")
            .param_opt("state", self.state.as_ref())
            .param_opt("team", self.team.as_ref())
            .param_opt("department", self.department.as_ref())
            .param_all("expand", &self.expand)
            .param_all("include", &self.include)
    }
}

/// Query parameters for `/requisitions`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequisitionFilter {
    pub status: Option<String>,
    pub requisition_code: Option<String>,
    /// Epoch milliseconds.
    pub created_at_start: Option<i64>,
    /// Epoch milliseconds.
    pub created_at_end: Option<i64>,
    pub confidentiality: Option<String>,
}

impl RequisitionFilter {
    pub fn to_query(&self) -> PageQuery {
        PageQuery::new("/requisitions")
            .param_opt("status", self.status.as_ref())
            .param_opt("requisition_code", self.requisition_code.as_ref())
            .param_opt("created_at_start", self.created_at_start)
            .param_opt("created_at_end", self.created_at_end)
            .param_opt("confidentiality", self.confidentiality.as_ref())
    }
}

/// Body of an archive request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveRequest {
    /// Archive reason id.
    pub reason: String,
    #[serde(rename = "perform_as", skip_serializing_if = "Option::is_none")]
    pub perform_as: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clean_interviews: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requisition_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewerInput {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback_template: Option<String>,
}

/// Body for creating or updating an interview. Unset fields are omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub panel: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub interviewers: Vec<InterviewerInput>,
    /// Start, in epoch milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<i64>,
    /// Length, in minutes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback_template: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback_reminder: Option<String>,
}

/// Body for creating or updating a panel. Unset fields are omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelInput {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub applications: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback_reminder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_url: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub interviews: Vec<InterviewInput>,
}

/// Body for creating or updating a requisition.
///
/// Fields the client does not model can be passed through `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequisitionInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requisition_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headcount_total: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hiring_manager: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
