//! Typed resource facade.
//!
//! Each method builds the query or body for one upstream operation and hands
//! it to the executor (single resources) or the aggregator (collections).
//! Throttling, retries and pagination live below this layer.

mod filters;
mod models;
mod outcome;
mod stages;

use std::borrow::Cow;
use std::sync::Arc;

use log::{info, warn};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::config::{BucketSettings, ClientConfig, RetryPolicy};
use crate::error_handling::ApiError;
use crate::fetch::{Executor, RequestDescriptor, Transport};
use crate::pagination::{Aggregator, CollectLimits, Collected, PageQuery};

pub use filters::{
    ArchiveRequest, ArchivedFilter, InterviewInput, InterviewerInput, OpportunityFilter,
    PanelInput, PostingFilter, RequisitionFilter, RequisitionInput,
};
pub use models::{
    Application, ArchiveReason, Interview, Interviewer, Note, Opportunity, Panel, Posting,
    PostingCategories, PostingRef, Requisition, Stage, StageRef, User, UserRef,
};
pub use outcome::ResourceOutcome;
pub use stages::{is_stage_id, resolve_stage_identifiers};

/// In-memory filter applied to candidates after they are fetched.
pub type OpportunityPredicate<'a> = &'a (dyn Fn(&Opportunity) -> bool + Sync);

/// Client for one upstream credential.
///
/// Owns its own token bucket and request queue; use separate instances for
/// separate credentials.
pub struct AtsClient {
    executor: Executor,
    limits: CollectLimits,
}

impl AtsClient {
    /// Creates a client over `transport` with the throttling and retry
    /// settings of `config`. Must be called inside a Tokio runtime.
    pub fn with_transport(transport: Arc<dyn Transport>, config: &ClientConfig) -> Self {
        Self::from_parts(transport, config.bucket, config.retry)
    }

    pub fn from_parts(
        transport: Arc<dyn Transport>,
        bucket: BucketSettings,
        retry: RetryPolicy,
    ) -> Self {
        AtsClient {
            executor: Executor::new(transport, bucket, retry),
            limits: CollectLimits::default(),
        }
    }

    /// Replaces the limits used by reference-data collections.
    pub fn with_default_limits(mut self, limits: CollectLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn executor(&self) -> &Executor {
        &self.executor
    }

    pub fn default_limits(&self) -> CollectLimits {
        self.limits
    }

    async fn fetch_one<T: DeserializeOwned>(
        &self,
        resource: &'static str,
        id: &str,
        request: RequestDescriptor,
    ) -> Result<T, ApiError> {
        let path = request.path.clone();
        let body = self.executor.execute(request).await?;
        ResourceOutcome::classify(body).into_result(resource, id, &path)
    }

    async fn delete(&self, request: RequestDescriptor) -> Result<(), ApiError> {
        self.executor.execute(request).await.map(|_| ())
    }

    async fn collect<T: DeserializeOwned>(
        &self,
        query: &PageQuery,
        limits: CollectLimits,
    ) -> Result<Collected<T>, ApiError> {
        Aggregator::new(&self.executor, limits).collect(query).await
    }

    /// Collects a small reference list with the client's default limits.
    async fn collect_reference<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<Collected<T>, ApiError> {
        let collected: Collected<T> = self.collect(&PageQuery::new(path), self.limits).await?;
        if let Some(note) = collected.completeness_note() {
            warn!("Reference list {} {}", path, note);
        }
        Ok(collected)
    }

    // Candidates

    /// Lists candidates matching `filter`, optionally narrowed in memory.
    pub async fn list_opportunities(
        &self,
        filter: &OpportunityFilter,
        limits: CollectLimits,
        predicate: Option<OpportunityPredicate<'_>>,
    ) -> Result<Collected<Opportunity>, ApiError> {
        let query = filter.to_query();
        let aggregator = Aggregator::new(&self.executor, limits);
        match predicate {
            Some(predicate) => {
                aggregator
                    .collect_filtered(&query, |opportunity: &Opportunity| predicate(opportunity))
                    .await
            }
            None => aggregator.collect(&query).await,
        }
    }

    /// Fetches one candidate.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::EmptyResource` when the upstream answers with an
    /// empty payload instead of a 404.
    pub async fn get_opportunity(&self, id: &str) -> Result<Opportunity, ApiError> {
        let path = format!("/opportunities/{}", segment(id)?);
        self.fetch_one("opportunity", id, RequestDescriptor::get(path)).await
    }

    pub async fn list_archived_opportunities(
        &self,
        filter: &ArchivedFilter,
        limits: CollectLimits,
    ) -> Result<Collected<Opportunity>, ApiError> {
        self.collect(&filter.to_query(), limits).await
    }

    /// Adds a note to a candidate; `author` is the author's email.
    pub async fn add_note(
        &self,
        opportunity_id: &str,
        text: &str,
        author: Option<&str>,
    ) -> Result<Value, ApiError> {
        let mut body = json!({ "value": text });
        if let Some(author) = author {
            body["author"] = json!(author);
        }
        let path = format!("/opportunities/{}/notes", segment(opportunity_id)?);
        let request = RequestDescriptor::post(path).with_body(body);
        self.fetch_one("note", opportunity_id, request).await
    }

    pub async fn update_opportunity_stage(
        &self,
        opportunity_id: &str,
        stage_id: &str,
        perform_as: Option<&str>,
    ) -> Result<Opportunity, ApiError> {
        let mut body = json!({ "stage": stage_id });
        if let Some(user) = perform_as {
            body["perform_as"] = json!(user);
        }
        let path = format!("/opportunities/{}/stage", segment(opportunity_id)?);
        let request = RequestDescriptor::put(path).with_body(body);
        let updated = self.fetch_one("opportunity", opportunity_id, request).await?;
        info!("Moved opportunity {} to stage {}", opportunity_id, stage_id);
        Ok(updated)
    }

    pub async fn archive_opportunity(
        &self,
        opportunity_id: &str,
        request: &ArchiveRequest,
    ) -> Result<Opportunity, ApiError> {
        let body = to_body(request)?;
        let path = format!("/opportunities/{}/archived", segment(opportunity_id)?);
        let request = RequestDescriptor::put(path).with_body(body);
        self.fetch_one("opportunity", opportunity_id, request).await
    }

    pub async fn add_tags(
        &self,
        opportunity_id: &str,
        tags: &[String],
        perform_as: Option<&str>,
    ) -> Result<Opportunity, ApiError> {
        self.change_tags(opportunity_id, "addTags", tags, perform_as)
            .await
    }

    pub async fn remove_tags(
        &self,
        opportunity_id: &str,
        tags: &[String],
        perform_as: Option<&str>,
    ) -> Result<Opportunity, ApiError> {
        self.change_tags(opportunity_id, "removeTags", tags, perform_as)
            .await
    }

    async fn change_tags(
        &self,
        opportunity_id: &str,
        action: &str,
        tags: &[String],
        perform_as: Option<&str>,
    ) -> Result<Opportunity, ApiError> {
        let path = format!("/opportunities/{}/{}", segment(opportunity_id)?, action);
        let request = RequestDescriptor::post(path)
            .with_query_opt("perform_as", perform_as)
            .with_body(json!({ "tags": tags }));
        self.fetch_one("opportunity", opportunity_id, request).await
    }

    // Candidate sub-resources

    pub async fn list_applications(
        &self,
        opportunity_id: &str,
        limits: CollectLimits,
    ) -> Result<Collected<Value>, ApiError> {
        let path = format!("/opportunities/{}/applications", segment(opportunity_id)?);
        let query = PageQuery::new(path);
        self.collect(&query, limits).await
    }

    pub async fn get_application(
        &self,
        opportunity_id: &str,
        application_id: &str,
    ) -> Result<Application, ApiError> {
        let path = format!(
            "/opportunities/{}/applications/{}",
            segment(opportunity_id)?,
            segment(application_id)?
        );
        let request = RequestDescriptor::get(path);
        self.fetch_one("application", application_id, request).await
    }

    pub async fn list_files(
        &self,
        opportunity_id: &str,
        limits: CollectLimits,
    ) -> Result<Collected<Value>, ApiError> {
        let path = format!("/opportunities/{}/files", segment(opportunity_id)?);
        let query = PageQuery::new(path);
        self.collect(&query, limits).await
    }

    pub async fn list_resumes(
        &self,
        opportunity_id: &str,
        limits: CollectLimits,
    ) -> Result<Collected<Value>, ApiError> {
        let path = format!("/opportunities/{}/resumes", segment(opportunity_id)?);
        let query = PageQuery::new(path);
        self.collect(&query, limits).await
    }

    // Postings

    pub async fn list_postings(
        &self,
        filter: &PostingFilter,
        limits: CollectLimits,
    ) -> Result<Collected<Posting>, ApiError> {
        self.collect(&filter.to_query(), limits).await
    }

    /// Lists postings whose owner name contains `owner` (case-insensitive).
    ///
    /// `state` defaults to `published`.
    pub async fn list_postings_by_owner(
        &self,
        owner: &str,
        state: Option<&str>,
        limits: CollectLimits,
    ) -> Result<Collected<Posting>, ApiError> {
        let filter = PostingFilter {
            state: Some(state.unwrap_or("published").to_string()),
            expand: vec!["owner".to_string(), "hiringManager".to_string()],
            ..PostingFilter::default()
        };
        let collected = Aggregator::new(&self.executor, limits)
            .collect_filtered(&filter.to_query(), |posting: &Posting| {
                posting.owner_name_contains(owner)
            })
            .await?;
        info!(
            "Found {} postings owned by '{}' among {} examined",
            collected.items.len(),
            owner,
            collected.stats.items_examined
        );
        Ok(collected)
    }

    // Reference data

    pub async fn list_stages(&self) -> Result<Collected<Stage>, ApiError> {
        self.collect_reference("/stages").await
    }

    pub async fn list_archive_reasons(&self) -> Result<Collected<ArchiveReason>, ApiError> {
        self.collect_reference("/archive_reasons").await
    }

    /// Resolves stage names or ids to ids, fetching the stage list once.
    ///
    /// # Errors
    ///
    /// - `IncompleteReferenceList` if names must be resolved and the stage
    ///   list stopped before its last page
    /// - `StageNotFound` for a name matching no stage
    pub async fn resolve_stage_ids<S: AsRef<str>>(
        &self,
        identifiers: &[S],
    ) -> Result<Vec<String>, ApiError> {
        if identifiers.iter().all(|id| is_stage_id(id.as_ref())) {
            return Ok(identifiers.iter().map(|id| id.as_ref().to_string()).collect());
        }
        let stages = self.list_stages().await?;
        if !stages.is_complete() {
            return Err(ApiError::IncompleteReferenceList {
                resource: "stage",
                exhausted: stages.exhausted,
            });
        }
        resolve_stage_identifiers(&stages.items, identifiers)
    }

    // Requisitions

    pub async fn list_requisitions(
        &self,
        filter: &RequisitionFilter,
        limits: CollectLimits,
    ) -> Result<Collected<Requisition>, ApiError> {
        self.collect(&filter.to_query(), limits).await
    }

    pub async fn get_requisition(&self, id: &str) -> Result<Requisition, ApiError> {
        let path = format!("/requisitions/{}", segment(id)?);
        self.fetch_one("requisition", id, RequestDescriptor::get(path)).await
    }

    /// Looks a requisition up by its human-facing code.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::EmptyResource` when no requisition carries `code`.
    pub async fn get_requisition_by_code(&self, code: &str) -> Result<Requisition, ApiError> {
        let filter = RequisitionFilter {
            requisition_code: Some(code.to_string()),
            ..RequisitionFilter::default()
        };
        let limits = self.limits.with_max_items(1);
        let collected: Collected<Requisition> = self.collect(&filter.to_query(), limits).await?;
        collected
            .items
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::EmptyResource {
                resource: "requisition",
                id: code.to_string(),
            })
    }

    pub async fn create_requisition(&self, input: &RequisitionInput) -> Result<Requisition, ApiError> {
        let request = RequestDescriptor::post("/requisitions").with_body(to_body(input)?);
        let label = input.requisition_code.as_deref().unwrap_or("new");
        self.fetch_one("requisition", label, request).await
    }

    pub async fn update_requisition(
        &self,
        id: &str,
        input: &RequisitionInput,
    ) -> Result<Requisition, ApiError> {
        let path = format!("/requisitions/{}", segment(id)?);
        let request = RequestDescriptor::put(path).with_body(to_body(input)?);
        self.fetch_one("requisition", id, request).await
    }

    pub async fn delete_requisition(&self, id: &str) -> Result<(), ApiError> {
        let path = format!("/requisitions/{}", segment(id)?);
        self.delete(RequestDescriptor::delete(path)).await
    }

    // Interviews

    pub async fn list_interviews(
        &self,
        opportunity_id: &str,
        limits: CollectLimits,
    ) -> Result<Collected<Interview>, ApiError> {
        let path = format!("/opportunities/{}/interviews", segment(opportunity_id)?);
        let query = PageQuery::new(path);
        self.collect(&query, limits).await
    }

    pub async fn get_interview(
        &self,
        opportunity_id: &str,
        interview_id: &str,
    ) -> Result<Interview, ApiError> {
        let path = format!(
            "/opportunities/{}/interviews/{}",
            segment(opportunity_id)?,
            segment(interview_id)?
        );
        let request = RequestDescriptor::get(path);
        self.fetch_one("interview", interview_id, request).await
    }

    pub async fn create_interview(
        &self,
        opportunity_id: &str,
        input: &InterviewInput,
        perform_as: Option<&str>,
    ) -> Result<Interview, ApiError> {
        let path = format!("/opportunities/{}/interviews", segment(opportunity_id)?);
        let request = RequestDescriptor::post(path)
            .with_query_opt("perform_as", perform_as)
            .with_body(to_body(input)?);
        self.fetch_one("interview", opportunity_id, request).await
    }

    pub async fn update_interview(
        &self,
        opportunity_id: &str,
        interview_id: &str,
        input: &InterviewInput,
        perform_as: Option<&str>,
    ) -> Result<Interview, ApiError> {
        let path = format!(
            "/opportunities/{}/interviews/{}",
            segment(opportunity_id)?,
            segment(interview_id)?
        );
        let request = RequestDescriptor::put(path)
            .with_query_opt("perform_as", perform_as)
            .with_body(to_body(input)?);
        self.fetch_one("interview", interview_id, request).await
    }

    pub async fn delete_interview(
        &self,
        opportunity_id: &str,
        interview_id: &str,
        perform_as: Option<&str>,
    ) -> Result<(), ApiError> {
        let path = format!(
            "/opportunities/{}/interviews/{}",
            segment(opportunity_id)?,
            segment(interview_id)?
        );
        self.delete(RequestDescriptor::delete(path).with_query_opt("perform_as", perform_as))
            .await
    }

    // Panels

    pub async fn list_panels(
        &self,
        opportunity_id: &str,
        limits: CollectLimits,
    ) -> Result<Collected<Panel>, ApiError> {
        let path = format!("/opportunities/{}/panels", segment(opportunity_id)?);
        let query = PageQuery::new(path);
        self.collect(&query, limits).await
    }

    pub async fn get_panel(&self, opportunity_id: &str, panel_id: &str) -> Result<Panel, ApiError> {
        let path = format!(
            "/opportunities/{}/panels/{}",
            segment(opportunity_id)?,
            segment(panel_id)?
        );
        let request = RequestDescriptor::get(path);
        self.fetch_one("panel", panel_id, request).await
    }

    pub async fn create_panel(
        &self,
        opportunity_id: &str,
        input: &PanelInput,
        perform_as: Option<&str>,
    ) -> Result<Panel, ApiError> {
        let path = format!("/opportunities/{}/panels", segment(opportunity_id)?);
        let request = RequestDescriptor::post(path)
            .with_query_opt("perform_as", perform_as)
            .with_body(to_body(input)?);
        self.fetch_one("panel", opportunity_id, request).await
    }

    pub async fn update_panel(
        &self,
        opportunity_id: &str,
        panel_id: &str,
        input: &PanelInput,
        perform_as: Option<&str>,
    ) -> Result<Panel, ApiError> {
        let path = format!(
            "/opportunities/{}/panels/{}",
            segment(opportunity_id)?,
            segment(panel_id)?
        );
        let request = RequestDescriptor::put(path)
            .with_query_opt("perform_as", perform_as)
            .with_body(to_body(input)?);
        self.fetch_one("panel", panel_id, request).await
    }

    pub async fn delete_panel(
        &self,
        opportunity_id: &str,
        panel_id: &str,
        perform_as: Option<&str>,
    ) -> Result<(), ApiError> {
        let path = format!(
            "/opportunities/{}/panels/{}",
            segment(opportunity_id)?,
            segment(panel_id)?
        );
        self.delete(RequestDescriptor::delete(path).with_query_opt("perform_as", perform_as))
            .await
    }
}

/// Percent-encodes `id` as exactly one path segment.
///
/// Dot segments are rejected: URL normalization collapses them even when
/// percent-encoded.
fn segment(id: &str) -> Result<Cow<'_, str>, ApiError> {
    if matches!(id, "" | "." | "..") {
        return Err(ApiError::InvalidIdentifier(id.to_string()));
    }
    Ok(urlencoding::encode(id))
}

fn to_body<B: serde::Serialize>(body: &B) -> Result<Value, ApiError> {
    serde_json::to_value(body).map_err(|e| ApiError::MalformedResponse {
        path: "request body".to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::testing::{fast_policy, PagedTransport, ScriptedTransport};
    use crate::pagination::ExhaustionReason;
    use reqwest::Method;

    fn client_over(transport: Arc<dyn Transport>) -> AtsClient {
        AtsClient::from_parts(transport, BucketSettings::default(), fast_policy())
    }

    #[tokio::test(start_paused = true)]
    async fn test_get_opportunity_found() {
        let transport = Arc::new(ScriptedTransport::new().then_json(
            200,
            json!({"data": {"id": "o1", "name": "Ada Lovelace", "emails": ["ada@example.com"]}}),
        ));
        let client = client_over(transport.clone());

        let opportunity = client.get_opportunity("o1").await.unwrap();
        assert_eq!(opportunity.id, "o1");
        assert_eq!(opportunity.name.as_deref(), Some("Ada Lovelace"));
        assert_eq!(transport.requests()[0].path, "/opportunities/o1");
    }

    #[tokio::test(start_paused = true)]
    async fn test_ids_are_encoded_as_single_path_segments() {
        let transport =
            Arc::new(ScriptedTransport::new().always_json(200, json!({"data": {"id": "x"}})));
        let client = client_over(transport.clone());

        client.get_opportunity("../postings").await.unwrap();
        client.get_opportunity("abc?archived=true").await.unwrap();
        client.get_panel("o 1", "p#2").await.unwrap();

        let paths: Vec<String> = transport.requests().into_iter().map(|r| r.path).collect();
        assert_eq!(
            paths,
            vec![
                "/opportunities/..%2Fpostings",
                "/opportunities/abc%3Farchived%3Dtrue",
                "/opportunities/o%201/panels/p%232",
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_dot_segment_ids_are_rejected_before_any_request() {
        let transport =
            Arc::new(ScriptedTransport::new().always_json(200, json!({"data": {"id": "x"}})));
        let client = client_over(transport.clone());

        for id in ["", ".", ".."] {
            let err = client.get_requisition(id).await.unwrap_err();
            assert!(matches!(err, ApiError::InvalidIdentifier(ref bad) if bad == id), "{err:?}");
        }
        let err = client.delete_interview("o1", "..", None).await.unwrap_err();
        assert_eq!(err.kind(), crate::error_handling::ErrorKind::InvalidIdentifier);
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_payload_is_reported_as_missing_resource() {
        for body in [json!({"data": {}}), json!({"data": null})] {
            let transport = Arc::new(ScriptedTransport::new().then_json(200, body.clone()));
            let client = client_over(transport);

            let err = client.get_opportunity("ghost").await.unwrap_err();
            assert!(
                matches!(err, ApiError::EmptyResource { resource: "opportunity", ref id } if id == "ghost"),
                "body {body}: {err:?}"
            );
            assert!(err.is_not_found());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_upstream_404_is_a_client_error() {
        let transport = Arc::new(ScriptedTransport::new().always_status(404, "not found"));
        let client = client_over(transport.clone());

        let err = client.get_requisition("r404").await.unwrap_err();
        assert!(matches!(err, ApiError::ClientRequestError { status: 404, .. }));
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_list_opportunities_with_predicate() {
        let transport = Arc::new(ScriptedTransport::new().then_json(
            200,
            json!({
                "data": [
                    {"id": "o1", "name": "Ada", "tags": ["rust"]},
                    {"id": "o2", "name": "Bob", "tags": ["go"]},
                    {"id": "o3", "name": "Cy", "tags": ["rust", "c"]}
                ],
                "hasNext": false
            }),
        ));
        let client = client_over(transport.clone());
        let filter = OpportunityFilter {
            posting_id: Some("p1".into()),
            ..Default::default()
        };
        let knows_rust = |o: &Opportunity| o.tags.iter().any(|t| t == "rust");

        let collected = client
            .list_opportunities(&filter, CollectLimits::default(), Some(&knows_rust))
            .await
            .unwrap();

        let ids: Vec<&str> = collected.items.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, ["o1", "o3"]);
        assert_eq!(collected.stats.items_examined, 3);
        assert!(collected.is_complete());
        assert_eq!(transport.requests()[0].query_value("posting_id"), Some("p1"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_list_postings_by_owner_expands_and_filters() {
        let transport = Arc::new(ScriptedTransport::new().then_json(
            200,
            json!({
                "data": [
                    {"id": "p1", "text": "Backend", "owner": {"id": "u1", "name": "Jane Smith"}},
                    {"id": "p2", "text": "Frontend", "owner": {"id": "u2", "name": "John Doe"}},
                    {"id": "p3", "text": "Data", "owner": "u3"}
                ],
                "hasNext": false
            }),
        ));
        let client = client_over(transport.clone());

        let collected = client
            .list_postings_by_owner("smith", None, CollectLimits::default())
            .await
            .unwrap();

        assert_eq!(collected.items.len(), 1);
        assert_eq!(collected.items[0].id, "p1");
        let request = &transport.requests()[0];
        assert_eq!(request.query_value("state"), Some("published"));
        let expand: Vec<&str> = request
            .query
            .iter()
            .filter(|(k, _)| k == "expand")
            .map(|(_, v)| v.as_str())
            .collect();
        assert_eq!(expand, ["owner", "hiringManager"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_resolve_stage_ids_fetches_stages_only_for_names() {
        let transport = Arc::new(ScriptedTransport::new().then_json(
            200,
            json!({"data": [{"id": "s-screen", "text": "Phone Screen"}, {"id": "s-offer", "text": "Offer"}]}),
        ));
        let client = client_over(transport.clone());

        let uuid = "3f1c2b7a-1d2e-4f50-8a9b-0c1d2e3f4a5b";
        assert_eq!(client.resolve_stage_ids(&[uuid]).await.unwrap(), vec![uuid]);
        assert_eq!(transport.calls(), 0);

        let resolved = client.resolve_stage_ids(&["offer", uuid]).await.unwrap();
        assert_eq!(resolved, vec!["s-offer".to_string(), uuid.to_string()]);
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_partial_stage_list_is_labelled_and_not_used_for_names() {
        let first_page = json!({
            "data": [{"id": "s-screen", "text": "Phone Screen"}],
            "hasNext": true,
            "next": "p2"
        });
        let transport = Arc::new(
            ScriptedTransport::new()
                .then_json(200, first_page.clone())
                .then_json(200, first_page),
        );
        let client = client_over(transport.clone())
            .with_default_limits(CollectLimits::default().with_max_calls(1));

        let stages = client.list_stages().await.unwrap();
        assert_eq!(stages.items.len(), 1);
        assert!(!stages.is_complete());
        assert_eq!(stages.exhausted, ExhaustionReason::MaxCalls);

        let err = client.resolve_stage_ids(&["Offer"]).await.unwrap_err();
        assert!(
            matches!(
                err,
                ApiError::IncompleteReferenceList {
                    resource: "stage",
                    exhausted: ExhaustionReason::MaxCalls
                }
            ),
            "{err:?}"
        );
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_requisition_by_code() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .then_json(
                    200,
                    json!({"data": [{"id": "r1", "requisitionCode": "ENG-1"}], "hasNext": true, "next": "x"}),
                )
                .then_json(200, json!({"data": [], "hasNext": false})),
        );
        let client = client_over(transport.clone());

        let found = client.get_requisition_by_code("ENG-1").await.unwrap();
        assert_eq!(found.id, "r1");
        let request = &transport.requests()[0];
        assert_eq!(request.query_value("requisition_code"), Some("ENG-1"));
        assert_eq!(request.query_value("limit"), Some("1"));

        let err = client.get_requisition_by_code("NOPE-9").await.unwrap_err();
        assert!(matches!(err, ApiError::EmptyResource { resource: "requisition", .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_mutations_send_expected_requests() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .then_json(200, json!({"data": {"noteId": "n1"}}))
                .then_json(200, json!({"data": {"id": "o1", "stage": "s2"}}))
                .then_json(200, json!({"data": {"id": "o1", "tags": ["a", "b"]}}))
                .then_status(204, ""),
        );
        let client = client_over(transport.clone());

        let note = client.add_note("o1", "Great call", Some("me@example.com")).await.unwrap();
        assert_eq!(note, json!({"noteId": "n1"}));
        client.update_opportunity_stage("o1", "s2", Some("u9")).await.unwrap();
        let tagged = client
            .add_tags("o1", &["a".to_string(), "b".to_string()], Some("u9"))
            .await
            .unwrap();
        assert_eq!(tagged.tags, ["a", "b"]);
        client.delete_interview("o1", "i1", Some("u9")).await.unwrap();

        let requests = transport.requests();
        assert_eq!(requests[0].method, Method::POST);
        assert_eq!(requests[0].path, "/opportunities/o1/notes");
        assert_eq!(
            requests[0].body,
            Some(json!({"value": "Great call", "author": "me@example.com"}))
        );
        assert_eq!(requests[1].method, Method::PUT);
        assert_eq!(requests[1].body, Some(json!({"stage": "s2", "perform_as": "u9"})));
        assert_eq!(requests[2].path, "/opportunities/o1/addTags");
        assert_eq!(requests[2].query_value("perform_as"), Some("u9"));
        assert_eq!(requests[2].body, Some(json!({"tags": ["a", "b"]})));
        assert_eq!(requests[3].method, Method::DELETE);
        assert_eq!(requests[3].path, "/opportunities/o1/interviews/i1");
    }

    #[tokio::test(start_paused = true)]
    async fn test_archive_uses_put_on_archived() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .then_json(200, json!({"data": {"id": "o1", "archived": {"reason": "r1"}}})),
        );
        let client = client_over(transport.clone());

        let archived = client
            .archive_opportunity(
                "o1",
                &ArchiveRequest {
                    reason: "r1".into(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(archived.is_archived());
        let request = &transport.requests()[0];
        assert_eq!(request.method, Method::PUT);
        assert_eq!(request.path, "/opportunities/o1/archived");
    }

    #[tokio::test(start_paused = true)]
    async fn test_interviews_are_collected_across_pages() {
        let source = Arc::new(PagedTransport::new(130));
        let client = client_over(source.clone());

        let collected = client
            .list_interviews("o1", CollectLimits::default())
            .await
            .unwrap();
        assert_eq!(collected.items.len(), 130);
        assert_eq!(collected.items[129].id, "item-129");
        assert_eq!(source.requests()[0].path, "/opportunities/o1/interviews");
    }
}
