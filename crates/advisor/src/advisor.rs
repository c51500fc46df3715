//! Advisory operations over a [`CompletionProvider`].
//!
//! Each public operation issues exactly one completion request. Any failure
//! (transport, status, JSON, shape) is logged and replaced by a fixed
//! fallback, so callers never see an error.

use std::sync::Arc;

use chrono::{NaiveDate, TimeZone, Utc};
use dreamboard_core::resources::ResourceType;
use dreamboard_core::tasks::{progress_percentage, TaskPriority, TaskStatus};
use dreamboard_core::types::Timestamp;
use serde::{Deserialize, Serialize};

use crate::config::AdvisorConfig;
use crate::prompts;
use crate::provider::{AdvisorError, CompletionProvider, OpenAiProvider};

/// Confidence reported when the timeline falls back.
pub const TIMELINE_FALLBACK_CONFIDENCE: i32 = 65;

/// Confidence reported when progress analysis falls back.
pub const PROGRESS_FALLBACK_CONFIDENCE: i32 = 60;

const TIMELINE_DEFAULT_NEXT_ACTION: &str = "Start planning your first steps";
const TIMELINE_DEFAULT_CONFIDENCE: i32 = 75;
const PROGRESS_DEFAULT_NEXT_ACTION: &str = "Continue working on your current tasks";
const PROGRESS_DEFAULT_CONFIDENCE: i32 = 70;

// ---------------------------------------------------------------------------
// Public result types
// ---------------------------------------------------------------------------

/// One milestone proposed for a dream.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestedTask {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: Option<NaiveDate>,
}

impl SuggestedTask {
    /// Due date as a UTC midnight timestamp.
    pub fn due_timestamp(&self) -> Option<Timestamp> {
        self.due_date
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| Utc.from_utc_datetime(&dt))
    }
}

/// Proposed task timeline plus headline advice.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeline {
    pub tasks: Vec<SuggestedTask>,
    pub next_action: String,
    pub ai_confidence: i32,
}

impl Timeline {
    /// The fixed timeline used whenever generation fails.
    pub fn fallback() -> Self {
        Self {
            tasks: vec![SuggestedTask {
                title: "Create an action plan".into(),
                description: "Break down your dream into smaller, achievable goals.".into(),
                status: TaskStatus::ToDo,
                priority: TaskPriority::High,
                due_date: None,
            }],
            next_action: "Start by creating an action plan for your dream".into(),
            ai_confidence: TIMELINE_FALLBACK_CONFIDENCE,
        }
    }
}

/// One recommended learning resource.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestedResource {
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    pub url: String,
    pub is_verified: bool,
    pub is_free: bool,
    pub read_time: Option<i32>,
    pub duration: Option<i32>,
}

impl SuggestedResource {
    /// The fixed recommendation list used whenever generation fails.
    pub fn fallback_list() -> Vec<Self> {
        vec![Self {
            title: "How to Set Effective Goals".into(),
            description: "A comprehensive guide to setting achievable and measurable goals"
                .into(),
            resource_type: ResourceType::Article,
            url: "https://www.mindtools.com/pages/article/newHTE_90.htm".into(),
            is_verified: true,
            is_free: true,
            read_time: Some(8),
            duration: None,
        }]
    }
}

/// Minimal view of a task sent to the completion service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskSnapshot {
    pub title: String,
    pub status: TaskStatus,
}

/// Progress assessment of a dream.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressAnalysis {
    pub progress_percentage: u8,
    pub next_action: String,
    pub ai_confidence: i32,
}

impl ProgressAnalysis {
    /// Locally computed analysis used whenever the service fails.
    pub fn fallback(tasks: &[TaskSnapshot]) -> Self {
        Self {
            progress_percentage: progress_percentage(tasks.iter().map(|t| t.status)),
            next_action: "Continue working on your tasks in order of priority".into(),
            ai_confidence: PROGRESS_FALLBACK_CONFIDENCE,
        }
    }
}

// ---------------------------------------------------------------------------
// Wire shapes (lenient)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTimeline {
    #[serde(default)]
    tasks: Vec<RawTask>,
    next_action: Option<String>,
    ai_confidence: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTask {
    title: Option<String>,
    description: Option<String>,
    status: Option<String>,
    priority: Option<String>,
    due_date: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawResourceList {
    Bare(Vec<RawResource>),
    Wrapped { resources: Vec<RawResource> },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawResource {
    title: Option<String>,
    description: Option<String>,
    #[serde(rename = "type")]
    resource_type: Option<String>,
    url: Option<String>,
    is_verified: Option<bool>,
    is_free: Option<bool>,
    read_time: Option<f64>,
    duration: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawProgress {
    progress_percentage: Option<f64>,
    next_action: Option<String>,
    ai_confidence: Option<f64>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Round and clamp a model-supplied number into `0..=100`.
fn percent(value: f64) -> i32 {
    value.round().clamp(0.0, 100.0) as i32
}

fn parse_timeline(content: &str) -> Result<Timeline, AdvisorError> {
    let raw: RawTimeline = serde_json::from_str(content)?;

    let tasks: Vec<SuggestedTask> = raw
        .tasks
        .into_iter()
        .filter_map(|t| {
            let title = non_blank(t.title)?;
            Some(SuggestedTask {
                title,
                description: t.description.unwrap_or_default(),
                status: t
                    .status
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_default(),
                priority: t
                    .priority
                    .and_then(|p| p.parse().ok())
                    .unwrap_or_default(),
                due_date: t
                    .due_date
                    .and_then(|d| NaiveDate::parse_from_str(d.trim(), "%Y-%m-%d").ok()),
            })
        })
        .collect();

    if tasks.is_empty() {
        return Err(AdvisorError::Malformed("timeline contains no tasks".into()));
    }

    Ok(Timeline {
        tasks,
        next_action: non_blank(raw.next_action)
            .unwrap_or_else(|| TIMELINE_DEFAULT_NEXT_ACTION.into()),
        ai_confidence: raw
            .ai_confidence
            .map(percent)
            .unwrap_or(TIMELINE_DEFAULT_CONFIDENCE),
    })
}

fn parse_resources(content: &str) -> Result<Vec<SuggestedResource>, AdvisorError> {
    let raw = match serde_json::from_str::<RawResourceList>(content)? {
        RawResourceList::Bare(list) | RawResourceList::Wrapped { resources: list } => list,
    };

    let resources: Vec<SuggestedResource> = raw
        .into_iter()
        .filter_map(|r| {
            Some(SuggestedResource {
                title: non_blank(r.title)?,
                description: r.description.unwrap_or_default(),
                resource_type: r.resource_type?.trim().to_lowercase().parse().ok()?,
                url: non_blank(r.url)?,
                is_verified: r.is_verified.unwrap_or(false),
                is_free: r.is_free.unwrap_or(true),
                read_time: r.read_time.map(|m| m.round().max(0.0) as i32),
                duration: r.duration.map(|m| m.round().max(0.0) as i32),
            })
        })
        .collect();

    if resources.is_empty() {
        return Err(AdvisorError::Malformed("no usable resources".into()));
    }
    Ok(resources)
}

fn parse_progress(content: &str) -> Result<ProgressAnalysis, AdvisorError> {
    let raw: RawProgress = serde_json::from_str(content)?;
    Ok(ProgressAnalysis {
        progress_percentage: raw.progress_percentage.map(percent).unwrap_or(0) as u8,
        next_action: non_blank(raw.next_action)
            .unwrap_or_else(|| PROGRESS_DEFAULT_NEXT_ACTION.into()),
        ai_confidence: raw
            .ai_confidence
            .map(percent)
            .unwrap_or(PROGRESS_DEFAULT_CONFIDENCE),
    })
}

// ---------------------------------------------------------------------------
// Advisor
// ---------------------------------------------------------------------------

/// Best-effort AI advice for dreams. Cheap to clone.
#[derive(Clone)]
pub struct Advisor {
    provider: Arc<dyn CompletionProvider>,
}

impl Advisor {
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self { provider }
    }

    /// Build an advisor backed by [`OpenAiProvider`].
    pub fn from_config(config: AdvisorConfig) -> Result<Self, AdvisorError> {
        Ok(Self::new(Arc::new(OpenAiProvider::new(config)?)))
    }

    /// Propose a task timeline for a dream. Never fails.
    pub async fn generate_timeline(&self, title: &str, description: Option<&str>) -> Timeline {
        let prompt = prompts::timeline(title, description);
        let result = self
            .provider
            .complete(prompts::TIMELINE_SYSTEM, &prompt)
            .await
            .and_then(|content| parse_timeline(&content));

        match result {
            Ok(timeline) => timeline,
            Err(e) => {
                log_failure("generate_timeline", &e);
                Timeline::fallback()
            }
        }
    }

    /// Recommend learning resources for a dream. Never fails.
    pub async fn generate_resources(
        &self,
        title: &str,
        tasks: Option<&[TaskSnapshot]>,
    ) -> Vec<SuggestedResource> {
        let result = async {
            let tasks_json = tasks.map(serde_json::to_string).transpose()?;
            let prompt = prompts::resources(title, tasks_json.as_deref());
            let content = self
                .provider
                .complete(prompts::RESOURCES_SYSTEM, &prompt)
                .await?;
            parse_resources(&content)
        }
        .await;

        match result {
            Ok(resources) => resources,
            Err(e) => {
                log_failure("generate_resources", &e);
                SuggestedResource::fallback_list()
            }
        }
    }

    /// Assess progress on a dream from its task statuses. Never fails.
    pub async fn analyze_dream_progress(
        &self,
        title: &str,
        tasks: &[TaskSnapshot],
    ) -> ProgressAnalysis {
        let result = async {
            let tasks_json = serde_json::to_string(tasks)?;
            let prompt = prompts::progress(title, &tasks_json);
            let content = self
                .provider
                .complete(prompts::PROGRESS_SYSTEM, &prompt)
                .await?;
            parse_progress(&content)
        }
        .await;

        match result {
            Ok(analysis) => analysis,
            Err(e) => {
                log_failure("analyze_dream_progress", &e);
                ProgressAnalysis::fallback(tasks)
            }
        }
    }
}

fn log_failure(operation: &'static str, error: &AdvisorError) {
    match error {
        AdvisorError::NotConfigured => {
            tracing::debug!(operation, "Advisor disabled, using fallback");
        }
        other => {
            tracing::warn!(operation, error = %other, "Advisory call failed, using fallback");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Replies with a fixed body and records the prompts it saw.
    struct Canned {
        reply: Result<String, ()>,
        seen: Mutex<Vec<String>>,
    }

    impl Canned {
        fn ok(body: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(body.to_string()),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                reply: Err(()),
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl CompletionProvider for Canned {
        async fn complete(&self, _system: &str, user: &str) -> Result<String, AdvisorError> {
            self.seen.lock().unwrap().push(user.to_string());
            match &self.reply {
                Ok(body) => Ok(body.clone()),
                Err(()) => Err(AdvisorError::Api {
                    status: 500,
                    body: "boom".into(),
                }),
            }
        }
    }

    fn snapshot(title: &str, status: TaskStatus) -> TaskSnapshot {
        TaskSnapshot {
            title: title.into(),
            status,
        }
    }

    #[tokio::test]
    async fn timeline_falls_back_exactly_on_failure() {
        let advisor = Advisor::new(Canned::failing());
        let timeline = advisor.generate_timeline("Run a marathon", None).await;

        assert_eq!(timeline, Timeline::fallback());
        assert_eq!(timeline.ai_confidence, 65);
        assert_eq!(timeline.tasks.len(), 1);
        assert_eq!(timeline.tasks[0].title, "Create an action plan");
        assert_eq!(timeline.tasks[0].priority, TaskPriority::High);
        assert_eq!(
            timeline.next_action,
            "Start by creating an action plan for your dream"
        );
    }

    #[tokio::test]
    async fn timeline_falls_back_on_invalid_json_and_empty_tasks() {
        let advisor = Advisor::new(Canned::ok("not json"));
        assert_eq!(advisor.generate_timeline("x", None).await, Timeline::fallback());

        let advisor = Advisor::new(Canned::ok(r#"{"tasks": [], "nextAction": "go"}"#));
        assert_eq!(advisor.generate_timeline("x", None).await, Timeline::fallback());
    }

    #[tokio::test]
    async fn timeline_is_parsed_leniently() {
        let body = r#"{
            "tasks": [
                {"title": "Buy shoes", "description": "Proper running shoes", "status": "To-Do", "priority": "High", "dueDate": "2025-04-01"},
                {"title": "Run 5k", "priority": "urgent", "dueDate": "next week"},
                {"description": "no title, dropped"}
            ],
            "nextAction": "Buy shoes",
            "aiConfidence": 123.4
        }"#;
        let provider = Canned::ok(body);
        let advisor = Advisor::new(provider.clone());

        let timeline = advisor
            .generate_timeline("Run a marathon", Some("Before I turn 40"))
            .await;

        assert_eq!(timeline.tasks.len(), 2);
        assert_eq!(timeline.tasks[0].priority, TaskPriority::High);
        assert_eq!(
            timeline.tasks[0].due_date,
            NaiveDate::from_ymd_opt(2025, 4, 1)
        );
        assert!(timeline.tasks[0].due_timestamp().is_some());
        assert_eq!(timeline.tasks[1].priority, TaskPriority::Medium);
        assert_eq!(timeline.tasks[1].due_date, None);
        assert_eq!(timeline.next_action, "Buy shoes");
        assert_eq!(timeline.ai_confidence, 100);

        let seen = provider.seen.lock().unwrap();
        assert!(seen[0].contains("Additional context: Before I turn 40"));
    }

    #[tokio::test]
    async fn timeline_defaults_missing_advice_fields() {
        let advisor = Advisor::new(Canned::ok(r#"{"tasks": [{"title": "Start"}]}"#));
        let timeline = advisor.generate_timeline("x", None).await;
        assert_eq!(timeline.next_action, "Start planning your first steps");
        assert_eq!(timeline.ai_confidence, 75);
    }

    #[tokio::test]
    async fn resources_fall_back_exactly_on_failure() {
        let advisor = Advisor::new(Canned::failing());
        let resources = advisor.generate_resources("Learn piano", None).await;

        assert_eq!(resources, SuggestedResource::fallback_list());
        assert_eq!(resources[0].title, "How to Set Effective Goals");
        assert_eq!(resources[0].resource_type, ResourceType::Article);
        assert_eq!(resources[0].read_time, Some(8));
        assert!(resources[0].is_verified && resources[0].is_free);
    }

    #[tokio::test]
    async fn resources_accept_bare_or_wrapped_lists() {
        let item = r#"{"title": "Piano basics", "type": "Video", "url": "https://example.com/p", "duration": 12}"#;

        let advisor = Advisor::new(Canned::ok(&format!("[{item}]")));
        let bare = advisor.generate_resources("Learn piano", None).await;
        assert_eq!(bare.len(), 1);
        assert_eq!(bare[0].resource_type, ResourceType::Video);
        assert_eq!(bare[0].duration, Some(12));
        assert!(!bare[0].is_verified);
        assert!(bare[0].is_free);

        let advisor = Advisor::new(Canned::ok(&format!(r#"{{"resources": [{item}]}}"#)));
        let wrapped = advisor.generate_resources("Learn piano", None).await;
        assert_eq!(wrapped, bare);
    }

    #[tokio::test]
    async fn resources_with_unknown_types_only_fall_back() {
        let body = r#"{"resources": [{"title": "Pod", "type": "podcast", "url": "https://x.y"}]}"#;
        let advisor = Advisor::new(Canned::ok(body));
        assert_eq!(
            advisor.generate_resources("x", None).await,
            SuggestedResource::fallback_list()
        );
    }

    #[tokio::test]
    async fn resources_prompt_carries_tasks() {
        let provider = Canned::ok("[]");
        let advisor = Advisor::new(provider.clone());
        let tasks = [snapshot("Buy keyboard", TaskStatus::Doing)];

        advisor.generate_resources("Learn piano", Some(&tasks[..])).await;

        let seen = provider.seen.lock().unwrap();
        assert!(seen[0].contains(r#"{"title":"Buy keyboard","status":"Doing"}"#));
    }

    #[tokio::test]
    async fn progress_falls_back_to_local_percentage() {
        let advisor = Advisor::new(Canned::failing());
        let tasks = [
            snapshot("a", TaskStatus::Done),
            snapshot("b", TaskStatus::Doing),
            snapshot("c", TaskStatus::ToDo),
        ];

        let analysis = advisor.analyze_dream_progress("x", &tasks).await;
        assert_eq!(analysis.progress_percentage, 33);
        assert_eq!(analysis.ai_confidence, 60);
        assert_eq!(
            analysis.next_action,
            "Continue working on your tasks in order of priority"
        );

        let empty = advisor.analyze_dream_progress("x", &[]).await;
        assert_eq!(empty.progress_percentage, 0);
    }

    #[tokio::test]
    async fn progress_uses_service_answer() {
        let body = r#"{"progressPercentage": 40, "nextAction": "Book a race", "aiConfidence": 88}"#;
        let advisor = Advisor::new(Canned::ok(body));
        let analysis = advisor
            .analyze_dream_progress("x", &[snapshot("a", TaskStatus::Done)])
            .await;
        assert_eq!(
            analysis,
            ProgressAnalysis {
                progress_percentage: 40,
                next_action: "Book a race".into(),
                ai_confidence: 88,
            }
        );
    }

    #[tokio::test]
    async fn progress_defaults_missing_fields() {
        let advisor = Advisor::new(Canned::ok("{}"));
        let analysis = advisor.analyze_dream_progress("x", &[]).await;
        assert_eq!(analysis.progress_percentage, 0);
        assert_eq!(analysis.next_action, "Continue working on your current tasks");
        assert_eq!(analysis.ai_confidence, 70);
    }

    #[tokio::test]
    async fn disabled_config_yields_fallbacks() {
        let advisor = Advisor::from_config(AdvisorConfig::disabled()).unwrap();
        assert_eq!(advisor.generate_timeline("x", None).await, Timeline::fallback());
    }
}
