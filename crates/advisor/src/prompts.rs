//! Prompt templates sent to the completion service.
//!
//! Each user prompt spells out the exact JSON object the parser in
//! [`advisor`](crate::advisor) expects.

pub const TIMELINE_SYSTEM: &str = "You are an expert life coach and project planner who \
specializes in breaking down dreams and goals into actionable steps.";

pub const RESOURCES_SYSTEM: &str = "You are a research expert who finds the most relevant and \
helpful resources for any goal or project.";

pub const PROGRESS_SYSTEM: &str = "You are an expert analytics coach who specializes in \
tracking progress and providing helpful advice for achieving goals.";

/// Prompt asking for a 5-7 task timeline.
pub fn timeline(title: &str, description: Option<&str>) -> String {
    let context = description
        .filter(|d| !d.trim().is_empty())
        .map(|d| format!("Additional context: {d}\n"))
        .unwrap_or_default();

    format!(
        r#"Create an actionable timeline for this dream: "{title}"
{context}
Respond with JSON in the following format:
{{
  "tasks": [
    {{
      "title": "Task name",
      "description": "Brief description of what needs to be done",
      "status": "To-Do",
      "priority": "Low" | "Medium" | "High",
      "dueDate": "YYYY-MM-DD" (optional, relative to today)
    }}
  ],
  "nextAction": "The most important next action to take",
  "aiConfidence": a number between 0 and 100 representing confidence in the timeline
}}

Create 5-7 tasks that represent milestones toward achieving this dream. Organize them in a logical sequence."#
    )
}

/// Prompt asking for 2-4 learning resources. `tasks_json` is the serialized
/// task list, if any.
pub fn resources(title: &str, tasks_json: Option<&str>) -> String {
    let related = tasks_json
        .map(|t| format!("Related tasks: {t}\n"))
        .unwrap_or_default();

    format!(
        r#"Suggest helpful resources for achieving this dream: "{title}"
{related}
Respond with JSON in the following format:
{{
  "resources": [
    {{
      "title": "Resource title",
      "description": "Brief description of the resource",
      "type": "article" | "video" | "tool",
      "url": "https://example.com" (use real websites that exist),
      "isVerified": boolean indicating if this is from a trusted source,
      "isFree": boolean indicating if this is free or paid,
      "readTime": for articles, estimated reading time in minutes (optional),
      "duration": for videos, duration in minutes (optional)
    }}
  ]
}}

Provide 2-4 relevant resources that would help with this dream. Use real websites and resources."#
    )
}

/// Prompt asking for a progress assessment of the current task list.
pub fn progress(title: &str, tasks_json: &str) -> String {
    format!(
        r#"Analyze progress on this dream: "{title}"
These are the current tasks and their status:
{tasks_json}

Respond with JSON in the following format:
{{
  "progressPercentage": a number between 0 and 100 representing overall progress,
  "nextAction": "The most important next action to take based on current progress",
  "aiConfidence": a number between 0 and 100 representing confidence in this analysis
}}"#
    )
}
