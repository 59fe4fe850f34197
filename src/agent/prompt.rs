//! System instruction for the analytics assistant.

use std::path::Path;

use tracing::warn;

/// Built-in instruction for the `analytics_assistant` agent.
pub const ANALYTICS_ASSISTANT_PROMPT: &str = r#"You are an assistant that helps users with their Google Analytics 4 (GA4) questions.

You answer using the report tools provided to you. Each tool reports one GA4 metric for a date range:
- get_active_users: active users (activeUsers)
- get_1_day_active_users: daily active users (active1DayUsers)
- get_7_day_active_users: weekly active users (active7DayUsers)
- get_28_day_active_users: monthly active users (active28DayUsers)
- get_ad_unit_exposure: time ad units were exposed to users (adUnitExposure)
- list_supported_dimensions: the dimension names a metric accepts

## How to call the tools

- Dates are `YYYY-MM-DD`, or relative values such as `today`, `yesterday` and `30daysAgo`.
- Use `dimensions` to break results down, e.g. `["date"]` for trends, `["country"]` or `["city"]` for geography, `["deviceCategory"]` or `["platform"]` for devices, `["sessionSource", "sessionMedium"]` for traffic.
- Use `filters` for exact matches, e.g. `{"country": "France"}`. Several filters are combined with AND.
- Dimensions or filters a metric does not support are ignored silently. If unsure, call `list_supported_dimensions` first.
- A tool result starting with `Error:` means the report failed. Tell the user what went wrong instead of guessing numbers.

## How to answer

- Select the most relevant tool for the question.
- For comparisons, trends or rankings, add a time or category dimension and compare the rows.
- If the request is unclear (no date range, ambiguous metric), ask a clarifying question.
- If the user asks for data these tools cannot provide, say which reports are available and suggest the closest one.

Always give clear, concise, actionable answers grounded in the tool results."#;

/// Returns the instruction in `path`, or the built-in one.
///
/// An unreadable or empty override file falls back to
/// [`ANALYTICS_ASSISTANT_PROMPT`] with a warning.
#[must_use]
pub fn load_instruction(path: Option<&Path>) -> String {
    let Some(path) = path else {
        return ANALYTICS_ASSISTANT_PROMPT.to_string();
    };

    match std::fs::read_to_string(path) {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) => {
            warn!(path = %path.display(), "instruction file is empty; using built-in prompt");
            ANALYTICS_ASSISTANT_PROMPT.to_string()
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "cannot read instruction file; using built-in prompt");
            ANALYTICS_ASSISTANT_PROMPT.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_prompt_names_every_report_tool() {
        for tool in [
            "get_active_users",
            "get_1_day_active_users",
            "get_7_day_active_users",
            "get_28_day_active_users",
            "get_ad_unit_exposure",
            "list_supported_dimensions",
        ] {
            assert!(ANALYTICS_ASSISTANT_PROMPT.contains(tool), "prompt misses {tool}");
        }
    }

    #[test]
    fn test_load_default() {
        assert_eq!(load_instruction(None), ANALYTICS_ASSISTANT_PROMPT);
    }

    #[test]
    fn test_load_override_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap_or_else(|_| unreachable!());
        write!(file, "Answer in French.").unwrap_or_else(|_| unreachable!());
        assert_eq!(load_instruction(Some(file.path())), "Answer in French.");
    }

    #[test]
    fn test_missing_or_empty_file_falls_back() {
        assert_eq!(
            load_instruction(Some(Path::new("/nonexistent/prompt.md"))),
            ANALYTICS_ASSISTANT_PROMPT
        );
        let file = tempfile::NamedTempFile::new().unwrap_or_else(|_| unreachable!());
        assert_eq!(
            load_instruction(Some(file.path())),
            ANALYTICS_ASSISTANT_PROMPT
        );
    }
}
