use crate::eval::result::RunResult;

/// Format a run as pretty-printed JSON.
pub fn format_json(run: &RunResult) -> String {
    serde_json::to_string_pretty(run).unwrap_or_else(|_| "{}".to_string())
}

/// Read a run back from JSON produced by [`format_json`].
pub fn parse_json(json: &str) -> Result<RunResult, serde_json::Error> {
    serde_json::from_str(json)
}
