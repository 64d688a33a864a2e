use std::collections::HashMap;

/// Result of one worker invocation. Exactly one variant per call.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum InvocationOutcome {
    Success { output: String },
    Failure { message: String },
}

impl InvocationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

#[derive(Debug, Clone)]
pub struct WorkerStartArgs {
    pub cmd: String,
    pub args: Vec<String>,
    pub envs: HashMap<String, String>,
}

#[derive(Debug, Clone, Copy)]
pub struct WorkerExit {
    pub exit_code: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_serializes_with_tag() {
        let ok = InvocationOutcome::Success {
            output: "hello world".into(),
        };
        let json = serde_json::to_string(&ok).unwrap();
        assert_eq!(json, r#"{"outcome":"success","output":"hello world"}"#);

        let err = InvocationOutcome::Failure {
            message: "boom".into(),
        };
        assert!(!err.is_success());
    }
}
