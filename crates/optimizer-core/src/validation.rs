//! Form validation. Every problem is collected so the client can highlight all
//! offending fields at once.

use crate::schema::{Budget, Complexity, OptimizationInput, ResponseTime, UseCase};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

/// Longest description forwarded to the agent.
pub const MAX_DESCRIPTION_CHARS: usize = 4000;

/// Upper bound for `users` and `dailyRequests` (the int4 column range).
pub const MAX_COUNT: u64 = i32::MAX as u64;

/// Untyped form body as posted by the dashboard.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawOptimizationInput {
    #[serde(default)]
    pub user_description: Option<Value>,
    #[serde(default, alias = "useCase")]
    pub use_case_type: Option<Value>,
    #[serde(default)]
    pub complexity: Option<Value>,
    #[serde(default)]
    pub users: Option<Value>,
    #[serde(default)]
    pub daily_requests: Option<Value>,
    #[serde(default)]
    pub response_time: Option<Value>,
    #[serde(default)]
    pub budget: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldIssue {
    pub path: String,
    pub message: String,
}

impl FieldIssue {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid request data: {} issue(s)", .issues.len())]
pub struct ValidationError {
    pub issues: Vec<FieldIssue>,
}

impl ValidationError {
    pub fn single(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            issues: vec![FieldIssue::new(path, message)],
        }
    }
}

impl RawOptimizationInput {
    pub fn validate(self) -> Result<OptimizationInput, ValidationError> {
        let mut issues = Vec::new();

        let user_description = match self.user_description {
            Some(Value::String(s)) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    issues.push(FieldIssue::new("userDescription", "Description must not be empty"));
                } else if trimmed.chars().count() > MAX_DESCRIPTION_CHARS {
                    issues.push(FieldIssue::new(
                        "userDescription",
                        format!("Description must be at most {} characters", MAX_DESCRIPTION_CHARS),
                    ));
                }
                trimmed.to_string()
            }
            None | Some(Value::Null) => {
                issues.push(FieldIssue::new("userDescription", "Required"));
                String::new()
            }
            Some(other) => {
                issues.push(type_issue("userDescription", "string", &other));
                String::new()
            }
        };

        let use_case_type = parse_enum::<UseCase>("useCaseType", self.use_case_type, &mut issues);
        let complexity = parse_enum::<Complexity>("complexity", self.complexity, &mut issues);
        let response_time = parse_enum::<ResponseTime>("responseTime", self.response_time, &mut issues);
        let budget = parse_enum::<Budget>("budget", self.budget, &mut issues);
        let users = parse_count("users", self.users, &mut issues);
        let daily_requests = parse_count("dailyRequests", self.daily_requests, &mut issues);

        if !issues.is_empty() {
            return Err(ValidationError { issues });
        }

        Ok(OptimizationInput {
            user_description,
            use_case_type,
            complexity,
            users,
            daily_requests,
            response_time,
            budget,
        })
    }
}

fn parse_enum<T>(path: &str, value: Option<Value>, issues: &mut Vec<FieldIssue>) -> Option<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        None | Some(Value::Null) => None,
        // The form sends "" for an untouched select.
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(Value::String(s)) => match s.parse::<T>() {
            Ok(v) => Some(v),
            Err(e) => {
                issues.push(FieldIssue::new(path, e.to_string()));
                None
            }
        },
        Some(other) => {
            issues.push(type_issue(path, "string", &other));
            None
        }
    }
}

/// Positive integer; numeric strings are accepted because HTML inputs post text.
fn parse_count(path: &str, value: Option<Value>, issues: &mut Vec<FieldIssue>) -> Option<u64> {
    let n = match value {
        None | Some(Value::Null) => return None,
        Some(Value::String(s)) if s.trim().is_empty() => return None,
        Some(Value::String(s)) => match s.trim().parse::<f64>() {
            Ok(n) => n,
            Err(_) => {
                issues.push(FieldIssue::new(path, "Expected number, received nan"));
                return None;
            }
        },
        Some(Value::Number(n)) => match n.as_f64() {
            Some(n) => n,
            None => {
                issues.push(FieldIssue::new(path, "Expected number"));
                return None;
            }
        },
        Some(other) => {
            issues.push(type_issue(path, "number", &other));
            return None;
        }
    };

    if n.fract() != 0.0 {
        issues.push(FieldIssue::new(path, "Expected integer, received float"));
        None
    } else if n < 1.0 {
        issues.push(FieldIssue::new(path, "Number must be greater than 0"));
        None
    } else if n > MAX_COUNT as f64 {
        issues.push(FieldIssue::new(
            path,
            format!("Number must be less than or equal to {}", MAX_COUNT),
        ));
        None
    } else {
        Some(n as u64)
    }
}

fn type_issue(path: &str, expected: &str, got: &Value) -> FieldIssue {
    let received = match got {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    };
    FieldIssue::new(path, format!("Expected {}, received {}", expected, received))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(v: Value) -> RawOptimizationInput {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn accepts_full_form() {
        let input = raw(json!({
            "userDescription": "  Support chatbot for a telecom  ",
            "useCaseType": "chatbot",
            "complexity": "high",
            "users": 500,
            "dailyRequests": "20000",
            "responseTime": "fast",
            "budget": "large"
        }))
        .validate()
        .unwrap();
        assert_eq!(input.user_description, "Support chatbot for a telecom");
        assert_eq!(input.use_case_type, Some(UseCase::Chatbot));
        assert_eq!(input.daily_requests, Some(20_000));
        assert_eq!(input.budget, Some(Budget::Large));
    }

    #[test]
    fn use_case_alias_is_accepted() {
        let input = raw(json!({"userDescription": "x", "useCase": "automation"}))
            .validate()
            .unwrap();
        assert_eq!(input.use_case_type, Some(UseCase::Automation));
    }

    #[test]
    fn empty_selects_are_treated_as_unset() {
        let input = raw(json!({"userDescription": "x", "complexity": "", "users": ""}))
            .validate()
            .unwrap();
        assert_eq!(input.complexity, None);
        assert_eq!(input.users, None);
    }

    #[test]
    fn collects_every_issue() {
        let err = raw(json!({
            "complexity": "extreme",
            "users": -3,
            "dailyRequests": 1.5,
            "budget": 12
        }))
        .validate()
        .unwrap_err();
        let paths: Vec<&str> = err.issues.iter().map(|i| i.path.as_str()).collect();
        assert_eq!(paths, vec!["userDescription", "complexity", "budget", "users", "dailyRequests"]);
    }

    #[test]
    fn rejects_blank_and_oversized_descriptions() {
        let err = raw(json!({"userDescription": "   "})).validate().unwrap_err();
        assert_eq!(err.issues[0].message, "Description must not be empty");

        let long = "a".repeat(MAX_DESCRIPTION_CHARS + 1);
        let err = raw(json!({"userDescription": long})).validate().unwrap_err();
        assert!(err.issues[0].message.contains("at most"));
    }

    #[test]
    fn counts_are_capped_at_int4_range() {
        let ok = raw(json!({"userDescription": "x", "dailyRequests": 2_147_483_647_u64}))
            .validate()
            .unwrap();
        assert_eq!(ok.daily_requests, Some(MAX_COUNT));

        let err = raw(json!({
            "userDescription": "x",
            "users": "2147483648",
            "dailyRequests": 1_000_000_000_000_000_000_u64
        }))
        .validate()
        .unwrap_err();
        let paths: Vec<&str> = err.issues.iter().map(|i| i.path.as_str()).collect();
        assert_eq!(paths, vec!["users", "dailyRequests"]);
        assert_eq!(
            err.issues[1].message,
            "Number must be less than or equal to 2147483647"
        );
    }
}
