use serde_json::Value;

use crate::http_client::{ApiError, Verb};

/// Outcome of one submission, terminal either way. Success obliges
/// the caller to refresh the owning screen; Failed carries the last
/// error for display (field errors included).
#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    Success { body: Value, attempts: usize },
    Failed { error: ApiError, attempts: usize },
}

impl SubmitOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SubmitOutcome::Success { .. })
    }

    pub fn attempts(&self) -> usize {
        match self {
            SubmitOutcome::Success { attempts, .. } | SubmitOutcome::Failed { attempts, .. } => {
                *attempts
            }
        }
    }
}

/// Runs the payload through an ordered list of attempt verbs. A
/// transport or routing-class failure moves on to the next verb; a
/// validation or auth failure is terminal immediately. No verb is
/// tried after a success.
///
/// The multi-verb chain exists for one legacy statistics endpoint
/// whose routing rejects verbs inconsistently; every other call site
/// passes a single verb.
pub fn submit_with_fallback(
    verbs: &[Verb],
    payload: &Value,
    mut attempt: impl FnMut(Verb, &Value) -> Result<Value, ApiError>,
) -> SubmitOutcome {
    let mut last_error: Option<ApiError> = None;

    for (index, verb) in verbs.iter().enumerate() {
        match attempt(*verb, payload) {
            Ok(body) => {
                return SubmitOutcome::Success {
                    body,
                    attempts: index + 1,
                };
            }
            Err(error) => {
                if !error.is_retryable() {
                    return SubmitOutcome::Failed {
                        error,
                        attempts: index + 1,
                    };
                }
                last_error = Some(error);
            }
        }
    }

    SubmitOutcome::Failed {
        error: last_error
            .unwrap_or_else(|| ApiError::Transport("no submission strategy configured".to_string())),
        attempts: verbs.len(),
    }
}
