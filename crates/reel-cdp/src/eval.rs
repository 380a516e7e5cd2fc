use chromiumoxide::Page;
use chromiumoxide::cdp::js_protocol::runtime::EvaluateParams;
use std::time::Duration;

/// Per-attempt bound for one evaluation. A blocking `alert()` would
/// otherwise hang the call.
const EVAL_TIMEOUT: Duration = Duration::from_secs(10);

/// Retries while the page is between documents.
const MAX_CONTEXT_RETRIES: u32 = 10;

const CONTEXT_RETRY_DELAY: Duration = Duration::from_millis(100);

#[derive(Debug)]
pub enum EvalError {
    Timeout,
    Context(String),
    Other(String),
}

impl std::fmt::Display for EvalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EvalError::Timeout => write!(f, "evaluation timed out, possibly blocked by a dialog"),
            EvalError::Context(e) => write!(f, "page context unavailable: {}", e),
            EvalError::Other(e) => write!(f, "{}", e),
        }
    }
}

/// Whether an error means the execution context went away mid-navigation.
pub fn is_context_error(err: &str) -> bool {
    err.contains("Cannot find context")
        || err.contains("Execution context was destroyed")
        || err.contains("-32000")
}

/// Evaluate a JavaScript expression and return its JSON value
/// (`Null` for `null` and `undefined`).
pub async fn evaluate(page: &Page, expression: &str) -> Result<serde_json::Value, EvalError> {
    let mut last_error = None;

    for attempt in 0..MAX_CONTEXT_RETRIES {
        match evaluate_with_timeout(page, expression).await {
            Err(EvalError::Context(err)) => {
                tracing::debug!(
                    "Context error during evaluation (attempt {}/{}), retrying...",
                    attempt + 1,
                    MAX_CONTEXT_RETRIES
                );
                last_error = Some(err);
                tokio::time::sleep(CONTEXT_RETRY_DELAY).await;
            }
            other => return other,
        }
    }

    Err(EvalError::Context(last_error.unwrap_or_else(|| {
        "evaluation failed after retries".to_string()
    })))
}

async fn evaluate_with_timeout(
    page: &Page,
    expression: &str,
) -> Result<serde_json::Value, EvalError> {
    let params = EvaluateParams::builder()
        .expression(expression)
        .return_by_value(true)
        .await_promise(true)
        .build()
        .map_err(EvalError::Other)?;

    match tokio::time::timeout(EVAL_TIMEOUT, page.evaluate_expression(params)).await {
        Err(_) => Err(EvalError::Timeout),
        Ok(Err(e)) => {
            let err = e.to_string();
            if is_context_error(&err) {
                Err(EvalError::Context(err))
            } else {
                Err(EvalError::Other(err))
            }
        }
        Ok(Ok(result)) => Ok(result.value().cloned().unwrap_or(serde_json::Value::Null)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_errors_are_recognized() {
        assert!(is_context_error("Cannot find context with specified id"));
        assert!(is_context_error("Execution context was destroyed."));
        assert!(!is_context_error("ReferenceError: foo is not defined"));
    }
}
