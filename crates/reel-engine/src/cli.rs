use crate::config::schema::HotkeyConfig;
use crate::error::RecorderError;
use std::io::{self, Write};
use tokio::io::{AsyncBufReadExt, BufReader};
use url::Url;

/// Add `https://` unless the input already names an http(s) scheme, then
/// check that the result parses as a URL.
pub fn normalize_url(input: &str) -> Result<String, RecorderError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(RecorderError::InvalidUrl {
            input: input.to_string(),
            reason: "empty input".to_string(),
        });
    }

    let lower = trimmed.to_ascii_lowercase();
    let candidate = if lower.starts_with("http://") || lower.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    match Url::parse(&candidate) {
        Ok(url) if url.host_str().is_some() => Ok(candidate),
        Ok(_) => Err(RecorderError::InvalidUrl {
            input: input.to_string(),
            reason: "missing host".to_string(),
        }),
        Err(e) => Err(RecorderError::InvalidUrl {
            input: input.to_string(),
            reason: e.to_string(),
        }),
    }
}

/// Print `prompt` and read one line from stdin.
///
/// Returns `None` on end of input or Ctrl+C.
pub async fn prompt_line(prompt: &str) -> io::Result<Option<String>> {
    let mut stdout = io::stdout();
    print!("{}", prompt);
    stdout.flush()?;

    let mut reader = BufReader::new(tokio::io::stdin()).lines();
    tokio::select! {
        line = reader.next_line() => Ok(line?.map(|l| l.trim().to_string())),
        _ = tokio::signal::ctrl_c() => {
            println!();
            Ok(None)
        }
    }
}

/// Operator controls, one line each.
pub fn controls_banner(hotkeys: &HotkeyConfig) -> Vec<String> {
    vec![
        "Controls:".to_string(),
        format!("  {:<4} pause / resume recording", hotkeys.toggle),
        format!("  {:<4} finish recording and generate script", hotkeys.finish),
        format!("  {:<4} manual screenshot", hotkeys.screenshot),
        format!("  {:<4} check for popups", hotkeys.popup_check),
        "  Ctrl+C in this terminal also finishes the recording".to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_host_gets_https() {
        assert_eq!(normalize_url("example.com").unwrap(), "https://example.com");
        assert_eq!(
            normalize_url("  example.com/login?next=1 ").unwrap(),
            "https://example.com/login?next=1"
        );
    }

    #[test]
    fn explicit_scheme_is_kept() {
        assert_eq!(normalize_url("http://localhost:8080").unwrap(), "http://localhost:8080");
        assert_eq!(normalize_url("HTTPS://x.test").unwrap(), "HTTPS://x.test");
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(matches!(
            normalize_url(""),
            Err(RecorderError::InvalidUrl { .. })
        ));
        assert!(matches!(
            normalize_url("exa mple.com"),
            Err(RecorderError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn banner_names_configured_keys() {
        let hotkeys = HotkeyConfig {
            toggle: "F2".to_string(),
            ..HotkeyConfig::default()
        };
        let banner = controls_banner(&hotkeys);
        assert!(banner.iter().any(|l| l.contains("F2") && l.contains("pause")));
        assert!(banner.iter().any(|l| l.contains("F12") && l.contains("finish")));
    }
}
