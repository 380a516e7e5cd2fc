//! Python + Selenium rendering of a [`ScriptPlan`].

use super::{ScriptPlan, Step};
use crate::config::schema::{ReplayBrowser, ReplayConfig};

/// Fallback helpers. Each tries the selectors in order, waits a bounded time
/// per attempt, and reports exhaustion by returning False.
const HELPERS: &str = r#"LOCATORS = {
    "id": By.ID,
    "css": By.CSS_SELECTOR,
    "xpath": By.XPATH,
    "class": By.CLASS_NAME,
}


def _locate(selector):
    strategy, value = selector.split(":", 1)
    return LOCATORS.get(strategy, By.CSS_SELECTOR), value


def robust_click(driver, selectors, description="element"):
    """Click the first selector that resolves to a clickable element."""
    for i, selector in enumerate(selectors):
        try:
            element = WebDriverWait(driver, ATTEMPT_TIMEOUT).until(
                EC.element_to_be_clickable(_locate(selector))
            )
            element.click()
            print(f"[ok] click on {description} using: {selector}")
            return True
        except Exception as e:
            print(f"[retry] attempt {i + 1}/{len(selectors)} failed: {str(e)[:50]}")
            if i < len(selectors) - 1:
                time.sleep(RETRY_PAUSE)
    print(f"[fail] no selector matched {description}")
    return False


def robust_type(driver, selectors, text, description="field"):
    """Clear and fill the first selector that resolves to an element."""
    for i, selector in enumerate(selectors):
        try:
            element = WebDriverWait(driver, ATTEMPT_TIMEOUT).until(
                EC.presence_of_element_located(_locate(selector))
            )
            element.clear()
            element.send_keys(text)
            print(f"[ok] text typed in {description} using: {selector}")
            return True
        except Exception as e:
            print(f"[retry] attempt {i + 1}/{len(selectors)} failed: {str(e)[:50]}")
            if i < len(selectors) - 1:
                time.sleep(RETRY_PAUSE)
    print(f"[fail] no selector matched {description}")
    return False
"#;

const FOOTER: &str = r#"        print("Automation completed successfully!")
        input("Press ENTER to close browser...")
    except KeyboardInterrupt:
        print("Automation interrupted")
    except Exception as e:
        print(f"Critical error: {e}")
        if driver is not None:
            try:
                driver.save_screenshot("error.png")
            except Exception:
                pass
    finally:
        if driver is not None:
            driver.quit()


if __name__ == "__main__":
    run_automation()
"#;

struct DriverSetup {
    options_module: &'static str,
    class: &'static str,
    maximize_argument: bool,
}

fn driver_setup(browser: ReplayBrowser) -> DriverSetup {
    match browser {
        ReplayBrowser::Chrome => DriverSetup {
            options_module: "chrome",
            class: "Chrome",
            maximize_argument: true,
        },
        ReplayBrowser::Edge => DriverSetup {
            options_module: "edge",
            class: "Edge",
            maximize_argument: true,
        },
        ReplayBrowser::Firefox => DriverSetup {
            options_module: "firefox",
            class: "Firefox",
            maximize_argument: false,
        },
    }
}

/// Indentation-aware line builder.
struct ScriptWriter {
    out: String,
    indent: usize,
}

impl ScriptWriter {
    fn new() -> Self {
        Self {
            out: String::new(),
            indent: 0,
        }
    }

    fn line(&mut self, text: impl AsRef<str>) {
        let text = text.as_ref();
        if !text.is_empty() {
            for _ in 0..self.indent {
                self.out.push_str("    ");
            }
            self.out.push_str(text);
        }
        self.out.push('\n');
    }

    fn blank(&mut self) {
        self.out.push('\n');
    }

    fn raw(&mut self, block: &str) {
        self.out.push_str(block);
    }

    fn indented(&mut self, body: impl FnOnce(&mut Self)) {
        self.indent += 1;
        body(self);
        self.indent -= 1;
    }

    fn finish(self) -> String {
        self.out
    }
}

pub fn render(plan: &ScriptPlan, options: &ReplayConfig) -> String {
    let setup = driver_setup(options.browser);
    let mut w = ScriptWriter::new();

    render_header(&mut w, plan, &setup);
    render_constants(&mut w, options);
    w.raw(HELPERS);
    w.blank();
    w.blank();

    w.line("def run_automation():");
    w.indented(|w| {
        w.line("\"\"\"Replay the recorded session.\"\"\"");
        w.line("driver = None");
        w.line("try:");
        w.indented(|w| {
            w.line("options = Options()");
            if setup.maximize_argument {
                w.line("options.add_argument(\"--start-maximized\")");
            }
            w.line(format!("driver = webdriver.{}(options=options)", setup.class));
            if !setup.maximize_argument {
                w.line("driver.maximize_window()");
            }
            w.line("print(\"Executing recorded automation...\")");
            w.blank();

            w.line("# Navigate to initial URL");
            w.line(format!("driver.get({})", py_str(&plan.start_url)));
            w.line("driver.save_screenshot(\"step_00_start.png\")");
            w.line("time.sleep(INITIAL_SETTLE)");
            w.blank();

            for (index, step) in plan.steps.iter().enumerate() {
                render_step(w, index + 1, step);
            }
        });
    });
    w.raw(FOOTER);

    w.finish()
}

fn render_header(w: &mut ScriptWriter, plan: &ScriptPlan, setup: &DriverSetup) {
    let header = &plan.header;
    w.line("#!/usr/bin/env python3");
    w.line("# Auto-generated Selenium automation");
    w.line(format!("# Session: {}", single_line(&header.session_id)));
    w.line(format!(
        "# Recorded: {}",
        header.recorded_at.format("%Y-%m-%d %H:%M:%S")
    ));
    w.line(format!("# Total actions: {}", header.total_actions));
    w.line(format!("# Popups detected: {}", header.popups_detected));
    w.blank();
    w.line("import time");
    w.blank();
    w.line("from selenium import webdriver");
    w.line("from selenium.webdriver.common.by import By");
    w.line("from selenium.webdriver.common.keys import Keys");
    w.line(format!(
        "from selenium.webdriver.{}.options import Options",
        setup.options_module
    ));
    w.line("from selenium.webdriver.support import expected_conditions as EC");
    w.line("from selenium.webdriver.support.ui import WebDriverWait");
    w.blank();
}

fn render_constants(w: &mut ScriptWriter, options: &ReplayConfig) {
    w.line(format!("ATTEMPT_TIMEOUT = {}", options.attempt_timeout_secs));
    w.line(format!("RETRY_PAUSE = {}", py_float(options.retry_pause_secs)));
    w.line(format!(
        "INITIAL_SETTLE = {}",
        py_float(options.initial_settle_secs)
    ));
    w.line(format!("STEP_SETTLE = {}", py_float(options.step_settle_secs)));
    w.line(format!("POPUP_SETTLE = {}", py_float(options.popup_settle_secs)));
    w.blank();
}

fn render_step(w: &mut ScriptWriter, number: usize, step: &Step) {
    w.line(format!("# Step {}: {}", number, step.label()));
    match step {
        Step::Click {
            selectors,
            description,
        } => {
            w.line(format!("selectors_{} = {}", number, py_list(selectors)));
            w.line(format!(
                "if not robust_click(driver, selectors_{}, {}):",
                number,
                py_str(description)
            ));
            w.indented(|w| w.line(format!("print(\"Step {} failed, continuing\")", number)));
        }
        Step::TypeText {
            selectors,
            text,
            description,
        } => {
            w.line(format!("selectors_{} = {}", number, py_list(selectors)));
            w.line(format!(
                "if not robust_type(driver, selectors_{}, {}, {}):",
                number,
                py_str(text),
                py_str(description)
            ));
            w.indented(|w| w.line(format!("print(\"Step {} failed, continuing\")", number)));
        }
        Step::Enter => {
            w.line("driver.switch_to.active_element.send_keys(Keys.ENTER)");
        }
        Step::Navigate { url } => {
            w.line(format!("driver.get({})", py_str(url)));
        }
        Step::PopupSettle => {
            w.line("# Popup detected - wait for it to load");
            w.line("time.sleep(POPUP_SETTLE)");
        }
    }
    w.line(format!(
        "driver.save_screenshot(\"step_{:02}_{}.png\")",
        number,
        step.label()
    ));
    w.line("time.sleep(STEP_SETTLE)");
    w.blank();
}

/// Double-quoted Python string literal. JSON string escaping is a subset
/// of Python's.
pub fn py_str(value: &str) -> String {
    serde_json::Value::String(value.to_owned()).to_string()
}

fn py_list(values: &[String]) -> String {
    let items: Vec<String> = values.iter().map(|v| py_str(v)).collect();
    format!("[{}]", items.join(", "))
}

fn py_float(value: f64) -> String {
    if value.is_finite() && value >= 0.0 {
        format!("{:?}", value)
    } else {
        "0.0".to_string()
    }
}

fn single_line(value: &str) -> String {
    value.replace(['\r', '\n'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_literals_escape_quotes_and_controls() {
        assert_eq!(py_str("plain"), "\"plain\"");
        assert_eq!(py_str("[name=\"q\"]"), r#""[name=\"q\"]""#);
        assert_eq!(py_str("a\\b\nc"), r#""a\\b\nc""#);
        assert_eq!(py_str("\u{7}"), r#""\u0007""#);
        assert_eq!(py_str("café"), "\"café\"");
    }

    #[test]
    fn floats_keep_a_decimal_point() {
        assert_eq!(py_float(1.0), "1.0");
        assert_eq!(py_float(1.5), "1.5");
        assert_eq!(py_float(f64::NAN), "0.0");
    }

    #[test]
    fn writer_indents_nested_blocks() {
        let mut w = ScriptWriter::new();
        w.line("a:");
        w.indented(|w| {
            w.line("b");
            w.blank();
            w.indented(|w| w.line("c"));
        });
        assert_eq!(w.finish(), "a:\n    b\n\n        c\n");
    }
}
