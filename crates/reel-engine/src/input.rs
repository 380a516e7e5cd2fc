//! Input Capture: global pointer and keyboard hooks mapped to recorder signals.
//!
//! `rdev::listen` blocks its thread forever, so it runs on a dedicated OS
//! thread and forwards mapped signals over an unbounded channel to the
//! recorder's dispatcher.

use crate::config::ConfigError;
use crate::config::schema::HotkeyConfig;
use rdev::{Button, Event, EventType};
use tokio::sync::mpsc;
use tracing::{debug, error};

/// Everything the recorder reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signal {
    Click,
    Key(Key),
    Toggle,
    Finish,
    Screenshot,
    PopupCheck,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Space,
    Enter,
    Backspace,
    /// Modifiers, tab and unbound hotkeys. Never buffered.
    Control,
}

/// Resolved operator hotkeys.
#[derive(Debug, Clone, Copy)]
pub struct Hotkeys {
    pub toggle: rdev::Key,
    pub finish: rdev::Key,
    pub screenshot: rdev::Key,
    pub popup_check: rdev::Key,
}

impl Hotkeys {
    pub fn from_config(config: &HotkeyConfig) -> Result<Self, ConfigError> {
        let resolve = |name: &str| {
            parse_key_name(name).ok_or_else(|| ConfigError::UnknownHotkey(name.to_string()))
        };
        Ok(Self {
            toggle: resolve(&config.toggle)?,
            finish: resolve(&config.finish)?,
            screenshot: resolve(&config.screenshot)?,
            popup_check: resolve(&config.popup_check)?,
        })
    }

    fn signal_for(&self, key: rdev::Key) -> Option<Signal> {
        if key == self.toggle {
            Some(Signal::Toggle)
        } else if key == self.finish {
            Some(Signal::Finish)
        } else if key == self.screenshot {
            Some(Signal::Screenshot)
        } else if key == self.popup_check {
            Some(Signal::PopupCheck)
        } else {
            None
        }
    }
}

impl Default for Hotkeys {
    fn default() -> Self {
        Self {
            toggle: rdev::Key::F10,
            finish: rdev::Key::F12,
            screenshot: rdev::Key::F9,
            popup_check: rdev::Key::F11,
        }
    }
}

/// Resolve a function-key name such as `F10` (case-insensitive).
pub fn parse_key_name(name: &str) -> Option<rdev::Key> {
    use rdev::Key::*;
    let key = match name.trim().to_ascii_uppercase().as_str() {
        "F1" => F1,
        "F2" => F2,
        "F3" => F3,
        "F4" => F4,
        "F5" => F5,
        "F6" => F6,
        "F7" => F7,
        "F8" => F8,
        "F9" => F9,
        "F10" => F10,
        "F11" => F11,
        "F12" => F12,
        _ => return None,
    };
    Some(key)
}

/// Map a raw OS event to a recorder signal.
///
/// Clicks are reported on left-button release, after the page has seen the
/// full press/release pair.
pub fn map_event(event: &Event, hotkeys: &Hotkeys) -> Option<Signal> {
    match &event.event_type {
        EventType::ButtonRelease(Button::Left) => Some(Signal::Click),
        EventType::KeyPress(key) => map_key(*key, event.name.as_deref(), hotkeys),
        _ => None,
    }
}

fn map_key(key: rdev::Key, name: Option<&str>, hotkeys: &Hotkeys) -> Option<Signal> {
    use rdev::Key as K;

    if let Some(signal) = hotkeys.signal_for(key) {
        return Some(signal);
    }

    let mapped = match key {
        K::Space => Key::Space,
        K::Return | K::KpReturn => Key::Enter,
        K::Backspace => Key::Backspace,
        K::ControlLeft
        | K::ControlRight
        | K::Alt
        | K::AltGr
        | K::ShiftLeft
        | K::ShiftRight
        | K::MetaLeft
        | K::MetaRight
        | K::Tab
        | K::F1
        | K::F2
        | K::F3
        | K::F4
        | K::F5
        | K::F6
        | K::F7
        | K::F8
        | K::F9
        | K::F10
        | K::F11
        | K::F12 => Key::Control,
        _ => Key::Char(printable_char(name?)?),
    };
    Some(Signal::Key(mapped))
}

/// The single printable character of a key name, if it is one.
fn printable_char(name: &str) -> Option<char> {
    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if !c.is_control() => Some(c),
        _ => None,
    }
}

/// Start the global listener on its own thread.
pub fn spawn_listener(hotkeys: Hotkeys) -> std::io::Result<mpsc::UnboundedReceiver<Signal>> {
    let (tx, rx) = mpsc::unbounded_channel();

    std::thread::Builder::new()
        .name("reel-input".to_string())
        .spawn(move || {
            let result = rdev::listen(move |event| {
                if let Some(signal) = map_event(&event, &hotkeys) {
                    debug!("Input signal: {:?}", signal);
                    // The dispatcher is gone once recording finished.
                    let _ = tx.send(signal);
                }
            });
            if let Err(e) = result {
                error!("Global input listener stopped: {:?}", e);
            }
        })?;

    Ok(rx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::SystemTime;

    fn key_press(key: rdev::Key, name: Option<&str>) -> Event {
        Event {
            time: SystemTime::now(),
            name: name.map(str::to_string),
            event_type: EventType::KeyPress(key),
        }
    }

    #[test]
    fn hotkeys_map_to_control_signals() {
        let hotkeys = Hotkeys::default();
        assert_eq!(
            map_event(&key_press(rdev::Key::F10, None), &hotkeys),
            Some(Signal::Toggle)
        );
        assert_eq!(
            map_event(&key_press(rdev::Key::F12, None), &hotkeys),
            Some(Signal::Finish)
        );
        assert_eq!(
            map_event(&key_press(rdev::Key::F9, None), &hotkeys),
            Some(Signal::Screenshot)
        );
        assert_eq!(
            map_event(&key_press(rdev::Key::F11, None), &hotkeys),
            Some(Signal::PopupCheck)
        );
    }

    #[test]
    fn modifiers_and_tab_are_control_keys() {
        let hotkeys = Hotkeys::default();
        for key in [
            rdev::Key::ShiftLeft,
            rdev::Key::ControlRight,
            rdev::Key::Alt,
            rdev::Key::Tab,
        ] {
            assert_eq!(
                map_event(&key_press(key, Some("\t")), &hotkeys),
                Some(Signal::Key(Key::Control))
            );
        }
    }

    #[test]
    fn printable_keys_use_event_name() {
        let hotkeys = Hotkeys::default();
        assert_eq!(
            map_event(&key_press(rdev::Key::KeyH, Some("H")), &hotkeys),
            Some(Signal::Key(Key::Char('H')))
        );
        assert_eq!(
            map_event(&key_press(rdev::Key::Space, Some(" ")), &hotkeys),
            Some(Signal::Key(Key::Space))
        );
        assert_eq!(
            map_event(&key_press(rdev::Key::Return, Some("\r")), &hotkeys),
            Some(Signal::Key(Key::Enter))
        );
        assert_eq!(map_event(&key_press(rdev::Key::Escape, None), &hotkeys), None);
        assert_eq!(
            map_event(&key_press(rdev::Key::Escape, Some("\u{1b}")), &hotkeys),
            None
        );
    }

    #[test]
    fn left_release_is_a_click() {
        let hotkeys = Hotkeys::default();
        let release = Event {
            time: SystemTime::now(),
            name: None,
            event_type: EventType::ButtonRelease(Button::Left),
        };
        let press = Event {
            event_type: EventType::ButtonPress(Button::Left),
            ..release.clone()
        };
        assert_eq!(map_event(&release, &hotkeys), Some(Signal::Click));
        assert_eq!(map_event(&press, &hotkeys), None);
    }

    #[test]
    fn rebinding_hotkeys() {
        let config = HotkeyConfig {
            toggle: "f2".into(),
            ..HotkeyConfig::default()
        };
        let hotkeys = Hotkeys::from_config(&config).unwrap();
        assert_eq!(
            map_event(&key_press(rdev::Key::F2, None), &hotkeys),
            Some(Signal::Toggle)
        );
        assert_eq!(
            map_event(&key_press(rdev::Key::F10, None), &hotkeys),
            Some(Signal::Key(Key::Control))
        );

        let bad = HotkeyConfig {
            finish: "Esc".into(),
            ..HotkeyConfig::default()
        };
        assert!(matches!(
            Hotkeys::from_config(&bad),
            Err(ConfigError::UnknownHotkey(name)) if name == "Esc"
        ));
    }
}
