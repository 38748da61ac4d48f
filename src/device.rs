//! Device and viewport classification for adapting the UI.
//!
//! Everything here is a pure function of [`DeviceSignals`]; callers gather the
//! signals from the host (user agent, viewport width, touch and hover support)
//! and re-run classification on mount, resize and orientation change.

use serde::Serialize;

use crate::scoring::is_mobile_width;

const MOBILE_KEYWORDS: [&str; 6] = ["android", "iphone", "ipad", "ipod", "windows phone", "mobile"];

pub const MOBILE_VOLUME: f32 = 0.9;
pub const DESKTOP_VOLUME: f32 = 0.7;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceSignals {
    pub user_agent: String,
    pub viewport_width: u32,
    pub has_touch: bool,
    /// Result of the `(hover: hover)` media query.
    pub hover_capable: bool,
}

impl DeviceSignals {
    pub fn new(user_agent: impl Into<String>, viewport_width: u32) -> Self {
        Self {
            user_agent: user_agent.into(),
            viewport_width,
            has_touch: false,
            hover_capable: false,
        }
    }

    pub fn with_touch(mut self, has_touch: bool) -> Self {
        self.has_touch = has_touch;
        self
    }

    pub fn with_hover(mut self, hover_capable: bool) -> Self {
        self.hover_capable = hover_capable;
        self
    }
}

pub fn is_mobile_user_agent(user_agent: &str) -> bool {
    let ua = user_agent.to_lowercase();
    MOBILE_KEYWORDS.iter().any(|k| ua.contains(k))
}

/// Mobile if any of: mobile user agent, narrow viewport, touch support.
pub fn is_mobile(signals: &DeviceSignals) -> bool {
    is_mobile_user_agent(&signals.user_agent)
        || is_mobile_width(signals.viewport_width)
        || signals.has_touch
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionMode {
    Hover,
    Tap,
}

/// Classification used for hover/tap interaction. Touch support alone does
/// not make a device mobile here, so touch laptops keep hover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceProfile {
    pub is_mobile: bool,
    pub hover_enabled: bool,
}

impl DeviceProfile {
    pub fn detect(signals: &DeviceSignals) -> Self {
        let is_mobile =
            is_mobile_user_agent(&signals.user_agent) || is_mobile_width(signals.viewport_width);
        Self {
            is_mobile,
            hover_enabled: signals.hover_capable && !is_mobile,
        }
    }

    pub fn interaction_mode(&self) -> InteractionMode {
        if self.hover_enabled {
            InteractionMode::Hover
        } else {
            InteractionMode::Tap
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceEvent {
    Mount,
    Resize,
    OrientationChange,
}

/// Keeps the latest classification and reports when it flips.
#[derive(Debug, Clone, Default)]
pub struct DeviceTracker {
    current: Option<DeviceProfile>,
    mobile: bool,
}

impl DeviceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-classifies; returns true when anything changed since the last event.
    pub fn handle(&mut self, event: DeviceEvent, signals: &DeviceSignals) -> bool {
        let profile = DeviceProfile::detect(signals);
        let mobile = is_mobile(signals);
        let changed = self.current != Some(profile) || self.mobile != mobile;
        if changed {
            log::debug!(
                "device classification after {:?}: mobile={} hover={}",
                event,
                mobile,
                profile.hover_enabled
            );
        }
        self.current = Some(profile);
        self.mobile = mobile;
        changed
    }

    pub fn is_mobile(&self) -> bool {
        self.mobile
    }

    pub fn profile(&self) -> Option<DeviceProfile> {
        self.current
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioTrackConstraints {
    pub echo_cancellation: bool,
    pub noise_suppression: bool,
    pub auto_gain_control: bool,
    pub sample_rate: u32,
    pub channel_count: u32,
    pub latency: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AudioSetting {
    Enabled(bool),
    Tuned(AudioTrackConstraints),
}

/// Media capture constraints, serialised in the `getUserMedia` shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AudioConstraints {
    pub audio: AudioSetting,
}

impl AudioConstraints {
    pub fn for_device(mobile: bool) -> Self {
        let audio = if mobile {
            AudioSetting::Tuned(AudioTrackConstraints {
                echo_cancellation: true,
                noise_suppression: true,
                auto_gain_control: true,
                sample_rate: 16_000,
                channel_count: 1,
                latency: 0.01,
            })
        } else {
            AudioSetting::Enabled(true)
        };
        Self { audio }
    }
}

pub fn playback_volume(mobile: bool, requested: Option<f32>) -> f32 {
    requested.unwrap_or(if mobile { MOBILE_VOLUME } else { DESKTOP_VOLUME })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioContextState {
    Uninitialized,
    Suspended,
    Running,
    Closed,
}

/// Lifecycle of the playback context. Only mobile devices create one, on the
/// first user interaction, and a suspended context must be resumed explicitly.
#[derive(Debug, Clone)]
pub struct AudioContextTracker {
    state: AudioContextState,
}

impl Default for AudioContextTracker {
    fn default() -> Self {
        Self {
            state: AudioContextState::Uninitialized,
        }
    }
}

impl AudioContextTracker {
    pub fn state(&self) -> AudioContextState {
        self.state
    }

    /// `starts_suspended` reflects the platform: iOS hands out suspended contexts.
    pub fn init_on_interaction(&mut self, mobile: bool, starts_suspended: bool) -> AudioContextState {
        if mobile && self.state == AudioContextState::Uninitialized {
            self.state = if starts_suspended {
                AudioContextState::Suspended
            } else {
                AudioContextState::Running
            };
        }
        self.state
    }

    pub fn resume(&mut self) -> bool {
        if self.state == AudioContextState::Suspended {
            self.state = AudioContextState::Running;
            return true;
        }
        false
    }

    pub fn close(&mut self) {
        if self.state != AudioContextState::Uninitialized {
            self.state = AudioContextState::Closed;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const DESKTOP_UA: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 Chrome/126.0 Safari/537.36";
    const ANDROID_UA: &str = "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 Chrome/126.0 Mobile Safari/537.36";

    #[test]
    fn narrow_viewport_is_mobile() {
        assert!(is_mobile(&DeviceSignals::new(DESKTOP_UA, 500)));
    }

    #[test]
    fn mobile_user_agent_wins_on_wide_viewport() {
        assert!(is_mobile(&DeviceSignals::new(ANDROID_UA, 1200)));
    }

    #[test]
    fn wide_desktop_without_touch_is_not_mobile() {
        assert!(!is_mobile(&DeviceSignals::new(DESKTOP_UA, 1200).with_touch(false)));
        assert!(is_mobile(&DeviceSignals::new(DESKTOP_UA, 1200).with_touch(true)));
    }

    #[test]
    fn hover_is_suppressed_on_mobile() {
        let desktop = DeviceProfile::detect(&DeviceSignals::new(DESKTOP_UA, 1440).with_hover(true));
        assert_eq!(desktop, DeviceProfile { is_mobile: false, hover_enabled: true });
        assert_eq!(desktop.interaction_mode(), InteractionMode::Hover);

        let phone = DeviceProfile::detect(&DeviceSignals::new(ANDROID_UA, 412).with_hover(true));
        assert!(!phone.hover_enabled);
        assert_eq!(phone.interaction_mode(), InteractionMode::Tap);

        let touch_laptop = DeviceProfile::detect(
            &DeviceSignals::new(DESKTOP_UA, 1440).with_touch(true).with_hover(true),
        );
        assert!(touch_laptop.hover_enabled);
    }

    #[test]
    fn tracker_reports_changes_only() {
        let mut tracker = DeviceTracker::new();
        let wide = DeviceSignals::new(DESKTOP_UA, 1280).with_hover(true);
        assert!(tracker.handle(DeviceEvent::Mount, &wide));
        assert!(!tracker.handle(DeviceEvent::Resize, &wide));

        let narrow = DeviceSignals::new(DESKTOP_UA, 700).with_hover(true);
        assert!(tracker.handle(DeviceEvent::OrientationChange, &narrow));
        assert!(tracker.is_mobile());
        assert_eq!(tracker.profile().map(|p| p.hover_enabled), Some(false));
    }

    #[test]
    fn audio_constraints_shape() {
        let mobile = serde_json::to_value(AudioConstraints::for_device(true)).unwrap();
        assert_eq!(
            mobile,
            json!({
                "audio": {
                    "echoCancellation": true,
                    "noiseSuppression": true,
                    "autoGainControl": true,
                    "sampleRate": 16000,
                    "channelCount": 1,
                    "latency": 0.01
                }
            })
        );
        let desktop = serde_json::to_value(AudioConstraints::for_device(false)).unwrap();
        assert_eq!(desktop, json!({ "audio": true }));
    }

    #[test]
    fn volume_defaults() {
        assert_eq!(playback_volume(true, None), 0.9);
        assert_eq!(playback_volume(false, None), 0.7);
        assert_eq!(playback_volume(true, Some(0.2)), 0.2);
    }

    #[test]
    fn audio_context_only_starts_on_mobile() {
        let mut desktop = AudioContextTracker::default();
        assert_eq!(desktop.init_on_interaction(false, true), AudioContextState::Uninitialized);

        let mut phone = AudioContextTracker::default();
        assert_eq!(phone.init_on_interaction(true, true), AudioContextState::Suspended);
        assert!(phone.resume());
        assert!(!phone.resume());
        assert_eq!(phone.state(), AudioContextState::Running);
        phone.close();
        assert_eq!(phone.state(), AudioContextState::Closed);
    }
}
