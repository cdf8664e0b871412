//! Release notification output
//!
//! The controller publishes a single "parachute release active" flag through
//! an injected `NotificationSink`; LEDs, buzzers or telemetry are wired up by
//! whoever implements the sink. There is no acknowledgement channel.

/// Receiver of the release-active status
pub trait NotificationSink {
    /// Publish whether the parachute actuator is currently released
    fn set_release_active(&mut self, active: bool);
}

impl<N: NotificationSink + ?Sized> NotificationSink for &mut N {
    fn set_release_active(&mut self, active: bool) {
        (**self).set_release_active(active);
    }
}

/// Plain status flags polled by the notification driver
///
/// Owned by the firmware and handed to the controller by `&mut`, so
/// indicator tasks read it between controller updates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NotifyFlags {
    /// True while the parachute actuator is released
    pub parachute_release: bool,
}

impl NotificationSink for NotifyFlags {
    fn set_release_active(&mut self, active: bool) {
        self.parachute_release = active;
    }
}

/// Maximum number of toggles retained by `MockNotifier`
pub const MOCK_TOGGLE_CAPACITY: usize = 16;

/// Mock notification sink recording every published value
#[derive(Debug, Default)]
pub struct MockNotifier {
    toggles: heapless::Vec<bool, MOCK_TOGGLE_CAPACITY>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Published values, oldest first
    pub fn toggles(&self) -> &[bool] {
        &self.toggles
    }

    /// Most recently published value
    pub fn is_active(&self) -> bool {
        self.toggles.last().copied().unwrap_or(false)
    }
}

impl NotificationSink for MockNotifier {
    fn set_release_active(&mut self, active: bool) {
        self.toggles.push(active).ok();
    }
}
