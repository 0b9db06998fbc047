//! Live subsystems the command interface talks to.
//!
//! Handlers never reach for global state. Everything a command may touch is
//! passed in through a [`DeviceContext`] borrowed for that one command.

use std::fmt;

use crate::config::{ConfigManager, ConfigStore};

/// Backlight animation modes, by stored index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum BacklightPattern {
    Dark = 0,
    Test = 1,
    Constant = 2,
    Rainbow = 3,
    Pulse = 4,
    Breath = 5,
}

impl BacklightPattern {
    /// Every pattern in index order.
    pub const ALL: [BacklightPattern; 6] = [
        BacklightPattern::Dark,
        BacklightPattern::Test,
        BacklightPattern::Constant,
        BacklightPattern::Rainbow,
        BacklightPattern::Pulse,
        BacklightPattern::Breath,
    ];

    /// Number of known patterns.
    pub const COUNT: usize = Self::ALL.len();

    /// Display name.
    pub fn name(&self) -> &'static str {
        match self {
            BacklightPattern::Dark => "Dark",
            BacklightPattern::Test => "Test",
            BacklightPattern::Constant => "Constant",
            BacklightPattern::Rainbow => "Rainbow",
            BacklightPattern::Pulse => "Pulse",
            BacklightPattern::Breath => "Breath",
        }
    }

    /// Stored index.
    pub fn index(&self) -> u8 {
        *self as u8
    }

    /// Look up a pattern by stored index.
    pub fn from_index(index: i64) -> Option<BacklightPattern> {
        usize::try_from(index)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
    }

    /// Look up a pattern by name, ignoring ASCII case.
    pub fn from_name(name: &str) -> Option<BacklightPattern> {
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for BacklightPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Backlight engine.
pub trait Backlight {
    fn set_pattern(&mut self, pattern: BacklightPattern);
    fn set_color_phase(&mut self, phase: u16);
    fn set_intensity(&mut self, intensity: u8);
    fn set_pulse_rate(&mut self, bpm: u8);
    fn set_breath_rate(&mut self, per_min: u8);
    fn set_rainbow_duration(&mut self, seconds: f32);
}

/// Timekeeping.
pub trait Clock {
    fn set_twelve_hour(&mut self, twelve_hour: bool);
    /// Offset from UTC in seconds.
    fn set_time_zone_offset(&mut self, offset: i64);
    fn set_blank_hours_zero(&mut self, blank: bool);
    fn set_clock_graphics_idx(&mut self, index: u8);
}

/// The tube displays.
pub trait ClockDisplay {
    /// Number of selectable clock faces (N). Faces are numbered `1..=N`.
    fn face_count(&self) -> u8;

    /// Mirror of the selected face kept by the display itself.
    fn set_current_graphic(&mut self, index: u8);

    /// Redraw every tube now instead of waiting for the next change.
    fn force_refresh(&mut self);
}

/// Platform services.
pub trait System {
    /// Block for `ms` milliseconds.
    fn delay_ms(&mut self, ms: u64);

    /// Restart the device. Never returns.
    fn restart(&mut self) -> !;
}

/// The live subsystems a `set` may apply its value to.
pub struct Peripherals<'a> {
    pub backlight: &'a mut dyn Backlight,
    pub clock: &'a mut dyn Clock,
    pub display: &'a mut dyn ClockDisplay,
}

impl fmt::Debug for Peripherals<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Peripherals")
            .field("face_count", &self.display.face_count())
            .finish_non_exhaustive()
    }
}

/// Everything a single command can touch.
pub struct DeviceContext<'a, S> {
    pub config: &'a mut ConfigManager<S>,
    pub peripherals: Peripherals<'a>,
    pub system: &'a mut dyn System,
}

impl<'a, S: ConfigStore> DeviceContext<'a, S> {
    pub fn new(
        config: &'a mut ConfigManager<S>,
        peripherals: Peripherals<'a>,
        system: &'a mut dyn System,
    ) -> Self {
        DeviceContext {
            config,
            peripherals,
            system,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_indices_are_stable() {
        for (i, pattern) in BacklightPattern::ALL.iter().enumerate() {
            assert_eq!(pattern.index() as usize, i);
            assert_eq!(BacklightPattern::from_index(i as i64), Some(*pattern));
        }
        assert_eq!(BacklightPattern::from_index(6), None);
        assert_eq!(BacklightPattern::from_index(-1), None);
    }

    #[test]
    fn test_pattern_name_lookup_ignores_case() {
        assert_eq!(BacklightPattern::from_name("DaRk"), Some(BacklightPattern::Dark));
        assert_eq!(
            BacklightPattern::from_name("rainbow"),
            Some(BacklightPattern::Rainbow)
        );
        assert_eq!(BacklightPattern::from_name("strobe"), None);
    }
}
