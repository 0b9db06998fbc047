//! Simulated clock hardware for running the command interface on a host.
//!
//! Each subsystem keeps the state it was last given and logs changes, so a
//! session can be followed from the log alone.

use std::process;
use std::thread;
use std::time::Duration;

use tracing::{debug, info};
use tubeclock_cli::{Backlight, BacklightPattern, Clock, ClockDisplay, Peripherals, System};

/// Process exit code used for a requested restart, so a supervisor can tell
/// it apart from a failure and relaunch.
pub const RESTART_EXIT_CODE: i32 = 3;

/// Backlight state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimBacklight {
    pub pattern: Option<BacklightPattern>,
    pub color_phase: u16,
    pub intensity: u8,
    pub pulse_bpm: u8,
    pub breath_per_min: u8,
    pub rainbow_sec: f32,
}

impl Backlight for SimBacklight {
    fn set_pattern(&mut self, pattern: BacklightPattern) {
        info!("Backlight: pattern {}", pattern);
        self.pattern = Some(pattern);
    }

    fn set_color_phase(&mut self, phase: u16) {
        debug!("Backlight: color phase {}", phase);
        self.color_phase = phase;
    }

    fn set_intensity(&mut self, intensity: u8) {
        debug!("Backlight: intensity {}", intensity);
        self.intensity = intensity;
    }

    fn set_pulse_rate(&mut self, bpm: u8) {
        debug!("Backlight: pulse {} bpm", bpm);
        self.pulse_bpm = bpm;
    }

    fn set_breath_rate(&mut self, per_min: u8) {
        debug!("Backlight: breath {}/min", per_min);
        self.breath_per_min = per_min;
    }

    fn set_rainbow_duration(&mut self, seconds: f32) {
        debug!("Backlight: rainbow cycle {:.2}s", seconds);
        self.rainbow_sec = seconds;
    }
}

/// Timekeeping state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimClock {
    pub twelve_hour: bool,
    pub time_zone_offset: i64,
    pub blank_hours_zero: bool,
    pub graphics_idx: u8,
}

impl Clock for SimClock {
    fn set_twelve_hour(&mut self, twelve_hour: bool) {
        debug!("Clock: twelve hour {}", twelve_hour);
        self.twelve_hour = twelve_hour;
    }

    fn set_time_zone_offset(&mut self, offset: i64) {
        info!("Clock: UTC offset {}s", offset);
        self.time_zone_offset = offset;
    }

    fn set_blank_hours_zero(&mut self, blank: bool) {
        debug!("Clock: blank leading zero {}", blank);
        self.blank_hours_zero = blank;
    }

    fn set_clock_graphics_idx(&mut self, index: u8) {
        debug!("Clock: graphics index {}", index);
        self.graphics_idx = index;
    }
}

/// Tube display state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimDisplay {
    face_count: u8,
    pub current_graphic: u8,
    /// Forced redraws so far.
    pub refreshes: u32,
}

impl SimDisplay {
    pub fn new(face_count: u8) -> Self {
        SimDisplay {
            face_count,
            current_graphic: 1,
            refreshes: 0,
        }
    }
}

impl ClockDisplay for SimDisplay {
    fn face_count(&self) -> u8 {
        self.face_count
    }

    fn set_current_graphic(&mut self, index: u8) {
        self.current_graphic = index;
    }

    fn force_refresh(&mut self) {
        self.refreshes += 1;
        info!("Display: redraw with face {}", self.current_graphic);
    }
}

/// The simulated clock's live subsystems.
#[derive(Debug, Clone)]
pub struct SimHardware {
    pub backlight: SimBacklight,
    pub clock: SimClock,
    pub display: SimDisplay,
}

impl SimHardware {
    pub fn new(face_count: u8) -> Self {
        SimHardware {
            backlight: SimBacklight::default(),
            clock: SimClock::default(),
            display: SimDisplay::new(face_count),
        }
    }

    /// Borrow the subsystems for one command.
    pub fn peripherals(&mut self) -> Peripherals<'_> {
        Peripherals {
            backlight: &mut self.backlight,
            clock: &mut self.clock,
            display: &mut self.display,
        }
    }
}

/// Platform services of the host process.
#[derive(Debug, Default)]
pub struct HostSystem;

impl System for HostSystem {
    fn delay_ms(&mut self, ms: u64) {
        thread::sleep(Duration::from_millis(ms));
    }

    fn restart(&mut self) -> ! {
        info!("HostSystem: restarting (exit code {})", RESTART_EXIT_CODE);
        process::exit(RESTART_EXIT_CODE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tubeclock_cli::{apply_all, DeviceConfig};

    #[test]
    fn test_apply_all_syncs_hardware() {
        let mut hw = SimHardware::new(6);
        let mut config = DeviceConfig::default();
        config.clock.selected_graphic = 5;
        config.backlights.pattern = BacklightPattern::Pulse.index();

        apply_all(&config, &mut hw.peripherals());

        assert_eq!(hw.backlight.pattern, Some(BacklightPattern::Pulse));
        assert_eq!(hw.backlight.intensity, 7);
        assert_eq!(hw.clock.graphics_idx, 5);
        assert_eq!(hw.display.current_graphic, 5);
        assert_eq!(hw.display.refreshes, 1);
        assert!(hw.clock.twelve_hour);
    }

    #[test]
    fn test_apply_all_skips_out_of_range_stored_values() {
        let mut hw = SimHardware::new(6);
        let mut config = DeviceConfig::default();
        config.clock.selected_graphic = 9;
        config.clock.time_zone_offset = -7200;
        config.backlights.pattern = 42;

        apply_all(&config, &mut hw.peripherals());

        assert_eq!(hw.clock.graphics_idx, SimClock::default().graphics_idx);
        assert_eq!(hw.display.current_graphic, SimDisplay::new(6).current_graphic);
        assert_eq!(hw.display.refreshes, 0);
        assert_eq!(hw.backlight.pattern, None);
        assert_eq!(hw.clock.time_zone_offset, -7200);
    }
}
