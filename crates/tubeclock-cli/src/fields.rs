//! Configurable fields and their value domains.
//!
//! Each field is one [`FieldDescriptor`] in [`FIELDS`]: its name, how its
//! input is validated, where it lives in [`DeviceConfig`], and which live
//! subsystem hears about a change. Handlers validate completely before
//! writing, so a rejected value never reaches the configuration or the
//! peripherals.

use std::fmt;

use tracing::warn;

use crate::config::{DeviceConfig, TEXT_CAPACITY};
use crate::device::{BacklightPattern, Peripherals};
use crate::error::{CliError, CliResult};

/// Configurable field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKey {
    WifiSsid,
    WifiPassword,
    BlPattern,
    BlColorPhase,
    BlIntensity,
    BlPulseBpm,
    BlBreathPerMin,
    BlRainbowSec,
    ClkTwelveHour,
    ClkTimeZoneOffset,
    ClkBlankHoursZero,
    ClkSelectedGraphic,
}

impl FieldKey {
    /// Get the field name used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKey::WifiSsid => "wifi_ssid",
            FieldKey::WifiPassword => "wifi_password",
            FieldKey::BlPattern => "bl_pattern",
            FieldKey::BlColorPhase => "bl_color_phase",
            FieldKey::BlIntensity => "bl_intensity",
            FieldKey::BlPulseBpm => "bl_pulse_bpm",
            FieldKey::BlBreathPerMin => "bl_breath_per_min",
            FieldKey::BlRainbowSec => "bl_rainbow_sec",
            FieldKey::ClkTwelveHour => "clk_twelve_hour",
            FieldKey::ClkTimeZoneOffset => "clk_time_zone_offset",
            FieldKey::ClkBlankHoursZero => "clk_blank_hours_zero",
            FieldKey::ClkSelectedGraphic => "clk_selected_graphic",
        }
    }

    /// Parse a field name (already lowercase).
    pub fn from_str(s: &str) -> Option<FieldKey> {
        match s {
            "wifi_ssid" => Some(FieldKey::WifiSsid),
            "wifi_password" => Some(FieldKey::WifiPassword),
            "bl_pattern" => Some(FieldKey::BlPattern),
            "bl_color_phase" => Some(FieldKey::BlColorPhase),
            "bl_intensity" => Some(FieldKey::BlIntensity),
            "bl_pulse_bpm" => Some(FieldKey::BlPulseBpm),
            "bl_breath_per_min" => Some(FieldKey::BlBreathPerMin),
            "bl_rainbow_sec" => Some(FieldKey::BlRainbowSec),
            "clk_twelve_hour" => Some(FieldKey::ClkTwelveHour),
            "clk_time_zone_offset" => Some(FieldKey::ClkTimeZoneOffset),
            "clk_blank_hours_zero" => Some(FieldKey::ClkBlankHoursZero),
            "clk_selected_graphic" => Some(FieldKey::ClkSelectedGraphic),
            _ => None,
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a field accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldDomain {
    /// Text stored in a [`FixedStr`](crate::config::FixedStr) of
    /// [`TEXT_CAPACITY`] bytes.
    Text {
        /// Name used in error messages (`SSID`).
        label: &'static str,
        allow_empty: bool,
        /// Whether the success line repeats the value.
        echo: bool,
    },
    /// Backlight pattern, by index or name.
    Pattern,
    /// Integer in `min..=max`. Malformed input reports the range.
    Integer { min: i64, max: i64 },
    /// Any `i64`. Malformed input is a format error.
    SignedInteger,
    /// Clock face in `1..=N`, N taken from the display.
    FaceIndex,
    /// Decimal number, zero or above.
    NonNegativeFloat,
    /// `true`, `false`, `1` or `0`.
    Bool,
}

/// A validated field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    /// Pattern index as stored; may be out of range when read back.
    Pattern(u8),
    Integer(i64),
    Float(f32),
    Bool(bool),
}

impl FieldValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_pattern(&self) -> Option<BacklightPattern> {
        match self {
            FieldValue::Pattern(index) => BacklightPattern::from_index(i64::from(*index)),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_u8(&self) -> Option<u8> {
        self.as_i64().and_then(|v| u8::try_from(v).ok())
    }

    pub fn as_u16(&self) -> Option<u16> {
        self.as_i64().and_then(|v| u16::try_from(v).ok())
    }

    pub fn as_f32(&self) -> Option<f32> {
        match self {
            FieldValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Pattern(index) => write!(f, "{}", index),
            FieldValue::Integer(v) => write!(f, "{}", v),
            FieldValue::Float(v) => write!(f, "{:.2}", v),
            FieldValue::Bool(v) => f.write_str(if *v { "true" } else { "false" }),
        }
    }
}

/// One configurable field.
pub struct FieldDescriptor {
    pub key: FieldKey,
    pub domain: FieldDomain,
    /// Argument shape shown by `help`.
    pub usage: &'static str,
    read: fn(&DeviceConfig) -> FieldValue,
    write: fn(&mut DeviceConfig, &FieldValue),
    apply: fn(&mut Peripherals<'_>, &FieldValue),
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("key", &self.key)
            .field("domain", &self.domain)
            .field("usage", &self.usage)
            .finish_non_exhaustive()
    }
}

impl FieldDescriptor {
    /// Find the descriptor for a (lowercase) field name.
    pub fn find(name: &str) -> Option<&'static FieldDescriptor> {
        FieldKey::from_str(name).map(Self::for_key)
    }

    /// The descriptor for `key`.
    pub fn for_key(key: FieldKey) -> &'static FieldDescriptor {
        // FIELDS is declared in FieldKey order.
        &FIELDS[key as usize]
    }

    pub fn name(&self) -> &'static str {
        self.key.as_str()
    }

    /// Validate `raw` against this field's domain.
    ///
    /// `face_count` bounds [`FieldDomain::FaceIndex`]; other domains ignore it.
    pub fn parse(&self, raw: &str, face_count: u8) -> CliResult<FieldValue> {
        let field = self.name();
        match self.domain {
            FieldDomain::Text {
                label, allow_empty, ..
            } => {
                if raw.is_empty() && !allow_empty {
                    return Err(CliError::EmptyText { label });
                }
                if raw.len() >= TEXT_CAPACITY {
                    return Err(CliError::TextTooLong {
                        label,
                        max: TEXT_CAPACITY - 1,
                    });
                }
                Ok(FieldValue::Text(raw.to_string()))
            }
            FieldDomain::Pattern => parse_pattern(raw).map(|p| FieldValue::Pattern(p.index())),
            FieldDomain::Integer { min, max } => parse_integer(raw)
                .filter(|v| (min..=max).contains(v))
                .map(FieldValue::Integer)
                .ok_or(CliError::OutOfRange { field, min, max }),
            FieldDomain::SignedInteger => parse_integer(raw)
                .map(FieldValue::Integer)
                .ok_or(CliError::InvalidNumber { field }),
            FieldDomain::FaceIndex => {
                let value = parse_integer(raw).ok_or(CliError::InvalidNumber { field })?;
                if (1..=i64::from(face_count)).contains(&value) {
                    Ok(FieldValue::Integer(value))
                } else {
                    Err(CliError::OutOfRange {
                        field,
                        min: 1,
                        max: i64::from(face_count),
                    })
                }
            }
            FieldDomain::NonNegativeFloat => parse_leading_float(raw)
                .filter(|v| v.is_finite() && *v >= 0.0)
                // Normalizes -0 to 0.
                .map(|v| FieldValue::Float(v + 0.0))
                .ok_or(CliError::NegativeNumber { field }),
            FieldDomain::Bool => match raw.to_ascii_lowercase().as_str() {
                "true" | "1" => Ok(FieldValue::Bool(true)),
                "false" | "0" => Ok(FieldValue::Bool(false)),
                _ => Err(CliError::InvalidBool { field }),
            },
        }
    }

    /// Current value from the configuration.
    pub fn read(&self, config: &DeviceConfig) -> FieldValue {
        (self.read)(config)
    }

    /// Whether a stored value lies in this field's domain.
    pub fn accepts(&self, value: &FieldValue, face_count: u8) -> bool {
        match self.domain {
            FieldDomain::Text { .. } => value.as_str().is_some_and(|s| s.len() < TEXT_CAPACITY),
            FieldDomain::Pattern => value.as_pattern().is_some(),
            FieldDomain::Integer { min, max } => {
                value.as_i64().is_some_and(|v| (min..=max).contains(&v))
            }
            FieldDomain::SignedInteger => value.as_i64().is_some(),
            FieldDomain::FaceIndex => value
                .as_i64()
                .is_some_and(|v| (1..=i64::from(face_count)).contains(&v)),
            FieldDomain::NonNegativeFloat => {
                value.as_f32().is_some_and(|v| v.is_finite() && v >= 0.0)
            }
            FieldDomain::Bool => value.as_bool().is_some(),
        }
    }

    /// Push a value to the live subsystem that owns it.
    pub fn apply(&self, peripherals: &mut Peripherals<'_>, value: &FieldValue) {
        (self.apply)(peripherals, value)
    }

    /// Answer for `get <field>`, without the status prefix.
    pub fn describe(&self, config: &DeviceConfig) -> CliResult<String> {
        let value = self.read(config);
        match self.domain {
            FieldDomain::Pattern => {
                let pattern = value.as_pattern().ok_or(CliError::StoredPatternInvalid)?;
                Ok(format!("{}={}", self.name(), pattern))
            }
            _ => Ok(format!("{}={}", self.name(), value)),
        }
    }

    /// Handle `set <field> <raw>`: validate, store, apply, and return the
    /// success summary.
    pub fn set(
        &self,
        raw: &str,
        config: &mut DeviceConfig,
        peripherals: &mut Peripherals<'_>,
    ) -> CliResult<String> {
        let value = self.parse(raw, peripherals.display.face_count())?;
        (self.write)(config, &value);
        self.apply(peripherals, &value);

        let message = match (self.domain, &value) {
            (FieldDomain::Text { echo: false, .. }, _) => format!("{} set.", self.name()),
            (FieldDomain::Pattern, v) => match v.as_pattern() {
                Some(pattern) => format!("{} set to {}", self.name(), pattern),
                None => format!("{} set to {}", self.name(), v),
            },
            (_, v) => format!("{} set to {}", self.name(), v),
        };
        Ok(message)
    }
}

/// Every configurable field, in `FieldKey` order (which is also the order
/// of `help` and `get_config`).
pub static FIELDS: [FieldDescriptor; 12] = [
    FieldDescriptor {
        key: FieldKey::WifiSsid,
        domain: FieldDomain::Text {
            label: "SSID",
            allow_empty: false,
            echo: true,
        },
        usage: "<ssid>",
        read: |c| FieldValue::Text(c.wifi.ssid.as_str().to_string()),
        write: |c, v| {
            if let Some(s) = v.as_str() {
                c.wifi.ssid.set(s);
            }
        },
        apply: |_, _| {},
    },
    FieldDescriptor {
        key: FieldKey::WifiPassword,
        domain: FieldDomain::Text {
            label: "password",
            allow_empty: true,
            echo: false,
        },
        usage: "<password>",
        read: |c| FieldValue::Text(c.wifi.password.as_str().to_string()),
        write: |c, v| {
            if let Some(s) = v.as_str() {
                c.wifi.password.set(s);
            }
        },
        apply: |_, _| {},
    },
    FieldDescriptor {
        key: FieldKey::BlPattern,
        domain: FieldDomain::Pattern,
        usage: "<pattern_name_or_index>",
        read: |c| FieldValue::Pattern(c.backlights.pattern),
        write: |c, v| {
            if let Some(p) = v.as_pattern() {
                c.backlights.pattern = p.index();
            }
        },
        apply: |p, v| {
            if let Some(pattern) = v.as_pattern() {
                p.backlight.set_pattern(pattern);
            }
        },
    },
    FieldDescriptor {
        key: FieldKey::BlColorPhase,
        domain: FieldDomain::Integer { min: 0, max: 65535 },
        usage: "<0-65535>",
        read: |c| FieldValue::Integer(c.backlights.color_phase.into()),
        write: |c, v| {
            if let Some(x) = v.as_u16() {
                c.backlights.color_phase = x;
            }
        },
        apply: |p, v| {
            if let Some(x) = v.as_u16() {
                p.backlight.set_color_phase(x);
            }
        },
    },
    FieldDescriptor {
        key: FieldKey::BlIntensity,
        domain: FieldDomain::Integer { min: 0, max: 255 },
        usage: "<0-255>",
        read: |c| FieldValue::Integer(c.backlights.intensity.into()),
        write: |c, v| {
            if let Some(x) = v.as_u8() {
                c.backlights.intensity = x;
            }
        },
        apply: |p, v| {
            if let Some(x) = v.as_u8() {
                p.backlight.set_intensity(x);
            }
        },
    },
    FieldDescriptor {
        key: FieldKey::BlPulseBpm,
        domain: FieldDomain::Integer { min: 0, max: 255 },
        usage: "<rate>",
        read: |c| FieldValue::Integer(c.backlights.pulse_bpm.into()),
        write: |c, v| {
            if let Some(x) = v.as_u8() {
                c.backlights.pulse_bpm = x;
            }
        },
        apply: |p, v| {
            if let Some(x) = v.as_u8() {
                p.backlight.set_pulse_rate(x);
            }
        },
    },
    FieldDescriptor {
        key: FieldKey::BlBreathPerMin,
        domain: FieldDomain::Integer { min: 0, max: 255 },
        usage: "<rate>",
        read: |c| FieldValue::Integer(c.backlights.breath_per_min.into()),
        write: |c, v| {
            if let Some(x) = v.as_u8() {
                c.backlights.breath_per_min = x;
            }
        },
        apply: |p, v| {
            if let Some(x) = v.as_u8() {
                p.backlight.set_breath_rate(x);
            }
        },
    },
    FieldDescriptor {
        key: FieldKey::BlRainbowSec,
        domain: FieldDomain::NonNegativeFloat,
        usage: "<seconds>",
        read: |c| FieldValue::Float(c.backlights.rainbow_sec),
        write: |c, v| {
            if let Some(x) = v.as_f32() {
                c.backlights.rainbow_sec = x;
            }
        },
        apply: |p, v| {
            if let Some(x) = v.as_f32() {
                p.backlight.set_rainbow_duration(x);
            }
        },
    },
    FieldDescriptor {
        key: FieldKey::ClkTwelveHour,
        domain: FieldDomain::Bool,
        usage: "<true|false|1|0>",
        read: |c| FieldValue::Bool(c.clock.twelve_hour),
        write: |c, v| {
            if let Some(x) = v.as_bool() {
                c.clock.twelve_hour = x;
            }
        },
        apply: |p, v| {
            if let Some(x) = v.as_bool() {
                p.clock.set_twelve_hour(x);
            }
        },
    },
    FieldDescriptor {
        key: FieldKey::ClkTimeZoneOffset,
        domain: FieldDomain::SignedInteger,
        usage: "<seconds_from_utc>",
        read: |c| FieldValue::Integer(c.clock.time_zone_offset),
        write: |c, v| {
            if let Some(x) = v.as_i64() {
                c.clock.time_zone_offset = x;
            }
        },
        apply: |p, v| {
            if let Some(x) = v.as_i64() {
                p.clock.set_time_zone_offset(x);
            }
        },
    },
    FieldDescriptor {
        key: FieldKey::ClkBlankHoursZero,
        domain: FieldDomain::Bool,
        usage: "<true|false|1|0>",
        read: |c| FieldValue::Bool(c.clock.blank_hours_zero),
        write: |c, v| {
            if let Some(x) = v.as_bool() {
                c.clock.blank_hours_zero = x;
            }
        },
        apply: |p, v| {
            if let Some(x) = v.as_bool() {
                p.clock.set_blank_hours_zero(x);
            }
        },
    },
    FieldDescriptor {
        key: FieldKey::ClkSelectedGraphic,
        domain: FieldDomain::FaceIndex,
        usage: "<index>",
        read: |c| FieldValue::Integer(c.clock.selected_graphic.into()),
        write: |c, v| {
            if let Some(x) = v.as_u8() {
                c.clock.selected_graphic = x;
            }
        },
        // Clock first, then the display's own copy, then redraw.
        apply: |p, v| {
            if let Some(x) = v.as_u8() {
                p.clock.set_clock_graphics_idx(x);
                p.display.set_current_graphic(x);
                p.display.force_refresh();
            }
        },
    },
];

/// Push every stored value to the live subsystems, e.g. after boot.
///
/// Values outside their field's domain (a face index past the display's
/// face count, an unknown pattern) are skipped with a warning.
pub fn apply_all(config: &DeviceConfig, peripherals: &mut Peripherals<'_>) {
    let face_count = peripherals.display.face_count();
    for field in FIELDS.iter() {
        let value = field.read(config);
        if !field.accepts(&value, face_count) {
            warn!("apply_all: stored {}={} out of range, not applied", field.name(), value);
            continue;
        }
        field.apply(peripherals, &value);
    }
}

/// Base-10 integer with lenient trailing text (`12abc` is 12).
///
/// `None` when there are no leading digits, when the value overflows, or
/// when it comes out zero but the text is not a plain digit string
/// (`0x10`, `-0abc`).
pub fn parse_integer(text: &str) -> Option<i64> {
    let value = parse_leading_int(text)?;
    if value == 0 && text != "0" {
        let digits = text.strip_prefix('-').unwrap_or(text);
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
    }
    Some(value)
}

fn parse_leading_int(text: &str) -> Option<i64> {
    let unsigned = text
        .strip_prefix(|c: char| c == '-' || c == '+')
        .unwrap_or(text);
    let digit_count = unsigned.bytes().take_while(u8::is_ascii_digit).count();
    if digit_count == 0 {
        return None;
    }
    let sign_len = text.len() - unsigned.len();
    text[..sign_len + digit_count].parse().ok()
}

/// Decimal number with optional exponent and lenient trailing text
/// (`2.5s` is 2.5, `1e3` is 1000).
pub fn parse_leading_float(text: &str) -> Option<f32> {
    let bytes = text.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'-' | b'+')) {
        end = 1;
    }
    let int_digits = bytes[end..].iter().take_while(|b| b.is_ascii_digit()).count();
    end += int_digits;
    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = bytes[end + 1..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count();
        end += 1 + frac_digits;
    }
    if int_digits + frac_digits == 0 {
        return None;
    }
    // An exponent counts only when at least one digit follows it.
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'-' | b'+')) {
            exp_end += 1;
        }
        let exp_digits = bytes[exp_end..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count();
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }
    text[..end].parse().ok()
}

fn parse_pattern(raw: &str) -> CliResult<BacklightPattern> {
    let mut chars = raw.chars();
    let numeric = match (chars.next(), chars.next()) {
        (None, _) => return Err(CliError::EmptyPattern),
        (Some(c), _) if c.is_ascii_digit() => true,
        (Some('-'), Some(c)) => c.is_ascii_digit(),
        _ => false,
    };

    let by_index = if numeric {
        parse_leading_int(raw).and_then(BacklightPattern::from_index)
    } else {
        None
    };
    by_index
        .or_else(|| BacklightPattern::from_name(raw))
        .ok_or(CliError::UnknownPattern)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_matches_key_order() {
        for (i, field) in FIELDS.iter().enumerate() {
            assert_eq!(field.key as usize, i);
            assert_eq!(FieldDescriptor::find(field.name()).map(|f| f.key), Some(field.key));
        }
        assert!(FieldDescriptor::find("bl_speed").is_none());
    }

    #[test]
    fn test_parse_integer_lenient_suffix() {
        assert_eq!(parse_integer("12abc"), Some(12));
        assert_eq!(parse_integer("-3600"), Some(-3600));
        assert_eq!(parse_integer("0"), Some(0));
        assert_eq!(parse_integer("-0"), Some(0));
        assert_eq!(parse_integer("000"), Some(0));
    }

    #[test]
    fn test_parse_integer_rejects_malformed() {
        assert_eq!(parse_integer("abc"), None);
        assert_eq!(parse_integer("0abc"), None);
        assert_eq!(parse_integer("-"), None);
        assert_eq!(parse_integer("99999999999999999999"), None);
    }

    #[test]
    fn test_parse_leading_float() {
        assert_eq!(parse_leading_float("2.5"), Some(2.5));
        assert_eq!(parse_leading_float("2.5s"), Some(2.5));
        assert_eq!(parse_leading_float(".5"), Some(0.5));
        assert_eq!(parse_leading_float("7."), Some(7.0));
        assert_eq!(parse_leading_float("-1"), Some(-1.0));
        assert_eq!(parse_leading_float("fast"), None);
        assert_eq!(parse_leading_float("."), None);
    }

    #[test]
    fn test_parse_leading_float_exponent() {
        assert_eq!(parse_leading_float("1e3"), Some(1000.0));
        assert_eq!(parse_leading_float("2.5e-1"), Some(0.25));
        assert_eq!(parse_leading_float("4E+2x"), Some(400.0));
        assert_eq!(parse_leading_float("3e"), Some(3.0));
        assert_eq!(parse_leading_float("3e-"), Some(3.0));
        assert_eq!(parse_leading_float("e3"), None);

        let field = FieldDescriptor::for_key(FieldKey::BlRainbowSec);
        assert_eq!(field.parse("1e3", 6), Ok(FieldValue::Float(1000.0)));
        assert!(field.parse("1e99", 6).is_err());
    }

    #[test]
    fn test_range_error_for_malformed_bounded_integer() {
        let field = FieldDescriptor::for_key(FieldKey::BlIntensity);
        assert_eq!(
            field.parse("bright", 6),
            Err(CliError::OutOfRange {
                field: "bl_intensity",
                min: 0,
                max: 255
            })
        );
        assert_eq!(field.parse("255", 6), Ok(FieldValue::Integer(255)));
    }

    #[test]
    fn test_face_index_errors() {
        let field = FieldDescriptor::for_key(FieldKey::ClkSelectedGraphic);
        assert_eq!(
            field.parse("two", 6),
            Err(CliError::InvalidNumber {
                field: "clk_selected_graphic"
            })
        );
        assert_eq!(
            field.parse("7", 6),
            Err(CliError::OutOfRange {
                field: "clk_selected_graphic",
                min: 1,
                max: 6
            })
        );
        assert!(field.parse("0", 6).is_err());
        assert_eq!(field.parse("6", 6), Ok(FieldValue::Integer(6)));
    }

    #[test]
    fn test_pattern_index_then_name() {
        assert_eq!(parse_pattern("4"), Ok(BacklightPattern::Pulse));
        assert_eq!(parse_pattern("BREATH"), Ok(BacklightPattern::Breath));
        assert_eq!(parse_pattern("6"), Err(CliError::UnknownPattern));
        assert_eq!(parse_pattern("-1"), Err(CliError::UnknownPattern));
        assert_eq!(parse_pattern(""), Err(CliError::EmptyPattern));
    }

    #[test]
    fn test_bool_literals() {
        let field = FieldDescriptor::for_key(FieldKey::ClkTwelveHour);
        assert_eq!(field.parse("TRUE", 6), Ok(FieldValue::Bool(true)));
        assert_eq!(field.parse("0", 6), Ok(FieldValue::Bool(false)));
        assert!(field.parse("yes", 6).is_err());
    }

    #[test]
    fn test_rainbow_rejects_negative_and_text() {
        let field = FieldDescriptor::for_key(FieldKey::BlRainbowSec);
        assert!(field.parse("-0.5", 6).is_err());
        assert!(field.parse("slow", 6).is_err());
        assert_eq!(field.parse("0", 6), Ok(FieldValue::Float(0.0)));
    }

    #[test]
    fn test_float_renders_two_decimals() {
        assert_eq!(FieldValue::Float(2.5).to_string(), "2.50");
        assert_eq!(FieldValue::Bool(false).to_string(), "false");
    }

    #[test]
    fn test_text_limits() {
        let ssid = FieldDescriptor::for_key(FieldKey::WifiSsid);
        assert_eq!(ssid.parse("", 6), Err(CliError::EmptyText { label: "SSID" }));
        assert!(ssid.parse(&"n".repeat(31), 6).is_ok());
        assert_eq!(
            ssid.parse(&"n".repeat(32), 6),
            Err(CliError::TextTooLong {
                label: "SSID",
                max: 31
            })
        );

        let password = FieldDescriptor::for_key(FieldKey::WifiPassword);
        assert_eq!(password.parse("", 6), Ok(FieldValue::Text(String::new())));
    }

    #[test]
    fn test_accepts_checks_stored_values() {
        let face = FieldDescriptor::for_key(FieldKey::ClkSelectedGraphic);
        assert!(face.accepts(&FieldValue::Integer(6), 6));
        assert!(!face.accepts(&FieldValue::Integer(9), 6));
        assert!(!face.accepts(&FieldValue::Integer(0), 6));

        let pattern = FieldDescriptor::for_key(FieldKey::BlPattern);
        assert!(pattern.accepts(&FieldValue::Pattern(5), 6));
        assert!(!pattern.accepts(&FieldValue::Pattern(6), 6));

        let rainbow = FieldDescriptor::for_key(FieldKey::BlRainbowSec);
        assert!(!rainbow.accepts(&FieldValue::Float(-1.0), 6));
        assert!(!rainbow.accepts(&FieldValue::Float(f32::NAN), 6));
    }

    #[test]
    fn test_describe_stored_pattern() {
        let field = FieldDescriptor::for_key(FieldKey::BlPattern);
        let mut config = DeviceConfig::default();
        assert_eq!(field.describe(&config), Ok("bl_pattern=Rainbow".to_string()));

        config.backlights.pattern = 9;
        assert_eq!(field.describe(&config), Err(CliError::StoredPatternInvalid));
    }
}
