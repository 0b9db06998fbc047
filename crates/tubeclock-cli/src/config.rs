//! Device configuration model and persistence seam.

use std::fmt;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use tracing::{debug, info, warn};

use crate::error::StoreError;

/// Capacity of the credential buffers, terminator included.
pub const TEXT_CAPACITY: usize = 32;

/// Fixed-capacity text buffer that always keeps a NUL terminator.
///
/// At most `N - 1` bytes of text fit.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct FixedStr<const N: usize> {
    bytes: [u8; N],
}

impl<const N: usize> FixedStr<N> {
    /// Longest text that fits, in bytes.
    pub const MAX_LEN: usize = N - 1;

    /// Create an empty buffer.
    pub const fn new() -> Self {
        FixedStr { bytes: [0; N] }
    }

    /// Create a buffer holding `value`, or `None` if it does not fit.
    pub fn from_str(value: &str) -> Option<Self> {
        let mut out = Self::new();
        out.set(value).then_some(out)
    }

    /// Replace the contents. Returns `false` and leaves the buffer untouched
    /// if `value` is `N` bytes or longer.
    pub fn set(&mut self, value: &str) -> bool {
        let len = value.len();
        if len >= N {
            return false;
        }
        self.bytes = [0; N];
        self.bytes[..len].copy_from_slice(value.as_bytes());
        true
    }

    /// Get the text up to the terminator.
    pub fn as_str(&self) -> &str {
        let len = self.len();
        // Only whole `&str` values are ever copied in.
        std::str::from_utf8(&self.bytes[..len]).unwrap_or_default()
    }

    /// Length of the text in bytes.
    pub fn len(&self) -> usize {
        self.bytes.iter().position(|&b| b == 0).unwrap_or(N)
    }

    /// Whether the buffer holds no text.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The raw storage, terminator and padding included.
    pub fn as_bytes_with_nul(&self) -> &[u8; N] {
        &self.bytes
    }
}

impl<const N: usize> Default for FixedStr<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> fmt::Debug for FixedStr<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

impl<const N: usize> fmt::Display for FixedStr<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<const N: usize> Serialize for FixedStr<N> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de, const N: usize> Deserialize<'de> for FixedStr<N> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        FixedStr::from_str(&value).ok_or_else(|| {
            de::Error::custom(format!(
                "text of {} bytes exceeds capacity of {} bytes",
                value.len(),
                N - 1
            ))
        })
    }
}

/// Network credentials.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WifiConfig {
    pub ssid: FixedStr<TEXT_CAPACITY>,
    pub password: FixedStr<TEXT_CAPACITY>,
}

/// Backlight parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BacklightConfig {
    /// Pattern index, see [`BacklightPattern`](crate::device::BacklightPattern).
    pub pattern: u8,
    pub color_phase: u16,
    pub intensity: u8,
    pub pulse_bpm: u8,
    pub breath_per_min: u8,
    /// Seconds per rainbow cycle.
    pub rainbow_sec: f32,
}

impl Default for BacklightConfig {
    fn default() -> Self {
        BacklightConfig {
            pattern: 3,
            color_phase: 0,
            intensity: 7,
            pulse_bpm: 72,
            breath_per_min: 10,
            rainbow_sec: 10.0,
        }
    }
}

/// Clock parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    pub twelve_hour: bool,
    /// Offset from UTC in seconds.
    pub time_zone_offset: i64,
    pub blank_hours_zero: bool,
    /// Clock face, 1-based.
    pub selected_graphic: u8,
}

impl Default for ClockConfig {
    fn default() -> Self {
        ClockConfig {
            twelve_hour: true,
            time_zone_offset: 0,
            blank_hours_zero: true,
            selected_graphic: 1,
        }
    }
}

/// Everything the command interface can read or change.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    pub wifi: WifiConfig,
    pub backlights: BacklightConfig,
    pub clock: ClockConfig,
}

/// Durable storage for a [`DeviceConfig`].
pub trait ConfigStore {
    /// Read the stored configuration. `Ok(None)` means nothing was stored yet.
    fn load(&mut self) -> Result<Option<DeviceConfig>, StoreError>;

    /// Write the whole configuration.
    fn save(&mut self, config: &DeviceConfig) -> Result<(), StoreError>;
}

/// Store that keeps the saved configuration in memory.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    saved: Option<DeviceConfig>,
    saves: u32,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds `config`.
    pub fn with_config(config: DeviceConfig) -> Self {
        MemoryStore {
            saved: Some(config),
            saves: 0,
        }
    }

    /// The last saved configuration.
    pub fn saved(&self) -> Option<&DeviceConfig> {
        self.saved.as_ref()
    }

    /// How many times `save` was called.
    pub fn save_count(&self) -> u32 {
        self.saves
    }
}

impl ConfigStore for MemoryStore {
    fn load(&mut self) -> Result<Option<DeviceConfig>, StoreError> {
        Ok(self.saved.clone())
    }

    fn save(&mut self, config: &DeviceConfig) -> Result<(), StoreError> {
        self.saved = Some(config.clone());
        self.saves += 1;
        Ok(())
    }
}

/// Owns the in-memory configuration and loads it on first access.
#[derive(Debug)]
pub struct ConfigManager<S> {
    store: S,
    config: Option<DeviceConfig>,
}

impl<S: ConfigStore> ConfigManager<S> {
    /// Create a manager over `store`. Nothing is read until first access.
    pub fn new(store: S) -> Self {
        ConfigManager {
            store,
            config: None,
        }
    }

    /// Whether the configuration has been loaded yet.
    pub fn is_loaded(&self) -> bool {
        self.config.is_some()
    }

    /// Read access, loading first if needed.
    pub fn config(&mut self) -> &DeviceConfig {
        self.ensure_loaded()
    }

    /// Write access, loading first if needed.
    pub fn config_mut(&mut self) -> &mut DeviceConfig {
        self.ensure_loaded()
    }

    /// Persist the current configuration.
    pub fn save(&mut self) -> Result<(), StoreError> {
        let config = self.ensure_loaded().clone();
        self.store.save(&config)?;
        info!("ConfigManager: configuration saved");
        Ok(())
    }

    /// The backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutable access to the backing store.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    fn ensure_loaded(&mut self) -> &mut DeviceConfig {
        if self.config.is_none() {
            let loaded = match self.store.load() {
                Ok(Some(config)) => {
                    debug!("ConfigManager: loaded stored configuration");
                    config
                }
                Ok(None) => {
                    debug!("ConfigManager: no stored configuration, using defaults");
                    DeviceConfig::default()
                }
                Err(e) => {
                    warn!("ConfigManager: failed to load configuration ({}), using defaults", e);
                    DeviceConfig::default()
                }
            };
            self.config = Some(loaded);
        }
        self.config.get_or_insert_with(DeviceConfig::default)
    }
}
