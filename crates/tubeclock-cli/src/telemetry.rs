//! Metric declarations for the command interface.
//!
//! Counters are recorded through the `metrics` facade and cost nothing
//! unless the host installs a recorder.
//!
//! ```rust,ignore
//! use tubeclock_cli::telemetry::{self, metric_defs};
//!
//! telemetry::describe_metrics();
//! metrics::counter!(metric_defs::COMMANDS.name, "outcome" => "ok").increment(1);
//! ```

use metrics::{describe_counter, Unit};

/// A counter declaration with its metadata.
#[derive(Debug, Clone)]
pub struct Metric {
    /// The metric name (e.g., "tubeclock.cli.commands").
    pub name: &'static str,
    /// Human-readable description of the metric.
    pub description: &'static str,
    /// The unit of measurement (optional).
    pub unit: Option<Unit>,
    /// Expected label keys for this metric.
    pub labels: &'static [&'static str],
}

impl Metric {
    /// Creates a new counter metric with the given name.
    pub const fn counter(name: &'static str) -> Self {
        Self {
            name,
            description: "",
            unit: None,
            labels: &[],
        }
    }

    /// Sets the description for the metric.
    pub const fn with_description(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    /// Sets the unit for the metric.
    pub const fn with_unit(mut self, unit: Unit) -> Self {
        self.unit = Some(unit);
        self
    }

    /// Sets the expected label keys for the metric.
    pub const fn with_labels(mut self, labels: &'static [&'static str]) -> Self {
        self.labels = labels;
        self
    }

    /// Registers this metric's description with the metrics recorder.
    pub fn describe(&self) {
        match self.unit {
            Some(unit) => {
                describe_counter!(self.name, unit, self.description);
            }
            None => {
                describe_counter!(self.name, self.description);
            }
        }
    }
}

/// All metrics recorded by the command interface.
pub mod metric_defs {
    use super::{Metric, Unit};

    /// Commands handled, by route and outcome.
    ///
    /// Labels: command, outcome
    pub const COMMANDS: Metric = Metric::counter("tubeclock.cli.commands")
        .with_description("Commands handled")
        .with_unit(Unit::Count)
        .with_labels(&["command", "outcome"]);

    /// Lines that matched no command.
    pub const UNKNOWN_COMMANDS: Metric = Metric::counter("tubeclock.cli.unknown_commands")
        .with_description("Lines that matched no command")
        .with_unit(Unit::Count);

    /// Input lines dropped for exceeding the maximum length.
    pub const LINE_OVERFLOWS: Metric = Metric::counter("tubeclock.cli.line_overflows")
        .with_description("Input lines dropped for exceeding the maximum length")
        .with_unit(Unit::Count);

    /// Successful configuration saves.
    pub const CONFIG_SAVES: Metric = Metric::counter("tubeclock.config.saves")
        .with_description("Successful configuration saves")
        .with_unit(Unit::Count);

    /// Every metric, for registration.
    pub const ALL: &[Metric] = &[COMMANDS, UNKNOWN_COMMANDS, LINE_OVERFLOWS, CONFIG_SAVES];
}

/// Register descriptions for every metric. Call once at startup, after the
/// recorder is installed.
pub fn describe_metrics() {
    for metric in metric_defs::ALL {
        metric.describe();
    }
}
