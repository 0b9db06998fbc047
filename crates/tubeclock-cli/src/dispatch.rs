//! Command routing.
//!
//! All commands live in one table keyed by their canonical string
//! (`help`, `get bl_intensity`, `set bl_intensity`, ...). Field routes are
//! generated from [`FIELDS`], so a new field needs only a new descriptor.

use std::collections::HashMap;
use std::io::{self, Write};
use std::sync::LazyLock;

use tracing::{debug, info, warn};

use crate::build_info;
use crate::codec::LineReader;
use crate::commands::{BareCommand, CommandLine};
use crate::config::ConfigStore;
use crate::device::DeviceContext;
use crate::error::{CliError, CliResult};
use crate::fields::{FieldDescriptor, FIELDS};
use crate::responses::{Outcome, Response};
use crate::telemetry::metric_defs;

/// Pause between the reboot acknowledgement and the restart, so the
/// acknowledgement leaves the UART.
pub const RESTART_DELAY_MS: u64 = 100;

/// What a canonical command resolves to.
#[derive(Debug, Clone, Copy)]
pub enum Route {
    Help,
    BuildInfo,
    DumpConfig,
    Save,
    Reboot,
    Get(&'static FieldDescriptor),
    Set(&'static FieldDescriptor),
}

static ROUTES: LazyLock<HashMap<String, Route>> = LazyLock::new(|| {
    let mut routes = HashMap::new();
    for bare in BareCommand::ALL {
        let route = match bare {
            BareCommand::Help => Route::Help,
            BareCommand::GetBuildInfo => Route::BuildInfo,
            BareCommand::GetConfig => Route::DumpConfig,
            BareCommand::SaveConfig => Route::Save,
            BareCommand::Reboot => Route::Reboot,
        };
        routes.insert(bare.as_str().to_string(), route);
    }
    for field in FIELDS.iter() {
        routes.insert(format!("get {}", field.name()), Route::Get(field));
        routes.insert(format!("set {}", field.name()), Route::Set(field));
    }
    routes
});

/// Resolve a canonical command string. Returns the table's own key along
/// with the route.
pub fn lookup(canonical: &str) -> Option<(&'static str, Route)> {
    ROUTES
        .get_key_value(canonical)
        .map(|(key, route)| (key.as_str(), *route))
}

/// Every command shape, one per line, in listing order.
pub fn help_lines() -> Vec<String> {
    let mut lines = vec![BareCommand::Help.as_str().to_string()];
    for field in FIELDS.iter() {
        lines.push(format!("get {}", field.name()));
        lines.push(format!("set {} {}", field.name(), field.usage));
    }
    lines.extend(
        [
            BareCommand::SaveConfig,
            BareCommand::Reboot,
            BareCommand::GetConfig,
            BareCommand::GetBuildInfo,
        ]
        .iter()
        .map(|c| c.as_str().to_string()),
    );
    lines
}

/// Handle one trimmed, non-empty line.
///
/// Never restarts by itself; a `reboot` comes back with
/// [`Outcome::restart`] set so the caller can flush first.
pub fn execute<S: ConfigStore>(line: &str, ctx: &mut DeviceContext<'_, S>) -> Outcome {
    let command = match CommandLine::parse(line) {
        Ok(command) => command,
        Err(e) => {
            warn!("Dispatcher: rejected '{}': {}", line, e);
            record("set", false);
            return Outcome::respond(e.into());
        }
    };

    let Some((key, route)) = lookup(&command.canonical) else {
        warn!("Dispatcher: unknown command '{}'", line);
        metrics::counter!(metric_defs::UNKNOWN_COMMANDS.name).increment(1);
        return Outcome::respond(
            CliError::UnknownCommand {
                input: line.to_string(),
            }
            .into(),
        );
    };
    debug!("Dispatcher: '{}' -> {}", line, key);

    let outcome = match route {
        Route::Help => Outcome::respond(Response::listing("Available commands:", help_lines())),
        Route::BuildInfo => Outcome::respond(Response::ok(build_info::summary())),
        Route::DumpConfig => Outcome::respond(dump_config(ctx)),
        Route::Save => Outcome::respond(into_response(save_config(ctx))),
        Route::Reboot => {
            info!("Dispatcher: reboot requested");
            Outcome::restart_after(Response::ok("Rebooting..."))
        }
        Route::Get(field) => Outcome::respond(into_response(field.describe(ctx.config.config()))),
        Route::Set(field) => {
            let value = command.value.unwrap_or_default();
            let result = field.set(value, ctx.config.config_mut(), &mut ctx.peripherals);
            if let Err(e) = &result {
                warn!("Dispatcher: {} rejected: {}", key, e);
            }
            Outcome::respond(into_response(result))
        }
    };

    record(key, outcome.response.is_ok());
    outcome
}

/// Handle one line end to end: answer on `out`, and restart the device if
/// the command asked for it.
pub fn process_line<S: ConfigStore>(
    line: &str,
    ctx: &mut DeviceContext<'_, S>,
    out: &mut dyn Write,
) -> io::Result<()> {
    let outcome = execute(line, ctx);
    out.write_all(&outcome.response.encode())?;
    out.flush()?;

    if outcome.restart {
        ctx.system.delay_ms(RESTART_DELAY_MS);
        ctx.system.restart();
    }
    Ok(())
}

/// The serial command interface: a line reader feeding the dispatcher.
#[derive(Debug, Default)]
pub struct CommandInterface {
    reader: LineReader,
}

impl CommandInterface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue bytes received from the link.
    pub fn receive(&mut self, data: &[u8]) {
        self.reader.push(data);
    }

    /// Handle at most one buffered line. Returns whether a line was handled.
    pub fn poll<S: ConfigStore>(
        &mut self,
        ctx: &mut DeviceContext<'_, S>,
        out: &mut dyn Write,
    ) -> io::Result<bool> {
        match self.reader.poll_line() {
            Some(line) => {
                process_line(&line, ctx, out)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// The underlying line reader.
    pub fn reader(&self) -> &LineReader {
        &self.reader
    }
}

fn dump_config<S: ConfigStore>(ctx: &mut DeviceContext<'_, S>) -> Response {
    let config = ctx.config.config();
    let lines = FIELDS
        .iter()
        .map(|field| format!("{}={}", field.name(), field.read(config)))
        .collect();
    Response::listing("Current configuration:", lines)
}

fn save_config<S: ConfigStore>(ctx: &mut DeviceContext<'_, S>) -> CliResult<String> {
    ctx.config.save().map_err(|e| {
        warn!("Dispatcher: save failed: {}", e);
        CliError::SaveFailed(e.to_string())
    })?;
    metrics::counter!(metric_defs::CONFIG_SAVES.name).increment(1);
    Ok("Configuration saved".to_string())
}

fn into_response(result: CliResult<String>) -> Response {
    match result {
        Ok(message) => Response::ok(message),
        Err(e) => Response::Error(e),
    }
}

fn record(command: &'static str, ok: bool) {
    let outcome = if ok { "ok" } else { "error" };
    metrics::counter!(
        metric_defs::COMMANDS.name,
        "command" => command,
        "outcome" => outcome
    )
    .increment(1);
}
