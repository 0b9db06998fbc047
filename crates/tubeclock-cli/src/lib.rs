//! Tube Clock Serial Command Interface
//!
//! This crate implements the text command interface of the tube clock: it
//! assembles lines from the serial link, routes each line to a handler, and
//! answers with a single status line.
//!
//! # Protocol Overview
//!
//! - **Commands** (host → clock): ASCII text terminated with `\n`; a trailing
//!   `\r` and surrounding whitespace are ignored
//! - **Responses** (clock → host): `OK: <summary>` or `ERROR: <reason>`,
//!   terminated with `\r\n`
//! - Keywords and field names are case-insensitive; `set` values keep their
//!   case
//!
//! # Command Types
//!
//! - **Get commands**: `get <field>` answers `OK: <field>=<value>`
//! - **Set commands**: `set <field> <value>` validates, stores, applies the
//!   value to the live subsystem, and answers `OK: <field> set to <value>`
//! - **Bare commands**: `help`, `get_config`, `get_build_info`,
//!   `save_config`, `reboot`
//!
//! # Example
//!
//! ```rust,ignore
//! use tubeclock_cli::{CommandInterface, ConfigManager, DeviceContext, MemoryStore, Peripherals};
//!
//! let mut config = ConfigManager::new(MemoryStore::new());
//! let mut cli = CommandInterface::new();
//!
//! cli.receive(b"set bl_intensity 5\r\n");
//! let mut ctx = DeviceContext::new(&mut config, peripherals, &mut system);
//! cli.poll(&mut ctx, &mut uart)?; // writes "OK: bl_intensity set to 5\r\n"
//! ```

pub mod build_info;
mod codec;
mod commands;
mod config;
mod device;
mod dispatch;
mod error;
mod fields;
mod responses;
pub mod telemetry;

pub use codec::*;
pub use commands::*;
pub use config::*;
pub use device::*;
pub use dispatch::*;
pub use error::*;
pub use fields::*;
pub use responses::*;
