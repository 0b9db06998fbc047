//! Host runner for the tube clock command interface.
//!
//! Runs the serial command interface from `tubeclock-cli` against simulated
//! backlight, clock and display hardware, with the device configuration
//! kept in a JSON file. The "serial port" is either stdio or a TCP port.

pub mod error;
pub mod link;
pub mod runner;
pub mod settings;
pub mod sim;
pub mod store;
pub mod uart_server;

pub use error::{RunnerError, RunnerResult};
pub use link::{ChannelLink, SerialLink, StdioLink};
pub use runner::Runner;
pub use settings::{RunnerSettings, TransportSettings};
pub use sim::{HostSystem, SimHardware, RESTART_EXIT_CODE};
pub use store::JsonFileStore;
pub use uart_server::TcpLink;
