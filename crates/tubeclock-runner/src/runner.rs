//! The host poll loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use tracing::{debug, info};
use tubeclock_cli::{
    apply_all, ClockDisplay, CommandInterface, ConfigManager, ConfigStore, DeviceContext, System,
};

use crate::error::RunnerResult;
use crate::link::SerialLink;
use crate::sim::{HostSystem, SimHardware};

/// Runs the command interface against simulated hardware.
///
/// Each pass moves whatever the link received into the line reader and
/// handles at most one complete line.
pub struct Runner<S, L> {
    config: ConfigManager<S>,
    hardware: SimHardware,
    system: Box<dyn System>,
    link: L,
    interface: CommandInterface,
    poll_interval: Duration,
    started: bool,
}

impl<S: ConfigStore, L: SerialLink> Runner<S, L> {
    pub fn new(store: S, link: L, face_count: u8) -> Self {
        Runner {
            config: ConfigManager::new(store),
            hardware: SimHardware::new(face_count),
            system: Box::new(HostSystem),
            link,
            interface: CommandInterface::new(),
            poll_interval: Duration::from_millis(10),
            started: false,
        }
    }

    /// Replace the platform services (restart, delays).
    pub fn with_system(mut self, system: Box<dyn System>) -> Self {
        self.system = system;
        self
    }

    /// Sleep between idle passes.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Load the stored configuration and push it to the hardware, as the
    /// clock does at boot. Runs once; later calls do nothing.
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        let config = self.config.config();
        apply_all(config, &mut self.hardware.peripherals());
        info!(
            "Runner: started on face {} of {}",
            self.hardware.display.current_graphic,
            self.hardware.display.face_count()
        );
    }

    /// One pass. Returns whether a command was handled.
    pub fn poll_once(&mut self) -> RunnerResult<bool> {
        self.start();
        while let Some(data) = self.link.try_recv() {
            self.interface.receive(&data);
        }

        let mut ctx = DeviceContext::new(
            &mut self.config,
            self.hardware.peripherals(),
            self.system.as_mut(),
        );
        Ok(self.interface.poll(&mut ctx, &mut self.link)?)
    }

    /// Poll until `shutdown` is set or the link closes.
    pub fn run(&mut self, shutdown: &AtomicBool) -> RunnerResult<()> {
        self.start();
        while !shutdown.load(Ordering::Relaxed) {
            let handled = self.poll_once()?;
            if handled {
                continue;
            }
            if self.link.is_closed() {
                debug!("Runner: link closed");
                break;
            }
            thread::sleep(self.poll_interval);
        }
        info!("Runner: stopped");
        Ok(())
    }

    pub fn hardware(&self) -> &SimHardware {
        &self.hardware
    }

    pub fn config_manager(&mut self) -> &mut ConfigManager<S> {
        &mut self.config
    }

    pub fn link_mut(&mut self) -> &mut L {
        &mut self.link
    }
}
