//! Receive state machine: scan for a preamble, receive the packet, hand it over, scan again.
//!
//! The machine is driven by polling [`EventFlags`]. Each poll consumes the
//! flags it acts on before issuing any radio command, so an edge raised while
//! a command is in flight stays pending for the next poll. Radio commands are
//! issued strictly one after another from the polling context.

use core::convert::Infallible;

use crate::config::{ReceiverConfig, TimeoutPolicy, MAX_PACKET_LENGTH};
use crate::device::packet_buffer::PacketBuffer;
use crate::device::radio::types::{RadioConfig, ReceivedPacket};
use crate::device::radio::Radio;
use crate::device::timer::Timer;
use crate::device::{self, Device};
use crate::irq::EventFlags;
use crate::status::{classify, classify_result, Diagnostic, Phase, Status};
use crate::Error;


/// What the radio is currently doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RadioMode {
    /// Listening for a preamble, no packet in flight.
    #[default]
    ScanningChannel,
    /// Preamble seen, reception running with a bounded timeout.
    AwaitingPacket,
}

/// Result of a single poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Activity {
    /// No flag was raised.
    Idle,
    /// A detected edge was processed.
    Detected,
    /// A timeout edge was processed.
    Timeout,
}

/// Counters kept over the lifetime of a receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReceiverStats {
    /// Packets handed to the consumer.
    pub packets: u32,
    /// Packets dropped on a failed integrity check.
    pub integrity_errors: u32,
    /// Any other failed radio command.
    pub driver_errors: u32,
    /// Receptions the radio accepted.
    pub receives_started: u32,
    /// Channel scans the radio accepted.
    pub scans_started: u32,
    /// Timeout edges acted upon.
    pub timeouts: u32,
}

/// The receive state machine.
pub struct Receiver<const N: usize = MAX_PACKET_LENGTH> {
    mode: RadioMode,
    config: ReceiverConfig,
    buffer: PacketBuffer<N>,
    stats: ReceiverStats,
}

impl<const N: usize> Receiver<N> {
    /// Initialize the radio and start the first channel scan.
    ///
    /// Fails only when the configuration is invalid or the radio rejects
    /// initialization. A failed first scan is reported and left for the
    /// next detected edge to retry.
    pub async fn start<D: Device>(
        device: &mut D,
        radio_config: &RadioConfig,
        config: ReceiverConfig,
    ) -> Result<Self, Error<D>> {
        info!("Initializing radio {}", radio_config);
        if let Err(status) = radio_config.validate() {
            if let Some(diagnostic) = classify(Phase::Initialization, status) {
                report(device, diagnostic);
            }
            return Err(Error::Configuration(status));
        }

        let result = device.radio().initialize(radio_config).await;
        if let Some(diagnostic) = classify_result(Phase::Initialization, &result) {
            report(device, diagnostic);
        }
        result.map_err(device::Error::<D>::Radio)?;
        info!("Radio initialized");

        let mut receiver = Self {
            mode: RadioMode::ScanningChannel,
            config,
            buffer: PacketBuffer::new(),
            stats: ReceiverStats::default(),
        };
        receiver.restart_scan(device).await;
        Ok(receiver)
    }

    /// Current radio mode.
    pub fn mode(&self) -> RadioMode {
        self.mode
    }

    /// Settings this receiver runs with.
    pub fn config(&self) -> &ReceiverConfig {
        &self.config
    }

    /// Lifetime counters.
    pub fn stats(&self) -> &ReceiverStats {
        &self.stats
    }

    /// Run one iteration of the state machine.
    pub async fn poll<D: Device>(&mut self, device: &mut D, flags: &EventFlags) -> Activity {
        let watch_timeout = self.config.timeout_policy == TimeoutPolicy::RestartScan;
        if flags.take_detected() {
            if watch_timeout && flags.take_timeout() {
                trace!("Timeout edge superseded by detected edge");
            }
            self.on_detected(device, flags).await;
            Activity::Detected
        } else if watch_timeout && flags.take_timeout() {
            self.on_timeout(device).await;
            Activity::Timeout
        } else {
            Activity::Idle
        }
    }

    /// Poll once, then back off if nothing happened and a backoff is configured.
    pub async fn tick<D: Device>(&mut self, device: &mut D, flags: &EventFlags) -> Activity {
        let activity = self.poll(device, flags).await;
        if activity == Activity::Idle && self.config.idle_backoff_ms > 0 {
            device.timer().delay_ms(self.config.idle_backoff_ms).await;
        }
        activity
    }

    /// Poll forever.
    pub async fn run<D: Device>(&mut self, device: &mut D, flags: &EventFlags) -> Infallible {
        loop {
            self.tick(device, flags).await;
        }
    }

    async fn on_detected<D: Device>(&mut self, device: &mut D, flags: &EventFlags) {
        let preamble = match self.mode {
            RadioMode::AwaitingPacket => {
                self.read_packet(device).await;
                self.mode = RadioMode::ScanningChannel;
                // An edge raised during the read is a new preamble.
                flags.take_detected()
            }
            RadioMode::ScanningChannel => true,
        };

        if preamble {
            // Timeout edges raised before the window opens belong to the
            // previous scan or reception.
            let watch_timeout = self.config.timeout_policy == TimeoutPolicy::RestartScan;
            if watch_timeout && flags.take_timeout() {
                trace!("Stale timeout edge dropped");
            }
            self.start_receive(device).await;
            if watch_timeout && self.mode == RadioMode::AwaitingPacket && flags.take_timeout() {
                trace!("Timeout edge raised while opening the receive window dropped");
            }
        }
        if self.mode == RadioMode::ScanningChannel {
            self.restart_scan(device).await;
        }
    }

    async fn on_timeout<D: Device>(&mut self, device: &mut D) {
        self.stats.timeouts += 1;
        match self.mode {
            RadioMode::AwaitingPacket => {
                if let Some(diagnostic) = classify(Phase::ReceiveWindow, Status::RxTimeout) {
                    report(device, diagnostic);
                }
                self.mode = RadioMode::ScanningChannel;
            }
            RadioMode::ScanningChannel => trace!("Scan ended without preamble"),
        }
        self.restart_scan(device).await;
    }

    async fn read_packet<D: Device>(&mut self, device: &mut D) {
        self.buffer.clear();
        let result = device.radio().read_packet(self.buffer.as_raw_slice()).await;
        let diagnostic = match &result {
            Ok(len) if *len > N => classify(Phase::ReadPacket, Status::PacketTooLong),
            _ => classify_result(Phase::ReadPacket, &result),
        };
        if let Some(diagnostic) = diagnostic {
            if let Err(e) = &result {
                debug!("Read failed {:?}", e);
            }
            if diagnostic.status == Status::IntegrityMismatch {
                self.stats.integrity_errors += 1;
            } else {
                self.stats.driver_errors += 1;
            }
            report(device, diagnostic);
            return;
        }
        let Ok(len) = result else {
            return;
        };

        self.buffer.set_len(len);
        let metrics = device.radio().signal_metrics();
        let packet = ReceivedPacket { payload: self.buffer.as_ref(), metrics };
        info!(
            "Received packet: {} bytes, RSSI {} dBm, SNR {} dB, frequency error {} Hz",
            packet.len(),
            metrics.rssi,
            metrics.snr,
            metrics.frequency_error
        );
        self.stats.packets += 1;
        device.handle_packet(&packet);
    }

    async fn start_receive<D: Device>(&mut self, device: &mut D) {
        debug!("Preamble detected, starting reception");
        let result = device.radio().start_receive(self.config.rx_timeout_symbols).await;
        match classify_result(Phase::StartReceive, &result) {
            None => {
                self.stats.receives_started += 1;
                self.mode = RadioMode::AwaitingPacket;
            }
            Some(diagnostic) => {
                self.stats.driver_errors += 1;
                report(device, diagnostic);
            }
        }
    }

    async fn restart_scan<D: Device>(&mut self, device: &mut D) {
        let result = device.radio().start_channel_scan().await;
        match classify_result(Phase::ChannelScan, &result) {
            None => {
                self.stats.scans_started += 1;
                trace!("Scanning for preamble");
            }
            Some(diagnostic) => {
                self.stats.driver_errors += 1;
                report(device, diagnostic);
            }
        }
    }
}

fn report<D: Device>(device: &mut D, diagnostic: Diagnostic) {
    if diagnostic.is_fatal() {
        error!(
            "{} failed: {} (code {})",
            diagnostic.phase,
            diagnostic.status.description(),
            diagnostic.status.code()
        );
    } else {
        warn!(
            "{} failed: {} (code {})",
            diagnostic.phase,
            diagnostic.status.description(),
            diagnostic.status.code()
        );
    }
    device.handle_diagnostic(diagnostic);
}

/// Initialize the radio and run the receive loop for the lifetime of the process.
///
/// Returns only if initialization fails; no flag is polled in that case.
pub async fn run<D: Device, const N: usize>(
    device: &mut D,
    flags: &EventFlags,
    radio_config: &RadioConfig,
    config: ReceiverConfig,
) -> Result<Infallible, Error<D>> {
    let mut receiver = Receiver::<N>::start(device, radio_config, config).await?;
    Ok(receiver.run(device, flags).await)
}
