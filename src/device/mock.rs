//! Scripted device used by the unit tests.

use std::collections::VecDeque;

use super::radio::types::{RadioConfig, ReceivedPacket, SignalMetrics};
use super::radio::Radio;
use super::timer::Timer;
use super::Device;
use crate::irq::EventFlags;
use crate::status::{Diagnostic, Status};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Command {
    Initialize,
    ChannelScan,
    StartReceive,
    ReadPacket,
}

/// One issued command and whether the radio accepted it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Issued {
    pub command: Command,
    pub ok: bool,
}

#[derive(Debug, Default)]
pub(crate) struct MockRadio<'a> {
    pub log: Vec<Issued>,
    pub receive_timeouts: Vec<u16>,
    pub init: Option<Status>,
    pub scans: VecDeque<Status>,
    pub receives: VecDeque<Status>,
    pub reads: VecDeque<Result<Vec<u8>, Status>>,
    pub metrics: SignalMetrics,
    /// Raise a detected edge while this command executes, once.
    pub edge_during: Option<(Command, &'a EventFlags)>,
    /// Raise a timeout edge while this command executes, once.
    pub timeout_during: Option<(Command, &'a EventFlags)>,
}

impl MockRadio<'_> {
    pub fn commands(&self) -> Vec<Command> {
        self.log.iter().map(|issued| issued.command).collect()
    }

    fn issue(&mut self, command: Command, status: Status) -> Result<(), Status> {
        if let Some((edge_command, flags)) = self.edge_during {
            if edge_command == command {
                flags.on_detected();
                self.edge_during = None;
            }
        }
        if let Some((timeout_command, flags)) = self.timeout_during {
            if timeout_command == command {
                flags.on_timeout_signal();
                self.timeout_during = None;
            }
        }
        self.log.push(Issued { command, ok: status.is_ok() });
        match status {
            Status::Ok => Ok(()),
            failure => Err(failure),
        }
    }
}

impl Radio for MockRadio<'_> {
    type Error = Status;

    async fn initialize(&mut self, _config: &RadioConfig) -> Result<(), Self::Error> {
        let status = self.init.unwrap_or(Status::Ok);
        self.issue(Command::Initialize, status)
    }

    async fn start_channel_scan(&mut self) -> Result<(), Self::Error> {
        let status = self.scans.pop_front().unwrap_or(Status::Ok);
        self.issue(Command::ChannelScan, status)
    }

    async fn start_receive(&mut self, timeout_symbols: u16) -> Result<(), Self::Error> {
        self.receive_timeouts.push(timeout_symbols);
        let status = self.receives.pop_front().unwrap_or(Status::Ok);
        self.issue(Command::StartReceive, status)
    }

    async fn read_packet(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        match self.reads.pop_front().unwrap_or(Ok(Vec::new())) {
            Ok(payload) if payload.len() > buf.len() => {
                self.issue(Command::ReadPacket, Status::PacketTooLong).map(|_| 0)
            }
            Ok(payload) => {
                buf[..payload.len()].copy_from_slice(&payload);
                self.issue(Command::ReadPacket, Status::Ok).map(|_| payload.len())
            }
            Err(status) => self.issue(Command::ReadPacket, status).map(|_| 0),
        }
    }

    fn signal_metrics(&mut self) -> SignalMetrics {
        self.metrics
    }
}

#[derive(Debug, Default)]
pub(crate) struct MockTimer {
    pub delays: Vec<u64>,
}

impl Timer for MockTimer {
    async fn delay_ms(&mut self, millis: u64) {
        self.delays.push(millis);
    }
}

#[derive(Debug, Default)]
pub(crate) struct MockDevice<'a> {
    pub radio: MockRadio<'a>,
    pub timer: MockTimer,
    pub packets: Vec<(Vec<u8>, SignalMetrics)>,
    pub diagnostics: Vec<Diagnostic>,
}

impl<'a> Device for MockDevice<'a> {
    type Radio = MockRadio<'a>;
    type Timer = MockTimer;

    fn radio(&mut self) -> &mut Self::Radio {
        &mut self.radio
    }

    fn timer(&mut self) -> &mut Self::Timer {
        &mut self.timer
    }

    fn handle_packet(&mut self, packet: &ReceivedPacket<'_>) {
        self.packets.push((packet.payload.to_vec(), packet.metrics));
    }

    fn handle_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }
}
