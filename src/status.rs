//! Driver status codes and their classification into fatal and recoverable conditions.

use core::fmt::Debug;

/// Raw status codes as reported by transceiver drivers.
///
/// Values follow RadioLib's `RADIOLIB_ERR_*` numbering. RadioLib has no
/// generic configuration error, so the invalid bandwidth, spreading factor
/// and coding rate codes all map to `Status::InvalidConfiguration`.
pub mod code {
    #![allow(missing_docs)]
    pub const NONE: i16 = 0;
    pub const UNKNOWN: i16 = -1;
    pub const CHIP_NOT_FOUND: i16 = -2;
    pub const PACKET_TOO_LONG: i16 = -4;
    pub const RX_TIMEOUT: i16 = -6;
    pub const CRC_MISMATCH: i16 = -7;
    pub const INVALID_BANDWIDTH: i16 = -8;
    pub const INVALID_SPREADING_FACTOR: i16 = -9;
    pub const INVALID_CODING_RATE: i16 = -10;
    pub const INVALID_FREQUENCY: i16 = -12;
    pub const INVALID_GAIN: i16 = -21;
}

/// Outcome of a single driver operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Status {
    /// The operation completed.
    Ok,
    /// Modulation parameters were rejected by the driver.
    InvalidConfiguration,
    /// No transceiver answered on the bus.
    ChipNotFound,
    /// Receiver gain setting was rejected.
    InvalidGain,
    /// Carrier frequency is outside the supported band.
    InvalidFrequency,
    /// Packet does not fit into the supplied buffer.
    PacketTooLong,
    /// Packet arrived with a failed integrity check.
    IntegrityMismatch,
    /// The receive window closed without a packet.
    RxTimeout,
    /// Any code without a dedicated meaning.
    Other(i16),
}

impl Status {
    /// Map a raw driver code onto a status.
    pub fn from_code(code: i16) -> Self {
        match code {
            code::NONE => Self::Ok,
            code::CHIP_NOT_FOUND => Self::ChipNotFound,
            code::PACKET_TOO_LONG => Self::PacketTooLong,
            code::RX_TIMEOUT => Self::RxTimeout,
            code::CRC_MISMATCH => Self::IntegrityMismatch,
            code::INVALID_BANDWIDTH
            | code::INVALID_SPREADING_FACTOR
            | code::INVALID_CODING_RATE => Self::InvalidConfiguration,
            code::INVALID_FREQUENCY => Self::InvalidFrequency,
            code::INVALID_GAIN => Self::InvalidGain,
            other => Self::Other(other),
        }
    }

    /// Raw driver code of this status.
    pub fn code(self) -> i16 {
        match self {
            Self::Ok => code::NONE,
            Self::InvalidConfiguration => code::INVALID_BANDWIDTH,
            Self::ChipNotFound => code::CHIP_NOT_FOUND,
            Self::InvalidGain => code::INVALID_GAIN,
            Self::InvalidFrequency => code::INVALID_FREQUENCY,
            Self::PacketTooLong => code::PACKET_TOO_LONG,
            Self::IntegrityMismatch => code::CRC_MISMATCH,
            Self::RxTimeout => code::RX_TIMEOUT,
            Self::Other(code) => code,
        }
    }

    /// Short human readable description.
    pub fn description(self) -> &'static str {
        match self {
            Self::Ok => "success",
            Self::InvalidConfiguration => "invalid modulation configuration",
            Self::ChipNotFound => "radio module not found",
            Self::InvalidGain => "invalid gain",
            Self::InvalidFrequency => "invalid frequency",
            Self::PacketTooLong => "packet too long",
            Self::IntegrityMismatch => "CRC mismatch",
            Self::RxTimeout => "receive timeout",
            Self::Other(_) => "unknown error",
        }
    }

    /// Whether the status reports success.
    pub fn is_ok(self) -> bool {
        self == Self::Ok
    }
}

impl From<i16> for Status {
    fn from(code: i16) -> Self {
        Self::from_code(code)
    }
}

/// Implemented by every driver error so it can be classified uniformly.
pub trait StatusCode {
    /// Status equivalent of this error.
    fn status(&self) -> Status;
}

impl StatusCode for Status {
    fn status(&self) -> Status {
        *self
    }
}

/// Driver operation a status was reported for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[allow(missing_docs)]
pub enum Phase {
    Initialization,
    ChannelScan,
    StartReceive,
    ReadPacket,
    ReceiveWindow,
}

/// How a failed operation affects the duty cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Severity {
    /// The process cannot continue.
    Fatal,
    /// Reported, then retried on a later cycle.
    Recoverable,
}

/// Record of a failed driver operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Diagnostic {
    /// Operation that failed.
    pub phase: Phase,
    /// Status the driver reported.
    pub status: Status,
    /// Consequence for the duty cycle.
    pub severity: Severity,
}

impl Diagnostic {
    /// Whether this diagnostic ends the process.
    pub fn is_fatal(&self) -> bool {
        self.severity == Severity::Fatal
    }
}

/// Classify the status of a driver operation.
///
/// Returns `None` for success. Every failure during initialization is fatal;
/// runtime failures, unknown codes included, never are.
pub fn classify(phase: Phase, status: Status) -> Option<Diagnostic> {
    if status.is_ok() {
        return None;
    }
    let severity = match phase {
        Phase::Initialization => Severity::Fatal,
        Phase::ChannelScan | Phase::StartReceive | Phase::ReadPacket | Phase::ReceiveWindow => {
            Severity::Recoverable
        }
    };
    Some(Diagnostic { phase, status, severity })
}

/// Classify the outcome of a driver call that returned a `Result`.
pub fn classify_result<T, E>(phase: Phase, result: &Result<T, E>) -> Option<Diagnostic>
where
    E: StatusCode + Debug,
{
    match result {
        Ok(_) => None,
        // An adapter reporting `Ok` inside an error is still a failure.
        Err(e) => match e.status() {
            Status::Ok => classify(phase, Status::Other(code::UNKNOWN)),
            status => classify(phase, status),
        },
    }
}
