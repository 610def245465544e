//! Build-time defaults and runtime settings of the receive loop.

use crate::device::radio::types::{Bandwidth, CodingRate, RadioConfig, SpreadingFactor};

/// Default carrier frequency in MHz.
pub const FREQUENCY_MHZ: f32 = 433.0;
/// Default bandwidth in kHz.
pub const BANDWIDTH_KHZ: f32 = 500.0;
/// Default spreading factor.
pub const SPREADING_FACTOR: u8 = 7;
/// Default coding rate denominator (4/5).
pub const CODING_RATE: u8 = 5;
/// Largest packet the receive buffer holds.
pub const MAX_PACKET_LENGTH: usize = 64;
/// Receive window opened after a preamble, in LoRa symbols.
pub const RX_TIMEOUT_SYMBOLS: u16 = 100;

/// Radio configuration built from the defaults above.
pub const fn default_radio_config() -> RadioConfig {
    RadioConfig::new(
        433_000_000,
        Bandwidth::_500KHz,
        SpreadingFactor::_7,
        CodingRate::_4_5,
    )
}

/// What the receive loop does with the channel busy/timeout line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TimeoutPolicy {
    /// Drop back to scanning whenever the timeout line fires.
    #[default]
    RestartScan,
    /// Leave the flag untouched and rely on the driver to end the receive.
    Ignore,
}

/// Runtime settings of the receive loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReceiverConfig {
    pub(crate) rx_timeout_symbols: u16,
    pub(crate) timeout_policy: TimeoutPolicy,
    pub(crate) idle_backoff_ms: u64,
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        Self {
            rx_timeout_symbols: RX_TIMEOUT_SYMBOLS,
            timeout_policy: TimeoutPolicy::default(),
            idle_backoff_ms: 0,
        }
    }
}

impl ReceiverConfig {
    /// Receive window length in symbols.
    pub fn with_rx_timeout_symbols(self, rx_timeout_symbols: u16) -> Self {
        Self { rx_timeout_symbols, ..self }
    }

    /// Handling of the timeout line.
    pub fn with_timeout_policy(self, timeout_policy: TimeoutPolicy) -> Self {
        Self { timeout_policy, ..self }
    }

    /// Wait between idle polls; zero polls without pausing.
    pub fn with_idle_backoff_ms(self, idle_backoff_ms: u64) -> Self {
        Self { idle_backoff_ms, ..self }
    }

    /// Receive window length in symbols.
    pub fn rx_timeout_symbols(&self) -> u16 {
        self.rx_timeout_symbols
    }

    /// Handling of the timeout line.
    pub fn timeout_policy(&self) -> TimeoutPolicy {
        self.timeout_policy
    }

    /// Wait between idle polls in milliseconds.
    pub fn idle_backoff_ms(&self) -> u64 {
        self.idle_backoff_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_parameter_constants() {
        let from_params =
            RadioConfig::from_params(FREQUENCY_MHZ, BANDWIDTH_KHZ, SPREADING_FACTOR, CODING_RATE)
                .unwrap();
        assert_eq!(from_params, default_radio_config());
    }

    #[test]
    fn receiver_defaults() {
        let config = ReceiverConfig::default();
        assert_eq!(config.rx_timeout_symbols(), 100);
        assert_eq!(config.timeout_policy(), TimeoutPolicy::RestartScan);
        assert_eq!(config.idle_backoff_ms(), 0);
    }

    #[test]
    fn builders_override_single_fields() {
        let config = ReceiverConfig::default()
            .with_timeout_policy(TimeoutPolicy::Ignore)
            .with_idle_backoff_ms(5);
        assert_eq!(config.timeout_policy(), TimeoutPolicy::Ignore);
        assert_eq!(config.idle_backoff_ms(), 5);
        assert_eq!(config.rx_timeout_symbols(), RX_TIMEOUT_SYMBOLS);
    }
}
