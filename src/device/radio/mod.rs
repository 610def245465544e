pub mod phy;
pub mod types;
use core::fmt::Debug;
use types::*;

use crate::status::StatusCode;

/// A transceiver that can scan for preambles and receive single packets.
///
/// Each call may block on bus transactions but must not wait for radio
/// events; those are reported through the interrupt lines instead. Calls are
/// only ever issued from the receive loop, one at a time.
pub trait Radio: Sized {
    #[cfg(feature = "defmt")]
    type Error: Debug + StatusCode + defmt::Format;

    #[cfg(not(feature = "defmt"))]
    type Error: Debug + StatusCode;

    /// Bring the transceiver up with the given modulation settings.
    async fn initialize(&mut self, config: &RadioConfig) -> Result<(), Self::Error>;

    /// Start listening for a preamble without committing to a reception.
    async fn start_channel_scan(&mut self) -> Result<(), Self::Error>;

    /// Start a single reception that gives up after `timeout_symbols` symbols.
    async fn start_receive(&mut self, timeout_symbols: u16) -> Result<(), Self::Error>;

    /// Copy the received packet into `buf`, returning its length.
    async fn read_packet(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Link metrics of the last packet. Only meaningful right after a successful read.
    fn signal_metrics(&mut self) -> SignalMetrics;
}
