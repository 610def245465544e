//! Wrapper for all necessary functionality implemented by calling code.

pub mod packet_buffer;
pub mod radio;
pub mod timer;

#[cfg(test)]
pub(crate) mod mock;

use radio::types::ReceivedPacket;
use radio::Radio;
use timer::Timer;

use crate::status::Diagnostic;

#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[allow(missing_docs)]
pub enum Error<D>
where
    D: Device,
{
    Radio(<<D as Device>::Radio as Radio>::Error),
}
impl<D> From<Error<D>> for super::Error<D>
where
    D: Device,
{
    fn from(value: Error<D>) -> Self {
        Self::Device(value)
    }
}

/// Specification of receiver node functionality provided by the caller.
pub trait Device {
    /// Radio provided by the calling code.
    type Radio: Radio;
    /// Timer provided by the calling code.
    type Timer: Timer;

    /// Get the caller-supplied LoRa radio implementation.
    fn radio(&mut self) -> &mut Self::Radio;
    /// Get the caller-supplied timer implementation.
    fn timer(&mut self) -> &mut Self::Timer;
    /// Process a successfully decoded packet as directed by the caller.
    fn handle_packet(&mut self, _packet: &ReceivedPacket<'_>) {
        // default do nothing
    }
    /// Process a failed radio operation as directed by the caller.
    fn handle_diagnostic(&mut self, _diagnostic: Diagnostic) {
        // default do nothing
    }
}
