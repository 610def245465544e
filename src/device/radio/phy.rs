//! [`Radio`] implementation on top of the lora-phy crate.

use embedded_hal_async::delay::DelayNs;
use lora_phy::mod_params::{ModulationParams, PacketParams, RadioError, RxMode};
use lora_phy::mod_traits::RadioKind;
use lora_phy::LoRa;

use super::types::{RadioConfig, SignalMetrics};
use super::Radio;
use crate::status::{code, Status, StatusCode};

/// Preamble length in symbols expected from transmitters.
const PREAMBLE_LENGTH: u16 = 8;

#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[allow(missing_docs)]
pub enum PhyError {
    /// An operation was attempted before `initialize`.
    Uninitialized,
    Phy(RadioError),
}

impl From<RadioError> for PhyError {
    fn from(value: RadioError) -> Self {
        Self::Phy(value)
    }
}

impl StatusCode for PhyError {
    fn status(&self) -> Status {
        match self {
            Self::Uninitialized => Status::InvalidConfiguration,
            Self::Phy(RadioError::CRCErrorOnReceive) => Status::IntegrityMismatch,
            Self::Phy(RadioError::ReceiveTimeout) => Status::RxTimeout,
            Self::Phy(RadioError::PayloadSizeMismatch(_, _)) => Status::PacketTooLong,
            Self::Phy(RadioError::UnavailableSpreadingFactor)
            | Self::Phy(RadioError::UnavailableBandwidth) => Status::InvalidConfiguration,
            Self::Phy(RadioError::Reset) => Status::ChipNotFound,
            Self::Phy(_) => Status::Other(code::UNKNOWN),
        }
    }
}

struct Params {
    modulation: ModulationParams,
    packet: PacketParams,
}

/// Driver adapter wrapping an initialized [`LoRa`] instance.
///
/// lora-phy reports RSSI and SNR only, so [`SignalMetrics::frequency_error`]
/// is always 0.0 for packets read through this adapter.
pub struct PhyRadio<RK, DLY, const N: usize>
where
    RK: RadioKind,
    DLY: DelayNs,
{
    lora: LoRa<RK, DLY>,
    params: Option<Params>,
    metrics: SignalMetrics,
}

impl<RK, DLY, const N: usize> PhyRadio<RK, DLY, N>
where
    RK: RadioKind,
    DLY: DelayNs,
{
    /// Wrap a radio; parameters are set up by [`Radio::initialize`].
    pub fn new(lora: LoRa<RK, DLY>) -> Self {
        Self { lora, params: None, metrics: SignalMetrics::default() }
    }

    /// Give the wrapped radio back.
    pub fn release(self) -> LoRa<RK, DLY> {
        self.lora
    }
}

impl<RK, DLY, const N: usize> Radio for PhyRadio<RK, DLY, N>
where
    RK: RadioKind,
    DLY: DelayNs,
{
    type Error = PhyError;

    async fn initialize(&mut self, config: &RadioConfig) -> Result<(), Self::Error> {
        let modulation = self.lora.create_modulation_params(
            config.spreading_factor.into(),
            config.bandwidth.into(),
            config.coding_rate.into(),
            config.frequency,
        )?;
        let max_payload = u8::try_from(N).unwrap_or(u8::MAX);
        let packet = self.lora.create_rx_packet_params(
            PREAMBLE_LENGTH,
            false,
            max_payload,
            true,
            false,
            &modulation,
        )?;
        self.params = Some(Params { modulation, packet });
        Ok(())
    }

    async fn start_channel_scan(&mut self) -> Result<(), Self::Error> {
        let params = self.params.as_ref().ok_or(PhyError::Uninitialized)?;
        self.lora.prepare_for_cad(&params.modulation).await?;
        Ok(())
    }

    async fn start_receive(&mut self, timeout_symbols: u16) -> Result<(), Self::Error> {
        let params = self.params.as_ref().ok_or(PhyError::Uninitialized)?;
        self.lora
            .prepare_for_rx(RxMode::Single(timeout_symbols), &params.modulation, &params.packet)
            .await?;
        Ok(())
    }

    async fn read_packet(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let params = self.params.as_ref().ok_or(PhyError::Uninitialized)?;
        let (len, status) = self.lora.rx(&params.packet, buf).await?;
        self.metrics = SignalMetrics::new(f32::from(status.rssi), f32::from(status.snr), 0.0);
        Ok(usize::from(len))
    }

    fn signal_metrics(&mut self) -> SignalMetrics {
        self.metrics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phy_errors_map_to_status() {
        assert_eq!(PhyError::Phy(RadioError::CRCErrorOnReceive).status(), Status::IntegrityMismatch);
        assert_eq!(PhyError::Phy(RadioError::ReceiveTimeout).status(), Status::RxTimeout);
        assert_eq!(PhyError::Phy(RadioError::PayloadSizeMismatch(64, 80)).status(), Status::PacketTooLong);
        assert_eq!(PhyError::Phy(RadioError::Reset).status(), Status::ChipNotFound);
        assert_eq!(PhyError::Uninitialized.status(), Status::InvalidConfiguration);
        assert_eq!(PhyError::Phy(RadioError::SPI).status(), Status::Other(code::UNKNOWN));
    }
}
