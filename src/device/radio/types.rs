use crate::status::Status;

#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bandwidth {
    _7KHz,
    _10KHz,
    _15KHz,
    _20KHz,
    _31KHz,
    _41KHz,
    _62KHz,
    _125KHz,
    _250KHz,
    _500KHz,
}

impl Bandwidth {
    const TABLE: [(f32, Bandwidth); 10] = [
        (7.8, Bandwidth::_7KHz),
        (10.4, Bandwidth::_10KHz),
        (15.6, Bandwidth::_15KHz),
        (20.8, Bandwidth::_20KHz),
        (31.25, Bandwidth::_31KHz),
        (41.7, Bandwidth::_41KHz),
        (62.5, Bandwidth::_62KHz),
        (125.0, Bandwidth::_125KHz),
        (250.0, Bandwidth::_250KHz),
        (500.0, Bandwidth::_500KHz),
    ];

    /// Look up the bandwidth closest to `khz`, within 0.1 kHz.
    pub fn from_khz(khz: f32) -> Option<Self> {
        Self::TABLE.iter().find_map(|(nominal, bw)| {
            let diff = nominal - khz;
            let diff = if diff < 0.0 { -diff } else { diff };
            (diff < 0.1).then_some(*bw)
        })
    }

    /// Nominal bandwidth in kHz.
    pub fn khz(self) -> f32 {
        Self::TABLE.iter().find(|(_, bw)| *bw == self).map_or(0.0, |(khz, _)| *khz)
    }
}

/// Convert the bandwidth for use in the external lora-phy crate
impl From<Bandwidth> for lora_phy::mod_params::Bandwidth {
    fn from(bw: Bandwidth) -> Self {
        match bw {
            Bandwidth::_7KHz => lora_phy::mod_params::Bandwidth::_7KHz,
            Bandwidth::_10KHz => lora_phy::mod_params::Bandwidth::_10KHz,
            Bandwidth::_15KHz => lora_phy::mod_params::Bandwidth::_15KHz,
            Bandwidth::_20KHz => lora_phy::mod_params::Bandwidth::_20KHz,
            Bandwidth::_31KHz => lora_phy::mod_params::Bandwidth::_31KHz,
            Bandwidth::_41KHz => lora_phy::mod_params::Bandwidth::_41KHz,
            Bandwidth::_62KHz => lora_phy::mod_params::Bandwidth::_62KHz,
            Bandwidth::_125KHz => lora_phy::mod_params::Bandwidth::_125KHz,
            Bandwidth::_250KHz => lora_phy::mod_params::Bandwidth::_250KHz,
            Bandwidth::_500KHz => lora_phy::mod_params::Bandwidth::_500KHz,
        }
    }
}

#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpreadingFactor {
    _5,
    _6,
    _7,
    _8,
    _9,
    _10,
    _11,
    _12,
}

impl TryFrom<u8> for SpreadingFactor {
    type Error = Status;

    fn try_from(sf: u8) -> Result<Self, Self::Error> {
        match sf {
            5 => Ok(Self::_5),
            6 => Ok(Self::_6),
            7 => Ok(Self::_7),
            8 => Ok(Self::_8),
            9 => Ok(Self::_9),
            10 => Ok(Self::_10),
            11 => Ok(Self::_11),
            12 => Ok(Self::_12),
            _ => Err(Status::InvalidConfiguration),
        }
    }
}

/// Convert the spreading factor for use in the external lora-phy crate
impl From<SpreadingFactor> for lora_phy::mod_params::SpreadingFactor {
    fn from(sf: SpreadingFactor) -> Self {
        match sf {
            SpreadingFactor::_5 => lora_phy::mod_params::SpreadingFactor::_5,
            SpreadingFactor::_6 => lora_phy::mod_params::SpreadingFactor::_6,
            SpreadingFactor::_7 => lora_phy::mod_params::SpreadingFactor::_7,
            SpreadingFactor::_8 => lora_phy::mod_params::SpreadingFactor::_8,
            SpreadingFactor::_9 => lora_phy::mod_params::SpreadingFactor::_9,
            SpreadingFactor::_10 => lora_phy::mod_params::SpreadingFactor::_10,
            SpreadingFactor::_11 => lora_phy::mod_params::SpreadingFactor::_11,
            SpreadingFactor::_12 => lora_phy::mod_params::SpreadingFactor::_12,
        }
    }
}

#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodingRate {
    _4_5,
    _4_6,
    _4_7,
    _4_8,
}

/// Coding rate from its denominator, 5 through 8.
impl TryFrom<u8> for CodingRate {
    type Error = Status;

    fn try_from(cr: u8) -> Result<Self, Self::Error> {
        match cr {
            5 => Ok(Self::_4_5),
            6 => Ok(Self::_4_6),
            7 => Ok(Self::_4_7),
            8 => Ok(Self::_4_8),
            _ => Err(Status::InvalidConfiguration),
        }
    }
}

/// Convert the coding rate for use in the external lora-phy crate
impl From<CodingRate> for lora_phy::mod_params::CodingRate {
    fn from(cr: CodingRate) -> Self {
        match cr {
            CodingRate::_4_5 => lora_phy::mod_params::CodingRate::_4_5,
            CodingRate::_4_6 => lora_phy::mod_params::CodingRate::_4_6,
            CodingRate::_4_7 => lora_phy::mod_params::CodingRate::_4_7,
            CodingRate::_4_8 => lora_phy::mod_params::CodingRate::_4_8,
        }
    }
}

/// Modulation settings, fixed once the radio is initialized.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RadioConfig {
    /// Carrier frequency in Hz.
    pub frequency: u32,
    #[allow(missing_docs)]
    pub bandwidth: Bandwidth,
    #[allow(missing_docs)]
    pub spreading_factor: SpreadingFactor,
    #[allow(missing_docs)]
    pub coding_rate: CodingRate,
}

impl RadioConfig {
    /// Lowest carrier frequency accepted, in Hz.
    pub const MIN_FREQUENCY: u32 = 137_000_000;
    /// Highest carrier frequency accepted, in Hz.
    pub const MAX_FREQUENCY: u32 = 1_020_000_000;

    /// Creation.
    pub const fn new(
        frequency: u32,
        bandwidth: Bandwidth,
        spreading_factor: SpreadingFactor,
        coding_rate: CodingRate,
    ) -> Self {
        Self { frequency, bandwidth, spreading_factor, coding_rate }
    }

    /// Build from frequency in MHz, bandwidth in kHz, spreading factor and
    /// coding rate denominator.
    pub fn from_params(
        frequency_mhz: f32,
        bandwidth_khz: f32,
        spreading_factor: u8,
        coding_rate: u8,
    ) -> Result<Self, Status> {
        if !(frequency_mhz > 0.0 && frequency_mhz < 10_000.0) {
            return Err(Status::InvalidFrequency);
        }
        // Rounded to the nearest kHz; f32 cannot hold every Hz in the band.
        let khz = (f64::from(frequency_mhz) * 1000.0 + 0.5) as u32;
        let config = Self::new(
            khz * 1000,
            Bandwidth::from_khz(bandwidth_khz).ok_or(Status::InvalidConfiguration)?,
            SpreadingFactor::try_from(spreading_factor)?,
            CodingRate::try_from(coding_rate)?,
        );
        config.validate()?;
        Ok(config)
    }

    /// Check the carrier frequency against the supported band.
    pub fn validate(&self) -> Result<(), Status> {
        if (Self::MIN_FREQUENCY..=Self::MAX_FREQUENCY).contains(&self.frequency) {
            Ok(())
        } else {
            Err(Status::InvalidFrequency)
        }
    }
}

/// Link metrics of the most recently read packet.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SignalMetrics {
    /// Received signal strength in dBm.
    pub rssi: f32,
    /// Signal to noise ratio in dB.
    pub snr: f32,
    /// Carrier frequency error in Hz, 0.0 when the adapter does not measure it.
    pub frequency_error: f32,
}

impl SignalMetrics {
    /// Creation.
    pub fn new(rssi: f32, snr: f32, frequency_error: f32) -> SignalMetrics {
        SignalMetrics { rssi, snr, frequency_error }
    }
}

/// A successfully decoded packet as handed to the packet consumer.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReceivedPacket<'a> {
    /// Decoded payload bytes.
    pub payload: &'a [u8],
    /// Link metrics reported by the radio for this packet.
    pub metrics: SignalMetrics,
}

impl ReceivedPacket<'_> {
    /// Payload length in bytes.
    pub fn len(&self) -> usize {
        self.payload.len()
    }

    /// Whether the payload holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bandwidth_lookup_tolerates_rounding() {
        assert_eq!(Bandwidth::from_khz(500.0), Some(Bandwidth::_500KHz));
        assert_eq!(Bandwidth::from_khz(7.8), Some(Bandwidth::_7KHz));
        assert_eq!(Bandwidth::from_khz(31.25), Some(Bandwidth::_31KHz));
        assert_eq!(Bandwidth::from_khz(62.52), Some(Bandwidth::_62KHz));
        assert_eq!(Bandwidth::from_khz(300.0), None);
        assert_eq!(Bandwidth::_125KHz.khz(), 125.0);
    }

    #[test]
    fn spreading_factor_and_coding_rate_ranges() {
        assert_eq!(SpreadingFactor::try_from(7), Ok(SpreadingFactor::_7));
        assert_eq!(SpreadingFactor::try_from(13), Err(Status::InvalidConfiguration));
        assert_eq!(SpreadingFactor::try_from(4), Err(Status::InvalidConfiguration));
        assert_eq!(CodingRate::try_from(8), Ok(CodingRate::_4_8));
        assert_eq!(CodingRate::try_from(4), Err(Status::InvalidConfiguration));
    }

    #[test]
    fn from_params_converts_units() {
        let config = RadioConfig::from_params(868.1, 125.0, 9, 6).unwrap();
        assert_eq!(config.frequency, 868_100_000);
        assert_eq!(config.bandwidth, Bandwidth::_125KHz);
        assert_eq!(config.spreading_factor, SpreadingFactor::_9);
        assert_eq!(config.coding_rate, CodingRate::_4_6);
    }

    #[test]
    fn from_params_rejects_out_of_band_frequency() {
        assert_eq!(RadioConfig::from_params(100.0, 125.0, 7, 5), Err(Status::InvalidFrequency));
        assert_eq!(RadioConfig::from_params(f32::NAN, 125.0, 7, 5), Err(Status::InvalidFrequency));
        assert_eq!(RadioConfig::from_params(-433.0, 125.0, 7, 5), Err(Status::InvalidFrequency));
    }

    #[test]
    fn from_params_rejects_unknown_modulation() {
        assert_eq!(
            RadioConfig::from_params(433.0, 100.0, 7, 5),
            Err(Status::InvalidConfiguration)
        );
        assert_eq!(
            RadioConfig::from_params(433.0, 125.0, 7, 9),
            Err(Status::InvalidConfiguration)
        );
    }

    #[test]
    fn converts_into_phy_parameters() {
        assert!(matches!(
            lora_phy::mod_params::Bandwidth::from(Bandwidth::_500KHz),
            lora_phy::mod_params::Bandwidth::_500KHz
        ));
        assert!(matches!(
            lora_phy::mod_params::SpreadingFactor::from(SpreadingFactor::_12),
            lora_phy::mod_params::SpreadingFactor::_12
        ));
        assert!(matches!(
            lora_phy::mod_params::CodingRate::from(CodingRate::_4_7),
            lora_phy::mod_params::CodingRate::_4_7
        ));
    }
}
