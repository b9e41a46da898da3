#![allow(missing_docs)]
use bilge::prelude::*;

/// Register addresses
#[derive(Debug, PartialEq, PartialOrd)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Register {
    /// Temperature register address.
    Temperature,

    /// Configuration register address.
    Configuration,

    /// Temperature low limit register address.
    LowLimit,

    /// Temperature high limit register address.
    HighLimit,

    /// Device ID register address.
    DeviceId,
}

impl From<Register> for u8 {
    fn from(reg: Register) -> Self {
        match reg {
            Register::Temperature => 0x00,
            Register::Configuration => 0x01,
            Register::LowLimit => 0x02,
            Register::HighLimit => 0x03,
            Register::DeviceId => 0x0f,
        }
    }
}

/// Value of the shadow configuration register until it is loaded from the
/// device.
pub const CONFIGURATION_UNINITIALIZED: u16 = 0x00ff;

/// Fields of the configuration register.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Field {
    /// One-shot conversion trigger, always reads back as 0.
    OneShot,

    /// Conversion rate (two bits).
    Rate,

    /// Consecutive faults until alert (two bits).
    Faults,

    /// Alert polarity.
    Polarity,

    /// Thermostat mode.
    ThermostatMode,

    /// Shutdown.
    Shutdown,
}

impl Field {
    /// Bit offset of the field's least significant bit.
    #[must_use]
    pub fn offset(self) -> u16 {
        match self {
            Self::OneShot => 7,
            Self::Rate => 5,
            Self::Faults => 3,
            Self::Polarity => 2,
            Self::ThermostatMode => 1,
            Self::Shutdown => 0,
        }
    }

    /// Mask of the field's value once shifted down to bit 0.
    #[must_use]
    pub fn width_mask(self) -> u16 {
        match self {
            Self::Rate | Self::Faults => 0b11,
            _ => 0b1,
        }
    }

    /// Mask of the bits cleared before a new value is shifted in.
    ///
    /// Two-bit fields use decimal 11 (`0b1011`): besides the field itself
    /// this clears the bit three positions above the offset, i.e. bit 8 for
    /// [`Field::Rate`] and bit 6 (the upper rate bit) for [`Field::Faults`].
    #[must_use]
    pub fn clear_mask(self) -> u16 {
        match self {
            Self::Rate | Self::Faults => 11,
            _ => 1,
        }
    }

    /// Extract the field from a raw configuration value.
    #[must_use]
    pub fn get(self, config: u16) -> u16 {
        (config >> self.offset()) & self.width_mask()
    }

    /// Return `config` with the field replaced by `value`.
    #[must_use]
    pub fn replace(self, config: u16, value: u16) -> u16 {
        (config & !(self.clear_mask() << self.offset())) | ((value & self.width_mask()) << self.offset())
    }
}

/// Configuration register.
#[bitsize(16)]
#[derive(Clone, Copy, DebugBits, FromBits, PartialEq)]
pub struct Configuration {
    /// Shutdown mode
    pub sd: bool,

    /// Thermostat mode
    pub tm: ThermostatMode,

    /// Alert polarity
    pub pol: Polarity,

    /// Consecutive faults until alert
    pub faults: ConsecutiveFaults,

    /// Conversion rate
    pub rate: ConversionTime,

    /// One-shot conversion
    pub os: bool,

    reserved8_15: u8,
}

impl Configuration {
    /// Configure shutdown mode.
    #[must_use]
    pub fn with_sd(mut self, shutdown: bool) -> Self {
        self.set_sd(shutdown);
        self
    }

    /// Configure thermostat mode.
    #[must_use]
    pub fn with_tm(mut self, mode: ThermostatMode) -> Self {
        self.set_tm(mode);
        self
    }

    /// Configure alert polarity.
    #[must_use]
    pub fn with_pol(mut self, polarity: Polarity) -> Self {
        self.set_pol(polarity);
        self
    }

    /// Configure consecutive faults until alert.
    #[must_use]
    pub fn with_faults(mut self, faults: ConsecutiveFaults) -> Self {
        self.set_faults(faults);
        self
    }

    /// Configure conversion rate.
    #[must_use]
    pub fn with_rate(mut self, rate: ConversionTime) -> Self {
        self.set_rate(rate);
        self
    }

    /// Configure one-shot conversion.
    #[must_use]
    pub fn with_os(mut self, one_shot: bool) -> Self {
        self.set_os(one_shot);
        self
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Configuration {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Configuration({=u16:#06x})", u16::from(*self));
    }
}

/// Thermostat mode.
#[bitsize(1)]
#[derive(Debug, FromBits, PartialEq, PartialOrd)]
pub enum ThermostatMode {
    /// Comparator mode for the thermostat.
    Comparator,

    /// Interrupt mode for the thermostat.
    Interrupt,
}

/// Polarity
#[bitsize(1)]
#[derive(Debug, FromBits, PartialEq, PartialOrd)]
pub enum Polarity {
    /// Active low (default).
    ActiveLow,

    /// Active high.
    ActiveHigh,
}

/// Conversion time.
#[bitsize(2)]
#[derive(Debug, FromBits, PartialEq, PartialOrd)]
pub enum ConversionTime {
    /// 27.5ms conversion time.
    Ms27_5,

    /// 55ms conversion time.
    Ms55,

    /// 110ms conversion time.
    Ms110,

    /// 220ms conversion time.
    Ms220,
}

impl ConversionTime {
    /// Duration of one conversion in microseconds.
    #[must_use]
    pub fn micros(&self) -> u32 {
        match self {
            Self::Ms27_5 => 27_500,
            Self::Ms55 => 55_000,
            Self::Ms110 => 110_000,
            Self::Ms220 => 220_000,
        }
    }
}

impl From<ConversionTime> for u16 {
    fn from(rate: ConversionTime) -> Self {
        match rate {
            ConversionTime::Ms27_5 => 0b00,
            ConversionTime::Ms55 => 0b01,
            ConversionTime::Ms110 => 0b10,
            ConversionTime::Ms220 => 0b11,
        }
    }
}

/// Consecutive faults before the alert is raised.
#[bitsize(2)]
#[derive(Debug, FromBits, PartialEq, PartialOrd)]
pub enum ConsecutiveFaults {
    /// 1 fault.
    One,

    /// 2 faults.
    Two,

    /// 3 faults.
    Three,

    /// 4 faults.
    Four,
}

impl From<ConsecutiveFaults> for u16 {
    fn from(faults: ConsecutiveFaults) -> Self {
        match faults {
            ConsecutiveFaults::One => 0b00,
            ConsecutiveFaults::Two => 0b01,
            ConsecutiveFaults::Three => 0b10,
            ConsecutiveFaults::Four => 0b11,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_pointers() {
        assert_eq!(u8::from(Register::Temperature), 0x00);
        assert_eq!(u8::from(Register::Configuration), 0x01);
        assert_eq!(u8::from(Register::LowLimit), 0x02);
        assert_eq!(u8::from(Register::HighLimit), 0x03);
        assert_eq!(u8::from(Register::DeviceId), 0x0f);
    }

    #[test]
    fn decode_uninitialized_configuration() {
        let cfg = Configuration::from(CONFIGURATION_UNINITIALIZED);
        assert!(cfg.sd());
        assert_eq!(cfg.tm(), ThermostatMode::Interrupt);
        assert_eq!(cfg.pol(), Polarity::ActiveHigh);
        assert_eq!(cfg.faults(), ConsecutiveFaults::Four);
        assert_eq!(cfg.rate(), ConversionTime::Ms220);
        assert!(cfg.os());
    }

    #[test]
    fn modify_shutdown() {
        let cfg = Configuration::from(0x0000).with_sd(true);
        assert_eq!(u16::from(cfg), 0x0001);
    }

    #[test]
    fn modify_thermostat_mode() {
        let cfg = Configuration::from(0x0000).with_tm(ThermostatMode::Interrupt);
        assert_eq!(u16::from(cfg), 0x0002);
    }

    #[test]
    fn modify_polarity() {
        let cfg = Configuration::from(0x0000).with_pol(Polarity::ActiveHigh);
        assert_eq!(u16::from(cfg), 0x0004);
    }

    #[test]
    fn modify_faults() {
        let cfg = Configuration::from(0x0000).with_faults(ConsecutiveFaults::Three);
        assert_eq!(u16::from(cfg), 0x0010);
    }

    #[test]
    fn modify_rate() {
        let cfg = Configuration::from(0x0000).with_rate(ConversionTime::Ms110);
        assert_eq!(u16::from(cfg), 0x0040);
    }

    #[test]
    fn modify_one_shot() {
        let cfg = Configuration::from(0x0000).with_os(true);
        assert_eq!(u16::from(cfg), 0x0080);
    }

    #[test]
    fn field_layout_matches_bitfield() {
        let raw = 0x00b5;
        let cfg = Configuration::from(raw);
        assert_eq!(Field::Shutdown.get(raw), u16::from(cfg.sd()));
        assert_eq!(Field::Polarity.get(raw), 1);
        assert_eq!(Field::Faults.get(raw), u16::from(cfg.faults()));
        assert_eq!(Field::Rate.get(raw), u16::from(cfg.rate()));
        assert_eq!(Field::OneShot.get(raw), 1);
    }

    #[test]
    fn replace_single_bit_fields() {
        assert_eq!(Field::Shutdown.replace(0x00fe, 1), 0x00ff);
        assert_eq!(Field::ThermostatMode.replace(0x00ff, 0), 0x00fd);
        assert_eq!(Field::Polarity.replace(0x0000, 1), 0x0004);
    }

    #[test]
    fn replace_rate_also_clears_bit_8() {
        assert_eq!(Field::Rate.replace(0x0100, 0b11), 0x0060);
        assert_eq!(Field::Rate.replace(0x001f, 0b01), 0x003f);
    }

    #[test]
    fn replace_faults_also_clears_upper_rate_bit() {
        assert_eq!(Field::Faults.replace(0x0040, 0b01), 0x0008);
        assert_eq!(Field::Faults.replace(0x0027, 0b10), 0x0037);
    }
}
