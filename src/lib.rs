//! This is a platform-agnostic Rust driver for the TMP1075 temperature sensor
//! based on the [`embedded-hal`] traits.
//!
//! [`embedded-hal`]: https://docs.rs/embedded-hal
//!
//! For further details of the device architecture and operation, please refer
//! to the official [`Datasheet`].
//!
//! [`Datasheet`]: https://www.ti.com/lit/gpn/tmp1075

#![doc(html_root_url = "https://docs.rs/tmp1075/latest")]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(test), no_std)]

mod registers;
pub use registers::*;

#[cfg(feature = "async")]
pub mod asynchronous;

pub mod blocking;

#[cfg(feature = "embedded-sensors-hal")]
use embedded_sensors_hal::sensor;
#[cfg(all(feature = "embedded-sensors-hal-async", not(feature = "embedded-sensors-hal")))]
use embedded_sensors_hal_async::sensor;

/// Temperature step of one bit in the upper 12 bits of a raw register.
pub const CELSIUS_PER_BIT: f32 = 0.0625;

/// Power-on value of the low limit register (75 °C).
pub const LOW_LIMIT_DEFAULT: i16 = 0x4b00;

/// Power-on value of the high limit register (80 °C).
pub const HIGH_LIMIT_DEFAULT: i16 = 0x5000;

/// Address pin logic level representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    /// Pin tied to GND (default).
    #[default]
    Gnd,
    /// Pin tied to V+.
    Vplus,
}

/// Strapping of the A2, A1 and A0 pins, selecting one of eight addresses
/// between `0x48` and `0x4f`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Address {
    /// A2 pin level.
    pub a2: Level,
    /// A1 pin level.
    pub a1: Level,
    /// A0 pin level.
    pub a0: Level,
}

impl From<Address> for u8 {
    fn from(pins: Address) -> Self {
        let bit = |level: Level| u8::from(level == Level::Vplus);
        0b100_1000 | bit(pins.a2) << 2 | bit(pins.a1) << 1 | bit(pins.a0)
    }
}

/// Tmp1075 Errors
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// I2C Bus Error
    Bus(E),
    /// Other Error
    Other,
}

#[cfg(any(feature = "embedded-sensors-hal", feature = "embedded-sensors-hal-async"))]
impl<E: embedded_hal::i2c::Error> sensor::Error for Error<E> {
    fn kind(&self) -> sensor::ErrorKind {
        match *self {
            Self::Bus(_) => sensor::ErrorKind::Peripheral,
            Self::Other => sensor::ErrorKind::Other,
        }
    }
}

/// Convert a raw temperature register value to degrees Celsius.
#[must_use]
pub fn convert_to_celsius(raw: i16) -> f32 {
    CELSIUS_PER_BIT * f32::from(raw) / 16.0
}

/// Convert degrees Celsius to a raw temperature register value.
///
/// The result is truncated toward zero and saturates at the `i16` bounds.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn convert_from_celsius(celsius: f32) -> i16 {
    (celsius * 16.0 / CELSIUS_PER_BIT) as i16
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;

    use super::*;

    #[test]
    fn address_pins_map_to_address() {
        assert_eq!(u8::from(Address::default()), 0x48);

        let pins = Address {
            a2: Level::Gnd,
            a1: Level::Gnd,
            a0: Level::Vplus,
        };
        assert_eq!(u8::from(pins), 0x49);

        let pins = Address {
            a2: Level::Vplus,
            a1: Level::Gnd,
            a0: Level::Gnd,
        };
        assert_eq!(u8::from(pins), 0x4c);

        let pins = Address {
            a2: Level::Vplus,
            a1: Level::Vplus,
            a0: Level::Vplus,
        };
        assert_eq!(u8::from(pins), 0x4f);
    }

    #[test]
    fn raw_to_celsius() {
        let raws = [0x7ff0, 0x6400, 0x1910, 0x0040, 0x0000, -0x0040, -0x1900, i16::MIN];
        let temps = [127.9375, 100.0, 25.0625, 0.25, 0.0, -0.25, -25.0, -128.0];

        for (r, t) in raws.iter().zip(temps.iter()) {
            assert_approx_eq!(convert_to_celsius(*r), *t, 1e-6);
        }
    }

    #[test]
    fn celsius_to_raw_truncates() {
        assert_eq!(convert_from_celsius(-55.0), -0x3700);
        // 0.001 °C is below one raw step.
        assert_eq!(convert_from_celsius(0.001), 0);
        assert_eq!(convert_from_celsius(-0.001), 0);
        assert_eq!(convert_from_celsius(1000.0), i16::MAX);
        assert_eq!(convert_from_celsius(-1000.0), i16::MIN);
    }

    #[test]
    fn default_limits() {
        assert_approx_eq!(convert_to_celsius(LOW_LIMIT_DEFAULT), 75.0, 1e-6);
        assert_approx_eq!(convert_to_celsius(HIGH_LIMIT_DEFAULT), 80.0, 1e-6);
        assert_eq!(convert_from_celsius(75.0), LOW_LIMIT_DEFAULT);
        assert_eq!(convert_from_celsius(80.0), HIGH_LIMIT_DEFAULT);
    }

    #[cfg(any(feature = "embedded-sensors-hal", feature = "embedded-sensors-hal-async"))]
    #[test]
    fn sensor_error_kinds() {
        use embedded_hal::i2c::ErrorKind;

        use super::sensor::Error as _;

        let err: Error<ErrorKind> = Error::Bus(ErrorKind::Other);
        assert!(matches!(err.kind(), sensor::ErrorKind::Peripheral));

        let err: Error<ErrorKind> = Error::Other;
        assert!(matches!(err.kind(), sensor::ErrorKind::Other));
    }

    #[test]
    fn raw_survives_celsius_round_trip() {
        for raw in i16::MIN..=i16::MAX {
            assert_eq!(convert_from_celsius(convert_to_celsius(raw)), raw);
        }
    }
}
