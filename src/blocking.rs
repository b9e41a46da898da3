//! Tmp1075 Blocking API

#[cfg(feature = "embedded-sensors-hal")]
use embedded_sensors_hal::sensor;
#[cfg(feature = "embedded-sensors-hal")]
use embedded_sensors_hal::temperature::{DegreesCelsius, TemperatureSensor};

use super::{
    convert_from_celsius, convert_to_celsius, Address, Configuration, ConsecutiveFaults, ConversionTime, Field,
    Polarity, Register, ThermostatMode, CONFIGURATION_UNINITIALIZED,
};
#[cfg(feature = "embedded-sensors-hal")]
use super::Error;

/// TMP1075 blocking device driver
///
/// Not reentrant: callers sharing one instance between contexts must
/// serialize access themselves.
pub struct Tmp1075<I2C: embedded_hal::i2c::I2c> {
    /// The concrete I2C bus implementation
    i2c: I2C,

    /// The I2C address.
    pub(crate) addr: u8,

    /// Shadow copy of the configuration register.
    config: u16,
}

impl<I2C: embedded_hal::i2c::I2c> Tmp1075<I2C> {
    /// Create a new TMP1075 instance responding to `addr`.
    ///
    /// No bus traffic happens until [`Tmp1075::begin`] is called.
    pub fn new_blocking(i2c: I2C, addr: u8) -> Self {
        Self {
            i2c,
            addr,
            config: CONFIGURATION_UNINITIALIZED,
        }
    }

    /// Create a new TMP1075 instance with the address selected by the A2,
    /// A1 and A0 pins.
    pub fn new_blocking_with_pins(i2c: I2C, pins: Address) -> Self {
        Self::new_blocking(i2c, pins.into())
    }

    /// Create a new TMP1075 instance with all address pins tied to GND,
    /// resulting in an instance responding to address `0x48`.
    pub fn new_blocking_with_default_address(i2c: I2C) -> Self {
        Self::new_blocking_with_pins(i2c, Address::default())
    }

    /// Destroy the driver instance, return the I2C bus instance.
    pub fn destroy(self) -> I2C {
        self.i2c
    }

    /// Load the configuration register from the device into the local
    /// cache. Must be called before the cached configuration accessors
    /// return meaningful values.
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub fn begin(&mut self) -> Result<(), I2C::Error> {
        let data = self.read(Register::Configuration)?;
        self.config = u16::from_be_bytes(data);
        Ok(())
    }

    /// Cached configuration register.
    #[must_use]
    pub fn configuration(&self) -> Configuration {
        Configuration::from(self.config)
    }

    /// Read temperature register
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub fn temperature_raw(&mut self) -> Result<i16, I2C::Error> {
        let raw = self.read(Register::Temperature)?;
        Ok(i16::from_be_bytes(raw))
    }

    /// Read temperature register in degrees Celsius
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub fn temperature(&mut self) -> Result<f32, I2C::Error> {
        self.temperature_raw().map(convert_to_celsius)
    }

    /// Trigger a single conversion. Only has an effect while the device is
    /// in shutdown mode.
    ///
    /// Sends a single data byte: the low byte of the cached configuration
    /// with the one-shot bit set. The cached high byte is not transmitted.
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub fn start_conversion(&mut self) -> Result<(), I2C::Error> {
        // OS reads back as 0, so it stays out of the cache.
        let config: u16 = self.configuration().with_os(true).into();
        let [_, low] = config.to_be_bytes();
        self.write_byte(Register::Configuration, low)
    }

    /// Trigger a single conversion, wait for the cached conversion time and
    /// read the result in degrees Celsius.
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub fn one_shot_temperature<DELAY: embedded_hal::delay::DelayNs>(
        &mut self,
        delay: &mut DELAY,
    ) -> Result<f32, I2C::Error> {
        self.start_conversion()?;
        delay.delay_us(self.conversion_time().micros());
        self.temperature()
    }

    /// Cached conversion mode, `true` when the device is in shutdown
    /// (single-shot) mode.
    #[must_use]
    pub fn conversion_mode(&self) -> bool {
        self.configuration().sd()
    }

    /// Set conversion mode, `true` selects shutdown (single-shot) mode.
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub fn set_conversion_mode(&mut self, single_shot: bool) -> Result<(), I2C::Error> {
        self.update(Field::Shutdown, single_shot.into())
    }

    /// Cached conversion time.
    #[must_use]
    pub fn conversion_time(&self) -> ConversionTime {
        self.configuration().rate()
    }

    /// Set conversion time.
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub fn set_conversion_time(&mut self, rate: ConversionTime) -> Result<(), I2C::Error> {
        self.update(Field::Rate, rate.into())
    }

    /// Cached number of consecutive faults that trigger the alert.
    #[must_use]
    pub fn faults_until_alert(&self) -> ConsecutiveFaults {
        self.configuration().faults()
    }

    /// Set number of consecutive faults that trigger the alert.
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub fn set_faults_until_alert(&mut self, faults: ConsecutiveFaults) -> Result<(), I2C::Error> {
        self.update(Field::Faults, faults.into())
    }

    /// Cached alert polarity, `true` when active high.
    #[must_use]
    pub fn alert_polarity(&self) -> bool {
        self.configuration().pol() == Polarity::ActiveHigh
    }

    /// Set alert polarity, `true` selects active high.
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub fn set_alert_polarity(&mut self, active_high: bool) -> Result<(), I2C::Error> {
        self.update(Field::Polarity, active_high.into())
    }

    /// Cached alert mode, `true` when in interrupt mode.
    #[must_use]
    pub fn alert_mode(&self) -> bool {
        self.configuration().tm() == ThermostatMode::Interrupt
    }

    /// Set alert mode, `true` selects interrupt mode.
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub fn set_alert_mode(&mut self, interrupt: bool) -> Result<(), I2C::Error> {
        self.update(Field::ThermostatMode, interrupt.into())
    }

    /// Read temperature low limit register
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub fn low_limit_raw(&mut self) -> Result<i16, I2C::Error> {
        let raw = self.read(Register::LowLimit)?;
        Ok(i16::from_be_bytes(raw))
    }

    /// Read temperature low limit register in degrees Celsius
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub fn low_limit(&mut self) -> Result<f32, I2C::Error> {
        self.low_limit_raw().map(convert_to_celsius)
    }

    /// Set temperature low limit register
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub fn set_low_limit_raw(&mut self, raw: i16) -> Result<(), I2C::Error> {
        self.write(Register::LowLimit, raw.to_be_bytes())
    }

    /// Set temperature low limit register in degrees Celsius
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub fn set_low_limit(&mut self, limit: f32) -> Result<(), I2C::Error> {
        self.set_low_limit_raw(convert_from_celsius(limit))
    }

    /// Read temperature high limit register
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub fn high_limit_raw(&mut self) -> Result<i16, I2C::Error> {
        let raw = self.read(Register::HighLimit)?;
        Ok(i16::from_be_bytes(raw))
    }

    /// Read temperature high limit register in degrees Celsius
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub fn high_limit(&mut self) -> Result<f32, I2C::Error> {
        self.high_limit_raw().map(convert_to_celsius)
    }

    /// Set temperature high limit register
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub fn set_high_limit_raw(&mut self, raw: i16) -> Result<(), I2C::Error> {
        self.write(Register::HighLimit, raw.to_be_bytes())
    }

    /// Set temperature high limit register in degrees Celsius
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub fn set_high_limit(&mut self, limit: f32) -> Result<(), I2C::Error> {
        self.set_high_limit_raw(convert_from_celsius(limit))
    }

    /// Read device ID register
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub fn device_id(&mut self) -> Result<u16, I2C::Error> {
        let data = self.read(Register::DeviceId)?;
        Ok(u16::from_be_bytes(data))
    }

    fn update(&mut self, field: Field, value: u16) -> Result<(), I2C::Error> {
        if field.get(self.config) == value {
            return Ok(());
        }

        let config = field.replace(self.config, value);
        self.write(Register::Configuration, config.to_be_bytes())?;

        // Only cache config after successful write
        self.config = config;
        Ok(())
    }

    fn read(&mut self, reg: Register) -> Result<[u8; 2], I2C::Error> {
        let mut bytes = [0; 2];
        self.i2c.write_read(self.addr, &[reg.into()], &mut bytes)?;
        Ok(bytes)
    }

    fn write(&mut self, reg: Register, value: [u8; 2]) -> Result<(), I2C::Error> {
        let mut data = [0; 3];

        data[0] = reg.into();
        data[1..].copy_from_slice(&value);

        self.i2c.write(self.addr, &data)
    }

    fn write_byte(&mut self, reg: Register, value: u8) -> Result<(), I2C::Error> {
        self.i2c.write(self.addr, &[reg.into(), value])
    }
}

#[cfg(feature = "embedded-sensors-hal")]
impl<I2C: embedded_hal::i2c::I2c> sensor::ErrorType for Tmp1075<I2C> {
    type Error = Error<I2C::Error>;
}

#[cfg(feature = "embedded-sensors-hal")]
impl<I2C: embedded_hal::i2c::I2c> TemperatureSensor for Tmp1075<I2C> {
    fn temperature(&mut self) -> Result<DegreesCelsius, Self::Error> {
        self.temperature().map_err(Error::Bus)
    }
}
