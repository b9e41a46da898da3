//! Tmp1075 Async API

#[cfg(feature = "embedded-sensors-hal-async")]
use embedded_sensors_hal_async::sensor;
#[cfg(feature = "embedded-sensors-hal-async")]
use embedded_sensors_hal_async::temperature::{
    DegreesCelsius, TemperatureSensor, TemperatureThresholdSet, TemperatureThresholdWait,
};

use super::{
    convert_from_celsius, convert_to_celsius, Address, Configuration, ConsecutiveFaults, ConversionTime, Field,
    Polarity, Register, ThermostatMode, CONFIGURATION_UNINITIALIZED,
};
#[cfg(feature = "embedded-sensors-hal-async")]
use super::Error;

/// TMP1075 asynchronous device driver
pub struct Tmp1075<I2C: embedded_hal_async::i2c::I2c> {
    /// The concrete I2C bus implementation
    i2c: I2C,

    /// The I2C address.
    pub(crate) addr: u8,

    /// Shadow copy of the configuration register.
    config: u16,
}

impl<I2C: embedded_hal_async::i2c::I2c> Tmp1075<I2C> {
    /// Create a new TMP1075 instance responding to `addr`.
    pub fn new_async(i2c: I2C, addr: u8) -> Self {
        Self {
            i2c,
            addr,
            config: CONFIGURATION_UNINITIALIZED,
        }
    }

    /// Create a new TMP1075 instance with the address selected by the A2,
    /// A1 and A0 pins.
    pub fn new_async_with_pins(i2c: I2C, pins: Address) -> Self {
        Self::new_async(i2c, pins.into())
    }

    /// Create a new TMP1075 instance with all address pins tied to GND,
    /// resulting in an instance responding to address `0x48`.
    pub fn new_async_with_default_address(i2c: I2C) -> Self {
        Self::new_async_with_pins(i2c, Address::default())
    }

    /// Create a new `AlertTmp1075` instance by consuming the original TMP1075 instance.
    #[cfg(feature = "embedded-sensors-hal-async")]
    pub fn into_alert<ALERT: embedded_hal_async::digital::Wait + embedded_hal::digital::InputPin>(
        self,
        alert: ALERT,
    ) -> AlertTmp1075<I2C, ALERT> {
        AlertTmp1075 { tmp1075: self, alert }
    }

    /// Destroy the driver instance, return the I2C bus instance.
    pub fn destroy(self) -> I2C {
        self.i2c
    }

    /// Load the configuration register from the device into the local cache.
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub async fn begin(&mut self) -> Result<(), I2C::Error> {
        let data = self.read(Register::Configuration).await?;
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
    pub async fn temperature_raw(&mut self) -> Result<i16, I2C::Error> {
        let raw = self.read(Register::Temperature).await?;
        Ok(i16::from_be_bytes(raw))
    }

    /// Read temperature register in degrees Celsius
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub async fn temperature(&mut self) -> Result<f32, I2C::Error> {
        self.temperature_raw().await.map(convert_to_celsius)
    }

    /// Trigger a single conversion.
    ///
    /// Sends a single data byte: the low byte of the cached configuration
    /// with the one-shot bit set. The cached high byte is not transmitted.
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub async fn start_conversion(&mut self) -> Result<(), I2C::Error> {
        let config: u16 = self.configuration().with_os(true).into();
        let [_, low] = config.to_be_bytes();
        self.write_byte(Register::Configuration, low).await
    }

    /// Trigger a single conversion, wait for the cached conversion time and
    /// read the result in degrees Celsius.
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub async fn one_shot_temperature<DELAY: embedded_hal_async::delay::DelayNs>(
        &mut self,
        delay: &mut DELAY,
    ) -> Result<f32, I2C::Error> {
        self.start_conversion().await?;
        delay.delay_us(self.conversion_time().micros()).await;
        self.temperature().await
    }

    /// Cached conversion mode, `true` when in shutdown (single-shot) mode.
    #[must_use]
    pub fn conversion_mode(&self) -> bool {
        self.configuration().sd()
    }

    /// Set conversion mode
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub async fn set_conversion_mode(&mut self, single_shot: bool) -> Result<(), I2C::Error> {
        self.update(Field::Shutdown, single_shot.into()).await
    }

    /// Cached conversion time.
    #[must_use]
    pub fn conversion_time(&self) -> ConversionTime {
        self.configuration().rate()
    }

    /// Set conversion time
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub async fn set_conversion_time(&mut self, rate: ConversionTime) -> Result<(), I2C::Error> {
        self.update(Field::Rate, rate.into()).await
    }

    /// Cached number of consecutive faults that trigger the alert.
    #[must_use]
    pub fn faults_until_alert(&self) -> ConsecutiveFaults {
        self.configuration().faults()
    }

    /// Set number of consecutive faults that trigger the alert
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub async fn set_faults_until_alert(&mut self, faults: ConsecutiveFaults) -> Result<(), I2C::Error> {
        self.update(Field::Faults, faults.into()).await
    }

    /// Cached alert polarity, `true` when active high.
    #[must_use]
    pub fn alert_polarity(&self) -> bool {
        self.configuration().pol() == Polarity::ActiveHigh
    }

    /// Set alert polarity
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub async fn set_alert_polarity(&mut self, active_high: bool) -> Result<(), I2C::Error> {
        self.update(Field::Polarity, active_high.into()).await
    }

    /// Cached alert mode, `true` when in interrupt mode.
    #[must_use]
    pub fn alert_mode(&self) -> bool {
        self.configuration().tm() == ThermostatMode::Interrupt
    }

    /// Set alert mode
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub async fn set_alert_mode(&mut self, interrupt: bool) -> Result<(), I2C::Error> {
        self.update(Field::ThermostatMode, interrupt.into()).await
    }

    /// Read temperature low limit register
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub async fn low_limit_raw(&mut self) -> Result<i16, I2C::Error> {
        let raw = self.read(Register::LowLimit).await?;
        Ok(i16::from_be_bytes(raw))
    }

    /// Read temperature low limit register in degrees Celsius
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub async fn low_limit(&mut self) -> Result<f32, I2C::Error> {
        self.low_limit_raw().await.map(convert_to_celsius)
    }

    /// Set temperature low limit register
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub async fn set_low_limit_raw(&mut self, raw: i16) -> Result<(), I2C::Error> {
        self.write(Register::LowLimit, raw.to_be_bytes()).await
    }

    /// Set temperature low limit register in degrees Celsius
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub async fn set_low_limit(&mut self, limit: f32) -> Result<(), I2C::Error> {
        self.set_low_limit_raw(convert_from_celsius(limit)).await
    }

    /// Read temperature high limit register
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub async fn high_limit_raw(&mut self) -> Result<i16, I2C::Error> {
        let raw = self.read(Register::HighLimit).await?;
        Ok(i16::from_be_bytes(raw))
    }

    /// Read temperature high limit register in degrees Celsius
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub async fn high_limit(&mut self) -> Result<f32, I2C::Error> {
        self.high_limit_raw().await.map(convert_to_celsius)
    }

    /// Set temperature high limit register
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub async fn set_high_limit_raw(&mut self, raw: i16) -> Result<(), I2C::Error> {
        self.write(Register::HighLimit, raw.to_be_bytes()).await
    }

    /// Set temperature high limit register in degrees Celsius
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub async fn set_high_limit(&mut self, limit: f32) -> Result<(), I2C::Error> {
        self.set_high_limit_raw(convert_from_celsius(limit)).await
    }

    /// Read device ID register
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub async fn device_id(&mut self) -> Result<u16, I2C::Error> {
        let data = self.read(Register::DeviceId).await?;
        Ok(u16::from_be_bytes(data))
    }

    async fn update(&mut self, field: Field, value: u16) -> Result<(), I2C::Error> {
        if field.get(self.config) == value {
            return Ok(());
        }

        let config = field.replace(self.config, value);
        self.write(Register::Configuration, config.to_be_bytes()).await?;
        self.config = config;
        Ok(())
    }

    async fn read(&mut self, reg: Register) -> Result<[u8; 2], I2C::Error> {
        let mut bytes = [0; 2];
        self.i2c.write_read(self.addr, &[reg.into()], &mut bytes).await?;
        Ok(bytes)
    }

    async fn write(&mut self, reg: Register, value: [u8; 2]) -> Result<(), I2C::Error> {
        let mut data = [0; 3];

        data[0] = reg.into();
        data[1..].copy_from_slice(&value);

        self.i2c.write(self.addr, &data).await
    }

    async fn write_byte(&mut self, reg: Register, value: u8) -> Result<(), I2C::Error> {
        self.i2c.write(self.addr, &[reg.into(), value]).await
    }
}

#[cfg(feature = "embedded-sensors-hal-async")]
impl<I2C: embedded_hal_async::i2c::I2c> sensor::ErrorType for Tmp1075<I2C> {
    type Error = Error<I2C::Error>;
}

#[cfg(feature = "embedded-sensors-hal-async")]
impl<I2C: embedded_hal_async::i2c::I2c> TemperatureSensor for Tmp1075<I2C> {
    async fn temperature(&mut self) -> Result<DegreesCelsius, Self::Error> {
        self.temperature().await.map_err(Error::Bus)
    }
}

#[cfg(feature = "embedded-sensors-hal-async")]
impl<I2C: embedded_hal_async::i2c::I2c> TemperatureThresholdSet for Tmp1075<I2C> {
    async fn set_temperature_threshold_low(&mut self, threshold: DegreesCelsius) -> Result<(), Self::Error> {
        self.set_low_limit(threshold).await.map_err(Error::Bus)
    }

    async fn set_temperature_threshold_high(&mut self, threshold: DegreesCelsius) -> Result<(), Self::Error> {
        self.set_high_limit(threshold).await.map_err(Error::Bus)
    }
}

/// TMP1075 asynchronous device driver (with alert pin)
#[cfg(feature = "embedded-sensors-hal-async")]
pub struct AlertTmp1075<
    I2C: embedded_hal_async::i2c::I2c,
    ALERT: embedded_hal_async::digital::Wait + embedded_hal::digital::InputPin,
> {
    /// Underlying TMP1075 sensor.
    pub tmp1075: Tmp1075<I2C>,
    alert: ALERT,
}

#[cfg(feature = "embedded-sensors-hal-async")]
impl<
        I2C: embedded_hal_async::i2c::I2c,
        ALERT: embedded_hal_async::digital::Wait + embedded_hal::digital::InputPin,
    > AlertTmp1075<I2C, ALERT>
{
    /// Create a new `AlertTmp1075` instance responding to `addr`.
    pub fn new_async(i2c: I2C, addr: u8, alert: ALERT) -> Self {
        Tmp1075::new_async(i2c, addr).into_alert(alert)
    }

    /// Create a new `AlertTmp1075` instance with all address pins tied to
    /// GND, resulting in an instance responding to address `0x48`.
    pub fn new_async_with_default_address(i2c: I2C, alert: ALERT) -> Self {
        Tmp1075::new_async_with_default_address(i2c).into_alert(alert)
    }

    /// Destroy the driver instance, return the I2C bus instance and ALERT pin instance.
    pub fn destroy(self) -> (I2C, ALERT) {
        (self.tmp1075.destroy(), self.alert)
    }
}

#[cfg(feature = "embedded-sensors-hal-async")]
impl<
        I2C: embedded_hal_async::i2c::I2c,
        ALERT: embedded_hal_async::digital::Wait + embedded_hal::digital::InputPin,
    > sensor::ErrorType for AlertTmp1075<I2C, ALERT>
{
    type Error = Error<I2C::Error>;
}

#[cfg(feature = "embedded-sensors-hal-async")]
impl<
        I2C: embedded_hal_async::i2c::I2c,
        ALERT: embedded_hal_async::digital::Wait + embedded_hal::digital::InputPin,
    > TemperatureSensor for AlertTmp1075<I2C, ALERT>
{
    async fn temperature(&mut self) -> Result<DegreesCelsius, Self::Error> {
        self.tmp1075.temperature().await.map_err(Error::Bus)
    }
}

#[cfg(feature = "embedded-sensors-hal-async")]
impl<
        I2C: embedded_hal_async::i2c::I2c,
        ALERT: embedded_hal_async::digital::Wait + embedded_hal::digital::InputPin,
    > TemperatureThresholdSet for AlertTmp1075<I2C, ALERT>
{
    async fn set_temperature_threshold_low(&mut self, threshold: DegreesCelsius) -> Result<(), Self::Error> {
        self.tmp1075.set_low_limit(threshold).await.map_err(Error::Bus)
    }

    async fn set_temperature_threshold_high(&mut self, threshold: DegreesCelsius) -> Result<(), Self::Error> {
        self.tmp1075.set_high_limit(threshold).await.map_err(Error::Bus)
    }
}

#[cfg(feature = "embedded-sensors-hal-async")]
impl<
        I2C: embedded_hal_async::i2c::I2c,
        ALERT: embedded_hal_async::digital::Wait + embedded_hal::digital::InputPin,
    > TemperatureThresholdWait for AlertTmp1075<I2C, ALERT>
{
    async fn wait_for_temperature_threshold(&mut self) -> Result<DegreesCelsius, Self::Error> {
        let config = self.tmp1075.configuration();

        match (config.tm(), config.pol()) {
            // Comparator mode keeps ALERT asserted until the temperature is back inside the limits.
            (ThermostatMode::Comparator, Polarity::ActiveLow) => {
                self.alert.wait_for_low().await.map_err(|_| Error::Other)?;
            }
            (ThermostatMode::Comparator, Polarity::ActiveHigh) => {
                self.alert.wait_for_high().await.map_err(|_| Error::Other)?;
            }

            // Interrupt mode latches ALERT until any register is read.
            (ThermostatMode::Interrupt, Polarity::ActiveLow) => {
                self.alert.wait_for_falling_edge().await.map_err(|_| Error::Other)?;
                self.tmp1075.begin().await.map_err(Error::Bus)?;
            }
            (ThermostatMode::Interrupt, Polarity::ActiveHigh) => {
                self.alert.wait_for_rising_edge().await.map_err(|_| Error::Other)?;
                self.tmp1075.begin().await.map_err(Error::Bus)?;
            }
        }

        self.tmp1075.temperature().await.map_err(Error::Bus)
    }
}
