#![cfg_attr(not(test), no_std)]
#![deny(missing_docs)]

/*! # DS620
 *
 * A driver for the Maxim DS620 digital temperature sensor, accessed over
 * I2C through the [`I2c`](embedded_hal::i2c::I2c) trait.
 *
 * Up to eight devices share a bus, distinguished by the A2..A0 strap pins;
 * a [`SensorId`] selects one of them. Register access is exposed both raw
 * (see [`Register`]) and typed: [`Config`] models the 16-bit configuration
 * register and [`RawTemperature`] the signed fixed-point temperature
 * format. The EEPROM copy sequence and its mode-changing side effect are
 * handled by [`Ds620::copy_to_eeprom`].
 */

mod address;
mod error;
mod protocol;
mod registers;

pub use address::{BusDirection, SensorId};
pub use error::{Ds620Error, InvalidAddress};
pub use registers::{Config, RawTemperature, Register, Resolution, Temperature};

/// Results of DS620-specific function calls.
pub type Ds620Result<T, E> = Result<T, Ds620Error<E>>;

/// A DS620 digital temperature sensor.
///
/// Takes ownership of an I2C bus (implementing the
/// [`I2c`](embedded_hal::i2c::I2c) trait) and a timer object implementing
/// the [`DelayNs`](embedded_hal::delay::DelayNs) trait. The timer is used
/// only by the status polling helpers; plain register access and the
/// device commands never wait.
pub struct Ds620<I, D> {
    pub(crate) i2c: I,
    pub(crate) addr: u8,
    pub(crate) delay: D,
    pub(crate) retries: u8,
}

impl<I, D> Ds620<I, D> {
    /// Creates a new instance of `Ds620` for the sensor selected by `id`.
    pub fn new(i2c: I, delay: D, id: SensorId) -> Self {
        Ds620 {
            i2c,
            addr: id.seven_bit(),
            delay,
            retries: 100,
        }
    }

    /// Set the retry count.
    ///
    /// The retry count bounds how long the status polling helpers wait
    /// for the DONE or NVB flag before giving up with
    /// [`Ds620Error::RetriesExceeded`].
    pub fn with_retries(mut self, retries: u8) -> Self {
        self.retries = retries;
        self
    }
}
