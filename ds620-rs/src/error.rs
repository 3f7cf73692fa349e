#[derive(Debug)]
/// DS620 hardware errors.
pub enum Ds620Error<E> {
    /// I2C bus errors.
    I2c(E),
    /// Busy wait retries exceeded.
    RetriesExceeded,
}

impl<E> From<E> for Ds620Error<E> {
    fn from(value: E) -> Self {
        Self::I2c(value)
    }
}

/// A logical sensor index outside the 3-bit strap-pin range `0..=7`.
///
/// An out-of-range index cannot be truncated into a valid bus address
/// without silently selecting a different physical device, so
/// [`SensorId`](crate::SensorId) construction rejects it instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidAddress(pub u8);
