use crate::InvalidAddress;
use embedded_hal::i2c::SevenBitAddress;

/// Direction of an addressed bus transaction, i.e. the R/W̄ bit.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusDirection {
    /// Controller writes to the device (R/W̄ = 0).
    Write = 0,
    /// Controller reads from the device (R/W̄ = 1).
    Read = 1,
}

/// One of up to eight DS620 devices sharing a bus.
///
/// The device responds to the fixed `1001` family nibble combined with
/// the state of its A2..A0 strap pins, so the logical index must lie in
/// `0..=7`. Construction goes through [`TryFrom<u8>`] and fails with
/// [`InvalidAddress`] outside that range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorId(u8);

impl SensorId {
    /// The fixed high nibble of the device family, as the upper four
    /// bits of the 8-bit address byte on the wire.
    #[inline]
    pub const fn family() -> u8 {
        0b1001_0000
    }

    /// The strap-pin index this id was built from.
    pub const fn index(self) -> u8 {
        self.0
    }

    /// The seven-bit bus address, as used with
    /// [`I2c<SevenBitAddress>`](embedded_hal::i2c::I2c).
    pub const fn seven_bit(self) -> SevenBitAddress {
        (Self::family() >> 1) | self.0
    }

    /// The full 8-bit address byte presented on the wire for the given
    /// transaction direction.
    pub const fn wire_byte(self, direction: BusDirection) -> u8 {
        Self::family() | (self.0 << 1) | direction as u8
    }
}

impl TryFrom<u8> for SensorId {
    type Error = InvalidAddress;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        if index < 8 {
            Ok(SensorId(index))
        } else {
            Err(InvalidAddress(index))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_bytes_distinct_per_index_and_direction() {
        let mut seen = Vec::new();
        for index in 0..8 {
            let id = SensorId::try_from(index).unwrap();
            assert_eq!(id.index(), index);
            assert_eq!(id.seven_bit(), 0x48 | index);
            for direction in [BusDirection::Write, BusDirection::Read] {
                let byte = id.wire_byte(direction);
                assert!(!seen.contains(&byte), "duplicate address byte {byte:#04x}");
                seen.push(byte);
            }
        }
        assert_eq!(seen.len(), 16);
    }

    #[test]
    fn wire_byte_combines_family_index_and_direction() {
        let id = SensorId::try_from(0b101).unwrap();
        assert_eq!(id.wire_byte(BusDirection::Write), 0b1001_1010);
        assert_eq!(id.wire_byte(BusDirection::Read), 0b1001_1011);
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        for index in [8, 9, 0x48, 0x90, 0xff] {
            assert_eq!(SensorId::try_from(index), Err(InvalidAddress(index)));
        }
    }
}
