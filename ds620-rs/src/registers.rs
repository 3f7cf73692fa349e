use bitfield_struct::bitfield;
use fixed::types::I12F4;

/// Named locations in the DS620 internal memory map.
///
/// Whether a location is writable is a property of the identifier, not of
/// the protocol: the device silently ignores writes to read-only
/// locations, and the driver cannot detect that on the wire.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Register {
    /// Thermostat upper trip-point (MSB).
    ThermostatHighMsb = 0xa0,
    /// Thermostat upper trip-point (LSB).
    ThermostatHighLsb = 0xa1,
    /// Thermostat lower trip-point (MSB).
    ThermostatLowMsb = 0xa2,
    /// Thermostat lower trip-point (LSB).
    ThermostatLowLsb = 0xa3,
    /// User register, general purpose data storage.
    User1 = 0xa4,
    /// User register, general purpose data storage.
    User2 = 0xa5,
    /// User register, general purpose data storage.
    User3 = 0xa6,
    /// User register, general purpose data storage.
    User4 = 0xa7,
    /// Current temperature (MSB). Read only.
    TemperatureMsb = 0xaa,
    /// Current temperature (LSB). Read only.
    TemperatureLsb = 0xab,
    /// Configuration register (MSB).
    ConfigMsb = 0xac,
    /// Configuration register (LSB).
    ConfigLsb = 0xad,
}

impl Register {
    /// Offset of this location in the device's internal address space.
    pub const fn addr(self) -> u8 {
        self as u8
    }

    /// Whether the device ignores writes to this location.
    pub const fn read_only(self) -> bool {
        matches!(self, Register::TemperatureMsb | Register::TemperatureLsb)
    }
}

/// Conversion resolution, selected by the R1:R0 configuration bits.
///
/// Determines how many of the four fraction bits of a
/// [`RawTemperature`] carry data, and how long a conversion takes.
#[repr(u8)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// 10-bit conversion, 0.5°C per LSB.
    Bits10 = 0b00,
    /// 11-bit conversion, 0.25°C per LSB.
    Bits11 = 0b01,
    /// 12-bit conversion, 0.125°C per LSB.
    Bits12 = 0b10,
    /// 13-bit conversion, 0.0625°C per LSB. Factory default.
    #[default]
    Bits13 = 0b11,
}

impl Resolution {
    /// Worst-case conversion time in milliseconds.
    pub const fn max_conversion_time_ms(self) -> u32 {
        use Resolution::*;
        match self {
            Bits10 => 25,
            Bits11 => 50,
            Bits12 => 100,
            Bits13 => 200,
        }
    }

    /// Mask of the valid fraction bits, in units of 1/16°C.
    ///
    /// Fraction bits below the configured resolution are undefined and
    /// must not be interpreted.
    pub const fn fraction_mask(self) -> u8 {
        use Resolution::*;
        match self {
            Bits10 => 0b1000,
            Bits11 => 0b1100,
            Bits12 => 0b1110,
            Bits13 => 0b1111,
        }
    }

    const fn into_bits(self) -> u8 {
        self as _
    }

    const fn from_bits(value: u8) -> Self {
        match value {
            0b00 => Self::Bits10,
            0b01 => Self::Bits11,
            0b10 => Self::Bits12,
            _ => Self::Bits13,
        }
    }
}

/// # Configuration register
///
/// The 16-bit configuration and status register, transmitted MSB first
/// at [`Register::ConfigMsb`]/[`Register::ConfigLsb`].
///
/// DONE, NVB and the A2..A0 pin echoes are read-only: no setter exists
/// for them, so a value obtained from the device, modified and written
/// back can never claim to change them. Configuration updates must be
/// read-modify-write for the same reason; building a value from scratch
/// with [`Config::new`] and writing it would zero the flag bits the
/// device expects to see preserved.
#[bitfield(u16)]
pub struct Config {
    /// User memory for general purpose storage.
    pub user0: bool,
    /// User memory for general purpose storage.
    pub user1: bool,
    /// User memory for general purpose storage.
    pub user2: bool,
    /// Address bit 0, echoing the A0 strap pin. Read only.
    #[bits(1, access = RO)]
    pub a0: bool,
    /// Address bit 1, echoing the A1 strap pin. Read only.
    #[bits(1, access = RO)]
    pub a1: bool,
    /// Address bit 2, echoing the A2 strap pin. Read only.
    #[bits(1, access = RO)]
    pub a2: bool,
    /// Thermostat mode for the PO pin, low bit. See datasheet.
    pub po1: bool,
    /// Thermostat mode for the PO pin, high bit. See datasheet.
    pub po2: bool,
    /// Conversion mode: `true` for one-shot, `false` for continuous.
    pub oneshot: bool,
    /// Whether the device powers up converting.
    pub auto_convert: bool,
    /// Conversion resolution (the R1:R0 bits).
    #[bits(2)]
    pub resolution: Resolution,
    /// Set once the temperature meets or falls below the thermostat
    /// lower trip-point. Cleared by the user or device reset.
    pub temp_low_flag: bool,
    /// Set once the temperature meets or exceeds the thermostat upper
    /// trip-point. Cleared by the user or device reset.
    pub temp_high_flag: bool,
    /// Whether an EEPROM write is in progress. Read only.
    #[bits(1, access = RO)]
    pub nvb: bool,
    /// Whether the last requested conversion has finished. Read only.
    #[bits(1, access = RO)]
    pub done: bool,
}

/// A decoded DS620 reading with 1/16°C granularity.
pub type Temperature = I12F4;

/// A raw 16-bit value from the temperature register.
///
/// Bits \[15:7\] are a 9-bit two's-complement count of whole degrees,
/// bits \[6:3\] the fraction in 1/16°C steps, and bits \[2:0\] are always
/// zero in anything the device returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RawTemperature(pub u16);

impl RawTemperature {
    /// The signed whole-degree part, sign-extended from 9 bits.
    pub const fn whole_degrees(self) -> i16 {
        (self.0 as i16) >> 7
    }

    /// All four fraction bits, in units of 1/16°C.
    ///
    /// Only [`Resolution::Bits13`] defines all four; see
    /// [`fraction_sixteenths_at`](Self::fraction_sixteenths_at) when the
    /// configured resolution is known.
    pub const fn fraction_sixteenths(self) -> u8 {
        ((self.0 >> 3) & 0x0f) as u8
    }

    /// The fraction bits valid at the given resolution, in 1/16°C.
    pub const fn fraction_sixteenths_at(self, resolution: Resolution) -> u8 {
        self.fraction_sixteenths() & resolution.fraction_mask()
    }

    /// The reading as a signed fixed-point temperature.
    pub const fn to_fixed(self) -> Temperature {
        Temperature::from_bits((self.0 as i16) >> 3)
    }

    /// Encodes a whole-degree value, fraction bits zeroed.
    ///
    /// `degrees` must lie in the representable 9-bit range `-256..=255`;
    /// bits above that are discarded.
    pub const fn from_degrees(degrees: i16) -> Self {
        RawTemperature((degrees as u16) << 7)
    }
}

impl core::fmt::Display for RawTemperature {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.to_fixed(), f)
    }
}
