use crate::{Config, Ds620, Ds620Error, Ds620Result, RawTemperature, Register};
use embedded_hal::{
    delay::DelayNs,
    i2c::{I2c, SevenBitAddress},
};

pub(crate) const START_CONVERT_CMD: u8 = 0x51; // Start temperature conversion
pub(crate) const STOP_CONVERT_CMD: u8 = 0x22; // Stop continuous conversion
pub(crate) const RECALL_DATA_CMD: u8 = 0xb8; // Reload shadow registers from EEPROM
pub(crate) const COPY_DATA_CMD: u8 = 0x48; // Commit shadow registers to EEPROM

impl<I: I2c<SevenBitAddress>, D: DelayNs> Ds620<I, D> {
    /// Read an 8-bit register.
    pub fn read_register8(&mut self, register: Register) -> Ds620Result<u8, I::Error> {
        let mut buf = [0u8; 1];
        self.i2c.write_read(self.addr, &[register.addr()], &mut buf)?;
        Ok(buf[0])
    }

    /// Write an 8-bit register.
    ///
    /// Writes go to the SRAM shadow registers only; use
    /// [`copy_to_eeprom`](Self::copy_to_eeprom) to persist them.
    pub fn write_register8(&mut self, register: Register, value: u8) -> Ds620Result<(), I::Error> {
        self.i2c.write(self.addr, &[register.addr(), value])?;
        Ok(())
    }

    /// Read a 16-bit register pair, MSB first.
    ///
    /// `register` names the MSB half; the LSB follows at the next
    /// offset. Both bytes move in one bus transaction so a conversion
    /// completing mid-read cannot tear the value.
    pub fn read_register16(&mut self, register: Register) -> Ds620Result<u16, I::Error> {
        let mut buf = [0u8; 2];
        self.i2c.write_read(self.addr, &[register.addr()], &mut buf)?;
        Ok(u16::from_be_bytes(buf))
    }

    /// Write a 16-bit register pair, MSB first, as one bus transaction.
    ///
    /// Writes go to the SRAM shadow registers only; use
    /// [`copy_to_eeprom`](Self::copy_to_eeprom) to persist them.
    pub fn write_register16(&mut self, register: Register, value: u16) -> Ds620Result<(), I::Error> {
        let [msb, lsb] = value.to_be_bytes();
        self.i2c.write(self.addr, &[register.addr(), msb, lsb])?;
        Ok(())
    }

    /// Read the current temperature register.
    pub fn temperature(&mut self) -> Ds620Result<RawTemperature, I::Error> {
        self.read_register16(Register::TemperatureMsb)
            .map(RawTemperature)
    }

    /// Read the configuration register.
    pub fn config(&mut self) -> Ds620Result<Config, I::Error> {
        self.read_register16(Register::ConfigMsb).map(Config::from_bits)
    }

    /// Write the configuration register.
    ///
    /// `config` must be derived from a fresh [`config`](Self::config)
    /// read so the device's flag and strap-pin echo bits are carried
    /// back unchanged (read-modify-write).
    pub fn set_config(&mut self, config: Config) -> Ds620Result<(), I::Error> {
        self.write_register16(Register::ConfigMsb, config.into_bits())
    }

    /// In one-shot mode, initiate a single conversion; in continuous
    /// mode, start automatic conversions.
    ///
    /// Does not wait: the DONE flag reports completion, see
    /// [`wait_conversion_done`](Self::wait_conversion_done).
    pub fn start_conversion(&mut self) -> Ds620Result<(), I::Error> {
        self.command(START_CONVERT_CMD)
    }

    /// Stop automatic conversions. A no-op in one-shot mode.
    pub fn stop_conversion(&mut self) -> Ds620Result<(), I::Error> {
        self.command(STOP_CONVERT_CMD)
    }

    /// Reload the SRAM shadow registers from EEPROM.
    pub fn recall_from_eeprom(&mut self) -> Ds620Result<(), I::Error> {
        self.command(RECALL_DATA_CMD)
    }

    /// Commit the SRAM shadow registers to EEPROM.
    ///
    /// Runs the copy command sequence from the datasheet: the device is
    /// switched to continuous mode, a conversion is started, the copy
    /// opcode is issued, and once the NVB flag reports the write
    /// finished, conversion is stopped again.
    ///
    /// The visible operating mode afterwards is therefore "stopped"
    /// regardless of the mode before the call, matching the device
    /// behavior. The prior mode is not restored; reinstating continuous
    /// conversion is the caller's explicit responsibility.
    pub fn copy_to_eeprom(&mut self) -> Ds620Result<(), I::Error> {
        let config = self.config()?;
        self.set_config(config.with_oneshot(false))?;
        self.start_conversion()?;
        self.command(COPY_DATA_CMD)?;
        self.wait_eeprom_idle()?;
        self.stop_conversion()
    }

    /// Poll the configuration register until DONE reports a finished
    /// conversion, in 10 ms steps bounded by the retry count.
    pub fn wait_conversion_done(&mut self) -> Ds620Result<Config, I::Error> {
        let mut tries = 0;
        loop {
            let config = self.config()?;
            if config.done() {
                return Ok(config);
            }
            if tries > self.retries {
                return Err(Ds620Error::RetriesExceeded);
            }
            tries += 1;
            self.delay.delay_ms(10);
        }
    }

    /// Poll the configuration register until NVB reports the EEPROM
    /// write finished, in 1 ms steps bounded by the retry count.
    pub fn wait_eeprom_idle(&mut self) -> Ds620Result<Config, I::Error> {
        let mut tries = 0;
        loop {
            let config = self.config()?;
            if !config.nvb() {
                return Ok(config);
            }
            if tries > self.retries {
                return Err(Ds620Error::RetriesExceeded);
            }
            tries += 1;
            self.delay.delay_ms(1);
        }
    }

    // Single opcode byte, no register-address framing.
    fn command(&mut self, opcode: u8) -> Ds620Result<(), I::Error> {
        self.i2c.write(self.addr, &[opcode])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SensorId;
    use embedded_hal_mock::eh1::delay::NoopDelay;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};

    const ADDR: u8 = 0x48; // sensor index 0

    fn sensor(i2c: I2cMock) -> Ds620<I2cMock, NoopDelay> {
        Ds620::new(i2c, NoopDelay, SensorId::try_from(0).unwrap())
    }

    #[test]
    fn temperature_read_is_one_framed_transaction() {
        let mut i2c = I2cMock::new(&[I2cTransaction::write_read(
            ADDR,
            vec![0xaa],
            vec![0x0c, 0xc0],
        )]);
        let mut dev = sensor(i2c.clone());
        let temp = dev.temperature().unwrap();
        assert_eq!(temp, RawTemperature(0x0cc0));
        assert_eq!(temp.whole_degrees(), 25);
        i2c.done();
    }

    #[test]
    fn register8_access_frames_the_register_byte() {
        let mut i2c = I2cMock::new(&[
            I2cTransaction::write_read(ADDR, vec![0xa4], vec![0x5a]),
            I2cTransaction::write(ADDR, vec![0xa4, 0xa5]),
        ]);
        let mut dev = sensor(i2c.clone());
        assert_eq!(dev.read_register8(Register::User1).unwrap(), 0x5a);
        dev.write_register8(Register::User1, 0xa5).unwrap();
        i2c.done();
    }

    #[test]
    fn register16_write_carries_both_bytes_msb_first() {
        let mut i2c = I2cMock::new(&[I2cTransaction::write(ADDR, vec![0xa0, 0x2d, 0x80])]);
        let mut dev = sensor(i2c.clone());
        dev.write_register16(Register::ThermostatHighMsb, 0x2d80)
            .unwrap();
        i2c.done();
    }

    #[test]
    fn commands_are_bare_opcodes() {
        let mut i2c = I2cMock::new(&[
            I2cTransaction::write(ADDR, vec![0x51]),
            I2cTransaction::write(ADDR, vec![0x22]),
            I2cTransaction::write(ADDR, vec![0xb8]),
        ]);
        let mut dev = sensor(i2c.clone());
        dev.start_conversion().unwrap();
        dev.stop_conversion().unwrap();
        dev.recall_from_eeprom().unwrap();
        i2c.done();
    }

    #[test]
    fn commands_address_the_selected_sensor() {
        let mut i2c = I2cMock::new(&[I2cTransaction::write(0x4d, vec![0x51])]);
        let mut dev = Ds620::new(i2c.clone(), NoopDelay, SensorId::try_from(5).unwrap());
        dev.start_conversion().unwrap();
        i2c.done();
    }

    #[test]
    fn copy_to_eeprom_runs_the_documented_sequence() {
        // One-shot mode, 13-bit resolution before the call.
        let mut i2c = I2cMock::new(&[
            I2cTransaction::write_read(ADDR, vec![0xac], vec![0x0d, 0x00]),
            // Rewritten with ONESHOT cleared: continuous mode.
            I2cTransaction::write(ADDR, vec![0xac, 0x0c, 0x00]),
            I2cTransaction::write(ADDR, vec![0x51]),
            I2cTransaction::write(ADDR, vec![0x48]),
            // NVB still set on the first poll, clear on the second.
            I2cTransaction::write_read(ADDR, vec![0xac], vec![0x4c, 0x00]),
            I2cTransaction::write_read(ADDR, vec![0xac], vec![0x0c, 0x00]),
            I2cTransaction::write(ADDR, vec![0x22]),
        ]);
        let mut dev = sensor(i2c.clone());
        dev.copy_to_eeprom().unwrap();
        i2c.done();
    }

    #[test]
    fn wait_conversion_done_polls_until_the_flag_sets() {
        let mut i2c = I2cMock::new(&[
            I2cTransaction::write_read(ADDR, vec![0xac], vec![0x0d, 0x00]),
            I2cTransaction::write_read(ADDR, vec![0xac], vec![0x8d, 0x00]),
        ]);
        let mut dev = sensor(i2c.clone());
        let config = dev.wait_conversion_done().unwrap();
        assert!(config.done());
        i2c.done();
    }

    #[test]
    fn wait_eeprom_idle_gives_up_after_the_retry_budget() {
        let busy = I2cTransaction::write_read(ADDR, vec![0xac], vec![0x4c, 0x00]);
        let mut i2c = I2cMock::new(&[busy.clone(), busy]);
        let mut dev = sensor(i2c.clone()).with_retries(0);
        assert!(matches!(
            dev.wait_eeprom_idle(),
            Err(Ds620Error::RetriesExceeded)
        ));
        i2c.done();
    }

    #[test]
    fn bus_errors_propagate_unchanged() {
        use embedded_hal::i2c::ErrorKind;
        let mut i2c = I2cMock::new(&[
            I2cTransaction::write(ADDR, vec![0x51]).with_error(ErrorKind::Other),
            I2cTransaction::write_read(ADDR, vec![0xaa], vec![0x00, 0x00])
                .with_error(ErrorKind::ArbitrationLoss),
        ]);
        let mut dev = sensor(i2c.clone());
        assert!(matches!(
            dev.start_conversion(),
            Err(Ds620Error::I2c(ErrorKind::Other))
        ));
        assert!(matches!(
            dev.temperature(),
            Err(Ds620Error::I2c(ErrorKind::ArbitrationLoss))
        ));
        i2c.done();
    }
}
