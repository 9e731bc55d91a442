use super::WordSource;
use embedded_hal::i2c::I2c;
use thiserror::Error;

/// Errors produced by [`I2cEeprom`].
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum I2cWordError<E> {
    /// The offset lies past the configured capacity.
    #[error("offset {0:#06x} is outside the device")]
    OutOfRange(u32),
    /// The bus transaction failed.
    #[error("I2C transfer failed: {0:?}")]
    Bus(E),
}

/// Calibration store held in a serial EEPROM with 16-bit byte addressing.
///
/// Word `n` occupies bytes `2n` (low) and `2n + 1` (high). Each word is read
/// with a single write-read transaction carrying the big-endian byte address.
///
/// ```rust
/// # use embedded_hal_mock::eh1::i2c::{Mock, Transaction};
/// use ath_eeprom::source::{I2cEeprom, WordSource};
///
/// # let bus = Mock::new(&[Transaction::write_read(0x50, vec![0x01, 0x82], vec![0x03, 0x30])]);
/// let mut eeprom = I2cEeprom::new(bus, 0x50, 0x400);
/// assert_eq!(eeprom.read(0xc1), Ok(0x3003));
/// # eeprom.release().done();
/// ```
#[derive(Debug)]
pub struct I2cEeprom<I2C> {
    i2c: I2C,
    address: u8,
    capacity: u32,
}

impl<I2C: I2c> I2cEeprom<I2C> {
    /// Wraps a bus with the device `address` and its size in words.
    pub fn new(i2c: I2C, address: u8, capacity: u32) -> Self {
        Self {
            i2c,
            address,
            capacity,
        }
    }

    /// Returns the bus.
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C: I2c> WordSource for I2cEeprom<I2C> {
    type Error = I2cWordError<I2C::Error>;

    fn read(&mut self, offset: u32) -> Result<u16, Self::Error> {
        if offset >= self.capacity {
            return Err(I2cWordError::OutOfRange(offset));
        }
        let byte_address = offset
            .checked_mul(2)
            .and_then(|bytes| u16::try_from(bytes).ok())
            .ok_or(I2cWordError::OutOfRange(offset))?;
        let mut word = [0u8; 2];
        self.i2c
            .write_read(self.address, &byte_address.to_be_bytes(), &mut word)
            .map_err(I2cWordError::Bus)?;
        Ok(u16::from_le_bytes(word))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::{self, FormatVersion, MapType};
    use embedded_hal::i2c::ErrorKind;
    use embedded_hal_mock::eh1::i2c::{Mock, Transaction};
    use std::vec;

    #[test]
    fn test_reads_little_endian_words() {
        let expectations = [
            Transaction::write_read(0x50, vec![0x00, 0x00], vec![0x34, 0x12]),
            Transaction::write_read(0x50, vec![0x01, 0xfe], vec![0xcd, 0xab]),
        ];
        let mut eeprom = I2cEeprom::new(Mock::new(&expectations), 0x50, 0x400);
        assert_eq!(eeprom.read(0), Ok(0x1234));
        assert_eq!(eeprom.read(0xff), Ok(0xabcd));
        eeprom.release().done();
    }

    #[test]
    fn test_rejects_offsets_past_capacity() {
        let mut eeprom = I2cEeprom::new(Mock::new(&[]), 0x50, 0x400);
        assert_eq!(eeprom.read(0x400), Err(I2cWordError::OutOfRange(0x400)));
        // Beyond the 16-bit byte address space.
        let mut eeprom_large = I2cEeprom::new(Mock::new(&[]), 0x50, 0x10000);
        assert_eq!(
            eeprom_large.read(0x8000),
            Err(I2cWordError::OutOfRange(0x8000))
        );
        eeprom.release().done();
        eeprom_large.release().done();
    }

    #[test]
    fn test_bus_errors_are_reported() {
        let expectations = [Transaction::write_read(0x50, vec![0x00, 0x02], vec![0x00, 0x00])
            .with_error(ErrorKind::Other)];
        let mut eeprom = I2cEeprom::new(Mock::new(&expectations), 0x50, 0x400);
        assert_eq!(eeprom.read(1), Err(I2cWordError::Bus(ErrorKind::Other)));
        eeprom.release().done();
    }

    #[test]
    fn test_selects_version_over_the_bus() {
        let expectations = [Transaction::write_read(
            0x50,
            vec![0x01, 0x82],
            vec![0x03, 0x30],
        )];
        let mut eeprom = I2cEeprom::new(Mock::new(&expectations), 0x50, 0x400);
        let (found, map) = version::select(&mut eeprom).unwrap();
        assert_eq!(found, FormatVersion::V3_3);
        assert_eq!(map, MapType::Pcdac);
        eeprom.release().done();
    }
}
