//! FT6336U capacitive touch controller driver, polling mode.
//!
//! Only the registers the panel needs: touch count, primary point
//! coordinates, chip identification, and the interrupt-mode switch. The
//! controller keeps reporting the primary point while a finger is down
//! and simply reports zero touches after lift-off, so the sampler pairs
//! this driver with [`helm_core::events::TouchTracker`] to recover
//! press/drag/release transitions.

use embedded_hal_async::i2c::I2c;

use helm_core::ui::TouchPoint;

/// FT6336U I2C address
pub const I2C_ADDR: u8 = 0x38;

/// Expected CHIP_ID register value for the FT6336U.
pub const CHIP_ID: u8 = 0x64;

// Register addresses
const ADDR_TD_STATUS: u8 = 0x02;
const ADDR_TOUCH1_X: u8 = 0x03;
const ADDR_TOUCH1_Y: u8 = 0x05;
const ADDR_CHIP_ID: u8 = 0xA3;
const ADDR_G_MODE: u8 = 0xA4;

/// Errors from the touch controller.
#[derive(Debug)]
pub enum Error<E> {
    /// I2C communication error
    I2c(E),
}

impl<E> From<E> for Error<E> {
    fn from(e: E) -> Self {
        Self::I2c(e)
    }
}

/// Minimal FT6336U driver over an async I2C bus.
pub struct Ft6336u<I2C> {
    i2c: I2C,
}

impl<I2C> Ft6336u<I2C>
where
    I2C: I2c,
{
    pub fn new(i2c: I2C) -> Self {
        Self { i2c }
    }

    async fn read_byte(&mut self, addr: u8) -> Result<u8, Error<I2C::Error>> {
        let mut buf = [0u8; 1];
        self.i2c.write_read(I2C_ADDR, &[addr], &mut buf).await?;
        Ok(buf[0])
    }

    async fn write_byte(&mut self, addr: u8, data: u8) -> Result<(), Error<I2C::Error>> {
        self.i2c.write(I2C_ADDR, &[addr, data]).await?;
        Ok(())
    }

    /// 12-bit coordinate from a two-register pair.
    async fn read_coord(&mut self, addr: u8) -> Result<u16, Error<I2C::Error>> {
        let mut buf = [0u8; 2];
        self.i2c.write_read(I2C_ADDR, &[addr], &mut buf).await?;
        Ok((((buf[0] & 0x0F) as u16) << 8) | (buf[1] as u16))
    }

    /// Read the chip ID (0x64 on a healthy FT6336U).
    pub async fn chip_id(&mut self) -> Result<u8, Error<I2C::Error>> {
        self.read_byte(ADDR_CHIP_ID).await
    }

    /// Disable interrupt generation; the sampler polls instead.
    pub async fn set_polling_mode(&mut self) -> Result<(), Error<I2C::Error>> {
        self.write_byte(ADDR_G_MODE, 0).await
    }

    /// One scan: the primary touch point, or `None` when nothing touches
    /// the panel.
    pub async fn sample(&mut self) -> Result<Option<TouchPoint>, Error<I2C::Error>> {
        let touches = self.read_byte(ADDR_TD_STATUS).await? & 0x0F;
        if touches == 0 {
            return Ok(None);
        }

        let x = self.read_coord(ADDR_TOUCH1_X).await?;
        let y = self.read_coord(ADDR_TOUCH1_Y).await?;
        Ok(Some(TouchPoint::new(x, y)))
    }
}
