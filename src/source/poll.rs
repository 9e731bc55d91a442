use super::WordSource;
use nb::block;

/// A word source whose reads complete asynchronously.
///
/// Typical of on-chip EEPROM controllers: a read is started, and the
/// controller is polled until it reports the word or a failure.
pub trait PollingWordSource {
    /// Error produced when a read fails.
    type Error: core::fmt::Debug;

    /// Starts or continues the read of `offset`.
    ///
    /// Returns `nb::Error::WouldBlock` until the word is available.
    fn try_read(&mut self, offset: u32) -> nb::Result<u16, Self::Error>;
}

/// Adapts a [`PollingWordSource`] into a blocking [`WordSource`].
#[derive(Debug)]
pub struct Polled<P> {
    inner: P,
}

impl<P: PollingWordSource> Polled<P> {
    /// Wraps a polling source.
    pub fn new(inner: P) -> Self {
        Self { inner }
    }

    /// Returns the wrapped source.
    pub fn into_inner(self) -> P {
        self.inner
    }
}

impl<P: PollingWordSource> WordSource for Polled<P> {
    type Error = P::Error;

    fn read(&mut self, offset: u32) -> Result<u16, P::Error> {
        block!(self.inner.try_read(offset))
    }
}
