use super::WordSource;
use core::cell::RefCell;
use critical_section::Mutex;

/// A word source shared through a `critical_section` mutex.
///
/// Lets the decoder read a store that an interrupt handler also owns. Each
/// word is read inside its own critical section.
///
/// ```rust
/// use ath_eeprom::source::{SharedWordSource, WordSource};
/// use core::cell::RefCell;
/// use critical_section::Mutex;
///
/// static IMAGE: Mutex<RefCell<[u16; 4]>> = Mutex::new(RefCell::new([0, 0, 0x3003, 0]));
///
/// let mut shared = SharedWordSource::new(&IMAGE);
/// assert_eq!(shared.read(2), Ok(0x3003));
/// ```
#[derive(Debug)]
pub struct SharedWordSource<'a, S> {
    cell: &'a Mutex<RefCell<S>>,
}

impl<'a, S: WordSource> SharedWordSource<'a, S> {
    /// Borrows the shared source.
    pub const fn new(cell: &'a Mutex<RefCell<S>>) -> Self {
        Self { cell }
    }
}

impl<S: WordSource> WordSource for SharedWordSource<'_, S> {
    type Error = S::Error;

    fn read(&mut self, offset: u32) -> Result<u16, S::Error> {
        critical_section::with(|cs| self.cell.borrow(cs).borrow_mut().read(offset))
    }
}
