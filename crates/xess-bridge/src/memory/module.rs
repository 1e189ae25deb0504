use crate::error::Result;

/// Read-only view of a loaded module: base address and mapped bytes.
#[derive(Debug, Clone, Copy)]
pub struct ModuleImage<'a> {
    base: usize,
    bytes: &'a [u8],
}

impl<'a> ModuleImage<'a> {
    pub fn new(base: usize, bytes: &'a [u8]) -> Self {
        Self { base, bytes }
    }

    pub fn base(&self) -> usize {
        self.base
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// One past the last mapped byte.
    pub fn end(&self) -> usize {
        self.base + self.bytes.len()
    }

    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    pub fn contains(&self, address: usize) -> bool {
        address >= self.base && address < self.end()
    }

    /// Bytes from `address` to the end of the module.
    pub fn slice_from(&self, address: usize) -> Option<&'a [u8]> {
        if !self.contains(address) {
            return None;
        }
        Some(&self.bytes[address - self.base..])
    }

    pub fn read_bytes(&self, address: usize, len: usize) -> Option<&'a [u8]> {
        let start = address.checked_sub(self.base)?;
        let end = start.checked_add(len)?;
        self.bytes.get(start..end)
    }

    /// Little-endian `i32` at `address`; `None` if any byte is outside the module.
    pub fn read_i32(&self, address: usize) -> Option<i32> {
        let bytes = self.read_bytes(address, 4)?;
        Some(i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }
}

/// Resolves a module name to its mapped image.
pub trait ModuleProvider {
    /// Fails with `Error::ModuleNotFound` when the module is not loaded.
    fn module(&self, name: &str) -> Result<ModuleImage<'_>>;
}

impl<T: ModuleProvider + ?Sized> ModuleProvider for &T {
    fn module(&self, name: &str) -> Result<ModuleImage<'_>> {
        (**self).module(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds() {
        let bytes = [0u8; 0x10];
        let image = ModuleImage::new(0x1000, &bytes);
        assert_eq!(image.size(), 0x10);
        assert_eq!(image.end(), 0x1010);
        assert!(image.contains(0x1000));
        assert!(image.contains(0x100F));
        assert!(!image.contains(0x1010));
        assert!(!image.contains(0x0FFF));
    }

    #[test]
    fn test_slice_from() {
        let bytes = [1u8, 2, 3, 4];
        let image = ModuleImage::new(0x2000, &bytes);
        assert_eq!(image.slice_from(0x2002), Some(&bytes[2..]));
        assert_eq!(image.slice_from(0x2004), None);
    }

    #[test]
    fn test_read_i32() {
        let bytes = [0x00, 0xFC, 0xFF, 0xFF, 0xFF, 0x10];
        let image = ModuleImage::new(0x3000, &bytes);
        assert_eq!(image.read_i32(0x3001), Some(-4));
        // Last two bytes are not enough for a full read
        assert_eq!(image.read_i32(0x3003), None);
        assert_eq!(image.read_i32(0x2FFF), None);
        assert_eq!(image.read_i32(usize::MAX), None);
    }
}
