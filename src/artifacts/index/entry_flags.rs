use bitflags::bitflags;

bitflags! {
    /// The 16-bit flags field of an index entry
    ///
    /// ```text
    /// bit 15      assume-valid
    /// bit 14      extended
    /// bits 12-13  merge stage
    /// bits 0-11   name length, saturated at 0xFFF
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct EntryFlags: u16 {
        const ASSUME_VALID = 0x8000;
        const EXTENDED = 0x4000;
        const STAGE = 0x3000;
        const NAME_LENGTH = 0x0FFF;
    }
}

impl EntryFlags {
    /// Flags for a stage-0 entry whose path is `name_length` bytes long
    pub fn for_name(name_length: usize) -> Self {
        let name_length = name_length.min(Self::NAME_LENGTH.bits() as usize) as u16;
        Self::from_bits_retain(name_length)
    }

    pub fn assume_valid(&self) -> bool {
        self.contains(Self::ASSUME_VALID)
    }

    pub fn extended(&self) -> bool {
        self.contains(Self::EXTENDED)
    }

    pub fn stage(&self) -> u8 {
        ((self.bits() & Self::STAGE.bits()) >> 12) as u8
    }

    pub fn name_length(&self) -> u16 {
        self.bits() & Self::NAME_LENGTH.bits()
    }
}
