use bitflags::bitflags;

bitflags! {
    /// Directions of an endpoint closed by its owner.
    ///
    /// Closes accumulate: closing `READ` and later `WRITE` leaves the endpoint
    /// at `BOTH`. `NONE` is the state every endpoint starts in.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CloseDirection: u8 {
        const NONE = 0;
        const READ = 0b01;
        const WRITE = 0b10;
        const BOTH = Self::READ.bits() | Self::WRITE.bits();
    }
}

impl CloseDirection {
    #[inline]
    pub fn includes_read(self) -> bool {
        self.contains(CloseDirection::READ)
    }

    #[inline]
    pub fn includes_write(self) -> bool {
        self.contains(CloseDirection::WRITE)
    }
}
