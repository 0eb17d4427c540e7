/// Which palette is active, cycling through `count` palettes in load order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PaletteCursor {
    index: usize,
    count: usize,
}

impl PaletteCursor {
    /// Returns `None` for an empty palette set.
    pub fn new(count: usize) -> Option<Self> {
        (count > 0).then_some(Self { index: 0, count })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Moves to the next palette, wrapping to the first, and returns the new
    /// index.
    pub fn advance(&mut self) -> usize {
        self.index = (self.index + 1) % self.count;
        self.index
    }
}
