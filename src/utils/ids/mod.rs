use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Issues random 16-hex-character identifiers.
///
/// Nothing is remembered between calls, so a long cleaner run stays at constant
/// memory. A 64-bit draw makes a repeat within one corpus negligible.
pub struct IdMinter<R: Rng = StdRng> {
    rng: R,
    minted: usize,
}

impl IdMinter<StdRng> {
    pub fn from_entropy() -> Self {
        IdMinter::new(StdRng::from_entropy())
    }
}

impl<R: Rng> IdMinter<R> {
    pub fn new(rng: R) -> Self {
        IdMinter { rng, minted: 0 }
    }

    pub fn mint(&mut self) -> String {
        self.minted += 1;
        hex::encode(self.rng.gen::<u64>().to_be_bytes())
    }

    pub fn minted(&self) -> usize {
        self.minted
    }
}
