const RANDNUM_W: u32 = 521288629;
const RANDNUM_Z: u32 = 362436069;

/// Multiply-with-carry generator with a 32-bit (w, z) state pair.
/// Every worker carries its own instance; seeding with the same value
/// always replays the same sequence, which the parallel kernel relies
/// on to give every rank an identical copy of the synthetic points
/// without any cross-rank coordination.
#[derive(Debug, Clone)]
pub struct Randnum {
    w: u32,
    z: u32,
}

impl Randnum {
    pub fn new() -> Self {
        Self {
            w: RANDNUM_W,
            z: RANDNUM_Z,
        }
    }

    pub fn from_seed(seed: i32) -> Self {
        let mut ret = Self::new();
        ret.seed(seed);
        ret
    }

    /// Re-initialize the state pair. A derived word of zero would
    /// collapse the recurrence to an all-zero cycle, so it remaps to
    /// the power-on constant.
    pub fn seed(&mut self, seed: i32) {
        let w = seed.wrapping_mul(104623) as u32;
        self.w = if w != 0 { w } else { RANDNUM_W };
        let z = seed.wrapping_mul(48947) as u32;
        self.z = if z != 0 { z } else { RANDNUM_Z };
    }

    pub fn next(&mut self) -> u32 {
        self.z = 36969u32
            .wrapping_mul(self.z & 0xffff)
            .wrapping_add(self.z >> 16);
        self.w = 18000u32
            .wrapping_mul(self.w & 0xffff)
            .wrapping_add(self.w >> 16);
        (self.z << 16).wrapping_add(self.w)
    }
}

impl Default for Randnum {
    fn default() -> Self {
        Self::new()
    }
}
