//! Random Number Generator.

use crate::pbrt::*;

/// 1 - epsilon for `Float` (0.99999994).
pub const ONE_MINUS_EPSILON: Float = hexf32!("0x1.fffffep-1");

const PCG32_DEFAULT_STATE: u64 = 0x853c49e6748fea9b;
const PCG32_DEFAULT_STREAM: u64 = 0xda3e39cb94b95bdb;
const PCG32_MULT: u64 = 0x5851f42d4c957f2d;

/// PCG32 pseudo-random number generator.
#[derive(Clone, Debug)]
pub struct RNG {
    state: u64,
    inc: u64,
}

impl Default for RNG {
    /// Return a new instance of `RNG` with default state and stream.
    fn default() -> Self {
        Self {
            state: PCG32_DEFAULT_STATE,
            inc: PCG32_DEFAULT_STREAM,
        }
    }
}

impl RNG {
    /// Create a new `RNG` on the stream selected by `sequence_index`.
    ///
    /// * `sequence_index` - The stream to use.
    pub fn new(sequence_index: u64) -> Self {
        let mut rng = Self { state: 0, inc: 0 };
        rng.set_sequence(sequence_index);
        rng
    }

    /// Restart the generator on the stream selected by `sequence_index`.
    ///
    /// * `sequence_index` - The stream to use.
    pub fn set_sequence(&mut self, sequence_index: u64) {
        self.state = 0;
        self.inc = (sequence_index << 1) | 1;
        self.uniform_u32();
        self.state = self.state.wrapping_add(PCG32_DEFAULT_STATE);
        self.uniform_u32();
    }

    /// Returns a uniformly distributed u32 value.
    #[inline(always)]
    pub fn uniform_u32(&mut self) -> u32 {
        let old_state = self.state;
        self.state = old_state.wrapping_mul(PCG32_MULT).wrapping_add(self.inc);

        let xor_shifted = (((old_state >> 18) ^ old_state) >> 27) as u32;
        let rot = (old_state >> 59) as u32;
        xor_shifted.rotate_right(rot)
    }

    /// Returns a uniformly distributed value over the half open interval [0.0, 1.0).
    #[inline(always)]
    pub fn uniform_float(&mut self) -> Float {
        min(self.uniform_u32() as Float * hexf32!("0x1.0p-32"), ONE_MINUS_EPSILON)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn streams_are_deterministic() {
        let mut a = RNG::new(42);
        let mut b = RNG::new(42);
        let mut c = RNG::new(43);
        let xs: Vec<u32> = (0..8).map(|_| a.uniform_u32()).collect();
        let ys: Vec<u32> = (0..8).map(|_| b.uniform_u32()).collect();
        let zs: Vec<u32> = (0..8).map(|_| c.uniform_u32()).collect();
        assert_eq!(xs, ys);
        assert_ne!(xs, zs);
    }

    #[test]
    fn uniform_float_in_unit_interval() {
        let mut rng = RNG::new(7);
        let mut sum = 0.0;
        let n = 10_000;
        for _ in 0..n {
            let u = rng.uniform_float();
            assert!((0.0..1.0).contains(&u));
            sum += u;
        }
        let mean = sum / n as Float;
        assert!((mean - 0.5).abs() < 0.02);
    }
}
