//! Seeded Perlin-style gradient noise.
//!
//! The permutation table is shuffled with a linear-congruential sequence so the
//! same seed yields the same field on every platform, independent of the `rand`
//! crate's algorithms.

use noise::NoiseFn;

const LCG_MULTIPLIER: u32 = 1_664_525;
const LCG_INCREMENT: u32 = 1_013_904_223;

/// 2D/3D gradient noise with a 512-entry mirrored permutation table.
#[derive(Clone)]
pub struct GradientNoise {
    seed: u32,
    perm: [u8; 512],
}

impl std::fmt::Debug for GradientNoise {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GradientNoise")
            .field("seed", &self.seed)
            .field("perm", &"<512 entries>")
            .finish()
    }
}

impl GradientNoise {
    /// Build the permutation table for `seed`.
    pub fn new(seed: u32) -> Self {
        let mut table: [u8; 256] = std::array::from_fn(|i| i as u8);
        let mut state = seed;
        for i in (1..256).rev() {
            state = state.wrapping_mul(LCG_MULTIPLIER).wrapping_add(LCG_INCREMENT);
            // High bits of an LCG are the well-distributed ones.
            let j = ((state >> 16) as usize) % (i + 1);
            table.swap(i, j);
        }

        let mut perm = [0u8; 512];
        for (i, slot) in perm.iter_mut().enumerate() {
            *slot = table[i & 255];
        }

        Self { seed, perm }
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    #[inline]
    fn hash(&self, i: usize) -> usize {
        self.perm[i] as usize
    }

    /// 2D noise in roughly `[-1, 1]`.
    pub fn perlin2(&self, x: f64, y: f64) -> f64 {
        let xf = x.floor();
        let yf = y.floor();
        let xi = (xf as i64 & 255) as usize;
        let yi = (yf as i64 & 255) as usize;
        let x = x - xf;
        let y = y - yf;

        let u = fade(x);
        let v = fade(y);

        let a = self.hash(xi) + yi;
        let b = self.hash(xi + 1) + yi;

        let n00 = grad2(self.hash(a), x, y);
        let n10 = grad2(self.hash(b), x - 1.0, y);
        let n01 = grad2(self.hash(a + 1), x, y - 1.0);
        let n11 = grad2(self.hash(b + 1), x - 1.0, y - 1.0);

        lerp(v, lerp(u, n00, n10), lerp(u, n01, n11))
    }

    /// 3D noise in roughly `[-1, 1]`.
    pub fn perlin3(&self, x: f64, y: f64, z: f64) -> f64 {
        let xf = x.floor();
        let yf = y.floor();
        let zf = z.floor();
        let xi = (xf as i64 & 255) as usize;
        let yi = (yf as i64 & 255) as usize;
        let zi = (zf as i64 & 255) as usize;
        let x = x - xf;
        let y = y - yf;
        let z = z - zf;

        let u = fade(x);
        let v = fade(y);
        let w = fade(z);

        let a = self.hash(xi) + yi;
        let aa = self.hash(a) + zi;
        let ab = self.hash(a + 1) + zi;
        let b = self.hash(xi + 1) + yi;
        let ba = self.hash(b) + zi;
        let bb = self.hash(b + 1) + zi;

        lerp(
            w,
            lerp(
                v,
                lerp(u, grad3(self.hash(aa), x, y, z), grad3(self.hash(ba), x - 1.0, y, z)),
                lerp(
                    u,
                    grad3(self.hash(ab), x, y - 1.0, z),
                    grad3(self.hash(bb), x - 1.0, y - 1.0, z),
                ),
            ),
            lerp(
                v,
                lerp(
                    u,
                    grad3(self.hash(aa + 1), x, y, z - 1.0),
                    grad3(self.hash(ba + 1), x - 1.0, y, z - 1.0),
                ),
                lerp(
                    u,
                    grad3(self.hash(ab + 1), x, y - 1.0, z - 1.0),
                    grad3(self.hash(bb + 1), x - 1.0, y - 1.0, z - 1.0),
                ),
            ),
        )
    }
}

impl NoiseFn<f64, 2> for GradientNoise {
    fn get(&self, point: [f64; 2]) -> f64 {
        self.perlin2(point[0], point[1])
    }
}

impl NoiseFn<f64, 3> for GradientNoise {
    fn get(&self, point: [f64; 3]) -> f64 {
        self.perlin3(point[0], point[1], point[2])
    }
}

/// Quintic fade `6t^5 - 15t^4 + 10t^3`: zero first and second derivative at lattice points.
#[inline]
fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn lerp(t: f64, a: f64, b: f64) -> f64 {
    a + t * (b - a)
}

/// Dot product with one of eight unit-ish 2D gradients.
#[inline]
fn grad2(hash: usize, x: f64, y: f64) -> f64 {
    match hash & 7 {
        0 => x + y,
        1 => -x + y,
        2 => x - y,
        3 => -x - y,
        4 => x,
        5 => -x,
        6 => y,
        _ => -y,
    }
}

/// Dot product with one of the twelve cube-edge gradients (padded to 16).
#[inline]
fn grad3(hash: usize, x: f64, y: f64, z: f64) -> f64 {
    let h = hash & 15;
    let u = if h < 8 { x } else { y };
    let v = if h < 4 {
        y
    } else if h == 12 || h == 14 {
        x
    } else {
        z
    };
    (if h & 1 == 0 { u } else { -u }) + (if h & 2 == 0 { v } else { -v })
}
