//! Center-biased subvolume coordinate sampling
//!
//! Subvolume centers are drawn per axis from a normal distribution centered on
//! the volume and truncated so that the whole subvolume stays inside it.

use rand::distributions::Distribution;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Exp1, StandardNormal};

use crate::config::VolumeGeometry;
use crate::error::PrepareError;
use crate::types::CoordBox;

/// Normal distribution restricted to `[mean + a*sigma, mean + b*sigma]`.
///
/// `a` and `b` are the standardized bounds, in units of standard deviations
/// from the mean.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TruncatedNormal {
    mean: f64,
    sigma: f64,
    a: f64,
    b: f64,
}

// Below this width (in standard deviations) a uniform proposal beats a normal one
const NARROW_INTERVAL: f64 = 2.5;

impl TruncatedNormal {
    pub fn new(mean: f64, sigma: f64, a: f64, b: f64) -> Result<Self, PrepareError> {
        if !(mean.is_finite() && a.is_finite() && b.is_finite()) {
            return Err(PrepareError::SamplingConfig(format!(
                "non-finite truncated normal parameters: mean {mean}, bounds ({a}, {b})"
            )));
        }
        if !(sigma.is_finite() && sigma > 0.0) {
            return Err(PrepareError::SamplingConfig(format!(
                "standard deviation must be positive, got {sigma}"
            )));
        }
        if a > b {
            return Err(PrepareError::SamplingConfig(format!(
                "lower bound {a} exceeds upper bound {b}"
            )));
        }
        Ok(Self { mean, sigma, a, b })
    }

    /// Distribution of subvolume centers along one axis of `volume` voxels.
    ///
    /// The axis must come from a validated [`VolumeGeometry`], which keeps
    /// `a < b`.
    pub fn for_axis(volume: u32, half_subvolume: u32) -> Self {
        let mean = f64::from(volume / 2);
        let sigma = f64::from(volume) / 4.0;
        let half = f64::from(half_subvolume);
        Self {
            mean,
            sigma,
            a: (half - mean + 1.0) / sigma,
            b: (f64::from(volume) - half - mean) / sigma,
        }
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    pub fn bounds(&self) -> (f64, f64) {
        (self.a, self.b)
    }

    pub fn lower(&self) -> f64 {
        self.mean + self.a * self.sigma
    }

    pub fn upper(&self) -> f64 {
        self.mean + self.b * self.sigma
    }

    /// Standardized draw from `[a, b]`
    fn sample_standard<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let (a, b) = (self.a, self.b);
        if a >= b {
            return a;
        }
        if b - a < NARROW_INTERVAL {
            return sample_uniform_proposal(rng, a, b);
        }
        if a <= 0.0 && b >= 0.0 {
            // At least ~40% of the standard normal mass lies in [a, b]
            loop {
                let z: f64 = rng.sample(StandardNormal);
                if z >= a && z <= b {
                    return z;
                }
            }
        }
        if a > 0.0 {
            sample_tail(rng, a, b)
        } else {
            -sample_tail(rng, -b, -a)
        }
    }
}

// Uniform proposal over [a, b], accepted against the density ratio to its peak
fn sample_uniform_proposal<R: Rng + ?Sized>(rng: &mut R, a: f64, b: f64) -> f64 {
    let peak = if a > 0.0 {
        a
    } else if b < 0.0 {
        b
    } else {
        0.0
    };
    loop {
        let z = rng.gen_range(a..=b);
        let ratio = ((peak * peak - z * z) / 2.0).exp();
        if rng.gen::<f64>() <= ratio {
            return z;
        }
    }
}

// Exponential proposal for an upper tail [a, b] with 0 < a and b - a >= NARROW_INTERVAL
fn sample_tail<R: Rng + ?Sized>(rng: &mut R, a: f64, b: f64) -> f64 {
    let rate = (a + (a * a + 4.0).sqrt()) / 2.0;
    loop {
        let step: f64 = rng.sample(Exp1);
        let z = a + step / rate;
        if z > b {
            continue;
        }
        let ratio = (-(z - rate) * (z - rate) / 2.0).exp();
        if rng.gen::<f64>() <= ratio {
            return z;
        }
    }
}

impl Distribution<f64> for TruncatedNormal {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        if self.a >= self.b {
            return self.lower();
        }
        let z = self.sample_standard(rng);
        (self.mean + self.sigma * z).clamp(self.lower(), self.upper())
    }
}

/// Draws subvolume bounding boxes inside a fixed volume.
pub struct CoordinateSampler {
    geometry: VolumeGeometry,
    axes: [TruncatedNormal; 3],
    rng: StdRng,
    seed: u64,
}

impl CoordinateSampler {
    pub fn new(geometry: VolumeGeometry, seed: u64) -> Self {
        let volume = geometry.volume_shape();
        let half = geometry.half_subvolume_shape();
        let axes = [0, 1, 2].map(|axis| TruncatedNormal::for_axis(volume[axis], half[axis]));
        Self {
            geometry,
            axes,
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    /// Sampler seeded from OS entropy; the seed is kept so the run can be repeated.
    pub fn from_entropy(geometry: VolumeGeometry) -> Self {
        let seed = rand::thread_rng().gen::<u64>();
        Self::new(geometry, seed)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn geometry(&self) -> &VolumeGeometry {
        &self.geometry
    }

    pub fn axis_distribution(&self, axis: usize) -> &TruncatedNormal {
        &self.axes[axis]
    }

    /// Draw one box; `end - start` equals the subvolume shape on every axis.
    pub fn sample_box(&mut self) -> CoordBox {
        let half = self.geometry.half_subvolume_shape();
        let mut coords = [[0i64; 2]; 3];
        for (axis, row) in coords.iter_mut().enumerate() {
            let center = self.axes[axis].sample(&mut self.rng).round() as i64;
            let half = i64::from(half[axis]);
            *row = [center - half, center + half];
        }
        CoordBox(coords)
    }

    /// Draw `n` independent boxes, possibly overlapping.
    pub fn sample_boxes(&mut self, n: usize) -> Vec<CoordBox> {
        (0..n).map(|_| self.sample_box()).collect()
    }
}
