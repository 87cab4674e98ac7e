use crate::foundation::math::exp_approach;

/// Per-tick band energies, each in `[0, 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AudioFeatures {
    pub bass: f64,
    pub mid: f64,
    pub high: f64,
    pub energy: f64,
}

impl AudioFeatures {
    pub fn new(bass: f64, mid: f64, high: f64, energy: f64) -> Self {
        Self {
            bass,
            mid,
            high,
            energy,
        }
    }

    /// Clamp every band into `[0, 1]`; non-finite samples read as silence.
    pub fn sanitized(self) -> Self {
        fn unit(v: f64) -> f64 {
            if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 }
        }
        Self {
            bass: unit(self.bass),
            mid: unit(self.mid),
            high: unit(self.high),
            energy: unit(self.energy),
        }
    }
}

/// Exponential low-pass filter over a single scalar.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FeatureSmoother {
    rate: f64,
    value: f64,
}

impl FeatureSmoother {
    pub fn new(rate: f64) -> Self {
        Self { rate, value: 0.0 }
    }

    pub fn update(&mut self, sample: f64, dt: f64) -> f64 {
        self.value += (sample - self.value) * exp_approach(self.rate, dt);
        self.value
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn reset(&mut self) {
        self.value = 0.0;
    }
}

/// One [`FeatureSmoother`] per band.
#[derive(Clone, Copy, Debug)]
pub struct BandSmoother {
    bass: FeatureSmoother,
    mid: FeatureSmoother,
    high: FeatureSmoother,
    energy: FeatureSmoother,
}

impl BandSmoother {
    pub fn new(cfg: &crate::config::model::SmoothingConfig) -> Self {
        Self {
            bass: FeatureSmoother::new(cfg.bass_rate),
            mid: FeatureSmoother::new(cfg.mid_rate),
            high: FeatureSmoother::new(cfg.high_rate),
            energy: FeatureSmoother::new(cfg.energy_rate),
        }
    }

    pub fn update(&mut self, raw: AudioFeatures, dt: f64) -> AudioFeatures {
        let raw = raw.sanitized();
        AudioFeatures {
            bass: self.bass.update(raw.bass, dt),
            mid: self.mid.update(raw.mid, dt),
            high: self.high.update(raw.high, dt),
            energy: self.energy.update(raw.energy, dt),
        }
    }
}
