// Microphone level meter driving the waveform bars
//
// Each update computes the RMS of a block of time-domain samples, boosts it
// so normal speech fills most of the range, and spreads it over a handful of
// bars whose heights are modulated by a slowly advancing phase.
//
// This is a view-side helper: `MediaTrack` carries no samples, so whoever
// renders the microphone stream feeds its PCM blocks in through `update`.

/// Relative weight of each waveform bar
pub const WAVEFORM_BARS: [f32; 5] = [0.35, 0.6, 0.9, 0.6, 0.35];

const LEVEL_GAIN: f32 = 3.2;
const PHASE_STEP: f32 = 0.22;
const BAR_PHASE_OFFSET: f32 = 0.7;
const BAR_FLOOR: f32 = 0.08;
const IDLE_BAR_LEVEL: f32 = 0.2;

#[derive(Debug, Clone)]
pub struct AudioMeter {
    level: f32,
    phase: f32,
    bars: [f32; WAVEFORM_BARS.len()],
}

impl Default for AudioMeter {
    fn default() -> Self {
        Self {
            level: 0.0,
            phase: 0.0,
            bars: [IDLE_BAR_LEVEL; WAVEFORM_BARS.len()],
        }
    }
}

impl AudioMeter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one block of 16-bit PCM samples and advance the animation
    pub fn update(&mut self, samples: &[i16]) {
        self.level = (rms(samples) * LEVEL_GAIN).min(1.0);
        self.phase += PHASE_STEP;

        for (i, (bar, weight)) in self.bars.iter_mut().zip(WAVEFORM_BARS).enumerate() {
            let modulation = 0.6 + 0.4 * (self.phase + i as f32 * BAR_PHASE_OFFSET).sin();
            *bar = (BAR_FLOOR + self.level * weight * modulation).min(1.0);
        }
    }

    /// Back to the idle picture
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Current level in 0.0..=1.0
    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn bars(&self) -> &[f32] {
        &self.bars
    }
}

/// Root mean square of samples normalized to -1.0..1.0
pub fn rms(samples: &[i16]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }

    let sum: f32 = samples
        .iter()
        .map(|&s| {
            let normalized = s as f32 / 32768.0;
            normalized * normalized
        })
        .sum();

    (sum / samples.len() as f32).sqrt()
}
