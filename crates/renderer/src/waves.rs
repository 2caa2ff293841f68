//! Gerstner wave parameters fed to the tessellation evaluation stage.

use std::fmt;

use glam::Vec2;

/// Number of wave slots the ocean shader declares.
pub const MAX_WAVES: usize = 4;

/// A single trochoidal wave component.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GerstnerWave {
    pub direction: Vec2,
    pub amplitude: f32,
    pub steepness: f32,
    pub frequency: f32,
    pub speed: f32,
}

impl GerstnerWave {
    /// Builds a wave whose direction is `(sin(x_angle), cos(z_angle))`.
    ///
    /// The two angles are independent, so the direction is only normalised
    /// when they coincide.
    pub fn from_angles(
        x_angle: f32,
        z_angle: f32,
        amplitude: f32,
        steepness: f32,
        frequency: f32,
        speed: f32,
    ) -> Self {
        Self {
            direction: Vec2::new(x_angle.sin(), z_angle.cos()),
            amplitude,
            steepness,
            frequency,
            speed,
        }
    }
}

/// Fixed set of wave slots uploaded every frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaveParameterSet {
    waves: [GerstnerWave; MAX_WAVES],
}

impl WaveParameterSet {
    pub fn new(waves: [GerstnerWave; MAX_WAVES]) -> Self {
        Self { waves }
    }

    /// The stock ocean: a long swell, a cross chop, a fast ripple and a tall roller.
    pub fn ocean() -> Self {
        Self::new([
            GerstnerWave::from_angles(0.32, 0.32, 1.64, 1.64, 3.0, 2.0),
            GerstnerWave::from_angles(0.75, 0.25, 2.5, 0.5, 1.0, 0.3),
            GerstnerWave::from_angles(1.0, 1.0, 1.25, 1.3, 4.0, 4.0),
            GerstnerWave::from_angles(0.5, 0.5, 6.0, 2.5, 2.0, 1.0),
        ])
    }

    pub fn slots(&self) -> &[GerstnerWave; MAX_WAVES] {
        &self.waves
    }
}

impl Default for WaveParameterSet {
    fn default() -> Self {
        Self::ocean()
    }
}

/// How many wave slots the shader sums, always within `1..=MAX_WAVES`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WaveCount(u32);

impl WaveCount {
    pub const MIN: WaveCount = WaveCount(1);
    pub const MAX: WaveCount = WaveCount(MAX_WAVES as u32);

    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for WaveCount {
    fn default() -> Self {
        Self::MIN
    }
}

impl TryFrom<u32> for WaveCount {
    type Error = WaveCountError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        if (Self::MIN.0..=Self::MAX.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(WaveCountError(value))
        }
    }
}

impl fmt::Display for WaveCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("wave count {0} is outside the supported range 1..={}", MAX_WAVES)]
pub struct WaveCountError(pub u32);
