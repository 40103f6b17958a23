//! Output level with a mute flag that preserves the stored level.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Volume {
    /// Stored level in `[0, 1]`.
    level: f32,
    muted: bool,
}

impl Volume {
    pub fn new(level: f32) -> Self {
        Self {
            level: clamp_level(level),
            muted: false,
        }
    }

    /// Set the stored level. Any non-zero level clears mute.
    pub fn set_level(&mut self, level: f32) {
        self.level = clamp_level(level);
        if self.level > 0.0 {
            self.muted = false;
        }
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Level actually sent to the output: 0 when muted.
    pub fn effective(&self) -> f32 {
        if self.muted { 0.0 } else { self.level }
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::new(0.7)
    }
}

fn clamp_level(level: f32) -> f32 {
    if level.is_nan() {
        0.0
    } else {
        level.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effective_level_follows_mute() {
        let mut vol = Volume::new(0.5);
        assert_eq!(vol.effective(), 0.5);

        vol.toggle_mute();
        assert!(vol.is_muted());
        assert_eq!(vol.effective(), 0.0);
        assert_eq!(vol.level(), 0.5); // level preserved

        vol.set_level(0.3);
        assert!(!vol.is_muted());
        assert_eq!(vol.effective(), 0.3);
    }

    #[test]
    fn zero_level_does_not_unmute() {
        let mut vol = Volume::new(0.5);
        vol.toggle_mute();
        vol.set_level(0.0);
        assert!(vol.is_muted());
        assert_eq!(vol.effective(), 0.0);
    }

    #[test]
    fn level_is_clamped() {
        assert_eq!(Volume::new(1.7).level(), 1.0);
        assert_eq!(Volume::new(-0.2).level(), 0.0);
        assert_eq!(Volume::new(f32::NAN).level(), 0.0);
    }
}
