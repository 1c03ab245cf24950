//! Present pacing for the terminal frontend.
//!
//! Pushing a full terminal frame is far more expensive than drawing the
//! map, so frames are only presented when the scene changed or a refresh
//! interval elapsed.

#[derive(Debug, Clone)]
pub struct RedrawThrottle {
    min_idle_interval_ms: u64,
    last_present_ms: u64,
    last_fingerprint: u64,
    has_presented: bool,
}

impl RedrawThrottle {
    pub fn new(min_idle_interval_ms: u64) -> Self {
        Self {
            min_idle_interval_ms,
            last_present_ms: 0,
            last_fingerprint: 0,
            has_presented: false,
        }
    }

    /// Decide whether to present a new frame.
    ///
    /// `fingerprint` summarizes everything visible (camera position, sprite
    /// positions). A changed fingerprint presents immediately; an unchanged
    /// one at most once per `min_idle_interval_ms`.
    pub fn should_present(&mut self, now_ms: u64, fingerprint: u64) -> bool {
        if !self.has_presented || fingerprint != self.last_fingerprint {
            self.has_presented = true;
            self.last_present_ms = now_ms;
            self.last_fingerprint = fingerprint;
            return true;
        }

        if now_ms.saturating_sub(self.last_present_ms) >= self.min_idle_interval_ms {
            self.last_present_ms = now_ms;
            return true;
        }

        false
    }
}

/// Fold camera and sprite positions into one fingerprint (FNV-1a).
pub fn scene_fingerprint(values: impl IntoIterator<Item = i32>) -> u64 {
    let mut h: u64 = 0xcbf2_9ce4_8422_2325;
    for v in values {
        for b in v.to_le_bytes() {
            h ^= b as u64;
            h = h.wrapping_mul(0x0100_0000_01b3);
        }
    }
    h
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_depends_on_order_and_values() {
        assert_eq!(scene_fingerprint([1, 2]), scene_fingerprint([1, 2]));
        assert_ne!(scene_fingerprint([1, 2]), scene_fingerprint([2, 1]));
        assert_ne!(scene_fingerprint([0]), scene_fingerprint([]));
    }
}
