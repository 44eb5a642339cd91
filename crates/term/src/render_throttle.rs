//! Frame pacing for the playback UI.
//!
//! While tiles are animating every tick may change the picture, so frames are
//! drawn unthrottled. When nothing animates the view is redrawn only when its
//! fingerprint changes, or once per `min_static_interval_ms` as a refresh.

#[derive(Debug, Clone)]
pub struct RenderThrottle {
    min_static_interval_ms: u64,
    last_render_ms: u64,
    last_fingerprint: Option<u64>,
}

impl RenderThrottle {
    pub fn new(min_static_interval_ms: u64) -> Self {
        Self {
            min_static_interval_ms,
            last_render_ms: 0,
            last_fingerprint: None,
        }
    }

    /// Decide whether to draw a frame.
    ///
    /// - `animating=true`: always draw.
    /// - `animating=false`: draw on fingerprint change, otherwise at most once
    ///   per `min_static_interval_ms`.
    pub fn should_render(&mut self, now_ms: u64, fingerprint: u64, animating: bool) -> bool {
        let changed = self.last_fingerprint != Some(fingerprint);
        let stale = now_ms.saturating_sub(self.last_render_ms) >= self.min_static_interval_ms;
        if animating || changed || stale {
            self.last_render_ms = now_ms;
            self.last_fingerprint = Some(fingerprint);
            return true;
        }
        false
    }

    /// Force the next call to draw, e.g. after a terminal resize.
    pub fn invalidate(&mut self) {
        self.last_fingerprint = None;
    }
}
