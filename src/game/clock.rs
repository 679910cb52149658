/// Converts absolute frame timestamps into bounded simulation deltas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameClock {
    last: Option<f64>,
    ceiling: f32,
}

impl FrameClock {
    pub fn new(ceiling: f32) -> Self {
        Self { last: None, ceiling }
    }

    /// Seconds since the previous call, clamped to `[0, ceiling]`. The first call yields zero.
    pub fn delta(&mut self, time: f64) -> f32 {
        let dt = match self.last {
            Some(last) => ((time - last) as f32).max(0.0).min(self.ceiling),
            None => 0.0,
        };
        self.last = Some(time);
        dt
    }
}
