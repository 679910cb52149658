use std::fmt;
use std::sync::Arc;

use glam::{UVec2, Vec2};

use crate::texture::raster::RasterImage;
use crate::texture::sprite::{FrameRect, FrameSource};
use crate::texture::target::{Color, DrawTarget, Rect};

/// Drawn in place of a sheet that failed to load.
pub const PLACEHOLDER_COLOR: Color = Color::rgba(255, 255, 255, 224);

/// Playback state for one spritesheet.
///
/// Time accumulates across calls to [`FrameAnimator::advance`] and whole frame periods are
/// consumed one at a time, so several small deltas and one large delta land on the same frame.
pub struct FrameAnimator {
    image: Option<Arc<RasterImage>>,
    source: FrameSource,
    current_frame: usize,
    current_row: usize,
    sequence_index: usize,
    elapsed: f32,
    fps: f32,
    playing: bool,
    looping: bool,
    start_frame: usize,
    sequence: Option<Vec<usize>>,
    on_complete: Option<Box<dyn FnMut()>>,
    completed: bool,
    placeholder: Color,
}

impl fmt::Debug for FrameAnimator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameAnimator")
            .field("source", &self.source)
            .field("has_image", &self.image.is_some())
            .field("current_frame", &self.current_frame)
            .field("current_row", &self.current_row)
            .field("elapsed", &self.elapsed)
            .field("fps", &self.fps)
            .field("playing", &self.playing)
            .field("looping", &self.looping)
            .field("sequence", &self.sequence)
            .finish_non_exhaustive()
    }
}

impl FrameAnimator {
    /// Creates a looping, playing animator. `image` is `None` when the sheet failed to load.
    pub fn new(image: Option<Arc<RasterImage>>, source: FrameSource, fps: f32) -> Self {
        Self {
            image,
            source,
            current_frame: 0,
            current_row: 0,
            sequence_index: 0,
            elapsed: 0.0,
            fps,
            playing: true,
            looping: true,
            start_frame: 0,
            sequence: None,
            on_complete: None,
            completed: false,
            placeholder: PLACEHOLDER_COLOR,
        }
    }

    pub fn current_frame(&self) -> usize {
        self.current_frame
    }

    pub fn current_row(&self) -> usize {
        self.current_row
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn source(&self) -> &FrameSource {
        &self.source
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    /// Color of the disc drawn while the sheet is missing.
    pub fn set_placeholder(&mut self, color: Color) {
        self.placeholder = color;
    }

    pub fn set_fps(&mut self, fps: f32) {
        self.fps = fps;
    }

    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    pub fn set_start_frame(&mut self, frame: usize) {
        self.start_frame = frame;
    }

    /// Sets (or clears) an explicit frame order. Takes effect on the next [`reset`](Self::reset).
    pub fn set_sequence(&mut self, sequence: Option<Vec<usize>>) {
        self.sequence = sequence.filter(|s| !s.is_empty());
        self.sequence_index = 0;
    }

    /// Registers a callback fired once each time a non-looping run reaches its last frame.
    pub fn on_complete(&mut self, callback: impl FnMut() + 'static) {
        self.on_complete = Some(Box::new(callback));
    }

    /// Switches rows, rewinding to the start frame so a direction change never lands mid-stride.
    pub fn set_row(&mut self, row: usize) {
        if row == self.current_row {
            return;
        }
        self.current_row = row;
        self.sequence_index = 0;
        self.current_frame = self.first_frame();
        self.elapsed = 0.0;
    }

    /// Rewinds to the first frame and sets the playing flag.
    pub fn reset(&mut self, play: bool) {
        self.sequence_index = 0;
        self.current_frame = self.first_frame();
        self.elapsed = 0.0;
        self.playing = play;
        self.completed = false;
    }

    fn first_frame(&self) -> usize {
        match &self.sequence {
            Some(sequence) => sequence[0],
            None => self.start_frame,
        }
    }

    /// Consumes whole frame periods from the accumulated time.
    pub fn advance(&mut self, dt: f32) {
        if !self.playing || self.fps <= 0.0 {
            return;
        }

        let period = 1.0 / self.fps;
        self.elapsed += dt;
        while self.elapsed >= period {
            self.elapsed -= period;
            self.step();
            if !self.playing {
                break;
            }
        }
    }

    fn step(&mut self) {
        let (next, len) = match &self.sequence {
            Some(sequence) => (self.sequence_index + 1, sequence.len()),
            None => (self.current_frame + 1, self.source.columns()),
        };

        if next < len {
            match &self.sequence {
                Some(sequence) => {
                    self.sequence_index = next;
                    self.current_frame = sequence[next];
                }
                None => self.current_frame = next,
            }
            return;
        }

        if self.looping {
            self.sequence_index = 0;
            self.current_frame = self.first_frame();
            return;
        }

        match &self.sequence {
            Some(sequence) => {
                self.sequence_index = len - 1;
                self.current_frame = sequence[len - 1];
            }
            None => self.current_frame = len - 1,
        }
        self.finish();
    }

    fn finish(&mut self) {
        self.playing = false;
        self.elapsed = 0.0;
        if self.completed {
            return;
        }
        self.completed = true;
        if let Some(callback) = self.on_complete.as_mut() {
            callback();
        }
    }

    /// Source rectangle for any `(frame, row)`, clamped to the sheet's grid.
    pub fn resolve_frame_rect(&self, frame: usize, row: usize) -> FrameRect {
        let sheet = self
            .image
            .as_ref()
            .map_or(UVec2::ZERO, |image| UVec2::new(image.width(), image.height()));
        self.source.resolve(sheet, frame, row)
    }

    /// Draws the current frame into `dest`, or a placeholder disc if the sheet is missing.
    pub fn render(&self, target: &mut dyn DrawTarget, dest: Rect, flip_horizontal: bool) {
        let Some(image) = self.image.as_deref() else {
            let radius = dest.size.x.min(dest.size.y) * 0.5;
            target.fill_circle(dest.center(), radius, self.placeholder);
            return;
        };

        let src = self.resolve_frame_rect(self.current_frame, self.current_row);
        target.blit(image, src, dest, flip_horizontal);
    }

    /// Aspect-correct size of the current frame scaled to `height`.
    pub fn frame_size(&self, height: f32) -> Vec2 {
        let src = self.resolve_frame_rect(self.current_frame, self.current_row);
        if src.is_empty() {
            return Vec2::splat(height);
        }
        Vec2::new(height * src.width as f32 / src.height as f32, height)
    }
}
