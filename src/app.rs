//! Desktop presentation: an SDL window, device event normalization and the frame pacing loop.
//!
//! The window stands in for the overlay. Scene events are logged and reflected in the title,
//! and the confirm key sends whatever action the current state expects.

use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use glam::Vec2;
use sdl2::event::{Event, WindowEvent};
use sdl2::keyboard::Keycode;
use sdl2::mouse::MouseButton;
use sdl2::pixels::{Color as SdlColor, PixelFormatEnum};
use sdl2::rect::Rect as SdlRect;
use sdl2::render::{BlendMode, Canvas, ScaleMode, Texture, TextureCreator};
use sdl2::video::{Window, WindowContext};
use sdl2::EventPump;
use tracing::{debug, info, warn};

use crate::asset::{AssetLoader, LoadedAssets};
use crate::config::SceneConfig;
use crate::constants::LOOP_TIME;
use crate::entity::direction::Direction;
use crate::events::{Action, SceneEvent};
use crate::game::state::SceneState;
use crate::game::GameSession;
use crate::texture::raster::RasterImage;
use crate::texture::sprite::FrameRect;
use crate::texture::target::{Color, DrawTarget, Rect};

/// Draws onto an SDL canvas, uploading each sheet to a texture the first time it is blitted.
pub struct SdlTarget {
    canvas: Canvas<Window>,
    creator: TextureCreator<WindowContext>,
    /// Keyed by sheet address; sheets are shared and never move while animators hold them.
    textures: HashMap<usize, Texture>,
}

impl SdlTarget {
    pub fn new(canvas: Canvas<Window>) -> Self {
        let creator = canvas.texture_creator();
        Self {
            canvas,
            creator,
            textures: HashMap::new(),
        }
    }

    pub fn present(&mut self) {
        self.canvas.present();
    }

    pub fn window_mut(&mut self) -> &mut Window {
        self.canvas.window_mut()
    }

    fn upload(&self, image: &RasterImage) -> Result<Texture> {
        // ABGR8888 is R, G, B, A in memory on little-endian targets.
        let mut texture = self
            .creator
            .create_texture_static(PixelFormatEnum::ABGR8888, image.width(), image.height())?;
        texture.update(None, image.pixels(), image.width() as usize * 4)?;
        texture.set_blend_mode(BlendMode::Blend);
        texture.set_scale_mode(ScaleMode::Nearest);
        Ok(texture)
    }

    fn set_color(&mut self, color: Color) {
        self.canvas.set_blend_mode(BlendMode::Blend);
        self.canvas
            .set_draw_color(SdlColor::RGBA(color.r, color.g, color.b, color.a));
    }
}

fn sdl_rect(rect: Rect) -> SdlRect {
    SdlRect::new(
        rect.pos.x.round() as i32,
        rect.pos.y.round() as i32,
        rect.size.x.round().max(0.0) as u32,
        rect.size.y.round().max(0.0) as u32,
    )
}

impl DrawTarget for SdlTarget {
    fn size(&self) -> (u32, u32) {
        self.canvas.output_size().unwrap_or((0, 0))
    }

    fn clear(&mut self, color: Color) {
        self.set_color(color);
        self.canvas.clear();
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.set_color(color);
        if let Err(e) = self.canvas.fill_rect(sdl_rect(rect)) {
            debug!(error = %e, "fill_rect failed");
        }
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.set_color(color);
        let top = (center.y - radius).floor() as i32;
        let bottom = (center.y + radius).ceil() as i32;
        for y in top..bottom {
            let dy = y as f32 + 0.5 - center.y;
            let half = (radius * radius - dy * dy).max(0.0).sqrt();
            if half <= 0.0 {
                continue;
            }
            let row = SdlRect::new(
                (center.x - half).round() as i32,
                y,
                (half * 2.0).round().max(1.0) as u32,
                1,
            );
            if let Err(e) = self.canvas.fill_rect(row) {
                debug!(error = %e, "fill_circle failed");
                return;
            }
        }
    }

    fn blit(&mut self, image: &RasterImage, src: FrameRect, dest: Rect, flip_horizontal: bool) {
        if src.is_empty() {
            return;
        }
        let key = image as *const RasterImage as usize;
        if !self.textures.contains_key(&key) {
            match self.upload(image) {
                Ok(texture) => {
                    self.textures.insert(key, texture);
                }
                Err(e) => {
                    warn!(error = %e, "Sheet upload failed");
                    return;
                }
            }
        }
        let Some(texture) = self.textures.get(&key) else {
            return;
        };

        let src = SdlRect::new(src.x as i32, src.y as i32, src.width, src.height);
        if let Err(e) = self
            .canvas
            .copy_ex(texture, Some(src), Some(sdl_rect(dest)), 0.0, None, flip_horizontal, false)
        {
            debug!(error = %e, "copy_ex failed");
        }
    }
}

fn direction_for(keycode: Keycode) -> Option<Direction> {
    match keycode {
        Keycode::Up | Keycode::W => Some(Direction::Up),
        Keycode::Down | Keycode::S => Some(Direction::Down),
        Keycode::Left | Keycode::A => Some(Direction::Left),
        Keycode::Right | Keycode::D => Some(Direction::Right),
        _ => None,
    }
}

pub struct App {
    session: GameSession,
    target: SdlTarget,
    event_pump: EventPump,
    assets: Option<Receiver<LoadedAssets>>,
    started: Instant,
}

impl App {
    pub fn new(config: SceneConfig, width: u32, height: u32) -> Result<Self> {
        let sdl_context = sdl2::init().map_err(|e| anyhow!(e))?;
        let video_subsystem = sdl_context.video().map_err(|e| anyhow!(e))?;

        let window = video_subsystem
            .window("heartwalk", width, height)
            .resizable()
            .position_centered()
            .build()?;
        let canvas = window.into_canvas().accelerated().present_vsync().build()?;
        let event_pump = sdl_context.event_pump().map_err(|e| anyhow!(e))?;

        let loader = AssetLoader::from_config(&config.assets);
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            loader.load_all(|assets| {
                if tx.send(assets).is_err() {
                    warn!("Scene closed before assets settled");
                }
            })
        });

        let session = GameSession::new(config, width as f32, height as f32)?;

        Ok(Self {
            session,
            target: SdlTarget::new(canvas),
            event_pump,
            assets: Some(rx),
            started: Instant::now(),
        })
    }

    /// Runs until the window closes.
    pub fn run(&mut self) -> Result<()> {
        info!(
            "Starting scene loop ({:.3}ms)",
            LOOP_TIME.as_secs_f32() * 1000.0
        );
        loop {
            let start = Instant::now();

            if !self.handle_events() {
                info!("Exit requested");
                return Ok(());
            }
            self.poll_assets();

            let time = self.started.elapsed().as_secs_f64();
            self.session.frame(time, &mut self.target);
            self.target.present();
            self.present_events();

            let elapsed = start.elapsed();
            if elapsed < LOOP_TIME {
                spin_sleep::sleep(LOOP_TIME - elapsed);
            } else if elapsed > LOOP_TIME + Duration::from_millis(8) {
                debug!(behind = ?(elapsed - LOOP_TIME), "Frame over budget");
            }
        }
    }

    fn poll_assets(&mut self) {
        let Some(rx) = &self.assets else {
            return;
        };
        if let Ok(assets) = rx.try_recv() {
            self.session.assets_ready(&assets);
            self.assets = None;
        }
    }

    /// Turns raw SDL events into session calls. Returns `false` on quit.
    fn handle_events(&mut self) -> bool {
        for event in self.event_pump.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => return false,
                Event::Window {
                    win_event: WindowEvent::SizeChanged(w, h),
                    ..
                } => self.session.resize(w as f32, h as f32),
                Event::KeyDown {
                    keycode: Some(keycode),
                    repeat: false,
                    ..
                } => match keycode {
                    Keycode::Return | Keycode::Space => {
                        if let Some(action) = self.session.primary_action() {
                            self.session.apply(action);
                        }
                    }
                    Keycode::H if self.session.state() == SceneState::Start => self.session.apply(Action::HowToPlay),
                    Keycode::M => self.session.apply(Action::ToggleMute),
                    other => {
                        if let Some(direction) = direction_for(other) {
                            self.session.key_down(direction);
                        }
                    }
                },
                Event::KeyUp {
                    keycode: Some(keycode),
                    ..
                } => {
                    if let Some(direction) = direction_for(keycode) {
                        self.session.key_up(direction);
                    }
                }
                Event::MouseButtonDown {
                    mouse_btn: MouseButton::Left,
                    x,
                    y,
                    ..
                } => self.session.pointer_down(Vec2::new(x as f32, y as f32)),
                // The right button drives a virtual joystick anchored where it was pressed.
                Event::MouseButtonDown {
                    mouse_btn: MouseButton::Right,
                    x,
                    y,
                    ..
                } => self.session.joystick_begin(Vec2::new(x as f32, y as f32)),
                Event::MouseButtonUp {
                    mouse_btn: MouseButton::Right,
                    ..
                } => self.session.joystick_end(),
                Event::MouseMotion { mousestate, x, y, .. } => {
                    let position = Vec2::new(x as f32, y as f32);
                    if mousestate.right() {
                        self.session.joystick_move(position);
                    } else if mousestate.left() {
                        self.session.pointer_drag(position);
                    }
                }
                _ => {}
            }
        }
        true
    }

    fn present_events(&mut self) {
        for event in self.session.drain_events() {
            match event {
                SceneEvent::Entered { state, payload } => {
                    let name: &'static str = state.into();
                    info!(state = name, ?payload, "Entered");
                    let title = format!(
                        "heartwalk - {} ({}/{})",
                        name,
                        self.session.collected(),
                        self.session.total()
                    );
                    if let Err(e) = self.target.window_mut().set_title(&title) {
                        debug!(error = %e, "Could not set window title");
                    }
                }
                SceneEvent::Cue(cue) => debug!(?cue, "Cue"),
            }
        }
    }
}
