use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Result;

/// The presentation layer the core pipeline drives. A thin window +
/// image widget + pause button + mouse-position poll; the core never
/// reaches into SDL directly outside this module.
pub trait Display {
    /// Presents a reconstructed frame alongside a status line such as
    /// `"FG Quant: 10  BG Quant: 40  Gaze On: true  Frame: 3/300"`.
    fn present(&mut self, rgb_image: &[u8], header_text: &str) -> Result<()>;

    /// Returns the current pointer position mapped into frame
    /// coordinates, and whether gaze is enabled for this call.
    fn gaze_point(&mut self) -> (usize, usize, bool);

    /// `true` once the user has asked to close the window; the
    /// playback driver stops the process when this flips.
    fn should_close(&mut self) -> bool;
}

/// SDL2-backed display: one resizable window showing the reconstructed
/// frame, title bar carrying the status line, mouse position as the
/// gaze point.
pub struct SdlDisplay {
    canvas: sdl2::render::Canvas<sdl2::video::Window>,
    texture_creator: sdl2::render::TextureCreator<sdl2::video::WindowContext>,
    event_pump: sdl2::EventPump,
    width: u32,
    height: u32,
    gaze_enabled: bool,
    closed: bool,
    /// Shared with the playback driver: flipped here on Space, observed
    /// there between frames. The only mutable datum the two sides share.
    paused: Arc<AtomicBool>,
}

impl SdlDisplay {
    pub fn new(
        width: usize,
        height: usize,
        gaze_enabled: bool,
        paused: Arc<AtomicBool>,
    ) -> Result<Self> {
        let sdl_context = sdl2::init().map_err(|e| anyhow::anyhow!(e))?;
        let video_subsystem = sdl_context.video().map_err(|e| anyhow::anyhow!(e))?;
        let window = video_subsystem
            .window("gazecodec", width as u32, height as u32)
            .position_centered()
            .build()?;
        let canvas = window.into_canvas().accelerated().build()?;
        let texture_creator = canvas.texture_creator();
        let event_pump = sdl_context.event_pump().map_err(|e| anyhow::anyhow!(e))?;

        Ok(SdlDisplay {
            canvas,
            texture_creator,
            event_pump,
            width: width as u32,
            height: height as u32,
            gaze_enabled,
            closed: false,
            paused,
        })
    }

    /// Flips the shared pause flag; callable in response to user action
    /// (Space, or a future on-screen pause button).
    pub fn toggle_pause(&self) {
        self.paused.fetch_xor(true, Ordering::AcqRel);
    }

    fn pump_events(&mut self) {
        for event in self.event_pump.poll_iter() {
            match event {
                sdl2::event::Event::Quit { .. } => self.closed = true,
                sdl2::event::Event::KeyDown {
                    keycode: Some(sdl2::keyboard::Keycode::Space),
                    repeat: false,
                    ..
                } => self.toggle_pause(),
                _ => {}
            }
        }
    }
}

impl Display for SdlDisplay {
    fn present(&mut self, rgb_image: &[u8], header_text: &str) -> Result<()> {
        self.pump_events();
        self.canvas.window_mut().set_title(header_text)?;

        let mut texture = self
            .texture_creator
            .create_texture_streaming(sdl2::pixels::PixelFormatEnum::RGB24, self.width, self.height)
            .map_err(|e| anyhow::anyhow!(e))?;
        texture
            .update(None, rgb_image, self.width as usize * 3)
            .map_err(|e| anyhow::anyhow!(e))?;

        self.canvas.clear();
        self.canvas
            .copy(&texture, None, None)
            .map_err(|e| anyhow::anyhow!(e))?;
        self.canvas.present();
        Ok(())
    }

    fn gaze_point(&mut self) -> (usize, usize, bool) {
        if !self.gaze_enabled {
            return (0, 0, false);
        }
        let mouse = self.event_pump.mouse_state();
        let x = mouse.x().clamp(0, self.width as i32 - 1) as usize;
        let y = mouse.y().clamp(0, self.height as i32 - 1) as usize;
        (x, y, true)
    }

    fn should_close(&mut self) -> bool {
        self.pump_events();
        self.closed
    }
}
