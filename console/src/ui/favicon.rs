//! Rotating title icon shown while a deployment is running

use std::io::Cursor;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use image::{ImageFormat, Rgba, RgbaImage};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, warn};

use crate::errors::ConsoleError;
use crate::ui::views::IconSink;

const MIN_TICK_PERIOD: Duration = Duration::from_millis(1);

/// Favicon animation options
#[derive(Debug, Clone)]
pub struct FaviconOptions {
    /// Edge length of the drawn icon in pixels
    pub size: u32,

    /// Redraws per second while the view is visible
    pub frames_per_second: u32,

    /// Degrees added per redraw
    pub rotation_per_frame: f32,
}

impl Default for FaviconOptions {
    fn default() -> Self {
        Self {
            size: 32,
            frames_per_second: 10,
            rotation_per_frame: 4.0,
        }
    }
}

impl FaviconOptions {
    /// Time between redraws, never shorter than 1ms
    pub fn tick_period(&self) -> Duration {
        let period = Duration::from_nanos(1_000_000_000 / u64::from(self.frames_per_second.max(1)));
        period.max(MIN_TICK_PERIOD)
    }

    /// Rotation for one tick. Hidden views get roughly one tick per second,
    /// so each tick covers a whole second of rotation there.
    pub fn step(&self, hidden: bool) -> f32 {
        if hidden {
            self.rotation_per_frame * self.frames_per_second as f32
        } else {
            self.rotation_per_frame
        }
    }
}

/// Whether the view is currently hidden from the user
#[derive(Debug, Clone, Default)]
pub struct Visibility(Arc<AtomicBool>);

impl Visibility {
    pub fn set_hidden(&self, hidden: bool) {
        self.0.store(hidden, Ordering::SeqCst);
    }

    pub fn is_hidden(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// One redrawn frame of the icon
#[derive(Debug, Clone)]
pub struct RenderedIcon {
    pub angle: f32,
    pub png: Vec<u8>,
}

impl RenderedIcon {
    /// Data URL suitable for a `<link rel="icon">` href
    pub fn href(&self) -> String {
        format!("data:image/png;base64,{}", BASE64.encode(&self.png))
    }
}

/// Load the icon to rotate from an image file
pub fn load_icon(path: &Path) -> Result<RgbaImage, ConsoleError> {
    Ok(image::open(path)?.to_rgba8())
}

/// Built-in icon: a ring with a gap, so rotation is visible
pub fn default_icon(size: u32) -> RgbaImage {
    let center = size as f32 / 2.0;
    let outer = center - 1.0;
    let inner = outer * 0.6;

    RgbaImage::from_fn(size, size, |x, y| {
        let dx = x as f32 + 0.5 - center;
        let dy = y as f32 + 0.5 - center;
        let distance = (dx * dx + dy * dy).sqrt();
        let in_gap = dx > 0.0 && dy.abs() < dx * 0.4;

        if distance <= outer && distance >= inner && !in_gap {
            Rgba([0xd9, 0x53, 0x4f, 0xff])
        } else {
            Rgba([0, 0, 0, 0])
        }
    })
}

/// Draw `source` centred on a `size` square canvas, rotated clockwise by
/// `angle` degrees around the canvas centre
pub fn draw_rotated(source: &RgbaImage, size: u32, angle: f32) -> RgbaImage {
    let (sin, cos) = angle.to_radians().sin_cos();
    let center = size as f32 / 2.0;
    let (src_w, src_h) = (source.width() as f32, source.height() as f32);

    RgbaImage::from_fn(size, size, |x, y| {
        let dx = x as f32 + 0.5 - center;
        let dy = y as f32 + 0.5 - center;

        // Inverse rotation maps each canvas pixel back into the source
        let sx = cos * dx + sin * dy + src_w / 2.0;
        let sy = -sin * dx + cos * dy + src_h / 2.0;

        if sx < 0.0 || sy < 0.0 || sx >= src_w || sy >= src_h {
            return Rgba([0, 0, 0, 0]);
        }
        *source.get_pixel(sx as u32, sy as u32)
    })
}

fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, ConsoleError> {
    let mut png = Vec::new();
    image.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
    Ok(png)
}

/// Decrements the live timer count when a timer task goes away
struct TimerGuard(Arc<AtomicUsize>);

impl Drop for TimerGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// The title icon animator. Owned by one session; at most one timer runs.
pub struct Favicon {
    options: FaviconOptions,
    source: Arc<RgbaImage>,
    sink: Arc<tokio::sync::Mutex<Box<dyn IconSink>>>,
    visibility: Visibility,
    angle: Arc<Mutex<f32>>,
    timer: Option<JoinHandle<()>>,
    active_timers: Arc<AtomicUsize>,
    ticks: Arc<AtomicU64>,
}

impl Favicon {
    pub fn new(options: FaviconOptions, source: RgbaImage, sink: Box<dyn IconSink>) -> Self {
        Self {
            options,
            source: Arc::new(source),
            sink: Arc::new(tokio::sync::Mutex::new(sink)),
            visibility: Visibility::default(),
            angle: Arc::new(Mutex::new(0.0)),
            timer: None,
            active_timers: Arc::new(AtomicUsize::new(0)),
            ticks: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Handle used to report the view being hidden or shown again
    pub fn visibility(&self) -> Visibility {
        self.visibility.clone()
    }

    pub fn is_rotating(&self) -> bool {
        self.timer.is_some()
    }

    /// Timer tasks still alive; aborted timers drop out once the runtime
    /// has cancelled them
    pub fn active_timers(&self) -> usize {
        self.active_timers.load(Ordering::SeqCst)
    }

    /// Redraws performed so far
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::SeqCst)
    }

    /// Current rotation in degrees
    pub fn angle(&self) -> f32 {
        *self.angle.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Start rotating. A running timer is stopped first.
    pub fn start(&mut self) {
        self.stop();

        let period = self.options.tick_period();
        let options = self.options.clone();
        let source = self.source.clone();
        let sink = self.sink.clone();
        let visibility = self.visibility.clone();
        let angle = self.angle.clone();
        let ticks = self.ticks.clone();

        self.active_timers.fetch_add(1, Ordering::SeqCst);
        let guard = TimerGuard(self.active_timers.clone());

        debug!("Starting favicon rotation every {:?}", period);
        self.timer = Some(tokio::spawn(async move {
            let _guard = guard;
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                interval.tick().await;

                let step = options.step(visibility.is_hidden());
                let current = {
                    let mut angle = angle.lock().unwrap_or_else(|e| e.into_inner());
                    *angle = (*angle + step) % 360.0;
                    *angle
                };

                let frame = draw_rotated(&source, options.size, current);
                match encode_png(&frame) {
                    Ok(png) => {
                        let icon = RenderedIcon {
                            angle: current,
                            png,
                        };
                        sink.lock().await.publish(&icon).await;
                    }
                    Err(e) => warn!("Failed to encode favicon frame: {}", e),
                }
                ticks.fetch_add(1, Ordering::SeqCst);
            }
        }));
    }

    /// Stop rotating. Does nothing when not rotating.
    pub fn stop(&mut self) {
        if let Some(timer) = self.timer.take() {
            debug!("Stopping favicon rotation");
            timer.abort();
        }
    }
}

impl Drop for Favicon {
    fn drop(&mut self) {
        self.stop();
    }
}
