//! The analog clock face component.
//!
//! `ClockFace` owns its configuration and drives a [`Surface`]. It never
//! reads the clock itself: each refresh takes a sample from a
//! [`TimeSource`] and schedules exactly one follow-up on the event loop.

use crate::geometry::{hand_angles, HandAngles};
use crate::layout::{FaceLayout, FaceScene, HandLines};
use crate::options::{Change, ClockConfiguration, ImageHandle, OptionValue, OPTION_KEYS};
use crate::refresh::{refresh_interval, SubSecond, SubSecondCounter};
use clock_common::error::ClockResult;
use clock_common::time::{TimeSample, TimeSource};
use clock_runtime::scheduler::{EventLoop, TimerId};
use std::time::Duration;
use tracing::{debug, trace, warn};

/// Drawing target for a clock face.
pub trait Surface {
    /// The canvas changed size.
    fn resize(&mut self, canvas: f64);

    /// Draw the whole face from scratch.
    fn render(&mut self, scene: &FaceScene);

    /// Move only the hands.
    fn move_hands(&mut self, hands: &HandLines);

    /// An image is no longer displayed and may be freed.
    fn release_image(&mut self, _image: ImageHandle) {}
}

/// Event asking a face to refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshTick;

/// An analog clock face.
#[derive(Debug)]
pub struct ClockFace<S> {
    surface: S,
    config: ClockConfiguration,
    layout: FaceLayout,
    angles: HandAngles,
    counter: SubSecondCounter,
    stale: bool,
    pending: Option<TimerId>,
}

impl<S: Surface> ClockFace<S> {
    /// Create a face with the default configuration and draw it once.
    pub fn new(mut surface: S) -> Self {
        let config = ClockConfiguration::default();
        let layout = FaceLayout::new(config.size);
        let angles = HandAngles::default();

        surface.resize(layout.canvas());
        surface.render(&layout.scene(&config, angles));

        Self {
            surface,
            config,
            layout,
            angles,
            counter: SubSecondCounter::default(),
            stale: false,
            pending: None,
        }
    }

    /// Select where sub-second milliseconds come from.
    #[must_use]
    pub fn with_subsecond(mut self, mode: SubSecond) -> Self {
        self.counter = SubSecondCounter::new(mode);
        self
    }

    /// Apply option updates in order.
    ///
    /// Stops at the first rejected entry; entries before it stay applied and
    /// the face is redrawn on the next refresh instead of now. A size change
    /// before the rejected entry still resizes the surface right away.
    ///
    /// # Errors
    ///
    /// The [`ClockError`](clock_common::error::ClockError) for the first
    /// rejected entry.
    pub fn configure<'a, I>(&mut self, entries: I) -> ClockResult<()>
    where
        I: IntoIterator<Item = (&'a str, OptionValue)>,
    {
        let mut redraw = false;
        let mut resize = false;

        for (option, value) in entries {
            let (next, change) = match self.config.apply(option, &value) {
                Ok(applied) => applied,
                Err(e) => {
                    if resize {
                        self.resize();
                    }
                    if redraw {
                        self.stale = true;
                    }
                    warn!(option, %value, error = %e, "Rejected clock option");
                    return Err(e);
                }
            };

            debug!(option, %value, ?change, "Applied clock option");
            self.config = next;

            match change {
                Change::Cadence => {}
                Change::Redraw => redraw = true,
                Change::Resize => {
                    resize = true;
                    redraw = true;
                }
                Change::Background { released } => {
                    if let Some(image) = released {
                        self.surface.release_image(image);
                    }
                    redraw = true;
                }
            }
        }

        if resize {
            self.resize();
        }
        if redraw {
            self.redraw();
        }
        Ok(())
    }

    /// Current value of one option.
    ///
    /// # Errors
    ///
    /// Unknown option names.
    pub fn get(&self, option: &str) -> ClockResult<OptionValue> {
        self.config.get(option)
    }

    /// Recognized option names.
    #[must_use]
    pub fn keys(&self) -> &'static [&'static str] {
        &OPTION_KEYS
    }

    /// Current configuration.
    #[must_use]
    pub fn config(&self) -> &ClockConfiguration {
        &self.config
    }

    /// Hand angles as of the last refresh.
    #[must_use]
    pub fn angles(&self) -> HandAngles {
        self.angles
    }

    /// Hand strokes as of the last refresh.
    #[must_use]
    pub fn hands(&self) -> HandLines {
        self.layout.hands(self.angles)
    }

    /// Full scene as of the last refresh.
    #[must_use]
    pub fn scene(&self) -> FaceScene {
        self.layout.scene(&self.config, self.angles)
    }

    /// Drawing target.
    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable drawing target.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Whether a partially applied update is waiting for the next refresh.
    #[must_use]
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Pending refresh, if the face is running.
    #[must_use]
    pub fn pending(&self) -> Option<TimerId> {
        self.pending
    }

    /// Update the hands for `sample` and return the delay until the next
    /// refresh.
    pub fn tick(&mut self, sample: TimeSample) -> Duration {
        let interval = refresh_interval(&self.config);
        let sample = self.counter.observe(sample, interval);
        self.angles = hand_angles(sample, self.config.smooth);

        if self.stale {
            self.redraw();
        } else {
            self.surface.move_hands(&self.layout.hands(self.angles));
        }

        trace!(
            hour = sample.hour,
            minute = sample.minute,
            second = sample.second,
            millis = sample.millis,
            "Clock tick"
        );
        interval
    }

    /// Handle a [`RefreshTick`]: sample `time`, move the hands and schedule
    /// the next tick.
    pub fn refresh<E, T>(&mut self, time: &T, timers: &mut EventLoop<E>) -> TimerId
    where
        E: From<RefreshTick>,
        T: TimeSource + ?Sized,
    {
        let interval = self.tick(time.sample());
        let id = timers.schedule_after(interval, E::from(RefreshTick));
        self.pending = Some(id);
        id
    }

    /// Start refreshing. Any pending refresh is replaced.
    pub fn start<E, T>(&mut self, time: &T, timers: &mut EventLoop<E>) -> TimerId
    where
        E: From<RefreshTick>,
        T: TimeSource + ?Sized,
    {
        self.stop(timers);
        debug!(size = self.config.size, smooth = self.config.smooth, "Clock face started");
        self.refresh(time, timers)
    }

    /// Stop refreshing.
    pub fn stop<E>(&mut self, timers: &mut EventLoop<E>) {
        if let Some(id) = self.pending.take() {
            timers.cancel(id);
        }
    }

    fn resize(&mut self) {
        self.layout = FaceLayout::new(self.config.size);
        self.surface.resize(self.layout.canvas());
    }

    fn redraw(&mut self) {
        let scene = self.layout.scene(&self.config, self.angles);
        self.surface.render(&scene);
        self.stale = false;
        debug!(marks = %self.config.marks, size = self.config.size, "Clock face redrawn");
    }
}
