//! The animation driver.
//!
//! An [`AnimationSession`] owns a surface, the current scene, at most one
//! staged scene and the frame counter. The host calls [`AnimationSession::tick`]
//! once per frame; everything else (spawning, breathing, holding,
//! cross-fading and debounced resizing) happens inside it.
//!
//! ```text
//! spawning ──done──▶ holding ──age > hold_limit or trigger()──▶ fading out
//!     ▲                                                            │
//!     └──────────────── staged scene takes over at alpha 0 ◀───────┘
//! ```
//!
//! ## Rust Lesson #12: Owning State Instead of Globals
//!
//! All mutable state lives in the session value. Two sessions never share
//! anything, so a host can run as many previews as it likes, and tests can
//! drive `tick()` directly with a fake surface.

use tracing::debug;

use crate::patterns::Pattern;
use crate::render::draw_scene;
use crate::rng::Rng;
use crate::scene::{PatternRanges, Scene};
use crate::surface::{Rgb, Surface};

/// Colour scheme for the whole frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn foreground(&self) -> Rgb {
        match self {
            Theme::Light => Rgb::new(28, 34, 46),
            Theme::Dark => Rgb::new(226, 220, 204),
        }
    }

    pub fn background(&self) -> Rgb {
        match self {
            Theme::Light => Rgb::new(246, 243, 236),
            Theme::Dark => Rgb::new(16, 18, 24),
        }
    }

    pub fn toggled(&self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn from_name(name: &str) -> Option<Theme> {
        match name.to_lowercase().as_str() {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }
}

/// Pacing and generator settings for a session.
///
/// Ranges are `(min, max)`, inclusive for frame counts.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Frames a unit takes to fade in after it is born.
    pub fade_in_frames: u32,
    /// Units spawned per frame, drawn once per scene.
    pub tiles_per_tick: (u32, u32),
    /// Frames a finished scene holds before transitioning.
    pub hold_frames: (u32, u32),
    /// Alpha change per frame while cross-fading.
    pub crossfade_step: f64,
    /// Quiet frames a resize request waits before rebuilding.
    pub resize_debounce_frames: u32,
    /// Breathing angular speed per frame, drawn once per scene.
    pub breathe_speed: (f64, f64),
    /// Maximum spawn-order jitter in pixels.
    pub sort_jitter: f64,
    /// Generators to choose from; empty means all of them.
    pub patterns: Vec<Pattern>,
    pub ranges: PatternRanges,
    pub theme: Theme,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            fade_in_frames: 30,
            tiles_per_tick: (2, 9),
            hold_frames: (480, 1920),
            crossfade_step: 1.0 / 60.0,
            resize_debounce_frames: 12,
            breathe_speed: (0.012, 0.035),
            sort_jitter: 24.0,
            patterns: Pattern::all().to_vec(),
            ranges: PatternRanges::default(),
            theme: Theme::Light,
        }
    }
}

impl SessionConfig {
    pub fn with_fade_in_frames(mut self, frames: u32) -> Self {
        self.fade_in_frames = frames;
        self
    }

    pub fn with_tiles_per_tick(mut self, min: u32, max: u32) -> Self {
        self.tiles_per_tick = (min.max(1), max.max(min.max(1)));
        self
    }

    pub fn with_hold_frames(mut self, min: u32, max: u32) -> Self {
        self.hold_frames = (min, max.max(min));
        self
    }

    pub fn with_crossfade_step(mut self, step: f64) -> Self {
        self.crossfade_step = step.clamp(1e-4, 1.0);
        self
    }

    pub fn with_resize_debounce(mut self, frames: u32) -> Self {
        self.resize_debounce_frames = frames;
        self
    }

    pub fn with_sort_jitter(mut self, jitter: f64) -> Self {
        self.sort_jitter = jitter.max(0.0);
        self
    }

    pub fn with_patterns(mut self, patterns: Vec<Pattern>) -> Self {
        self.patterns = patterns;
        self
    }

    pub fn with_ranges(mut self, ranges: PatternRanges) -> Self {
        self.ranges = ranges;
        self
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct PendingResize {
    width: u32,
    height: u32,
    quiet_frames: u32,
}

/// A running animation bound to one surface.
pub struct AnimationSession<S: Surface> {
    surface: S,
    config: SessionConfig,
    rng: Rng,
    frame: u64,
    current: Scene,
    staged: Option<Scene>,
    pending_resize: Option<PendingResize>,
    /// Read once per frame; the host may change it at any time.
    pub theme: Theme,
}

impl<S: Surface> AnimationSession<S> {
    /// Start a session on `surface`.
    ///
    /// Returns `None` when there is no surface or it has no area; the host
    /// simply runs without an animation in that case.
    pub fn attach(surface: Option<S>, config: SessionConfig, seed: u64) -> Option<Self> {
        let Some(surface) = surface else {
            debug!("no surface to attach to, animation disabled");
            return None;
        };
        let (width, height) = surface.size();
        if width == 0 || height == 0 {
            debug!(width, height, "surface has no area, animation disabled");
            return None;
        }

        let mut rng = Rng::new(seed);
        let current = Scene::random(width as f64, height as f64, &config, &mut rng);
        debug!(seed, width, height, "attached animation session");

        Some(Self {
            surface,
            theme: config.theme,
            config,
            rng,
            frame: 0,
            current,
            staged: None,
            pending_resize: None,
        })
    }

    /// Advance one frame and redraw.
    pub fn tick(&mut self) {
        self.frame += 1;
        self.step_resize();
        self.step_scene();
        self.draw();
    }

    /// Start a transition now. Ignored while one is already under way.
    ///
    /// Returns whether a transition was started.
    pub fn trigger(&mut self) -> bool {
        if self.staged.is_some() || self.current.fading_out || !self.has_area() {
            return false;
        }
        self.begin_transition("trigger");
        true
    }

    /// Ask for a resize once the size has been quiet for a while.
    ///
    /// Each request restarts the debounce window.
    pub fn request_resize(&mut self, width: u32, height: u32) {
        self.pending_resize = Some(PendingResize { width, height, quiet_frames: 0 });
    }

    /// Resize immediately and rebuild the scene for the new size.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.pending_resize = None;
        self.surface.resize(width, height);
        self.staged = None;
        if width == 0 || height == 0 {
            // Nothing left to fade into
            self.current.fading_out = false;
            debug!(width, height, "resized to empty surface, keeping scene");
            return;
        }
        self.current = self.new_scene(width, height);
        debug!(width, height, "resized, scene rebuilt");
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn current(&self) -> &Scene {
        &self.current
    }

    pub fn staged(&self) -> Option<&Scene> {
        self.staged.as_ref()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Whether a resize request is waiting out its debounce.
    pub fn resize_pending(&self) -> bool {
        self.pending_resize.is_some()
    }

    fn has_area(&self) -> bool {
        let (width, height) = self.surface.size();
        width > 0 && height > 0
    }

    fn new_scene(&mut self, width: u32, height: u32) -> Scene {
        Scene::random(width as f64, height as f64, &self.config, &mut self.rng)
    }

    fn begin_transition(&mut self, reason: &'static str) {
        let (width, height) = self.surface.size();
        self.current.fading_out = true;
        self.staged = Some(self.new_scene(width, height));
        debug!(frame = self.frame, reason, "scene transition started");
    }

    fn step_resize(&mut self) {
        let Some(pending) = self.pending_resize.as_mut() else {
            return;
        };
        pending.quiet_frames += 1;
        if pending.quiet_frames >= self.config.resize_debounce_frames {
            let (width, height) = (pending.width, pending.height);
            self.resize(width, height);
        }
    }

    fn step_scene(&mut self) {
        let step = self.config.crossfade_step;

        if self.current.fading_out {
            self.current.alpha = (self.current.alpha - step).max(0.0);
            if self.current.alpha <= 0.0 {
                if let Some(next) = self.staged.take() {
                    self.current = next;
                    debug!(frame = self.frame, "staged scene took over");
                }
            }
            return;
        }

        self.current.alpha = (self.current.alpha + step).min(1.0);
        if !self.current.done {
            self.current.spawn(self.frame);
        } else {
            self.current.age += 1;
            if self.current.hold_expired() && self.staged.is_none() && self.has_area() {
                self.begin_transition("hold expired");
            }
        }
    }

    fn draw(&mut self) {
        let (width, height) = self.surface.size();
        if width == 0 || height == 0 {
            return;
        }
        self.surface.clear(self.theme.background());
        draw_scene(
            &mut self.surface,
            &self.current,
            self.frame,
            self.config.fade_in_frames,
            self.theme.foreground(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::SvgSurface;

    fn session(seed: u64) -> AnimationSession<SvgSurface> {
        let config = SessionConfig::default().with_hold_frames(20, 20).with_crossfade_step(0.25);
        AnimationSession::attach(Some(SvgSurface::new(240, 180)), config, seed).expect("surface has area")
    }

    #[test]
    fn attach_aborts_without_surface() {
        assert!(AnimationSession::<SvgSurface>::attach(None, SessionConfig::default(), 1).is_none());
        assert!(AnimationSession::attach(Some(SvgSurface::new(0, 100)), SessionConfig::default(), 1).is_none());
    }

    #[test]
    fn first_scene_starts_fresh() {
        let s = session(1);
        assert_eq!(s.frame(), 0);
        assert_eq!(s.current().spawn_idx, 0);
        assert_eq!(s.current().alpha, 0.0);
        assert!(s.staged().is_none());
    }

    #[test]
    fn tick_spawns_and_draws() {
        let mut s = session(2);
        s.tick();
        let per_tick = s.current().tiles_per_tick.min(s.current().units.len());
        assert_eq!(s.current().born_count(), per_tick);
        // Units born this frame are still at zero fade
        assert_eq!(s.surface().element_count(), 0);

        s.tick();
        assert!(s.surface().element_count() > 0);
        assert!(s.surface().to_svg().contains(&s.theme.background().hex()));
    }

    #[test]
    fn trigger_is_ignored_while_transitioning() {
        let mut s = session(3);
        assert!(s.trigger());
        assert!(s.current().fading_out);
        assert!(s.staged().is_some());
        assert!(!s.trigger());
    }

    #[test]
    fn crossfade_replaces_scene() {
        let mut s = session(4);
        for _ in 0..4 {
            s.tick();
        }
        assert_eq!(s.current().alpha, 1.0);
        s.trigger();
        let staged_units = s.staged().map(|sc| sc.units.clone());

        // 1.0 -> 0.75 -> 0.5 -> 0.25 -> 0.0, then the staged scene is current
        for _ in 0..4 {
            s.tick();
        }
        assert!(s.staged().is_none());
        assert!(!s.current().fading_out);
        assert_eq!(s.current().alpha, 0.0);
        assert_eq!(Some(s.current().units.clone()), staged_units);

        s.tick();
        assert_eq!(s.current().alpha, 0.25);
        assert!(s.trigger());
    }

    #[test]
    fn hold_expiry_starts_transition() {
        let mut s = session(5);
        let mut frames = 0;
        while !s.current().done && frames < 10_000 {
            s.tick();
            frames += 1;
        }
        assert!(s.current().done);
        for _ in 0..=20 {
            assert!(s.staged().is_none());
            s.tick();
        }
        assert!(s.current().fading_out);
        assert!(s.staged().is_some());
    }

    #[test]
    fn resize_request_is_debounced() {
        let mut s = session(6);
        s.request_resize(400, 300);
        for _ in 0..11 {
            s.tick();
        }
        assert_eq!(s.surface().size(), (240, 180));
        s.request_resize(500, 320);
        for _ in 0..11 {
            s.tick();
        }
        assert!(s.resize_pending());
        s.tick();
        assert!(!s.resize_pending());
        assert_eq!(s.surface().size(), (500, 320));
    }

    #[test]
    fn resize_rebuilds_scene() {
        let mut s = session(7);
        for _ in 0..10 {
            s.tick();
        }
        s.trigger();
        s.resize(320, 320);
        assert_eq!(s.surface().size(), (320, 320));
        assert!(s.staged().is_none());
        assert_eq!(s.current().spawn_idx, 0);
        assert!(!s.current().fading_out);
    }

    #[test]
    fn empty_resize_mid_fade_recovers() {
        let mut s = session(9);
        for _ in 0..4 {
            s.tick();
        }
        s.trigger();
        s.tick();
        s.tick();
        let alpha = s.current().alpha;
        assert!(alpha < 1.0);

        s.resize(0, 180);
        assert!(s.staged().is_none());
        assert!(!s.current().fading_out);
        assert!(!s.trigger());
        s.tick();
        assert!(s.current().alpha > alpha);

        s.resize(240, 180);
        assert!(s.trigger());
    }

    #[test]
    fn sessions_are_independent() {
        let mut a = session(8);
        let mut b = session(8);
        for _ in 0..5 {
            a.tick();
        }
        b.tick();
        assert_eq!(a.frame(), 5);
        assert_eq!(b.frame(), 1);
        assert_eq!(a.current().units.len(), b.current().units.len());
    }

    #[test]
    fn theme_names_round_trip() {
        for theme in [Theme::Light, Theme::Dark] {
            assert_eq!(Theme::from_name(theme.name()), Some(theme));
            assert_eq!(theme.toggled().toggled(), theme);
        }
        assert_ne!(Theme::Light.foreground(), Theme::Dark.foreground());
    }
}
