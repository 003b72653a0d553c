//! The block render loop.
//!
//! Per block of `block_size` frames:
//!
//! 1. drain up to [`MAX_EVENTS_PER_BLOCK`] pending events into the engine
//! 2. poll the control surface, apply moved knobs and pressed buttons
//! 3. update the LEDs
//! 4. render the frames
//!
//! Controls are therefore sampled at `sample_rate / block_size`.

use polypod_platform::{ControlSurface, PlatformController};
use polypod_synth::POLYSYNTH_VOICES;

use crate::engine::SynthEngine;
use crate::event::EngineEvent;
use crate::modes::{ButtonAction, ModeTable};
use crate::queue::EventReceiver;
use crate::router::ParameterRouter;
use crate::settings::EngineSettings;

/// Events applied per control block; the rest wait for the next block.
pub const MAX_EVENTS_PER_BLOCK: usize = 64;

/// Engine, routing and control surface driven one block at a time.
///
/// ```rust
/// use polypod_engine::{EngineEvent, EngineSettings, MidiEvent, RenderLoop};
/// use polypod_platform::VirtualPanel;
/// use std::collections::VecDeque;
///
/// let mut render: RenderLoop = RenderLoop::new(&EngineSettings::new(48000.0));
/// let mut panel = VirtualPanel::new();
/// let mut events = VecDeque::from([EngineEvent::from(MidiEvent::NoteOn { note: 69 })]);
///
/// let mut out = [0.0f32; 256];
/// render.render(&mut panel, &mut events, &mut out);
/// assert!(out.iter().any(|&s| s != 0.0));
/// ```
#[derive(Debug, Clone)]
pub struct RenderLoop<const N: usize = POLYSYNTH_VOICES> {
    engine: SynthEngine<N>,
    router: ParameterRouter,
    surface: ControlSurface,
    modes: ModeTable,
    buttons: [ButtonAction; 2],
    block_size: usize,
}

impl<const N: usize> RenderLoop<N> {
    /// Build everything `settings` describes.
    pub fn new(settings: &EngineSettings) -> Self {
        let mut surface = ControlSurface::new();
        surface.set_colors(settings.modes.colors());
        Self {
            engine: SynthEngine::from_settings(settings),
            router: settings.router(),
            surface,
            modes: settings.modes,
            buttons: settings.buttons,
            block_size: settings.block_size.max(1),
        }
    }

    /// Apply one event immediately, outside the block schedule.
    pub fn handle(&mut self, event: EngineEvent) {
        self.engine.handle(event, &self.router);
    }

    /// Fill `out` with interleaved stereo frames.
    ///
    /// An odd trailing sample is zeroed.
    pub fn render<P, R>(&mut self, panel: &mut P, events: &mut R, out: &mut [f32])
    where
        P: PlatformController + ?Sized,
        R: EventReceiver + ?Sized,
    {
        let frames = out.len() / 2;
        let (stereo, rest) = out.split_at_mut(frames * 2);
        for block in stereo.chunks_mut(self.block_size * 2) {
            self.control_tick(panel, events);
            for frame in block.chunks_exact_mut(2) {
                let (l, r) = self.engine.next_frame();
                frame[0] = l;
                frame[1] = r;
            }
        }
        rest.fill(0.0);
    }

    fn control_tick<P, R>(&mut self, panel: &mut P, events: &mut R)
    where
        P: PlatformController + ?Sized,
        R: EventReceiver + ?Sized,
    {
        for _ in 0..MAX_EVENTS_PER_BLOCK {
            let Some(event) = events.pop() else { break };
            self.engine.handle(event, &self.router);
        }

        let update = self.surface.update(panel);
        let binding = *self.modes.binding(update.mode);
        for (knob, value) in binding.knobs.iter().zip(update.knobs) {
            if let (Some(knob), Some(value)) = (knob, value) {
                self.engine.apply_knob(knob, value);
            }
        }
        for (action, pressed) in self.buttons.into_iter().zip(update.buttons_pressed) {
            if pressed {
                #[cfg(feature = "tracing")]
                tracing::debug!(action = action.name(), "button");
                self.engine.apply_button(action);
            }
        }

        self.surface.write_leds(panel);
    }

    /// The engine.
    pub fn engine(&self) -> &SynthEngine<N> {
        &self.engine
    }

    /// The engine, mutably.
    pub fn engine_mut(&mut self) -> &mut SynthEngine<N> {
        &mut self.engine
    }

    /// The controller router.
    pub fn router(&self) -> &ParameterRouter {
        &self.router
    }

    /// The control surface state.
    pub fn surface(&self) -> &ControlSurface {
        &self.surface
    }

    /// The mode bindings.
    pub fn modes(&self) -> &ModeTable {
        &self.modes
    }

    /// Frames per control update.
    pub fn block_size(&self) -> usize {
        self.block_size
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;
    use crate::{MidiEvent, NoEvents};
    use polypod_platform::VirtualPanel;

    #[test]
    fn odd_buffer_zeroes_last_sample() {
        let mut render: RenderLoop<2> = RenderLoop::new(&EngineSettings::new(48000.0));
        render.handle(MidiEvent::NoteOn { note: 60 }.into());
        let mut out = [1.0f32; 65];
        render.render(&mut VirtualPanel::new(), &mut NoEvents, &mut out);
        assert_eq!(out[64], 0.0);
        assert_eq!(render.engine().frames(), 32);
    }

    #[test]
    fn zero_block_size_is_raised_to_one() {
        let mut settings = EngineSettings::new(48000.0);
        settings.block_size = 0;
        let render: RenderLoop<2> = RenderLoop::new(&settings);
        assert_eq!(render.block_size(), 1);
    }

    #[test]
    fn one_led_flush_per_block() {
        let mut render: RenderLoop<2> = RenderLoop::new(&EngineSettings::new(48000.0));
        let mut panel = VirtualPanel::new();
        let mut out = [0.0f32; 2 * 4 * 3];
        render.render(&mut panel, &mut NoEvents, &mut out);
        assert_eq!(panel.flush_count(), 3);
    }
}
