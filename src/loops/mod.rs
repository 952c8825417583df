//=========================================================================
// Mode Loops
//=========================================================================
//
// Reference nested loops run by the main control loop.
//
// Both follow the same fixed-rate frame:
// ```text
//   pending changed? ─yes─► Yield
//   service_frame()  ─close─► ShuttingDown
//   commands         ─decision─► SwitchTo(mode)
//   sleep remainder of the frame
// ```
//
//=========================================================================

pub mod gameplay;
pub mod menu;

pub use gameplay::{SimulationController, SimulationFactory};
pub use menu::InteractiveMenu;

//=== External Dependencies ===============================================

use std::thread;
use std::time::{Duration, Instant};

//=== Pacing ==============================================================

const FALLBACK_RATE: f64 = 60.0;

/// Frame length for `rate` frames per second. Rates that give no
/// representable frame length fall back to 60.
pub(crate) fn frame_interval(rate: f64) -> Duration {
    let fallback = Duration::from_secs_f64(1.0 / FALLBACK_RATE);
    if !rate.is_finite() || rate <= 0.0 {
        return fallback;
    }
    Duration::try_from_secs_f64(1.0 / rate).unwrap_or(fallback)
}

/// Sleeps for whatever is left of the frame started at `started`.
pub(crate) fn pace(started: Instant, interval: Duration) {
    let elapsed = started.elapsed();
    if elapsed < interval {
        thread::sleep(interval - elapsed);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
