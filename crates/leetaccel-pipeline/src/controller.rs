//! Per-device interception state machine.
//!
//! For every raw event the controller decides whether to buffer it, pass it
//! through, or (at a synchronization marker) replace the buffered deltas
//! with curve-transformed ones. When the emission path loops back into the
//! pipeline, each emitted event returns as an echo; the controller lets
//! exactly that many echoes through untouched before it accelerates again.
//!
//! ```text
//!            rel motion                 SYN, n > 0 emitted
//!   Idle ───────────────▶ Buffering ─────────────────────▶ Suppressing { n }
//!    ▲                        │  SYN, nothing emitted          │ echo: n - 1
//!    └────────────────────────┴────────────────────────────────┘ (n == 0)
//! ```
//!
//! The controller never calls into a sink. It returns an [`Interception`]
//! describing what to forward and what to inject, so an echo is always a
//! separate, later call and the callback never recurses.
//!
//! # RT Safety
//!
//! [`InterceptionController::handle`] is RT-safe:
//! - No heap allocations (fixed-capacity outputs)
//! - No locks or syscalls
//! - Bounded execution time (one curve evaluation per flush)

use heapless::Vec as BoundedVec;
use leetaccel_curves::AccelCurve;
use leetaccel_errors::RTError;

use crate::events::{Axis, InputEvent};
use crate::sink::EchoMode;
use crate::window::{AggregationWindow, MotionDelta, SameAxisPolicy};

/// Controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControllerState {
    /// Nothing buffered, no echo outstanding.
    #[default]
    Idle,
    /// Motion buffered since the last marker.
    Buffering,
    /// Waiting for `remaining` self-emitted echoes. Device motion arriving
    /// meanwhile is still buffered.
    Suppressing {
        /// Echoes still expected, always at least 1.
        remaining: u32,
    },
}

/// What happens to the event that was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Buffered; do not forward.
    Consume,
    /// Forward unmodified.
    PassThrough,
}

/// Outcome of one [`InterceptionController::handle`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interception {
    /// Fate of the handled event.
    pub disposition: Disposition,
    /// Events to emit, in order, before forwarding the handled event.
    pub emitted: BoundedVec<InputEvent, 3>,
    /// Hot-path faults to report.
    pub faults: BoundedVec<RTError, 4>,
    /// A window was flushed.
    pub flushed: bool,
    /// The event was an expected echo.
    pub echo_absorbed: bool,
}

impl Interception {
    fn with(disposition: Disposition) -> Self {
        Self {
            disposition,
            emitted: BoundedVec::new(),
            faults: BoundedVec::new(),
            flushed: false,
            echo_absorbed: false,
        }
    }

    /// True when the handled event must not be forwarded.
    pub fn is_consumed(&self) -> bool {
        self.disposition == Disposition::Consume
    }

    fn fault(&mut self, fault: RTError) {
        if let Err(_full) = self.faults.push(fault) {
            // Capacity covers every fault one call can raise.
        }
    }
}

/// Interception state for one device.
#[derive(Debug, Clone)]
pub struct InterceptionController {
    state: ControllerState,
    window: AggregationWindow,
    echo_mode: EchoMode,
    carry_remainder: bool,
    carry: (f64, f64),
}

impl InterceptionController {
    /// Create an idle controller.
    ///
    /// With `carry_remainder`, the fractional part of each transformed delta
    /// is kept and added to the next window; without it deltas are rounded.
    pub fn new(policy: SameAxisPolicy, echo_mode: EchoMode, carry_remainder: bool) -> Self {
        Self {
            state: ControllerState::Idle,
            window: AggregationWindow::new(policy),
            echo_mode,
            carry_remainder,
            carry: (0.0, 0.0),
        }
    }

    /// Current state.
    pub fn state(&self) -> ControllerState {
        self.state
    }

    /// Buffered deltas.
    pub fn window(&self) -> &AggregationWindow {
        &self.window
    }

    /// Echo handling in effect.
    pub fn echo_mode(&self) -> EchoMode {
        self.echo_mode
    }

    /// Sub-count remainder carried into the next window.
    pub fn carry(&self) -> (f64, f64) {
        self.carry
    }

    /// Echoes still expected.
    pub fn outstanding_echoes(&self) -> u32 {
        match self.state {
            ControllerState::Suppressing { remaining } => remaining,
            _ => 0,
        }
    }

    /// Drop buffered motion, carry and outstanding echoes.
    pub fn reset(&mut self) {
        let _discarded = self.window.flush();
        self.carry = (0.0, 0.0);
        self.state = ControllerState::Idle;
    }

    /// Decide the fate of `event`.
    ///
    /// - device motion on a tracked axis is buffered
    /// - a device `SYN_REPORT` with buffered motion flushes the window
    ///   through `curve`; the marker itself is forwarded after the emitted
    ///   events
    /// - a synthetic motion event consumes one outstanding echo, or is
    ///   reported as [`RTError::UnexpectedEcho`] when none is expected, and
    ///   is forwarded either way
    /// - everything else is forwarded unmodified
    ///
    /// # RT Safety
    ///
    /// RT-safe.
    pub fn handle(&mut self, event: InputEvent, curve: &AccelCurve) -> Interception {
        match event.axis() {
            Some(_) if event.is_synthetic() => self.absorb_echo(),
            Some(axis) => {
                self.window.observe(axis, event.value);
                if self.state == ControllerState::Idle {
                    self.state = ControllerState::Buffering;
                }
                Interception::with(Disposition::Consume)
            }
            None if event.is_sync_report() && !event.is_synthetic() => {
                let mut out = Interception::with(Disposition::PassThrough);
                if !self.window.is_empty() {
                    self.flush_into(curve, &mut out);
                }
                out
            }
            None => Interception::with(Disposition::PassThrough),
        }
    }

    /// Flush buffered motion without a marker.
    ///
    /// Returns `None` when nothing is buffered. The returned disposition is
    /// [`Disposition::Consume`] since there is no triggering event.
    pub fn force_flush(&mut self, curve: &AccelCurve) -> Option<Interception> {
        if self.window.is_empty() {
            return None;
        }
        let mut out = Interception::with(Disposition::Consume);
        self.flush_into(curve, &mut out);
        Some(out)
    }

    fn absorb_echo(&mut self) -> Interception {
        let mut out = Interception::with(Disposition::PassThrough);
        match self.state {
            ControllerState::Suppressing { remaining } => {
                out.echo_absorbed = true;
                self.state = match remaining.saturating_sub(1) {
                    0 if self.window.is_empty() => ControllerState::Idle,
                    0 => ControllerState::Buffering,
                    left => ControllerState::Suppressing { remaining: left },
                };
            }
            ControllerState::Idle | ControllerState::Buffering => {
                out.fault(RTError::UnexpectedEcho);
            }
        }
        out
    }

    fn flush_into(&mut self, curve: &AccelCurve, out: &mut Interception) {
        let delta = self.window.flush();
        out.flushed = true;

        let (x, y) = match curve.try_transform(f64::from(delta.dx), f64::from(delta.dy)) {
            Ok((x, y)) => {
                let counts = self.quantize(x, y, out);
                self.enforce_cap(counts, curve.output_cap())
            }
            Err(fault) => {
                out.fault(fault);
                (delta.dx, delta.dy)
            }
        };

        let result = MotionDelta {
            dx: x,
            dy: y,
            dwheel: delta.dwheel,
        };
        for axis in Axis::ALL {
            let value = result.get(axis);
            if value != 0 && out.emitted.push(InputEvent::rel(axis, value).synthetic()).is_err() {
                break;
            }
        }

        self.arm_guard(out);
    }

    fn quantize(&mut self, x: f64, y: f64, out: &mut Interception) -> (i32, i32) {
        let (cx, cy) = self.carry;
        let (x, y) = if self.carry_remainder { (x + cx, y + cy) } else { (x, y) };
        let (qx, rx, clamped_x) = to_count(x, self.carry_remainder);
        let (qy, ry, clamped_y) = to_count(y, self.carry_remainder);
        self.carry = (rx, ry);
        if clamped_x || clamped_y {
            out.fault(RTError::OutputOverflow);
        }
        (qx, qy)
    }

    /// Shorten whole counts that rounding pushed past `cap`.
    ///
    /// The larger component steps toward zero until the vector fits; the
    /// removed counts go back into the carry, which stays within one count
    /// per axis so sustained capped motion cannot build a backlog.
    fn enforce_cap(&mut self, (mut qx, mut qy): (i32, i32), cap: f64) -> (i32, i32) {
        if cap <= 0.0 {
            return (qx, qy);
        }
        let (mut cx, mut cy) = self.carry;
        while f64::from(qx).hypot(f64::from(qy)) > cap {
            if qx.unsigned_abs() >= qy.unsigned_abs() {
                cx += f64::from(qx.signum());
                qx -= qx.signum();
            } else {
                cy += f64::from(qy.signum());
                qy -= qy.signum();
            }
        }
        if self.carry_remainder {
            self.carry = (cx.clamp(-1.0, 1.0), cy.clamp(-1.0, 1.0));
        }
        (qx, qy)
    }

    fn arm_guard(&mut self, out: &mut Interception) {
        let emitted = u32::try_from(out.emitted.len()).unwrap_or(u32::MAX);
        if self.echo_mode == EchoMode::Decoupled {
            self.state = ControllerState::Idle;
            return;
        }
        let remaining = match self.outstanding_echoes().checked_add(emitted) {
            Some(total) => total,
            None => {
                out.fault(RTError::GuardSaturated);
                u32::MAX
            }
        };
        self.state = if remaining == 0 {
            ControllerState::Idle
        } else {
            ControllerState::Suppressing { remaining }
        };
    }
}

/// Whole counts in `value`, the remainder, and whether it was clamped.
fn to_count(value: f64, carry: bool) -> (i32, f64, bool) {
    if value.is_nan() {
        return (0, 0.0, true);
    }
    let whole = if carry { value.trunc() } else { value.round() };
    if whole > f64::from(i32::MAX) {
        (i32::MAX, 0.0, true)
    } else if whole < f64::from(i32::MIN) {
        (i32::MIN, 0.0, true)
    } else {
        let remainder = if carry { value - whole } else { 0.0 };
        (whole as i32, remainder, false)
    }
}
