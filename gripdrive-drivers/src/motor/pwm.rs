//! PWM motor drive with attach/detach
//!
//! The power stage gate is driven by a PWM generator that can be bound to
//! and released from its pin. A released generator holds the gate low, so
//! the stage is off whenever the drive is detached.
//!
//! State machine:
//!
//! ```text
//!                  set_duty(d > 0)               start()
//!  DetachedIdle -------------------> AttachedStopped ---------> AttachedRunning
//!       ^                                  |                         |
//!       +------ stop() / set_duty(0) ------+-------------------------+
//! ```
//!
//! The stored duty survives `start`/`stop`; only `set_duty` changes it.

use gripdrive_core::traits::{MotorDriver, PwmOutput};

/// Motor drive on a single PWM gate
pub struct PwmMotor<P> {
    pwm: P,
    duty: u8,
    running: bool,
    attached: bool,
}

impl<P: PwmOutput> PwmMotor<P> {
    /// Create a stopped drive
    ///
    /// The generator is detached right away so the gate is low from boot.
    pub fn new(mut pwm: P) -> Self {
        pwm.write_duty(0);
        pwm.detach();
        Self {
            pwm,
            duty: 0,
            running: false,
            attached: false,
        }
    }

    /// Get the underlying PWM output
    pub fn pwm(&self) -> &P {
        &self.pwm
    }

    fn attach(&mut self) {
        if !self.attached {
            self.pwm.attach();
            self.attached = true;
        }
    }

    fn detach(&mut self) {
        // Always forwarded: the pin must be forced low even if it already is.
        // Zero the compare first so a later attach cannot replay a stale duty.
        self.pwm.write_duty(0);
        self.pwm.detach();
        self.attached = false;
    }
}

impl<P: PwmOutput> MotorDriver for PwmMotor<P> {
    fn set_duty(&mut self, duty: u8) {
        self.duty = duty;

        if duty == 0 {
            self.running = false;
            self.detach();
            return;
        }

        self.attach();
        if self.running {
            self.pwm.write_duty(duty);
        }
    }

    fn duty(&self) -> u8 {
        self.duty
    }

    fn start(&mut self) {
        self.running = true;
        if self.duty > 0 {
            self.attach();
            self.pwm.write_duty(self.duty);
        }
    }

    fn stop(&mut self) {
        self.running = false;
        self.detach();
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn is_attached(&self) -> bool {
        self.attached
    }
}
