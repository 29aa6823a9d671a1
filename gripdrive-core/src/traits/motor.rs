//! Motor drive traits
//!
//! The drive is split in two layers:
//! - [`PwmOutput`] is the raw PWM peripheral bound to the gate pin
//! - [`MotorDriver`] is the attach/detach state machine on top of it

/// PWM peripheral driving the power stage gate
///
/// Duty resolution is 8 bits (0-255).
pub trait PwmOutput {
    /// Bind the duty-cycle generator to the gate pin
    fn attach(&mut self);

    /// Unbind the duty-cycle generator and hold the gate pin low
    ///
    /// After this call the pin must be driven to a defined low level,
    /// never left floating.
    fn detach(&mut self);

    /// Write a duty cycle to the generator
    fn write_duty(&mut self, duty: u8);
}

/// Electrical state of the motor drive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotorState {
    /// Duty is zero, peripheral detached, pin held low
    #[default]
    DetachedIdle,
    /// Duty buffered and peripheral attached, but not running
    AttachedStopped,
    /// Peripheral attached and actively driving the buffered duty
    AttachedRunning,
}

/// Trait for a PWM motor drive with a defined idle level
///
/// Contract:
/// - `set_duty` never starts the motor
/// - `start` and `stop` never change the stored duty
/// - whenever the stored duty is zero the gate pin is held low and the
///   peripheral is detached
pub trait MotorDriver {
    /// Set the duty cycle (0-255)
    fn set_duty(&mut self, duty: u8);

    /// Get the stored duty cycle
    fn duty(&self) -> u8;

    /// Start driving the stored duty
    fn start(&mut self);

    /// Stop driving and hold the gate pin low
    fn stop(&mut self);

    /// Check if the run flag is set
    fn is_running(&self) -> bool;

    /// Check if the PWM peripheral is bound to the pin
    fn is_attached(&self) -> bool;

    /// Get the current drive state
    fn state(&self) -> MotorState {
        match (self.is_attached(), self.is_running() && self.duty() > 0) {
            (false, _) => MotorState::DetachedIdle,
            (true, false) => MotorState::AttachedStopped,
            (true, true) => MotorState::AttachedRunning,
        }
    }
}
