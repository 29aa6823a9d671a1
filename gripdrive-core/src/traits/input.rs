//! Digital input traits

/// A digital control input (trigger or button)
///
/// Implementations hide the electrical polarity: `is_active` is true while
/// the control is physically pressed, whatever level that maps to.
pub trait DigitalInput {
    /// Check if the control is currently pressed
    fn is_active(&mut self) -> bool;
}
