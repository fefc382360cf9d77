//! Concrete operator handed to inbound adapters.

/// Implements every operator port on top of the infrastructure layer.
#[derive(Debug, Default, Clone, Copy)]
pub struct Operator;

impl Operator {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}
