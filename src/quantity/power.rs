use std::fmt::{Debug, Display, Formatter};

use crate::quantity::Quantity;

/// Appliance power rating in watts.
pub type Watts = Quantity<f64, 1, 0, 0>;

impl Display for Watts {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} W", self.0)
    }
}

impl Debug for Watts {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}W", self.0)
    }
}
