use std::fmt::{Debug, Display, Formatter};

use itertools::Itertools;

use crate::quantity::Quantity;

/// Amount in Indonesian rupiah.
pub type Cost = Quantity<f64, 0, 0, 1>;

impl Display for Cost {
    /// Whole rupiah with `.` as the thousands separator: `Rp 1.445`.
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        #[expect(clippy::cast_possible_truncation)]
        let rounded = self.0.round() as i64;
        let digits = rounded.unsigned_abs().to_string();
        let grouped = digits
            .as_bytes()
            .rchunks(3)
            .rev()
            .map(|chunk| String::from_utf8_lossy(chunk))
            .join(".");
        let sign = if rounded < 0 { "-" } else { "" };
        write!(f, "Rp {sign}{grouped}")
    }
}

impl Debug for Cost {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}Rp", self.0)
    }
}
