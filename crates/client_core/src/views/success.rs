use std::fmt;

use super::format_amount;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SuccessView {
    pub total: f64,
}

impl SuccessView {
    pub fn set_total(&mut self, total: f64) {
        self.total = total;
    }

    pub fn description(&self) -> String {
        format!("Charged {}", format_amount(self.total))
    }
}

impl fmt::Display for SuccessView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Order placed")?;
        writeln!(f, "  {}", self.description())?;
        write!(f, "  <Back to shopping>")
    }
}
