pub mod calculator;
pub mod chart;
pub mod history;
pub mod load;
pub mod tariff;
pub mod worksheet;
