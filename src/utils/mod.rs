pub mod format;

pub use format::{format_amount, format_amount_f64, format_currency, split_amount};
