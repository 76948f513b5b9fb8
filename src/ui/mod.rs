// Console output

pub mod formatters;
pub mod report;

pub use formatters::{convert_units, format_local_time, SEPARATOR};
pub use report::{print_credits, print_full, print_status};
