mod compose;
mod handler;

pub use compose::{TableSelection, compose_report};
pub use handler::handle_report_command;
