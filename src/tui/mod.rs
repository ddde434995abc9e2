pub mod branch_display;
pub mod log_display;
pub mod status_display;
