pub mod log_capture;
pub mod page_server;
