//! System-level modules: logging setup and the panic hook

pub mod logging;
pub mod panic_handler;
