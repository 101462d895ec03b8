//! TUI widgets for sysmon.

mod debug_popup;
mod header;
mod help;
mod memory;
mod network;
mod popup;
mod quit_confirm;
mod system;

pub use debug_popup::render_debug_popup;
pub use header::render_header;
pub use help::render_help;
pub use memory::render_memory_processes;
pub use network::render_network;
pub use quit_confirm::render_quit_confirm;
pub use system::render_system;
