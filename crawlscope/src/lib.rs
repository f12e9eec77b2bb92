// Include handlers module directly from handlers.rs
#[path = "handlers.rs"]
pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{
    ConfigOverrides, build_config, expand_path, load_export, render_audit, render_redirects,
    resolve_output_path, write_output,
};

// Re-export report helpers from crawlscope-core
pub use crawlscope_core::report::{extract_url_path, format_chain};
