mod app_context;
mod project_root;

pub use app_context::AppContext;
pub use project_root::{PROJECT_DIR, explicit_project_root, find_project_root};
