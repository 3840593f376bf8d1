pub mod environment;
pub mod paths;
pub mod terminal;
pub mod timeout;

pub use environment::{default_session_dir, get_data_dir};
pub use paths::{display_file_name, format_path_with_tilde, has_csv_extension};
pub use terminal::sanitize_cell;
pub use timeout::run_with_timeout;
