//! Platform directories for config and data.

mod xdg_root;

pub use xdg_root::{config_file, config_home, data_dir};
