mod locator_handler;

pub use locator_handler::{index, show_map, upload_photo};
