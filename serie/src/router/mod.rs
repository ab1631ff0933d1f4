pub mod download;
pub mod history;
pub mod util;
