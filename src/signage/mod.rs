pub mod playlist;

pub use playlist::{Playlist, Slide, select_slide};
