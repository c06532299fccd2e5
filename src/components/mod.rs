pub mod app;
pub mod board_view;
pub mod color_picker;
pub mod score_pad;

pub use app::App;
