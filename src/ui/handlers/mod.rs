//! Handler modules for keyboard input, play, history and calendar state.

mod calendar_handler;
mod game_handler;
mod history_handler;
mod input_handler;

pub use calendar_handler::CalendarHandler;
pub use game_handler::GameHandler;
pub use history_handler::HistoryHandler;
pub use input_handler::InputHandler;
