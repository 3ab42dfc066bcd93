pub mod regions;
mod renderer;
mod state;
pub mod theme;

pub use renderer::render;
pub use state::AppState;
pub use theme::Theme;
