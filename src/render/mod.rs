pub mod renderer;

pub use renderer::{Renderer, badge_text};
