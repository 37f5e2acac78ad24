pub mod frame;
pub mod renderer;
pub mod span;
pub mod step_renderer;
pub mod style;
