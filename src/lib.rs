pub mod config;
pub mod events;
pub mod framebuffer;
pub mod grid;
pub mod io;
pub mod panel;
pub mod render;
pub mod rules;
pub mod seed;
pub mod sim;
pub mod step;
pub mod transport;
pub mod world;

pub use framebuffer::RenderFrame;
pub use grid::BitGrid;
pub use grid::Dimensions;
pub use world::DoubleBuffer;
