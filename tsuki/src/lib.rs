pub mod camera;
pub mod environment;
pub mod film;
pub mod hit;
pub mod integrators;
pub mod kdtree;
pub mod lights;
pub mod macros;
pub mod materials;
pub mod math;
pub mod renderer;
pub mod sampling;
pub mod scene;
pub mod settings;
pub mod shapes;
pub mod textures;
pub mod visibility;

// Re-exported for the logging macros
#[doc(hidden)]
pub use log;
