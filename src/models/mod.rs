pub mod intent;
pub mod settings;

pub use intent::*;
pub use settings::*;
