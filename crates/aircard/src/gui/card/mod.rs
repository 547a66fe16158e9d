pub mod assets;
pub mod model;
pub mod view;

pub use assets::AssetStore;
pub use model::{CardModel, Timer};
pub use view::draw;
