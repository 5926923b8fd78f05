//! Style storage: origins and the per-origin [`StyleableMap`].

mod origin;
mod styleable_map;

pub use origin::Origin;
pub use styleable_map::StyleableMap;
