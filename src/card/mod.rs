pub mod effect;

pub use effect::{is_effect, Effect, DRAW_TWO, PICK_FROM_PREFIX, UNKNOWN_CARD};
