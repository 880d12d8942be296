pub mod conditional_replace;
pub mod traits;

pub use conditional_replace::ConditionalReplaceWithDefault;
pub use traits::Transform;
