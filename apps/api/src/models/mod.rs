pub mod post;

pub use post::{OptimizedPost, ScheduledPost};
