pub mod coordinates;
pub mod record;
pub mod sentiment;

pub use coordinates::Coordinates;
pub use record::{NewRecord, SamplingRecord};
pub use sentiment::Sentiment;
