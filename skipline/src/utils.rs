mod axis;
mod bounding_box;
mod metrics;
#[cfg(test)]
mod test_scenes;

pub use self::axis::*;
pub use self::bounding_box::*;
pub use self::metrics::*;
#[cfg(test)]
pub(crate) use self::test_scenes::*;
