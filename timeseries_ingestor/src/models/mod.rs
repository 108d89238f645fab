pub mod dense;
pub mod extent;
pub mod granularity;
pub mod series;
