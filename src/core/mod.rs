pub mod backup;
pub mod daily;
pub mod hygiene;
pub mod logview;
pub mod monthly;
pub mod schedule;
pub mod sequence;
pub mod tolerance;
