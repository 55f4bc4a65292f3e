pub mod analysis;
pub mod indicator;
pub mod model;
pub mod services;
pub mod task;
