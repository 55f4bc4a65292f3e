pub mod bottomed_out;
pub mod capitulation_drop;
pub mod parabolic_rise;
pub mod pump_and_dump;
pub mod volume_anomaly;

pub use bottomed_out::BottomedOutDetector;
pub use capitulation_drop::CapitulationDropDetector;
pub use parabolic_rise::ParabolicRiseDetector;
pub use pump_and_dump::PumpAndDumpDetector;
pub use volume_anomaly::VolumeAnomalyDetector;
