pub mod config;
pub mod detectors;
pub mod signal_detector;
pub mod trend_classifier;
pub mod trend_signals;

pub use config::SignalThresholds;
pub use signal_detector::{DetectionOutcome, SignalDetector, SignalDetectorSet};
pub use trend_classifier::TrendClassifier;
