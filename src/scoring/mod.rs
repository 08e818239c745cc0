pub mod engine;
pub mod risk;
pub mod trend;
pub mod types;
pub mod validation;

pub use engine::{compute_score, ScoreSnapshot};
pub use risk::{compute_risk, RiskSnapshot};
pub use trend::{compute_trend, PillarDelta, TrendDelta};
pub use types::{EnvironmentalMetrics, GovernanceMetrics, RawMetrics, SocialMetrics};
pub use validation::EngineError;
