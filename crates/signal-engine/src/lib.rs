//! Deterministic financial signal classification and quantified findings.

pub mod bands;
pub mod candidates;
pub mod citations;
pub mod classifier;
pub mod config;
pub mod context;
pub mod enforcer;
pub mod findings;
pub mod format;
pub mod render;
pub mod selector;
pub mod state;

pub use bands::{ArrGrowthBand, BurnPressure, MarginBand};
pub use citations::{numeric_tokens, CitationSet};
pub use classifier::{classify, ClassificationReport, Classifier, RiskItem, StrategicQuestion};
pub use config::{BandThresholds, Bounds, FindingThresholds, SelectionLimits};
pub use context::{MetricDeltas, SignalContext};
pub use findings::{extract_findings, extract_findings_with, FindingCategory, QuantifiedFinding};
pub use render::{render_findings, render_report, RenderMode};
pub use state::SystemState;
