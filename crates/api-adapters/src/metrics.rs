//! Prometheus counters for the adoption workflow.

use domains::ApplicationStatus;
use prometheus_client::encoding::text::encode;
use prometheus_client::encoding::EncodeLabelSet;
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::registry::Registry;
use services::SideEffect;

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct StatusLabels {
    pub status: String,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct SideEffectLabels {
    /// `cascade` or `notification`.
    pub effect: String,
    pub outcome: String,
}

pub struct Metrics {
    registry: Registry,
    status_updates: Family<StatusLabels, Counter>,
    side_effects: Family<SideEffectLabels, Counter>,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub fn new() -> Self {
        let status_updates = Family::<StatusLabels, Counter>::default();
        let side_effects = Family::<SideEffectLabels, Counter>::default();

        let mut registry = Registry::with_prefix("pethub");
        registry.register(
            "application_status_updates",
            "Application status changes written",
            status_updates.clone(),
        );
        registry.register(
            "side_effects",
            "Outcomes of best-effort steps following a status change",
            side_effects.clone(),
        );

        Self {
            registry,
            status_updates,
            side_effects,
        }
    }

    pub fn record_status_update(&self, status: ApplicationStatus) {
        self.status_updates
            .get_or_create(&StatusLabels {
                status: status.as_str().to_owned(),
            })
            .inc();
    }

    pub fn record_side_effect(&self, effect: &str, outcome: &SideEffect) {
        let outcome = match outcome {
            SideEffect::Applied => "applied",
            SideEffect::Skipped => "skipped",
            SideEffect::Failed(_) => "failed",
        };
        self.side_effects
            .get_or_create(&SideEffectLabels {
                effect: effect.to_owned(),
                outcome: outcome.to_owned(),
            })
            .inc();
    }

    /// OpenMetrics text exposition of every registered metric.
    pub fn render(&self) -> Result<String, std::fmt::Error> {
        let mut buffer = String::new();
        encode(&mut buffer, &self.registry)?;
        Ok(buffer)
    }
}
