use chrono::Utc;

use crate::models::holding::{Alert, AlertKind};

/// Checks a holding's alerts against a new price.
///
/// Stateless: all state lives on the alerts themselves. An alert fires at
/// most once — once `triggered`, it is never re-evaluated, no matter how
/// often the price crosses the threshold afterwards.
pub struct AlertEvaluator;

impl AlertEvaluator {
    pub fn new() -> Self {
        Self
    }

    /// Evaluate every active, untriggered alert against `current_price`,
    /// marking the ones whose threshold is met. Returns how many alerts
    /// fired on this call.
    ///
    /// `VolumeSpike` and `News` alerts are never fired here: no volume or
    /// news feed is wired into the evaluator, so they stay active and
    /// untriggered unless set externally.
    pub fn evaluate(&self, alerts: &mut [Alert], current_price: f64) -> usize {
        let mut fired = 0;
        for alert in alerts.iter_mut() {
            if !alert.active || alert.triggered {
                continue;
            }

            let should_trigger = match (alert.kind, alert.value) {
                (AlertKind::PriceAbove, Some(value)) => current_price >= value,
                (AlertKind::PriceBelow, Some(value)) => current_price <= value,
                _ => false,
            };

            if should_trigger {
                alert.triggered = true;
                alert.triggered_date = Some(Utc::now());
                fired += 1;
            }
        }
        fired
    }
}

impl Default for AlertEvaluator {
    fn default() -> Self {
        Self::new()
    }
}
