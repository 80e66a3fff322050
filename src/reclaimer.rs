//! Periodic cancellation of orders that were never paid.
//!
//! An order that waits for payment longer than the timeout is presumed
//! abandoned. Each sweep cancels such orders through
//! [`OrderClient::cancel_order`] (status to Cancelled, hold released, order
//! removed) and then finishes any Cancelled leftovers of an earlier sweep
//! that stopped half way. Every step is idempotent, so a failed order is
//! simply picked up again on the next run.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info, instrument, warn};

use crate::clients::OrderClient;
use crate::clock::Clock;
use crate::domain::{Order, OrderStatus};
use crate::error::{BookstoreError, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct ReclaimerConfig {
    /// Time between two sweeps.
    pub interval: Duration,
    /// How long an order may wait for payment.
    pub order_timeout: Duration,
    /// Most orders looked at per status per sweep.
    pub batch_size: usize,
}

impl Default for ReclaimerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            order_timeout: Duration::from_secs(30),
            batch_size: 100,
        }
    }
}

/// Outcome of a single sweep.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SweepReport {
    /// Orders waiting for payment that were looked at.
    pub scanned: usize,
    /// Of those, how many were past the timeout.
    pub expired: usize,
    /// Expired orders cancelled, restocked and removed.
    pub reclaimed: usize,
    /// Cancelled leftovers that were finished.
    pub cleaned_up: usize,
    /// Expired orders that changed under the sweep, e.g. paid in the meantime.
    pub skipped: usize,
    /// Failures, retried on the next sweep.
    pub failed: usize,
}

/// Totals across every sweep of a running reclaimer.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReclaimerStats {
    pub sweeps: usize,
    pub reclaimed: usize,
    pub cleaned_up: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl ReclaimerStats {
    fn record(&mut self, report: &SweepReport) {
        self.sweeps += 1;
        self.reclaimed += report.reclaimed;
        self.cleaned_up += report.cleaned_up;
        self.skipped += report.skipped;
        self.failed += report.failed;
    }
}

/// Stale-order reclaimer.
///
/// ```ignore
/// let handle = Reclaimer::new(system.order_client.clone(), clock)
///     .with_interval(Duration::from_secs(5))
///     .with_order_timeout(Duration::from_secs(30))
///     .start();
///
/// // ... serve traffic ...
///
/// let stats = handle.stop().await?;
/// info!(reclaimed = stats.reclaimed, "Reclaimer stopped");
/// ```
pub struct Reclaimer {
    order_client: OrderClient,
    clock: Arc<dyn Clock>,
    config: ReclaimerConfig,
}

impl Reclaimer {
    pub fn new(order_client: OrderClient, clock: Arc<dyn Clock>) -> Self {
        Self {
            order_client,
            clock,
            config: ReclaimerConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ReclaimerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.config.interval = interval;
        self
    }

    pub fn with_order_timeout(mut self, timeout: Duration) -> Self {
        self.config.order_timeout = timeout;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.config.batch_size = batch_size;
        self
    }

    pub fn config(&self) -> &ReclaimerConfig {
        &self.config
    }

    /// Whether the order has waited longer than the timeout at `now`.
    /// A creation time in the future never counts as expired.
    pub fn is_expired(&self, order: &Order, now: DateTime<Utc>) -> bool {
        (now - order.created_at)
            .to_std()
            .map(|elapsed| elapsed > self.config.order_timeout)
            .unwrap_or(false)
    }

    /// Runs one sweep. Never fails: per-order errors are logged and counted.
    #[instrument(name = "reclaim_sweep", skip(self))]
    pub async fn run_once(&self) -> SweepReport {
        let mut report = SweepReport::default();
        let now = self.clock.now();

        match self
            .order_client
            .get_orders_by_status(OrderStatus::WaitingForPayment, self.config.batch_size)
            .await
        {
            Ok(waiting) => {
                report.scanned = waiting.len();
                for order in waiting.iter().filter(|order| self.is_expired(order, now)) {
                    report.expired += 1;
                    self.reclaim(order, &mut report).await;
                }
            }
            Err(e) => {
                error!(error = %e, "Could not fetch orders waiting for payment");
                report.failed += 1;
            }
        }

        match self
            .order_client
            .get_orders_by_status(OrderStatus::Cancelled, self.config.batch_size)
            .await
        {
            Ok(leftovers) => {
                for order in &leftovers {
                    match self.order_client.finish_cancellation(order).await {
                        Ok(()) => report.cleaned_up += 1,
                        Err(e) => {
                            error!(order_id = %order.id, error = %e, "Cleanup of cancelled order failed");
                            report.failed += 1;
                        }
                    }
                }
            }
            Err(e) => {
                error!(error = %e, "Could not fetch cancelled orders");
                report.failed += 1;
            }
        }

        if report.reclaimed + report.cleaned_up + report.failed > 0 {
            info!(?report, "Sweep finished");
        } else {
            debug!(?report, "Sweep finished");
        }
        report
    }

    async fn reclaim(&self, order: &Order, report: &mut SweepReport) {
        match self.order_client.cancel_order(order.id.clone()).await {
            Ok(_) => {
                debug!(order_id = %order.id, quantity = order.quantity, "Order reclaimed");
                report.reclaimed += 1;
            }
            Err(e @ BookstoreError::InvalidTransition { .. }) => {
                warn!(order_id = %order.id, error = %e, "Order moved on before it could be reclaimed");
                report.skipped += 1;
            }
            Err(e) if e.is_not_found() => {
                debug!(order_id = %order.id, "Order already gone");
                report.skipped += 1;
            }
            Err(e) => {
                error!(order_id = %order.id, error = %e, "Reclaiming order failed");
                report.failed += 1;
            }
        }
    }

    /// Starts sweeping in the background. The first sweep runs one interval from now.
    pub fn start(self) -> ReclaimerHandle {
        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(async move {
            let mut stats = ReclaimerStats::default();
            let period = self.config.interval;
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            info!(config = ?self.config, "Reclaimer started");

            loop {
                tokio::select! {
                    _ = &mut stop_rx => break,
                    _ = ticker.tick() => {
                        let report = self.run_once().await;
                        stats.record(&report);
                    }
                }
            }

            info!(?stats, "Reclaimer stopped");
            stats
        });

        ReclaimerHandle { stop_tx, handle }
    }
}

/// Running reclaimer. Dropping the handle also stops it after the current sweep.
pub struct ReclaimerHandle {
    stop_tx: oneshot::Sender<()>,
    handle: JoinHandle<ReclaimerStats>,
}

impl ReclaimerHandle {
    /// Stops after the sweep in flight, if any, and returns the totals.
    pub async fn stop(self) -> Result<ReclaimerStats> {
        let _ = self.stop_tx.send(());
        self.handle
            .await
            .map_err(|e| BookstoreError::Internal(format!("reclaimer task failed: {e}")))
    }
}
