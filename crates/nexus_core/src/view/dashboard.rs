//! Dashboard headline metrics and per-stage breakdown.

use crate::model::deal::{total_amount, Deal, DealStage};
use crate::model::task::Task;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageMetric {
    pub stage: DealStage,
    pub count: usize,
    pub amount: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardMetrics {
    /// Sum of every deal amount, closed ones included.
    pub total_pipeline: u64,
    pub won_revenue: u64,
    pub open_deals: usize,
    pub pending_tasks: usize,
    /// One entry per stage in board order.
    pub by_stage: Vec<StageMetric>,
}

impl DashboardMetrics {
    pub fn compute(deals: &[Deal], tasks: &[Task]) -> Self {
        let by_stage = DealStage::ALL
            .into_iter()
            .map(|stage| {
                let in_stage = || deals.iter().filter(move |deal| deal.stage == stage);
                StageMetric {
                    stage,
                    count: in_stage().count(),
                    amount: total_amount(in_stage()),
                }
            })
            .collect();

        Self {
            total_pipeline: total_amount(deals),
            won_revenue: total_amount(
                deals
                    .iter()
                    .filter(|deal| deal.stage == DealStage::ClosedWon),
            ),
            open_deals: deals.iter().filter(|deal| deal.is_open()).count(),
            pending_tasks: tasks.iter().filter(|task| !task.completed).count(),
            by_stage,
        }
    }

    /// Stages carrying value, for the pipeline-value chart.
    pub fn value_by_stage(&self) -> impl Iterator<Item = &StageMetric> {
        self.by_stage.iter().filter(|metric| metric.amount > 0)
    }
}
