//! Drag-and-drop pipeline board.
//!
//! Cards are drag sources, stage columns are drop targets. A drop yields the
//! moved deal for the controller to persist; the board itself never writes.

use crate::model::deal::{total_amount, Deal, DealStage};
use crate::model::RecordId;

/// One kanban column, deals in collection order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardColumn<'a> {
    pub stage: DealStage,
    pub deals: Vec<&'a Deal>,
    pub total_amount: u64,
}

impl BoardColumn<'_> {
    pub fn count(&self) -> usize {
        self.deals.len()
    }
}

/// Builds columns for every stage, or only `filter` when set.
pub fn columns(deals: &[Deal], filter: Option<DealStage>) -> Vec<BoardColumn<'_>> {
    DealStage::ALL
        .into_iter()
        .filter(|stage| filter.map_or(true, |only| only == *stage))
        .map(|stage| {
            let in_stage: Vec<&Deal> = deals.iter().filter(|deal| deal.stage == stage).collect();
            BoardColumn {
                stage,
                total_amount: total_amount(in_stage.iter().copied()),
                deals: in_stage,
            }
        })
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineBoard {
    dragging: Option<RecordId>,
    highlighted: Option<DealStage>,
}

impl PipelineBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dragging(&self) -> Option<&str> {
        self.dragging.as_deref()
    }

    pub fn is_highlighted(&self, stage: DealStage) -> bool {
        self.highlighted == Some(stage)
    }

    pub fn begin_drag(&mut self, deal_id: impl Into<RecordId>) {
        self.dragging = Some(deal_id.into());
        self.highlighted = None;
    }

    /// Highlights the hovered column while a card is being dragged.
    pub fn drag_over(&mut self, stage: DealStage) {
        if self.dragging.is_some() {
            self.highlighted = Some(stage);
        }
    }

    pub fn drag_leave(&mut self, stage: DealStage) {
        if self.highlighted == Some(stage) {
            self.highlighted = None;
        }
    }

    pub fn cancel_drag(&mut self) {
        self.dragging = None;
        self.highlighted = None;
    }

    /// Ends the drag over `stage`.
    ///
    /// Returns the dragged deal moved to `stage`, or `None` when nothing was
    /// dragged, the deal is unknown, or it already sits in that column.
    pub fn drop_on(&mut self, stage: DealStage, deals: &[Deal]) -> Option<Deal> {
        let deal_id = self.dragging.take()?;
        self.highlighted = None;
        deals
            .iter()
            .find(|deal| deal.id == deal_id)
            .filter(|deal| deal.stage != stage)
            .map(|deal| deal.with_stage(stage))
    }
}
