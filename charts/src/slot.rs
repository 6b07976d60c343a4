//! Reusable display slots.
//!
//! A slot (a table row, in the host UI) is reassigned to a different asset
//! whenever it is recycled. Every `assign` bumps the slot's generation and
//! hands out a [`SlotTicket`]; a result is applied only if it carries the
//! ticket that is still current at delivery time. Reassigning to the *same*
//! asset also bumps the generation, so results of the previous binding are
//! dropped as well.
//!
//! Slots are owned and mutated by the single consumer context. Results
//! produced on worker tasks reach them as [`Delivery`] values over a channel.

use std::sync::Arc;

use tracing::debug;

use market::{AssetId, Series};

use crate::coordinator::{Delivery, Payload};

pub type SlotId = usize;

/// Ownership token issued by [`SlotController::assign`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SlotTicket {
    pub slot: SlotId,
    pub generation: u64,
    pub asset_id: AssetId,
}

/// What a slot currently displays.
#[derive(Debug, Clone, Default)]
pub enum SlotContent {
    /// Nothing yet: unbound, or bound and waiting for a result.
    #[default]
    Blank,
    Series(Arc<Series>),
    /// Fetch failed, timed out or returned no points.
    NoData,
}

impl SlotContent {
    pub fn series(&self) -> Option<&Arc<Series>> {
        match self {
            SlotContent::Series(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, SlotContent::Blank)
    }
}

/// Chart widget behind a slot.
pub trait ChartSink {
    fn render(&mut self, content: &SlotContent);
}

/// Headless sink.
impl ChartSink for () {
    fn render(&mut self, _content: &SlotContent) {}
}

pub struct SlotController<S> {
    id: SlotId,
    generation: u64,
    owned: Option<AssetId>,
    content: SlotContent,
    sink: S,
}

impl<S: ChartSink> SlotController<S> {
    pub fn new(id: SlotId, sink: S) -> Self {
        Self {
            id,
            generation: 0,
            owned: None,
            content: SlotContent::Blank,
            sink,
        }
    }

    pub fn id(&self) -> SlotId {
        self.id
    }

    pub fn owned_id(&self) -> Option<&str> {
        self.owned.as_deref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn content(&self) -> &SlotContent {
        &self.content
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Ticket of the current binding, `None` while unbound.
    pub fn ticket(&self) -> Option<SlotTicket> {
        self.owned.as_ref().map(|id| SlotTicket {
            slot: self.id,
            generation: self.generation,
            asset_id: id.clone(),
        })
    }

    /// Bind the slot to `id`. Must happen before any fetch is requested for it.
    ///
    /// Clears the displayed chart; outstanding results for earlier bindings
    /// become stale.
    pub fn assign(&mut self, id: impl Into<AssetId>) -> SlotTicket {
        let asset_id = id.into();

        self.generation += 1;
        self.owned = Some(asset_id.clone());
        self.set_content(SlotContent::Blank);

        SlotTicket {
            slot: self.id,
            generation: self.generation,
            asset_id,
        }
    }

    pub fn is_current(&self, ticket: &SlotTicket) -> bool {
        ticket.slot == self.id
            && ticket.generation == self.generation
            && self.owned.as_deref() == Some(ticket.asset_id.as_str())
    }

    /// Show `series` if `ticket` is still current. An empty series shows as
    /// "no data".
    pub fn deliver(&mut self, ticket: &SlotTicket, series: Arc<Series>) -> bool {
        if !self.accepts(ticket) {
            return false;
        }

        if series.is_empty() {
            self.set_content(SlotContent::NoData);
        } else {
            self.set_content(SlotContent::Series(series));
        }
        true
    }

    /// Show "no data" if `ticket` is still current.
    pub fn deliver_empty(&mut self, ticket: &SlotTicket) -> bool {
        if !self.accepts(ticket) {
            return false;
        }

        self.set_content(SlotContent::NoData);
        true
    }

    pub fn apply(&mut self, delivery: Delivery) -> bool {
        match delivery.payload {
            Payload::Series(series) => self.deliver(&delivery.ticket, series),
            Payload::Empty => self.deliver_empty(&delivery.ticket),
        }
    }

    fn accepts(&self, ticket: &SlotTicket) -> bool {
        let current = self.is_current(ticket);
        if !current {
            debug!(
                slot = self.id,
                asset_id = %ticket.asset_id,
                ticket_generation = ticket.generation,
                slot_generation = self.generation,
                "stale delivery dropped"
            );
        }
        current
    }

    fn set_content(&mut self, content: SlotContent) {
        self.content = content;
        self.sink.render(&self.content);
    }
}

/// Fixed pool of slots addressed by position.
pub struct SlotTable<S> {
    slots: Vec<SlotController<S>>,
}

impl<S: ChartSink> SlotTable<S> {
    pub fn new(sinks: impl IntoIterator<Item = S>) -> Self {
        let slots = sinks
            .into_iter()
            .enumerate()
            .map(|(i, sink)| SlotController::new(i, sink))
            .collect();
        Self { slots }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, id: SlotId) -> Option<&SlotController<S>> {
        self.slots.get(id)
    }

    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut SlotController<S>> {
        self.slots.get_mut(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SlotController<S>> {
        self.slots.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut SlotController<S>> {
        self.slots.iter_mut()
    }

    /// Route a delivery to its slot. Unknown slots and stale tickets are dropped.
    pub fn apply(&mut self, delivery: Delivery) -> bool {
        match self.slots.get_mut(delivery.ticket.slot) {
            Some(slot) => slot.apply(delivery),
            None => false,
        }
    }

    /// Bound slots still waiting for a result.
    pub fn unresolved(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| s.owned_id().is_some() && s.content().is_blank())
            .count()
    }
}
