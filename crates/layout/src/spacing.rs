//! Margin and padding registers.
//!
//! Every node carries two parallel 8-slot registers: `box_reset` suppresses the raw style
//! value of a slot and `box_adjustment` adds a correction on top. A slot may also be
//! delegated to a partner node, which then owns it.

use crate::LayoutError;
use crate::delegation::SlotKey;
use crate::tree::NodeTree;
use bitflags::bitflags;
use boxflow_types::NodeId;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct BoxSlot: u8 {
        const MARGIN_TOP = 1;
        const MARGIN_RIGHT = 1 << 1;
        const MARGIN_BOTTOM = 1 << 2;
        const MARGIN_LEFT = 1 << 3;
        const PADDING_TOP = 1 << 4;
        const PADDING_RIGHT = 1 << 5;
        const PADDING_BOTTOM = 1 << 6;
        const PADDING_LEFT = 1 << 7;

        const MARGIN = Self::MARGIN_TOP.bits() | Self::MARGIN_RIGHT.bits()
            | Self::MARGIN_BOTTOM.bits() | Self::MARGIN_LEFT.bits();
        const PADDING = Self::PADDING_TOP.bits() | Self::PADDING_RIGHT.bits()
            | Self::PADDING_BOTTOM.bits() | Self::PADDING_LEFT.bits();
        const MARGIN_VERTICAL = Self::MARGIN_TOP.bits() | Self::MARGIN_BOTTOM.bits();
        const MARGIN_HORIZONTAL = Self::MARGIN_RIGHT.bits() | Self::MARGIN_LEFT.bits();
        const PADDING_VERTICAL = Self::PADDING_TOP.bits() | Self::PADDING_BOTTOM.bits();
        const PADDING_HORIZONTAL = Self::PADDING_RIGHT.bits() | Self::PADDING_LEFT.bits();
    }
}

impl BoxSlot {
    pub const SINGLE: [BoxSlot; 8] = [
        BoxSlot::MARGIN_TOP,
        BoxSlot::MARGIN_RIGHT,
        BoxSlot::MARGIN_BOTTOM,
        BoxSlot::MARGIN_LEFT,
        BoxSlot::PADDING_TOP,
        BoxSlot::PADDING_RIGHT,
        BoxSlot::PADDING_BOTTOM,
        BoxSlot::PADDING_LEFT,
    ];

    /// Register index of the lowest slot in the set.
    pub fn index(self) -> usize {
        self.bits().trailing_zeros().min(7) as usize
    }

    pub fn from_index(index: usize) -> Self {
        Self::SINGLE[index & 7]
    }

    /// Single slots contained in this set, in register order.
    pub fn slots(self) -> impl Iterator<Item = BoxSlot> {
        Self::SINGLE.into_iter().filter(move |s| self.contains(*s))
    }

    pub fn is_margin(self) -> bool {
        BoxSlot::MARGIN.contains(self)
    }

    pub fn is_padding(self) -> bool {
        BoxSlot::PADDING.contains(self)
    }

    pub fn is_horizontal(self) -> bool {
        (BoxSlot::MARGIN_HORIZONTAL | BoxSlot::PADDING_HORIZONTAL).contains(self)
    }
}

/// Options for [`NodeTree::set_box`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SetBoxOptions {
    pub reset: Option<bool>,
    pub adjustment: Option<f32>,
    /// Add to the existing adjustment instead of replacing it.
    pub accumulate: bool,
    /// Keep the smaller of the existing and the new adjustment.
    pub min: bool,
    /// Keep the larger of the existing and the new adjustment.
    pub max: bool,
    /// `Some(true)` lets the resolved value drop below zero.
    pub negative: Option<bool>,
}

impl SetBoxOptions {
    pub fn reset() -> Self {
        Self {
            reset: Some(true),
            adjustment: Some(0.0),
            ..Default::default()
        }
    }

    pub fn adjust(value: f32) -> Self {
        Self {
            adjustment: Some(value),
            ..Default::default()
        }
    }

    pub fn accumulate(mut self) -> Self {
        self.accumulate = true;
        self
    }

    pub fn max(mut self) -> Self {
        self.max = true;
        self
    }

    pub fn min(mut self) -> Self {
        self.min = true;
        self
    }

    pub fn allow_negative(mut self) -> Self {
        self.negative = Some(true);
        self
    }
}

impl NodeTree {
    /// Style value of a slot before registers apply.
    pub fn raw_spacing(&self, id: NodeId, slot: BoxSlot) -> f32 {
        let style = &self[id].style;
        let value = match slot.index() {
            0 => style.margin.top,
            1 => style.margin.right,
            2 => style.margin.bottom,
            3 => style.margin.left,
            4 => style.padding.top,
            5 => style.padding.right,
            6 => style.padding.bottom,
            _ => style.padding.left,
        };
        if value.is_finite() { value } else { 0.0 }
    }

    /// Register-applied value of a slot on this node, ignoring delegation.
    pub fn resolved(&self, id: NodeId, slot: BoxSlot) -> f32 {
        let index = slot.index();
        let node = &self[id];
        let base = if node.box_reset[index] {
            0.0
        } else {
            self.raw_spacing(id, slot)
        };
        base + node.box_adjustment[index]
    }

    /// `(reset, adjustment)` of the lowest slot in `slot`.
    pub fn get_box(&self, id: NodeId, slot: BoxSlot) -> (bool, f32) {
        let index = slot.index();
        let node = &self[id];
        (node.box_reset[index], node.box_adjustment[index])
    }

    pub fn is_locked(&self, id: NodeId, slot: BoxSlot) -> bool {
        self[id].box_reset[slot.index()]
    }

    /// Mutates the local registers of every slot in `slot`.
    pub fn set_box(&mut self, id: NodeId, slot: BoxSlot, options: SetBoxOptions) {
        let allow_negative = options.negative == Some(true);
        for single in slot.slots() {
            let index = single.index();
            let raw = self.raw_spacing(id, single);
            let node = self.node_mut(id);
            if let Some(reset) = options.reset {
                node.box_reset[index] = reset;
            }
            if let Some(value) = options.adjustment {
                let existing = node.box_adjustment[index];
                let mut adjustment = if options.accumulate {
                    existing + value
                } else {
                    value
                };
                if options.min {
                    adjustment = adjustment.min(existing);
                }
                if options.max {
                    adjustment = adjustment.max(existing);
                }
                if !allow_negative {
                    let base = if node.box_reset[index] { 0.0 } else { raw };
                    let floor = base.min(0.0);
                    if base + adjustment < floor {
                        adjustment = floor - base;
                    }
                }
                node.box_adjustment[index] = adjustment;
            }
        }
        self.spacing_changed(id, slot);
    }

    /// Sets the register so the slot resolves to exactly `value`.
    pub fn assign_box(&mut self, id: NodeId, slot: BoxSlot, value: f32) {
        for single in slot.slots() {
            let base = if self.is_locked(id, single) {
                0.0
            } else {
                self.raw_spacing(id, single)
            };
            self.set_box(id, single, SetBoxOptions::adjust(value - base).allow_negative());
        }
    }

    /// Adds `value` to the owner of each slot, following delegation first.
    pub fn modify_box(&mut self, id: NodeId, slot: BoxSlot, value: f32, negative: bool) {
        for single in slot.slots() {
            let owner = self
                .delegation
                .find(SlotKey::new(id, single.index() as u8))
                .node;
            let mut options = SetBoxOptions::adjust(value).accumulate();
            options.negative = Some(negative);
            self.set_box(owner, single, options);
        }
    }

    /// With a partner, delegates every slot in `slot` to it. Returns the terminal owner of
    /// the lowest slot either way.
    pub fn register_box(
        &mut self,
        id: NodeId,
        slot: BoxSlot,
        partner: Option<NodeId>,
    ) -> Result<NodeId, LayoutError> {
        if let Some(partner) = partner {
            self.try_get(partner)?;
            for single in slot.slots() {
                let index = single.index() as u8;
                self.delegation
                    .link(SlotKey::new(id, index), SlotKey::new(partner, index))?;
            }
        }
        Ok(self
            .delegation
            .find(SlotKey::new(id, slot.index() as u8))
            .node)
    }

    /// Terminal owner of a slot without compressing the forest.
    pub fn box_owner(&self, id: NodeId, slot: BoxSlot) -> NodeId {
        self.delegation
            .owner(SlotKey::new(id, slot.index() as u8))
            .node
    }

    pub fn is_delegated(&self, id: NodeId, slot: BoxSlot) -> bool {
        self.delegation
            .is_delegated(SlotKey::new(id, slot.index() as u8))
    }

    /// Marks each slot reset. With a partner and no prior delegation, the resolved value
    /// moves onto the partner and the slot is delegated to it.
    pub fn reset_box(
        &mut self,
        id: NodeId,
        slot: BoxSlot,
        partner: Option<NodeId>,
    ) -> Result<(), LayoutError> {
        for single in slot.slots() {
            let value = self.resolved(id, single);
            if let Some(partner) = partner {
                if !self.is_delegated(id, single) {
                    self.register_box(id, single, Some(partner))?;
                    if value != 0.0 {
                        self.set_box(
                            partner,
                            single,
                            SetBoxOptions::adjust(value).accumulate().allow_negative(),
                        );
                    }
                }
            }
            self.set_box(id, single, SetBoxOptions::reset());
        }
        Ok(())
    }

    /// Moves only the adjustment register of each slot onto `partner`.
    pub fn transfer_box(
        &mut self,
        id: NodeId,
        slot: BoxSlot,
        partner: NodeId,
    ) -> Result<(), LayoutError> {
        self.try_get(partner)?;
        for single in slot.slots() {
            let (_, adjustment) = self.get_box(id, single);
            if adjustment == 0.0 {
                continue;
            }
            self.set_box(
                partner,
                single,
                SetBoxOptions::adjust(adjustment).accumulate().allow_negative(),
            );
            self.set_box(id, single, SetBoxOptions::adjust(0.0).allow_negative());
        }
        Ok(())
    }

    /// Resolved margins as `[top, right, bottom, left]`.
    pub fn box_spacing(&self, id: NodeId) -> [f32; 4] {
        [
            self.resolved(id, BoxSlot::MARGIN_TOP),
            self.resolved(id, BoxSlot::MARGIN_RIGHT),
            self.resolved(id, BoxSlot::MARGIN_BOTTOM),
            self.resolved(id, BoxSlot::MARGIN_LEFT),
        ]
    }

    /// Resolved paddings as `[top, right, bottom, left]`.
    pub fn padding_spacing(&self, id: NodeId) -> [f32; 4] {
        [
            self.resolved(id, BoxSlot::PADDING_TOP),
            self.resolved(id, BoxSlot::PADDING_RIGHT),
            self.resolved(id, BoxSlot::PADDING_BOTTOM),
            self.resolved(id, BoxSlot::PADDING_LEFT),
        ]
    }

    fn spacing_changed(&self, id: NodeId, slot: BoxSlot) {
        self.invalidate_geometry(id);
        let node = &self[id];
        let style = &node.style;
        let axis_auto = if slot.is_horizontal() {
            style.width.is_auto()
        } else {
            style.height.is_auto()
        };
        let parent_synthesized = node
            .parent()
            .is_some_and(|p| self[p].is_synthesized());
        if (slot.intersects(BoxSlot::PADDING) && axis_auto)
            || (slot.intersects(BoxSlot::MARGIN) && parent_synthesized)
        {
            self.invalidate_layout(id);
        }
    }
}
