//! Capacity-bounded item containers.
//!
//! Two container policies share one contract:
//!
//! - [`LedgerInventory`] keeps one merged `(item, count)` entry per item kind
//!   under an aggregate capacity. This is the canonical shape.
//! - [`SlotInventory`] is a fixed array of [`ItemStack`] slots, each bounded
//!   by its item's stack size, modelling a physical multi-slot container.
//!
//! Both reject a store that does not fit as a whole, and both treat a remove
//! that cannot be satisfied as a no-op. Neither is an error: callers check
//! with `contains` first, or look at the returned flag.

use crate::error::CoreError;
use crate::item::{Item, ItemStack};

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

/// Which container policy to build, and how large.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InventoryLayout {
    /// Merged entries bounded by a total item count.
    Ledger { capacity: u32 },
    /// A fixed number of stack slots.
    Slots { slots: usize },
}

impl Default for InventoryLayout {
    fn default() -> Self {
        InventoryLayout::Ledger {
            capacity: DEFAULT_CAPACITY,
        }
    }
}

impl InventoryLayout {
    pub fn validate(&self) -> Result<(), CoreError> {
        match *self {
            InventoryLayout::Ledger { capacity: 0 } | InventoryLayout::Slots { slots: 0 } => {
                Err(CoreError::ZeroCapacity)
            }
            _ => Ok(()),
        }
    }
}

/// Capacity used when a layout is not specified.
pub const DEFAULT_CAPACITY: u32 = 100;

// ---------------------------------------------------------------------------
// Ledger inventory
// ---------------------------------------------------------------------------

/// One merged entry of a [`LedgerInventory`]. Counts are not bounded by the
/// item's stack size, only by the inventory capacity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    pub item: Item,
    pub count: u32,
}

/// Aggregated ledger: at most one entry per item, total bounded by capacity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerInventory {
    entries: Vec<LedgerEntry>,
    total: u32,
    capacity: u32,
}

impl LedgerInventory {
    pub fn new(capacity: u32) -> Result<Self, CoreError> {
        if capacity == 0 {
            return Err(CoreError::ZeroCapacity);
        }
        Ok(Self {
            entries: Vec::new(),
            total: 0,
            capacity,
        })
    }

    /// Store `amount` units of `item`. Returns `Ok(false)` and changes
    /// nothing if the inventory cannot take the whole amount.
    #[must_use = "a rejected store leaves the items with the caller"]
    pub fn store(&mut self, item: &Item, amount: u32) -> Result<bool, CoreError> {
        if amount == 0 {
            return Err(CoreError::ZeroAmount);
        }
        let Some(new_total) = self.total.checked_add(amount) else {
            return Ok(false);
        };
        if new_total > self.capacity {
            return Ok(false);
        }

        if let Some(entry) = self.entries.iter_mut().find(|e| e.item == *item) {
            entry.count += amount;
        } else {
            self.entries.push(LedgerEntry {
                item: item.clone(),
                count: amount,
            });
        }
        self.total = new_total;
        Ok(true)
    }

    /// Whether the entry for `item` holds at least `amount` units.
    pub fn contains(&self, item: &Item, amount: u32) -> bool {
        self.quantity(item) >= amount
    }

    /// Remove `amount` units of `item`. Returns `false` and changes nothing
    /// when fewer than `amount` units are held.
    #[must_use = "a failed remove means the items were never taken"]
    pub fn remove(&mut self, item: &Item, amount: u32) -> bool {
        if amount == 0 {
            return false;
        }
        let Some(index) = self.entries.iter().position(|e| e.item == *item) else {
            return false;
        };
        let entry = &mut self.entries[index];
        if entry.count < amount {
            return false;
        }
        if entry.count == amount {
            self.entries.remove(index);
        } else {
            entry.count -= amount;
        }
        self.total -= amount;
        true
    }

    pub fn quantity(&self, item: &Item) -> u32 {
        self.entries
            .iter()
            .find(|e| e.item == *item)
            .map(|e| e.count)
            .unwrap_or(0)
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn free_space(&self) -> u32 {
        self.capacity - self.total
    }

    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Slot inventory
// ---------------------------------------------------------------------------

/// Fixed-size array of stack slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotInventory {
    slots: Vec<ItemStack>,
}

impl SlotInventory {
    pub fn new(size: usize) -> Result<Self, CoreError> {
        if size == 0 {
            return Err(CoreError::ZeroCapacity);
        }
        Ok(Self {
            slots: vec![ItemStack::empty(); size],
        })
    }

    /// Merge `incoming` into the slots.
    ///
    /// The stack is combined into every slot already holding its item, in
    /// slot order, until it runs out. Whatever is left goes into the first
    /// empty slot. If there is no empty slot the remainder stays in
    /// `incoming`.
    pub fn insert(&mut self, incoming: &mut ItemStack) {
        let Some(item) = incoming.item().cloned() else {
            return;
        };

        let mut first_empty = None;
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.is_empty() {
                first_empty.get_or_insert(index);
                continue;
            }
            if !slot.holds(&item) {
                continue;
            }
            slot.combine(incoming);
            if incoming.is_empty() {
                return;
            }
        }

        if let Some(index) = first_empty {
            self.slots[index].combine(incoming);
        }
    }

    /// Units of `item` the slots could still take: free space in matching
    /// slots plus a full stack per empty slot.
    pub fn room_for(&self, item: &Item) -> u64 {
        self.slots
            .iter()
            .map(|slot| {
                if slot.is_empty() {
                    u64::from(item.max_stack())
                } else if slot.holds(item) {
                    u64::from(slot.space())
                } else {
                    0
                }
            })
            .sum()
    }

    /// Store `amount` units of `item`, which may span several slots.
    /// Returns `Ok(false)` and changes nothing if the slots cannot take the
    /// whole amount.
    #[must_use = "a rejected store leaves the items with the caller"]
    pub fn store(&mut self, item: &Item, amount: u32) -> Result<bool, CoreError> {
        if amount == 0 {
            return Err(CoreError::ZeroAmount);
        }
        if self.room_for(item) < u64::from(amount) {
            return Ok(false);
        }

        let mut remaining = amount;
        while remaining > 0 {
            let chunk = remaining.min(item.max_stack());
            let mut incoming = ItemStack::new(item, chunk)?;
            self.insert(&mut incoming);
            // Room was checked up front, so every chunk lands in full.
            debug_assert!(incoming.is_empty());
            remaining -= chunk - incoming.count();
        }
        Ok(true)
    }

    /// Whether the slots hold at least `amount` units of `item` in total,
    /// counting every matching slot.
    pub fn contains(&self, item: &Item, amount: u32) -> bool {
        if amount == 0 {
            return true;
        }
        let mut found: u64 = 0;
        for slot in self.slots.iter().filter(|s| s.holds(item)) {
            found += u64::from(slot.count());
            if found >= u64::from(amount) {
                return true;
            }
        }
        false
    }

    /// Remove `amount` units of `item`, draining matching slots in order.
    /// Returns `false` and changes nothing when fewer units are held.
    #[must_use = "a failed remove means the items were never taken"]
    pub fn remove(&mut self, item: &Item, amount: u32) -> bool {
        if amount == 0 || !self.contains(item, amount) {
            return false;
        }

        let mut needed = amount;
        for slot in self.slots.iter_mut().filter(|s| s.holds(item)) {
            let taken = slot.split(needed);
            needed -= taken.count();
            if needed == 0 {
                break;
            }
        }
        true
    }

    /// Units of `item` across all slots. Wider than a slot count, since
    /// several slots may each hold up to `u32::MAX`.
    pub fn quantity(&self, item: &Item) -> u64 {
        self.slots
            .iter()
            .filter(|s| s.holds(item))
            .map(|s| u64::from(s.count()))
            .sum()
    }

    pub fn total(&self) -> u64 {
        self.slots.iter().map(|s| u64::from(s.count())).sum()
    }

    pub fn slots(&self) -> &[ItemStack] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(ItemStack::is_empty)
    }
}

// ---------------------------------------------------------------------------
// Inventory
// ---------------------------------------------------------------------------

/// A container owned by a machine. Dispatches via enum match (no trait
/// objects).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inventory {
    Ledger(LedgerInventory),
    Slots(SlotInventory),
}

impl Inventory {
    pub fn ledger(capacity: u32) -> Result<Self, CoreError> {
        LedgerInventory::new(capacity).map(Inventory::Ledger)
    }

    pub fn slots(size: usize) -> Result<Self, CoreError> {
        SlotInventory::new(size).map(Inventory::Slots)
    }

    pub fn from_layout(layout: InventoryLayout) -> Result<Self, CoreError> {
        match layout {
            InventoryLayout::Ledger { capacity } => Self::ledger(capacity),
            InventoryLayout::Slots { slots } => Self::slots(slots),
        }
    }

    #[must_use = "a rejected store leaves the items with the caller"]
    pub fn store(&mut self, item: &Item, amount: u32) -> Result<bool, CoreError> {
        match self {
            Inventory::Ledger(inv) => inv.store(item, amount),
            Inventory::Slots(inv) => inv.store(item, amount),
        }
    }

    pub fn contains(&self, item: &Item, amount: u32) -> bool {
        match self {
            Inventory::Ledger(inv) => inv.contains(item, amount),
            Inventory::Slots(inv) => inv.contains(item, amount),
        }
    }

    #[must_use = "a failed remove means the items were never taken"]
    pub fn remove(&mut self, item: &Item, amount: u32) -> bool {
        match self {
            Inventory::Ledger(inv) => inv.remove(item, amount),
            Inventory::Slots(inv) => inv.remove(item, amount),
        }
    }

    pub fn quantity(&self, item: &Item) -> u64 {
        match self {
            Inventory::Ledger(inv) => u64::from(inv.quantity(item)),
            Inventory::Slots(inv) => inv.quantity(item),
        }
    }

    pub fn total(&self) -> u64 {
        match self {
            Inventory::Ledger(inv) => u64::from(inv.total()),
            Inventory::Slots(inv) => inv.total(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Inventory::Ledger(inv) => inv.is_empty(),
            Inventory::Slots(inv) => inv.is_empty(),
        }
    }

    /// Non-empty contents as `(item, count)` pairs in slot order, for display.
    pub fn contents(&self) -> Vec<(Item, u32)> {
        match self {
            Inventory::Ledger(inv) => inv
                .entries()
                .iter()
                .map(|e| (e.item.clone(), e.count))
                .collect(),
            Inventory::Slots(inv) => inv
                .slots()
                .iter()
                .filter_map(|s| s.item().map(|item| (item.clone(), s.count())))
                .collect(),
        }
    }
}
