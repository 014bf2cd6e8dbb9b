use crate::error::CoreError;
use crate::id::ItemId;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;

/// Fuel capability of an item. Items without it cannot be burned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fuel {
    /// Ticks of burn time one unit provides.
    pub burn_time: u32,
}

/// An item kind. Created by content authors, never mutated at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDef {
    pub id: ItemId,
    pub name: String,
    /// Largest count a single stack of this item may hold. Always positive.
    pub max_stack: u32,
    pub fuel: Option<Fuel>,
}

/// Interned handle to an [`ItemDef`].
///
/// Handles are handed out by the [`Registry`](crate::registry::Registry) and
/// compare by [`ItemId`], so two handles are equal exactly when they name the
/// same item kind.
#[derive(Clone)]
pub struct Item(Arc<ItemDef>);

impl Item {
    pub(crate) fn new(def: ItemDef) -> Self {
        Self(Arc::new(def))
    }

    pub fn id(&self) -> ItemId {
        self.0.id
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn max_stack(&self) -> u32 {
        self.0.max_stack
    }

    pub fn is_fuel(&self) -> bool {
        self.0.fuel.is_some()
    }
}

impl Deref for Item {
    type Target = ItemDef;

    fn deref(&self) -> &ItemDef {
        &self.0
    }
}

impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        self.0.id == other.0.id
    }
}

impl Eq for Item {}

impl Hash for Item {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.id.hash(state);
    }
}

impl fmt::Debug for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Item({}, {:?})", self.0.name, self.0.id)
    }
}

/// A bounded quantity of a single item kind.
///
/// The empty stack has no item and a count of zero; every other stack holds
/// between 1 and `item.max_stack` units. An inventory slot *is* an
/// `ItemStack`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemStack {
    item: Option<Item>,
    count: u32,
}

impl ItemStack {
    /// Create a stack of `count` units of `item`. A count of zero yields the
    /// empty stack.
    pub fn new(item: &Item, count: u32) -> Result<Self, CoreError> {
        if count > item.max_stack() {
            return Err(CoreError::CountExceedsStack {
                item: item.name().to_string(),
                count,
                max_stack: item.max_stack(),
            });
        }
        if count == 0 {
            return Ok(Self::empty());
        }
        Ok(Self {
            item: Some(item.clone()),
            count,
        })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn item(&self) -> Option<&Item> {
        self.item.as_ref()
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Whether this stack holds `item`. The empty stack holds nothing.
    pub fn holds(&self, item: &Item) -> bool {
        self.item.as_ref() == Some(item)
    }

    /// Units that can still be added before the stack is full. Zero for the
    /// empty stack, which has no item to bound it.
    pub fn space(&self) -> u32 {
        self.item
            .as_ref()
            .map(|item| item.max_stack() - self.count)
            .unwrap_or(0)
    }

    pub fn is_full(&self) -> bool {
        self.item.is_some() && self.space() == 0
    }

    /// Combine `other` into this stack.
    ///
    /// Stacks of different items (including one empty stack) trade places,
    /// so a slot can hand back what it held while taking what the caller
    /// carries. Stacks of the same item merge: this stack fills up to the
    /// stack size and `other` keeps whatever did not fit.
    pub fn combine(&mut self, other: &mut ItemStack) {
        if self.is_empty() && other.is_empty() {
            return;
        }

        if self.item != other.item {
            std::mem::swap(self, other);
            return;
        }

        // Move only what fits; never form the sum, which may exceed u32.
        let moved = self.space().min(other.count);
        self.count += moved;
        other.count -= moved;
        if other.count == 0 {
            *other = ItemStack::empty();
        }
    }

    /// Split `amount` units off into a new stack.
    ///
    /// Asking for as many units as the stack holds, or more, takes the whole
    /// stack and leaves this one empty. Splitting an empty stack, or asking
    /// for zero units, returns an empty stack.
    pub fn split(&mut self, amount: u32) -> ItemStack {
        if self.is_empty() || amount == 0 {
            return ItemStack::empty();
        }

        if amount >= self.count {
            return std::mem::take(self);
        }

        self.count -= amount;
        ItemStack {
            item: self.item.clone(),
            count: amount,
        }
    }
}

impl fmt::Display for ItemStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.item {
            Some(item) => write!(f, "({}, {})", item.name(), self.count),
            None => f.write_str("(Empty)"),
        }
    }
}
