//! Arena of tensor descriptors addressed by stable handles
//!
//! Views alias their parent through a [`TensorHandle`] rather than a
//! pointer or reference: mutation-through-view becomes "look up handle,
//! mutate in place", which sidesteps dangling parents and multiple mutable
//! aliases by construction. Handles stay valid for the arena's lifetime;
//! individual slots are never freed.

use super::descriptor::TensorDescriptor;

/// Stable handle to a [`TensorDescriptor`] inside a [`TensorArena`]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TensorHandle(usize);

impl TensorHandle {
    /// Index of the descriptor inside its arena; equal to the descriptor's
    /// id.
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Owning store for every descriptor participating in one configuration
#[derive(Debug, Default)]
pub struct TensorArena {
    slots: Vec<TensorDescriptor>,
}

impl TensorArena {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Register a descriptor, assigning it a stable id, and return its
    /// handle.
    pub fn alloc(&mut self, mut descriptor: TensorDescriptor) -> TensorHandle {
        let id = self.slots.len();
        descriptor.set_id(id);
        self.slots.push(descriptor);
        TensorHandle(id)
    }

    /// Look up a descriptor.
    ///
    /// Handles are only ever minted by [`TensorArena::alloc`] and slots are
    /// never freed, so a handle from this arena is always valid. A handle
    /// from a *different* arena is a caller bug and panics.
    pub fn get(&self, handle: TensorHandle) -> &TensorDescriptor {
        &self.slots[handle.0]
    }

    /// Look up a descriptor for mutation.
    pub fn get_mut(&mut self, handle: TensorHandle) -> &mut TensorDescriptor {
        &mut self.slots[handle.0]
    }

    /// Number of registered descriptors.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the arena is empty.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
