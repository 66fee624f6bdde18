//! A scope-guard stack of type-erased entries, released in reverse order on
//! drop. Not wired into the segmentation or chain-pool builders — ordinary
//! RAII already gives them this for free — but kept as a documented,
//! inert type completing the `spec.md` §4.6 allocator contract for a
//! future FFI host binding.

/// Releases its entries in reverse insertion order when dropped, mirroring
/// the source system's explicit scope stack.
#[derive(Default)]
pub struct ScopeStack {
    entries: Vec<Box<dyn std::any::Any>>,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push an entry onto the stack; it is dropped (in reverse order with
    /// its stack-mates) when the `ScopeStack` itself is dropped.
    pub fn push<T: 'static>(&mut self, entry: T) {
        self.entries.push(Box::new(entry));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Drop for ScopeStack {
    fn drop(&mut self) {
        while self.entries.pop().is_some() {}
    }
}
