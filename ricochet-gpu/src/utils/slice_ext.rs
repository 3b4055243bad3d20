#[cfg(target_arch = "spirv")]
use spirv_std::arch::IndexUnchecked;

/// Element access for per-pixel buffers.
///
/// Shaders index without bounds checks; everywhere else indexing is checked
/// and an out-of-range `id` panics.
pub trait SliceExt<T> {
    fn at(&self, id: usize) -> &T;
    fn at_mut(&mut self, id: usize) -> &mut T;
}

impl<T> SliceExt<T> for [T] {
    #[cfg(target_arch = "spirv")]
    fn at(&self, id: usize) -> &T {
        unsafe { self.index_unchecked(id) }
    }

    #[cfg(target_arch = "spirv")]
    fn at_mut(&mut self, id: usize) -> &mut T {
        unsafe { self.index_unchecked_mut(id) }
    }

    #[cfg(not(target_arch = "spirv"))]
    fn at(&self, id: usize) -> &T {
        &self[id]
    }

    #[cfg(not(target_arch = "spirv"))]
    fn at_mut(&mut self, id: usize) -> &mut T {
        &mut self[id]
    }
}
