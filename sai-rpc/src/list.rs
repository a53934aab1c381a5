/*
 *
 *    Copyright (c) 2024 SAI RPC Authors
 *
 *    Licensed under the Apache License, Version 2.0 (the "License");
 *    you may not use this file except in compliance with the License.
 *    You may obtain a copy of the License at
 *
 *        http://www.apache.org/licenses/LICENSE-2.0
 *
 *    Unless required by applicable law or agreed to in writing, software
 *    distributed under the License is distributed on an "AS IS" BASIS,
 *    WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *    See the License for the specific language governing permissions and
 *    limitations under the License.
 */

//! Native list buffers.
//!
//! A native list is the `{ count, list }` pair the SAI C API uses for every
//! variable-length value. The element buffer is allocated with the C allocator
//! (or any other [`ListAlloc`]) so that ownership can be handed over to native
//! code and taken back without copying.
//!
//! [`NativeList`] owns its buffer: it is move-only, and dropping it releases
//! the buffer exactly once. Attributes holding lists can therefore never leak
//! their buffers, whether a conversion succeeds or fails halfway.

use core::fmt;
use core::marker::PhantomData;
use core::mem::{self, ManuallyDrop};
use core::ops::{Deref, DerefMut};
use core::ptr::{self, NonNull};
use core::slice;

use crate::config::CodecConfig;
use crate::error::{Error, ErrorCode};
use crate::wire::WireConvert;

/// The allocator backing native list buffers.
///
/// # Safety
///
/// `allocate` must return either null or a pointer to at least `size` bytes,
/// aligned for any native element type, which stays valid until it is handed
/// to `release`. `release` must accept every non-null pointer returned by
/// `allocate` regardless of how many elements were eventually used.
pub unsafe trait ListAlloc {
    fn allocate(size: usize) -> *mut u8;

    /// # Safety
    ///
    /// `ptr` must come from `allocate` of the same allocator and must not have
    /// been released already.
    unsafe fn release(ptr: *mut u8);
}

/// The C allocator, i.e. `malloc` / `free`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Malloc;

unsafe impl ListAlloc for Malloc {
    fn allocate(size: usize) -> *mut u8 {
        // `malloc(0)` may legally return null
        unsafe { libc::malloc(size.max(1)) as *mut u8 }
    }

    unsafe fn release(ptr: *mut u8) {
        libc::free(ptr as *mut libc::c_void)
    }
}

/// An owned native list (`sai_*_list_t`).
///
/// The buffer is always allocated, even for zero elements, so the list pointer
/// handed to native code is never null.
#[repr(C)]
pub struct NativeList<T: Copy, A: ListAlloc = Malloc> {
    count: u32,
    list: NonNull<T>,
    _alloc: PhantomData<A>,
}

impl<T: Copy, A: ListAlloc> NativeList<T, A> {
    /// Allocate an uninitialized buffer for `count` elements.
    ///
    /// Callers must write all elements before the list is read.
    fn allocate(count: usize) -> Result<Self, Error> {
        let count32 = u32::try_from(count).map_err(|_| ErrorCode::ListTooLong)?;
        let size = mem::size_of::<T>()
            .checked_mul(count)
            .ok_or(ErrorCode::ListTooLong)?;

        let list = NonNull::new(A::allocate(size) as *mut T).ok_or_else(|| {
            log::error!("Failed to allocate a native list of {count} elements");
            Error::new(ErrorCode::NoMemory)
        })?;

        debug_assert_eq!(list.as_ptr() as usize % mem::align_of::<T>(), 0);

        Ok(Self {
            count: count32,
            list,
            _alloc: PhantomData,
        })
    }

    /// Copy `items` into a newly allocated list.
    pub fn from_slice(items: &[T]) -> Result<Self, Error> {
        let list = Self::allocate(items.len())?;

        unsafe {
            ptr::copy_nonoverlapping(items.as_ptr(), list.list.as_ptr(), items.len());
        }

        Ok(list)
    }

    /// A list of `count` copies of `value`.
    pub fn filled(value: T, count: usize) -> Result<Self, Error> {
        let list = Self::allocate(count)?;

        for i in 0..count {
            unsafe { list.list.as_ptr().add(i).write(value) };
        }

        Ok(list)
    }

    /// Take ownership of a buffer produced by [`Self::into_raw_parts`] or by
    /// native code using the same allocator.
    ///
    /// Returns `None` if `list` is null.
    ///
    /// # Safety
    ///
    /// `list` must have been allocated by `A`, must hold `count` initialized
    /// elements and must not be owned by anything else.
    pub unsafe fn from_raw_parts(list: *mut T, count: u32) -> Option<Self> {
        NonNull::new(list).map(|list| Self {
            count,
            list,
            _alloc: PhantomData,
        })
    }

    /// Give up ownership of the buffer. The caller becomes responsible for
    /// releasing it with `A::release`.
    pub fn into_raw_parts(self) -> (*mut T, u32) {
        let this = ManuallyDrop::new(self);

        (this.list.as_ptr(), this.count)
    }

    pub const fn count(&self) -> u32 {
        self.count
    }

    pub fn as_ptr(&self) -> *const T {
        self.list.as_ptr()
    }

    pub fn as_slice(&self) -> &[T] {
        unsafe { slice::from_raw_parts(self.list.as_ptr(), self.count as usize) }
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        unsafe { slice::from_raw_parts_mut(self.list.as_ptr(), self.count as usize) }
    }

    /// Shorten the list to `count` elements, as native code does when it
    /// returns fewer elements than were provided. The buffer is kept.
    pub fn truncate(&mut self, count: u32) {
        self.count = self.count.min(count);
    }
}

impl<T: WireConvert, A: ListAlloc> NativeList<T, A> {
    /// Convert wire elements into a newly allocated native list.
    ///
    /// If an element fails to convert, the buffer is released before the
    /// error is returned.
    pub fn from_wire(items: &[T::Wire], config: &CodecConfig) -> Result<Self, Error> {
        let list = Self::allocate(items.len())?;

        for (i, item) in items.iter().enumerate() {
            let elem = T::from_wire(item, config)?;

            unsafe { list.list.as_ptr().add(i).write(elem) };
        }

        Ok(list)
    }

    /// Convert the list to its wire form and release the buffer.
    pub fn into_wire(self) -> Vec<T::Wire> {
        self.iter().map(WireConvert::to_wire).collect()
    }
}

impl<T: Copy, A: ListAlloc> Drop for NativeList<T, A> {
    fn drop(&mut self) {
        unsafe { A::release(self.list.as_ptr() as *mut u8) }
    }
}

impl<T: Copy, A: ListAlloc> Deref for NativeList<T, A> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl<T: Copy, A: ListAlloc> DerefMut for NativeList<T, A> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.as_mut_slice()
    }
}

impl<T: Copy + fmt::Debug, A: ListAlloc> fmt::Debug for NativeList<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

impl<T: Copy + PartialEq, A: ListAlloc> PartialEq for NativeList<T, A> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Copy + Eq, A: ListAlloc> Eq for NativeList<T, A> {}

unsafe impl<T: Copy + Send, A: ListAlloc> Send for NativeList<T, A> {}
unsafe impl<T: Copy + Sync, A: ListAlloc> Sync for NativeList<T, A> {}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::addr::Ip4;

    #[test]
    fn test_from_slice() {
        let list: NativeList<u32> = NativeList::from_slice(&[1, 2, 3]).unwrap();

        assert_eq!(list.count(), 3);
        assert_eq!(list.as_slice(), &[1, 2, 3]);
        assert_eq!(format!("{:?}", list), "[1, 2, 3]");
    }

    #[test]
    fn test_empty_list_is_allocated() {
        let list: NativeList<u64> = NativeList::from_wire(&[], &CodecConfig::new()).unwrap();

        assert_eq!(list.count(), 0);
        assert!(list.is_empty());
        assert!(!list.as_ptr().is_null());
    }

    #[test]
    fn test_from_wire_reinterprets_bits() {
        let list: NativeList<u8> =
            NativeList::from_wire(&[-1, 0, 127, -128], &CodecConfig::new()).unwrap();
        assert_eq!(list.as_slice(), &[255, 0, 127, 128]);
        assert_eq!(list.into_wire(), vec![-1, 0, 127, -128]);

        let list: NativeList<u64> = NativeList::from_wire(&[-1], &CodecConfig::new()).unwrap();
        assert_eq!(list[0], u64::MAX);
    }

    #[test]
    fn test_from_wire_element_failure() {
        let wire = ["10.0.0.1".to_string(), "bogus".to_string()];

        let err = NativeList::<Ip4>::from_wire(&wire, &CodecConfig::new()).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidIpv4);
    }

    #[test]
    fn test_raw_parts() {
        let list: NativeList<i16> = NativeList::filled(-7, 4).unwrap();
        let (ptr, count) = list.into_raw_parts();

        assert_eq!(count, 4);

        let list = unsafe { NativeList::<i16>::from_raw_parts(ptr, count) }.unwrap();
        assert_eq!(list.as_slice(), &[-7; 4]);

        assert!(unsafe { NativeList::<i16>::from_raw_parts(ptr::null_mut(), 0) }.is_none());
    }

    #[test]
    fn test_truncate() {
        let mut list: NativeList<i32> = NativeList::filled(0, 8).unwrap();

        list.as_mut_slice()[..2].copy_from_slice(&[5, 6]);
        list.truncate(2);
        assert_eq!(list.as_slice(), &[5, 6]);

        list.truncate(10);
        assert_eq!(list.count(), 2);
    }
}
