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

use std::cell::{Cell, RefCell};
use std::collections::HashSet;

use sai_rpc::{ListAlloc, Registry};

pub fn init_env_logger() {
    let _ = env_logger::try_init_from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, "info"),
    );
}

/// The metadata registry all integration tests run against.
pub fn registry() -> Registry {
    Registry::parse(include_str!("sai.defs")).expect("valid test definitions")
}

thread_local! {
    static ALLOCATED: Cell<usize> = const { Cell::new(0) };
    static RELEASED: Cell<usize> = const { Cell::new(0) };
    static LIVE: RefCell<HashSet<usize>> = RefCell::new(HashSet::new());
}

/// A `malloc`-backed list allocator that counts what it hands out and
/// panics on a release of a pointer it does not own (e.g. a double free).
///
/// Counters are per thread, and every test runs on a thread of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tracked;

unsafe impl ListAlloc for Tracked {
    fn allocate(size: usize) -> *mut u8 {
        let ptr = unsafe { libc::malloc(size.max(1)) as *mut u8 };

        if !ptr.is_null() {
            ALLOCATED.with(|c| c.set(c.get() + 1));
            LIVE.with(|live| live.borrow_mut().insert(ptr as usize));
        }

        ptr
    }

    unsafe fn release(ptr: *mut u8) {
        let owned = LIVE.with(|live| live.borrow_mut().remove(&(ptr as usize)));
        assert!(owned, "Release of a buffer that is not live: {ptr:?}");

        RELEASED.with(|c| c.set(c.get() + 1));
        libc::free(ptr as *mut libc::c_void);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocStats {
    pub allocated: usize,
    pub released: usize,
    pub live: usize,
}

pub fn alloc_stats() -> AllocStats {
    AllocStats {
        allocated: ALLOCATED.with(Cell::get),
        released: RELEASED.with(Cell::get),
        live: LIVE.with(|live| live.borrow().len()),
    }
}

/// An allocator that is always out of memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Exhausted;

unsafe impl ListAlloc for Exhausted {
    fn allocate(_size: usize) -> *mut u8 {
        core::ptr::null_mut()
    }

    unsafe fn release(_ptr: *mut u8) {
        unreachable!("Nothing was ever allocated")
    }
}
