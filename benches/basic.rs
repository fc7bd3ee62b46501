//! Compares [`DynamicArray`] against `Vec` on the operations both provide.

use core::hint;
use criterion::{Bencher, Criterion, criterion_group, criterion_main};
use dynarray::DynamicArray;
use std::sync::OnceLock;

use rand::Rng;

const LARGE_SIZE: usize = 40000;

/// A function used to generate a random amount of data.
///
/// Random sizes keep the compiler from specializing the loops on a constant.
#[inline(never)]
fn gen_one(start: usize, end: usize) -> usize {
    let mut rng = rand::rng();
    rng.random_range(start..end)
}

/// The amount of data used in large data testing.
static LARGE_BOUND: OnceLock<usize> = OnceLock::new();

/// Generate an array of random content of a specified length.
#[inline(never)]
fn gen_rand(len: usize, start: u64, end: u64) -> Box<[u64]> {
    let mut rng = rand::rng();
    let mut vec: Vec<u64> = Vec::with_capacity(len);
    for _ in 0..len {
        vec.push(rng.random_range(start..end));
    }
    vec.into_boxed_slice()
}

/// The common surface of the containers under test.
trait VecLike: Clone {
    fn new_empty() -> Self;
    fn with_room(capacity: usize) -> Self;
    fn push(&mut self, value: u64);
    fn insert(&mut self, index: usize, value: u64);
    fn erase_at(&mut self, index: usize);
    fn get_mut(&mut self, index: usize) -> &mut u64;
    fn clear(&mut self);
}

impl VecLike for Vec<u64> {
    #[inline(always)]
    fn new_empty() -> Self {
        Self::new()
    }
    #[inline(always)]
    fn with_room(capacity: usize) -> Self {
        Self::with_capacity(capacity)
    }
    #[inline(always)]
    fn push(&mut self, value: u64) {
        Vec::push(self, value)
    }
    #[inline(always)]
    fn insert(&mut self, index: usize, value: u64) {
        Vec::insert(self, index, value)
    }
    #[inline(always)]
    fn erase_at(&mut self, index: usize) {
        Vec::remove(self, index);
    }
    #[inline(always)]
    fn get_mut(&mut self, index: usize) -> &mut u64 {
        &mut self[index]
    }
    #[inline(always)]
    fn clear(&mut self) {
        Vec::clear(self)
    }
}

impl VecLike for DynamicArray<u64> {
    #[inline(always)]
    fn new_empty() -> Self {
        Self::new()
    }
    #[inline(always)]
    fn with_room(capacity: usize) -> Self {
        Self::with_capacity(capacity)
    }
    #[inline(always)]
    fn push(&mut self, value: u64) {
        DynamicArray::push(self, value)
    }
    #[inline(always)]
    fn insert(&mut self, index: usize, value: u64) {
        DynamicArray::insert(self, index, value);
    }
    #[inline(always)]
    fn erase_at(&mut self, index: usize) {
        DynamicArray::erase_at(self, index);
    }
    #[inline(always)]
    fn get_mut(&mut self, index: usize) -> &mut u64 {
        &mut self[index]
    }
    #[inline(always)]
    fn clear(&mut self) {
        DynamicArray::clear(self)
    }
}

macro_rules! gen_bench_group {
    ($c:ident => $fn_name:ident) => {{
        let mut group_new = $c.benchmark_group(stringify!($fn_name));
        group_new.bench_function("Vec", |b| $fn_name::<Vec<u64>>(b));
        group_new.bench_function("DynamicArray", |b| $fn_name::<DynamicArray<u64>>(b));
    }};
}

fn bench_array(c: &mut Criterion) {
    LARGE_BOUND.get_or_init(|| gen_one(36000, 36003));
    gen_bench_group!(c => new_empty);
    gen_bench_group!(c => push_reserved);
    gen_bench_group!(c => push_from_empty);
    gen_bench_group!(c => insert_middle);
    gen_bench_group!(c => erase_middle);
    gen_bench_group!(c => clone_large);
}

/// Creation of an empty container. Neither allocates.
#[inline(never)]
fn new_empty<T: VecLike>(b: &mut Bencher) {
    b.iter(|| hint::black_box(T::new_empty()));
}

/// Pre allocate capacity and only test the efficiency of `push`.
#[inline(never)]
fn push_reserved<T: VecLike>(b: &mut Bencher) {
    let mut vec = T::with_room(LARGE_SIZE);
    let data = gen_rand(*LARGE_BOUND.get().unwrap(), 0, 9999);
    let index = gen_one(0, data.len());

    b.iter(|| {
        vec.clear();
        for item in &data {
            vec.push(*item);
        }
        hint::black_box(*vec.get_mut(index))
    });
}

/// Every container starts empty and grows by doubling.
#[inline(never)]
fn push_from_empty<T: VecLike>(b: &mut Bencher) {
    let data = gen_rand(*LARGE_BOUND.get().unwrap(), 0, 9999);
    let index = gen_one(0, data.len());

    b.iter(|| {
        let mut vec = T::new_empty();
        for item in &data {
            vec.push(*item);
        }
        hint::black_box(*vec.get_mut(index))
    });
}

/// `DynamicArray::insert` rotates by adjacent swaps, `Vec::insert` by memmove.
#[inline(never)]
fn insert_middle<T: VecLike>(b: &mut Bencher) {
    let data = gen_rand(4000, 0, 9999);
    let mut base = T::with_room(data.len() + 8);
    for item in &data {
        base.push(*item);
    }
    let at = gen_one(1000, 3000);

    b.iter(|| {
        let mut vec = base.clone();
        vec.insert(at, 6);
        vec.insert(at / 2, 7);
        hint::black_box(*vec.get_mut(at))
    });
}

#[inline(never)]
fn erase_middle<T: VecLike>(b: &mut Bencher) {
    let data = gen_rand(4000, 0, 9999);
    let mut base = T::with_room(data.len());
    for item in &data {
        base.push(*item);
    }
    let at = gen_one(1000, 3000);

    b.iter(|| {
        let mut vec = base.clone();
        vec.erase_at(at);
        vec.erase_at(at / 2);
        hint::black_box(*vec.get_mut(at))
    });
}

#[inline(never)]
fn clone_large<T: VecLike>(b: &mut Bencher) {
    let data = gen_rand(*LARGE_BOUND.get().unwrap(), 0, 9999);
    let mut base = T::new_empty();
    for item in &data {
        base.push(*item);
    }

    b.iter(|| hint::black_box(base.clone()));
}

criterion_group! {
    name = benches;
    config = Criterion::default()
        .sample_size(200)
        .warm_up_time(core::time::Duration::from_secs(3))
        .measurement_time(core::time::Duration::from_secs(8));
    targets = bench_array,
}
criterion_main!(benches);
