//! Worker partitioner: splits planar channels into contiguous segments and
//! runs one scoped worker thread per segment.


use std::ops::Range;
use std::thread;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Error, Result};
use crate::raster::{PlanarBuffer, Sample};

/// Half-open index range `[start, end)` processed by one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Segment {
    pub start: usize,
    pub end: usize,
}

impl Segment {
    pub const fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    #[inline]
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// How a channel of `len` samples is divided among workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PartitionMode {
    /// Segments cover `[0, len)`; their sizes differ by at most one.
    #[default]
    Balanced,
    /// Every segment has `len / workers` samples. The remainder
    /// `[(len / workers) * workers, len)` is left unprocessed.
    Truncating,
}

/// Splits `[0, len)` into exactly `workers` contiguous, disjoint segments.
///
/// Segments may be empty when `len` is small relative to `workers`.
///
/// # Panics
///
/// Panics if `workers` is 0.
pub fn partition(len: usize, workers: usize, mode: PartitionMode) -> Vec<Segment> {
    assert!(workers > 0, "worker count must be positive");

    let base = len / workers;
    match mode {
        PartitionMode::Balanced => {
            let extra = len % workers;
            let mut start = 0;
            (0..workers)
                .map(|i| {
                    let size = base + usize::from(i < extra);
                    let segment = Segment::new(start, start + size);
                    start += size;
                    segment
                })
                .collect()
        }
        PartitionMode::Truncating => (0..workers)
            .map(|i| Segment::new(i * base, (i + 1) * base))
            .collect(),
    }
}

/// Everything one worker owns: its index, its segment and the matching
/// disjoint channel sub-slices.
#[derive(Debug)]
pub struct WorkerSlices<'a, T> {
    pub index: usize,
    pub segment: Segment,
    pub b: &'a mut [T],
    pub g: &'a mut [T],
    pub r: &'a mut [T],
}

/// Runs `work` on one named scoped thread per non-empty segment and joins
/// every worker before returning.
///
/// The first failure wins: a spawn failure stops further spawning (already
/// running workers are still joined), a panicking worker is reported as
/// [`Error::WorkerPanicked`].
///
/// # Panics
///
/// Panics if `segments` are not ascending, disjoint and within the buffer.
pub fn run_partitioned<T, F>(
    planar: &mut PlanarBuffer<T>,
    segments: &[Segment],
    work: F,
) -> Result<()>
where
    T: Sample,
    F: Fn(WorkerSlices<'_, T>) + Sync,
{
    let (b, g, r) = planar.channels_mut();
    let slices = split_segments(b, g, r, segments);
    let work = &work;

    thread::scope(|scope| {
        let mut handles = Vec::with_capacity(slices.len());
        let mut first_error = None;

        for slice in slices {
            let index = slice.index;
            let spawned = thread::Builder::new()
                .name(format!("sepia-worker-{index}"))
                .spawn_scoped(scope, move || work(slice));

            match spawned {
                Ok(handle) => handles.push((index, handle)),
                Err(source) => {
                    warn!(index, error = %source, "Failed to spawn sepia worker");
                    first_error = Some(Error::WorkerSpawn { index, source });
                    break;
                }
            }
        }

        for (index, handle) in handles {
            if handle.join().is_err() {
                warn!(index, "Sepia worker panicked");
                first_error.get_or_insert(Error::WorkerPanicked { index });
            }
        }

        first_error.map_or(Ok(()), Err)
    })
}

/// Cuts the channels into per-segment sub-slices, skipping empty segments.
fn split_segments<'a, T>(
    mut b: &'a mut [T],
    mut g: &'a mut [T],
    mut r: &'a mut [T],
    segments: &[Segment],
) -> Vec<WorkerSlices<'a, T>> {
    let len = b.len();
    let mut offset = 0;
    let mut slices = Vec::with_capacity(segments.len());

    for (index, &segment) in segments.iter().enumerate() {
        assert!(
            segment.start >= offset && segment.start <= segment.end && segment.end <= len,
            "segment {index} ({segment:?}) is out of order or out of bounds"
        );
        if segment.is_empty() {
            continue;
        }

        let skip = segment.start - offset;
        let take = segment.len();
        offset = segment.end;

        slices.push(WorkerSlices {
            index,
            segment,
            b: take_front(&mut b, skip, take),
            g: take_front(&mut g, skip, take),
            r: take_front(&mut r, skip, take),
        });
    }

    slices
}

/// Drops `skip` elements from the front of `channel`, then detaches the next
/// `take` elements.
fn take_front<'a, T>(channel: &mut &'a mut [T], skip: usize, take: usize) -> &'a mut [T] {
    let (_, tail) = std::mem::take(channel).split_at_mut(skip);
    let (front, rest) = tail.split_at_mut(take);
    *channel = rest;
    front
}
