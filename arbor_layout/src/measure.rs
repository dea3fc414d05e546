// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Two-phase node measurement.
//!
//! Geometry is synchronous; measuring content may not be. The engine hands out
//! a [`PendingMeasurements`] batch tagged with its generation, the caller
//! resolves it (synchronously with [`Measure`] or concurrently with
//! [`AsyncMeasure`]), and the resulting [`MeasuredBatch`] is applied back. A
//! batch whose generation no longer matches the engine is discarded.

use alloc::string::String;
use alloc::vec::Vec;
use core::future::Future;

use hashbrown::HashMap;
use kurbo::Size;

use crate::error::MeasureError;
use crate::path::Path;

/// One node whose intrinsic size is unknown.
#[derive(Clone, Debug, PartialEq)]
pub struct MeasureRequest<E = ()> {
    /// Address of the node.
    pub path: Path,
    /// Label to measure.
    pub label: String,
    /// Caller payload from the input tree.
    pub extra: E,
    /// Configured lower bound; the final size is never smaller on either axis.
    pub minimum: Size,
}

/// Synchronous measurer.
///
/// Closures with the matching signature implement this trait.
pub trait Measure<E = ()> {
    /// Report the natural size of the node's content.
    fn measure(&self, request: &MeasureRequest<E>) -> Result<Size, MeasureError>;
}

impl<E, F> Measure<E> for F
where
    F: Fn(&MeasureRequest<E>) -> Result<Size, MeasureError>,
{
    fn measure(&self, request: &MeasureRequest<E>) -> Result<Size, MeasureError> {
        self(request)
    }
}

/// Asynchronous measurer, for content that needs a render round-trip.
///
/// All requests of a batch are polled concurrently.
pub trait AsyncMeasure<E = ()> {
    /// Report the natural size of the node's content.
    fn measure(
        &self,
        request: &MeasureRequest<E>,
    ) -> impl Future<Output = Result<Size, MeasureError>>;
}

/// Requests produced by [`LayoutEngine::pending_measurements`](crate::LayoutEngine::pending_measurements).
#[derive(Clone, Debug)]
pub struct PendingMeasurements<E = ()> {
    pub(crate) generation: u32,
    pub(crate) requests: Vec<MeasureRequest<E>>,
}

impl<E> PendingMeasurements<E> {
    /// Engine generation the requests were taken from.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// The nodes that still need a size.
    pub fn requests(&self) -> &[MeasureRequest<E>] {
        &self.requests
    }

    /// Number of requests.
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    /// Whether every node already has a size.
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Measure every request in order.
    pub fn resolve(self, measurer: &impl Measure<E>) -> MeasuredBatch {
        let results = self
            .requests
            .iter()
            .map(|request| Measured::new(request, measurer.measure(request)))
            .collect();
        MeasuredBatch {
            generation: self.generation,
            results,
        }
    }

    /// Measure every request concurrently and wait for all of them.
    pub async fn resolve_async(self, measurer: &impl AsyncMeasure<E>) -> MeasuredBatch {
        let sizes =
            futures::future::join_all(self.requests.iter().map(|r| measurer.measure(r))).await;
        let results = self
            .requests
            .iter()
            .zip(sizes)
            .map(|(request, size)| Measured::new(request, size))
            .collect();
        MeasuredBatch {
            generation: self.generation,
            results,
        }
    }
}

/// Outcome for one request.
#[derive(Clone, Debug, PartialEq)]
pub struct Measured {
    /// Address of the measured node.
    pub path: Path,
    /// Label that was measured.
    pub label: String,
    /// Reported size, already checked for finiteness.
    pub result: Result<Size, MeasureError>,
}

impl Measured {
    fn new<E>(request: &MeasureRequest<E>, result: Result<Size, MeasureError>) -> Self {
        Self {
            path: request.path.clone(),
            label: request.label.clone(),
            result: result.and_then(checked),
        }
    }
}

/// Resolved sizes, ready for [`LayoutEngine::apply_measurements`](crate::LayoutEngine::apply_measurements).
#[derive(Clone, Debug, PartialEq)]
pub struct MeasuredBatch {
    pub(crate) generation: u32,
    pub(crate) results: Vec<Measured>,
}

impl MeasuredBatch {
    /// Engine generation the batch was requested for.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Per-node outcomes, in request order.
    pub fn results(&self) -> &[Measured] {
        &self.results
    }
}

fn checked(size: Size) -> Result<Size, MeasureError> {
    let ok = |v: f64| v.is_finite() && v >= 0.0;
    if ok(size.width) && ok(size.height) {
        Ok(size)
    } else {
        Err(MeasureError::Invalid {
            width: size.width,
            height: size.height,
        })
    }
}

/// Measured sizes memoised by path. An entry only applies while the node
/// still carries the label it was measured with.
#[derive(Clone, Debug, Default)]
pub(crate) struct MeasureCache {
    sizes: HashMap<Path, (String, Size)>,
}

impl MeasureCache {
    pub(crate) fn get(&self, path: &Path, label: &str) -> Option<Size> {
        self.sizes
            .get(path)
            .filter(|(measured, _)| measured == label)
            .map(|&(_, size)| size)
    }

    pub(crate) fn insert(&mut self, path: Path, label: String, size: Size) {
        self.sizes.insert(path, (label, size));
    }

    pub(crate) fn clear(&mut self) {
        self.sizes.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.sizes.len()
    }
}
