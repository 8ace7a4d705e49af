//! Parallel region generation on a fixed worker pool.
//!
//! Regions are independent, so each worker runs the whole shared pipeline
//! on one region at a time. Requests go in over a bounded channel; finished
//! regions come back over another.

use std::collections::VecDeque;
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender, bounded};
use dashmap::DashMap;
use strata_math::Region3i;

use crate::error::PipelineError;
use crate::pipeline::Pipeline;
use crate::region::GeneratedRegion;

/// A finished (or failed) region.
#[derive(Debug)]
pub struct RegionResult {
    /// The core region that was requested.
    pub region: Region3i,
    pub result: Result<GeneratedRegion, PipelineError>,
    /// Wall time spent in the pipeline, in microseconds.
    pub generation_time_us: u64,
}

struct RegionTask {
    region: Region3i,
    cancelled: Arc<AtomicBool>,
}

/// Runs a [`Pipeline`] over many regions concurrently.
pub struct ParallelRegionGenerator {
    task_sender: Sender<RegionTask>,
    result_receiver: Receiver<RegionResult>,
    /// Cancellation flag per pending region.
    active_tasks: Arc<DashMap<Region3i, Arc<AtomicBool>>>,
    in_flight: Arc<AtomicU64>,
}

impl ParallelRegionGenerator {
    /// Spawn `thread_count` workers sharing `pipeline`.
    ///
    /// At most `max_queued` requests wait for a worker; at most
    /// `result_capacity` finished regions wait to be collected before
    /// workers block.
    ///
    /// # Errors
    ///
    /// Fails if a worker thread cannot be spawned.
    pub fn new(
        pipeline: Arc<Pipeline>,
        thread_count: usize,
        max_queued: usize,
        result_capacity: usize,
    ) -> io::Result<Self> {
        let (task_sender, task_receiver) = bounded::<RegionTask>(max_queued.max(1));
        let (result_sender, result_receiver) = bounded::<RegionResult>(result_capacity.max(1));
        let in_flight = Arc::new(AtomicU64::new(0));

        for index in 0..thread_count.max(1) {
            let receiver = task_receiver.clone();
            let sender = result_sender.clone();
            let in_flight = Arc::clone(&in_flight);
            let pipeline = Arc::clone(&pipeline);

            std::thread::Builder::new()
                .name(format!("region-gen-{index}"))
                .spawn(move || {
                    while let Ok(task) = receiver.recv() {
                        if task.cancelled.load(Ordering::Relaxed) {
                            in_flight.fetch_sub(1, Ordering::Relaxed);
                            continue;
                        }

                        let start = Instant::now();
                        let result = pipeline.generate(task.region);
                        let elapsed = start.elapsed().as_micros() as u64;

                        if let Err(e) = &result {
                            tracing::warn!(min = %task.region.min, error = %e, "Region generation failed");
                        }
                        if !task.cancelled.load(Ordering::Relaxed) {
                            let _ = sender.send(RegionResult {
                                region: task.region,
                                result,
                                generation_time_us: elapsed,
                            });
                        }
                        in_flight.fetch_sub(1, Ordering::Relaxed);
                    }
                })?;
        }

        tracing::info!(threads = thread_count.max(1), "Started region generation workers");

        Ok(Self {
            task_sender,
            result_receiver,
            active_tasks: Arc::new(DashMap::new()),
            in_flight,
        })
    }

    /// One worker per core minus one, and queues sized to match.
    ///
    /// # Errors
    ///
    /// Fails if a worker thread cannot be spawned.
    pub fn with_defaults(pipeline: Arc<Pipeline>) -> io::Result<Self> {
        let threads = num_cpus::get().saturating_sub(1).max(1);
        Self::new(pipeline, threads, threads * 4, threads * 8)
    }

    /// Queue a region for generation.
    ///
    /// Returns `Err(region)` if the request queue is full.
    pub fn submit(&self, region: Region3i) -> Result<(), Region3i> {
        let cancelled = Arc::new(AtomicBool::new(false));
        self.active_tasks.insert(region, Arc::clone(&cancelled));
        self.in_flight.fetch_add(1, Ordering::Relaxed);

        self.task_sender
            .try_send(RegionTask { region, cancelled })
            .map_err(|e| {
                self.in_flight.fetch_sub(1, Ordering::Relaxed);
                let region = e.into_inner().region;
                self.active_tasks.remove(&region);
                region
            })
    }

    /// Cancel a queued or running region. A finished region is unaffected.
    pub fn cancel(&self, region: &Region3i) {
        if let Some((_, cancelled)) = self.active_tasks.remove(region) {
            cancelled.store(true, Ordering::Relaxed);
        }
    }

    /// Collect every finished region without blocking.
    pub fn drain_results(&self) -> Vec<RegionResult> {
        let mut results = Vec::new();
        while let Ok(result) = self.result_receiver.try_recv() {
            self.active_tasks.remove(&result.region);
            results.push(result);
        }
        results
    }

    /// Wait up to `timeout` for the next finished region.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<RegionResult> {
        let result = self.result_receiver.recv_timeout(timeout).ok()?;
        self.active_tasks.remove(&result.region);
        Some(result)
    }

    /// Generate every region and return the results ordered by region
    /// minimum corner (`y`, then `z`, then `x`).
    ///
    /// Blocks until all regions are done. Regions cancelled meanwhile from
    /// another thread would never report back, so don't.
    pub fn generate_all(&self, regions: impl IntoIterator<Item = Region3i>) -> Vec<RegionResult> {
        let mut queue: VecDeque<Region3i> = regions.into_iter().collect();
        let mut expected = 0_usize;
        let mut results = Vec::with_capacity(queue.len());

        while !queue.is_empty() || results.len() < expected {
            while let Some(region) = queue.pop_front() {
                match self.submit(region) {
                    Ok(()) => expected += 1,
                    Err(region) => {
                        queue.push_front(region);
                        break;
                    }
                }
            }
            if let Some(result) = self.recv_timeout(Duration::from_millis(20)) {
                results.push(result);
            }
        }

        results.sort_by_key(|r| (r.region.min.y, r.region.min.z, r.region.min.x));
        results
    }

    /// Requests queued or running.
    pub fn in_flight_count(&self) -> u64 {
        self.in_flight.load(Ordering::Relaxed)
    }

    /// Returns `true` if `region` has been submitted and not yet collected.
    pub fn is_pending(&self, region: &Region3i) -> bool {
        self.active_tasks.contains_key(region)
    }
}

#[cfg(test)]
mod tests {
    use glam::IVec3;
    use strata_noise::WorldSeed;

    use strata_facet::FacetBorder;

    use super::*;
    use crate::facets::{FacetKind, SurfaceHeightFacet};
    use crate::providers::SurfaceProvider;
    use crate::region::GeneratingRegion;
    use crate::stage::{FacetProvider, StageDescriptor};

    struct Panics;

    impl FacetProvider for Panics {
        fn descriptor(&self) -> StageDescriptor {
            StageDescriptor::new("panics").updates(FacetKind::SurfaceHeight, FacetBorder::ZERO)
        }

        fn process(&self, _region: &mut GeneratingRegion) -> Result<(), PipelineError> {
            panic!("min > max");
        }
    }

    fn pipeline() -> Arc<Pipeline> {
        let seed = WorldSeed::new(42);
        Arc::new(
            Pipeline::builder(seed)
                .stage(SurfaceProvider::new(seed, 40.0).unwrap())
                .build()
                .unwrap(),
        )
    }

    fn region(x: i32, z: i32) -> Region3i {
        Region3i::from_min_and_size(IVec3::new(x * 16, 0, z * 16), IVec3::new(16, 64, 16))
    }

    #[test]
    fn test_generate_all_returns_every_region_in_order() {
        let generator = ParallelRegionGenerator::new(pipeline(), 3, 2, 2).unwrap();
        let regions: Vec<_> = (0..4).flat_map(|x| (0..3).map(move |z| region(x, z))).collect();

        let results = generator.generate_all(regions.clone());
        assert_eq!(results.len(), regions.len());
        for pair in results.windows(2) {
            let (a, b) = (pair[0].region.min, pair[1].region.min);
            assert!((a.y, a.z, a.x) < (b.y, b.z, b.x), "results out of order: {a} then {b}");
        }
        assert!(results.iter().all(|r| r.result.is_ok()));
    }

    #[test]
    fn test_panicking_stage_reports_failure() {
        let seed = WorldSeed::new(42);
        let pipeline = Arc::new(
            Pipeline::builder(seed)
                .stage(SurfaceProvider::new(seed, 40.0).unwrap())
                .stage(Panics)
                .build()
                .unwrap(),
        );
        let generator = ParallelRegionGenerator::new(pipeline, 1, 2, 2).unwrap();

        // A single worker has to survive the first panic to serve the rest.
        let results = generator.generate_all((0..3).map(|x| region(x, 0)));
        assert_eq!(results.len(), 3);
        for r in &results {
            assert!(matches!(
                &r.result,
                Err(PipelineError::StagePanicked { stage, .. }) if stage == "panics"
            ));
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let pipeline = pipeline();
        let generator = ParallelRegionGenerator::new(Arc::clone(&pipeline), 4, 8, 8).unwrap();
        let results = generator.generate_all((0..6).map(|x| region(x, -x)));

        for r in results {
            let parallel = r.result.unwrap();
            let sequential = pipeline.generate(r.region).unwrap();
            assert_eq!(
                parallel.facet::<SurfaceHeightFacet>(),
                sequential.facet::<SurfaceHeightFacet>(),
                "region {:?} differs between parallel and sequential runs",
                r.region
            );
        }
    }

    #[test]
    fn test_submit_and_drain() {
        let generator = ParallelRegionGenerator::new(pipeline(), 1, 16, 16).unwrap();
        let target = region(5, 5);
        generator.submit(target).unwrap();
        assert!(generator.is_pending(&target));

        let deadline = Instant::now() + Duration::from_secs(30);
        let mut received = Vec::new();
        while received.is_empty() && Instant::now() < deadline {
            received.extend(generator.drain_results());
            std::thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].region, target);
        assert!(!generator.is_pending(&target));
    }

    #[test]
    fn test_cancel_clears_pending() {
        let generator = ParallelRegionGenerator::new(pipeline(), 1, 16, 16).unwrap();
        let target = region(9, 9);
        let _ = generator.submit(target);
        generator.cancel(&target);
        assert!(!generator.is_pending(&target));
        // The task may have finished before the cancel landed; either way
        // nothing is left in flight once the worker catches up.
        let deadline = Instant::now() + Duration::from_secs(30);
        while generator.in_flight_count() > 0 && Instant::now() < deadline {
            let _ = generator.drain_results();
            std::thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(generator.in_flight_count(), 0);
    }
}
