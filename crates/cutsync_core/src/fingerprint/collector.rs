//! Shared, append-only sub-fingerprint store.

use std::sync::Arc;
use std::thread;

use parking_lot::Mutex;

use super::types::{FingerprintError, FingerprintGenerator, FingerprintResult, SubFingerprint, TrackInput};

/// Append-only store shared by the fingerprint producers.
#[derive(Debug, Clone, Default)]
pub struct FingerprintCollector {
    entries: Arc<Mutex<Vec<SubFingerprint>>>,
}

impl FingerprintCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a batch of sub-fingerprints.
    pub fn append(&self, batch: impl IntoIterator<Item = SubFingerprint>) {
        self.entries.lock().extend(batch);
    }

    /// Number of sub-fingerprints collected so far.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Copy of everything collected so far.
    pub fn snapshot(&self) -> Vec<SubFingerprint> {
        self.entries.lock().clone()
    }
}

/// Fingerprint all tracks concurrently and wait for every producer.
///
/// Each track gets its own thread feeding the same collector. Returns once
/// all producers are done; the first failure (in track order) is returned
/// and nothing is retried.
pub fn generate_fingerprints(
    generator: &dyn FingerprintGenerator,
    tracks: &[TrackInput],
) -> FingerprintResult<Vec<SubFingerprint>> {
    let collector = FingerprintCollector::new();

    thread::scope(|scope| {
        let handles: Vec<_> = tracks
            .iter()
            .map(|track| {
                let collector = &collector;
                let handle = scope.spawn(move || {
                    tracing::debug!("Generating fingerprints for {}", track.path.display());
                    let outcome = generator.generate(track, collector);
                    tracing::debug!("Finished with {}", track.path.display());
                    outcome
                });
                (track.role, handle)
            })
            .collect();

        let mut first_error = None;
        for (role, handle) in handles {
            let outcome = handle
                .join()
                .unwrap_or(Err(FingerprintError::ProducerPanicked(role)));
            if let Err(err) = outcome {
                first_error.get_or_insert(err);
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    })?;

    Ok(collector.snapshot())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FingerprintSettings;
    use crate::models::TrackRole;
    use std::sync::Barrier;

    /// Emits `frames` sub-fingerprints per track in small batches.
    struct CountingGenerator {
        settings: FingerprintSettings,
        frames: u32,
        fail_on: Option<TrackRole>,
        barrier: Option<Barrier>,
    }

    impl CountingGenerator {
        fn new(frames: u32) -> Self {
            Self {
                settings: FingerprintSettings::default(),
                frames,
                fail_on: None,
                barrier: None,
            }
        }
    }

    impl FingerprintGenerator for CountingGenerator {
        fn settings(&self) -> &FingerprintSettings {
            &self.settings
        }

        fn generate(
            &self,
            track: &TrackInput,
            collector: &FingerprintCollector,
        ) -> FingerprintResult<()> {
            // Both producers must be running at the same time to get past this.
            if let Some(barrier) = &self.barrier {
                barrier.wait();
            }
            if self.fail_on == Some(track.role) {
                return Err(FingerprintError::decode(track, "corrupt stream"));
            }
            for start in (0..self.frames).step_by(10) {
                let end = (start + 10).min(self.frames);
                collector.append((start..end).map(|index| SubFingerprint {
                    role: track.role,
                    index,
                    hash: index * 31,
                }));
            }
            Ok(())
        }
    }

    fn tracks() -> Vec<TrackInput> {
        vec![
            TrackInput::video("video.mkv"),
            TrackInput::reference("song.flac"),
        ]
    }

    #[test]
    fn collects_from_both_tracks() {
        let generator = CountingGenerator::new(35);
        let fingerprints = generate_fingerprints(&generator, &tracks()).unwrap();

        assert_eq!(fingerprints.len(), 70);
        let video = fingerprints.iter().filter(|f| f.role == TrackRole::Video).count();
        assert_eq!(video, 35);
    }

    #[test]
    fn producers_run_concurrently() {
        let mut generator = CountingGenerator::new(5);
        generator.barrier = Some(Barrier::new(2));
        let fingerprints = generate_fingerprints(&generator, &tracks()).unwrap();
        assert_eq!(fingerprints.len(), 10);
    }

    #[test]
    fn producer_failure_is_propagated() {
        let mut generator = CountingGenerator::new(5);
        generator.fail_on = Some(TrackRole::Reference);
        let err = generate_fingerprints(&generator, &tracks()).unwrap_err();
        assert!(matches!(
            err,
            FingerprintError::Decode {
                role: TrackRole::Reference,
                ..
            }
        ));
    }

    #[test]
    fn collector_clones_share_storage() {
        let collector = FingerprintCollector::new();
        let other = collector.clone();
        other.append([SubFingerprint {
            role: TrackRole::Video,
            index: 0,
            hash: 1,
        }]);
        assert_eq!(collector.len(), 1);
        assert!(!collector.is_empty());
    }
}
