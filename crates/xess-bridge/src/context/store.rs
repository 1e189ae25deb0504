//! Handle-indexed translation table.
//!
//! One mutex guards one map of complete records, so a reader never sees a
//! record whose fields come from different updates.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, info};

use super::{
    InitParams, NgxFeatureHandle, Registration, Scale, TranslationRecord, XessContextHandle,
};
use crate::config::BridgeConfig;
use crate::error::{Error, Result};

#[derive(Debug)]
pub struct ContextStore {
    records: Mutex<HashMap<XessContextHandle, TranslationRecord>>,
    default_motion_scale: Scale,
    default_jitter_scale: Scale,
}

impl Default for ContextStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ContextStore {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
            default_motion_scale: Scale::IDENTITY,
            default_jitter_scale: Scale::IDENTITY,
        }
    }

    /// Store whose registrations without explicit scales use the configured defaults.
    pub fn with_config(config: &BridgeConfig) -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
            default_motion_scale: config.default_motion_scale,
            default_jitter_scale: config.default_jitter_scale,
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<XessContextHandle, TranslationRecord>> {
        // Every operation is a single map mutation, so a panic elsewhere
        // cannot leave a half-written record behind.
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert the record for a new session. A live handle is never overwritten.
    pub fn register(&self, handle: XessContextHandle, registration: Registration) -> Result<()> {
        let record =
            registration.into_record(self.default_motion_scale, self.default_jitter_scale);

        let mut records = self.lock();
        if records.contains_key(&handle) {
            return Err(Error::DuplicateRegistration(handle));
        }
        records.insert(handle, record);

        debug!(
            "Registered context {} (feature {}, api {:?})",
            handle,
            record.feature,
            record.init.api()
        );
        Ok(())
    }

    pub fn resolve(&self, handle: XessContextHandle) -> Result<TranslationRecord> {
        self.lock()
            .get(&handle)
            .copied()
            .ok_or(Error::UnknownHandle(handle))
    }

    /// Update the given scales and leave the others unchanged.
    pub fn update_scales(
        &self,
        handle: XessContextHandle,
        motion: Option<Scale>,
        jitter: Option<Scale>,
    ) -> Result<()> {
        let mut records = self.lock();
        let record = records
            .get_mut(&handle)
            .ok_or(Error::UnknownHandle(handle))?;

        if let Some(scale) = motion {
            record.motion_scale = scale;
        }
        if let Some(scale) = jitter {
            record.jitter_scale = scale;
        }
        Ok(())
    }

    pub fn motion_scale(&self, handle: XessContextHandle) -> Result<Scale> {
        self.resolve(handle).map(|record| record.motion_scale)
    }

    pub fn jitter_scale(&self, handle: XessContextHandle) -> Result<Scale> {
        self.resolve(handle).map(|record| record.jitter_scale)
    }

    /// Swap in a new backend feature and init parameters after the
    /// application re-initializes or resizes an existing context.
    ///
    /// Returns the previous feature handle so the caller can release it.
    pub fn reinitialize(
        &self,
        handle: XessContextHandle,
        feature: NgxFeatureHandle,
        init: impl Into<InitParams>,
    ) -> Result<NgxFeatureHandle> {
        let mut records = self.lock();
        let record = records
            .get_mut(&handle)
            .ok_or(Error::UnknownHandle(handle))?;

        let previous = std::mem::replace(&mut record.feature, feature);
        record.init = init.into();

        debug!(
            "Reinitialized context {} (feature {} -> {})",
            handle, previous, feature
        );
        Ok(previous)
    }

    /// Remove the whole record. Returns it so backend resources can be released.
    pub fn unregister(&self, handle: XessContextHandle) -> Result<TranslationRecord> {
        let record = self
            .lock()
            .remove(&handle)
            .ok_or(Error::UnknownHandle(handle))?;

        debug!("Unregistered context {}", handle);
        Ok(record)
    }

    pub fn contains(&self, handle: XessContextHandle) -> bool {
        self.lock().contains_key(&handle)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Snapshot of live handles in ascending order.
    pub fn handles(&self) -> Vec<XessContextHandle> {
        let mut handles: Vec<_> = self.lock().keys().copied().collect();
        handles.sort_unstable();
        handles
    }

    /// Drain every record, e.g. at shim teardown.
    pub fn clear(&self) -> Vec<(XessContextHandle, TranslationRecord)> {
        let mut drained: Vec<_> = self.lock().drain().collect();
        drained.sort_unstable_by_key(|(handle, _)| *handle);

        if !drained.is_empty() {
            info!("Released {} live contexts", drained.len());
        }
        drained
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{
        D3D12InitParams, InitFlags, NativeHandle, NgxParameterHandle, QualitySetting, Resolution,
        VkInitParams,
    };
    use std::thread;

    fn handle(raw: usize) -> XessContextHandle {
        XessContextHandle::from_raw(raw).unwrap()
    }

    fn feature(raw: usize) -> NgxFeatureHandle {
        NgxFeatureHandle::from_raw(raw).unwrap()
    }

    fn params(raw: usize) -> NgxParameterHandle {
        NgxParameterHandle::from_raw(raw).unwrap()
    }

    fn d3d12_init() -> D3D12InitParams {
        D3D12InitParams {
            output_resolution: Resolution::new(2560, 1440),
            quality: QualitySetting::Quality,
            flags: InitFlags::INVERTED_DEPTH | InitFlags::HIGH_RES_MV,
            creation_node_mask: 1,
            visible_node_mask: 1,
            temp_buffer_heap: NativeHandle::from_raw(0xB000),
            buffer_heap_offset: 0x100,
            ..Default::default()
        }
    }

    #[test]
    fn test_register_then_resolve() {
        let store = ContextStore::new();
        let registration = Registration::new(params(0x10), feature(0x20), d3d12_init())
            .with_motion_scale(Scale::new(-1.0, 1.0))
            .with_jitter_scale(Scale::new(0.5, 0.5));

        store.register(handle(1), registration).unwrap();

        let record = store.resolve(handle(1)).unwrap();
        assert_eq!(record.parameters, params(0x10));
        assert_eq!(record.feature, feature(0x20));
        assert_eq!(record.motion_scale, Scale::new(-1.0, 1.0));
        assert_eq!(record.jitter_scale, Scale::new(0.5, 0.5));
        assert_eq!(record.init, InitParams::D3D12(d3d12_init()));
    }

    #[test]
    fn test_scales_default_to_identity() {
        let store = ContextStore::new();
        store
            .register(
                handle(1),
                Registration::new(params(1), feature(2), VkInitParams::default()),
            )
            .unwrap();

        assert_eq!(store.motion_scale(handle(1)).unwrap(), Scale::IDENTITY);
        assert_eq!(store.jitter_scale(handle(1)).unwrap(), Scale::IDENTITY);
    }

    #[test]
    fn test_scales_default_from_config() {
        let config = BridgeConfig::builder()
            .default_motion_scale(Scale::new(-1.0, -1.0))
            .build();
        let store = ContextStore::with_config(&config);
        store
            .register(
                handle(1),
                Registration::new(params(1), feature(2), InitParams::None)
                    .with_jitter_scale(Scale::new(2.0, 2.0)),
            )
            .unwrap();

        let record = store.resolve(handle(1)).unwrap();
        assert_eq!(record.motion_scale, Scale::new(-1.0, -1.0));
        assert_eq!(record.jitter_scale, Scale::new(2.0, 2.0));
    }

    #[test]
    fn test_duplicate_registration_keeps_original() {
        let store = ContextStore::new();
        store
            .register(handle(7), Registration::new(params(1), feature(2), d3d12_init()))
            .unwrap();

        let err = store
            .register(
                handle(7),
                Registration::new(params(3), feature(4), VkInitParams::default()),
            )
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateRegistration(h) if h == handle(7)));

        let record = store.resolve(handle(7)).unwrap();
        assert_eq!(record.parameters, params(1));
        assert_eq!(record.feature, feature(2));
        assert_eq!(record.init.api(), Some(crate::context::GraphicsApi::D3D12));
    }

    #[test]
    fn test_unknown_handle_operations_fail() {
        let store = ContextStore::new();
        let h = handle(0x99);

        assert!(matches!(store.resolve(h), Err(Error::UnknownHandle(_))));
        assert!(matches!(
            store.update_scales(h, Some(Scale::new(2.0, 2.0)), None),
            Err(Error::UnknownHandle(_))
        ));
        assert!(matches!(store.unregister(h), Err(Error::UnknownHandle(_))));
        assert!(matches!(
            store.reinitialize(h, feature(1), InitParams::None),
            Err(Error::UnknownHandle(_))
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn test_unregister_then_register_fresh() {
        let store = ContextStore::new();
        store
            .register(
                handle(1),
                Registration::new(params(1), feature(2), d3d12_init())
                    .with_motion_scale(Scale::new(3.0, 3.0)),
            )
            .unwrap();

        let removed = store.unregister(handle(1)).unwrap();
        assert_eq!(removed.feature, feature(2));
        assert!(matches!(store.resolve(handle(1)), Err(Error::UnknownHandle(_))));
        assert!(!store.contains(handle(1)));

        store
            .register(
                handle(1),
                Registration::new(params(5), feature(6), VkInitParams::default()),
            )
            .unwrap();
        let record = store.resolve(handle(1)).unwrap();
        assert_eq!(record.parameters, params(5));
        assert_eq!(record.motion_scale, Scale::IDENTITY);
        assert_eq!(record.init, InitParams::Vulkan(VkInitParams::default()));
    }

    #[test]
    fn test_update_scales_is_partial() {
        let store = ContextStore::new();
        store
            .register(
                handle(1),
                Registration::new(params(1), feature(2), d3d12_init())
                    .with_jitter_scale(Scale::new(0.5, -0.5)),
            )
            .unwrap();

        store
            .update_scales(handle(1), Some(Scale::new(2.0, 2.0)), None)
            .unwrap();
        let record = store.resolve(handle(1)).unwrap();
        assert_eq!(record.motion_scale, Scale::new(2.0, 2.0));
        assert_eq!(record.jitter_scale, Scale::new(0.5, -0.5));

        store
            .update_scales(handle(1), None, Some(Scale::IDENTITY))
            .unwrap();
        let record = store.resolve(handle(1)).unwrap();
        assert_eq!(record.motion_scale, Scale::new(2.0, 2.0));
        assert_eq!(record.jitter_scale, Scale::IDENTITY);
    }

    #[test]
    fn test_reinitialize_keeps_parameters_and_scales() {
        let store = ContextStore::new();
        store
            .register(
                handle(1),
                Registration::new(params(1), feature(2), d3d12_init())
                    .with_motion_scale(Scale::new(2.0, 2.0)),
            )
            .unwrap();

        let resized = D3D12InitParams {
            output_resolution: Resolution::new(3840, 2160),
            ..d3d12_init()
        };
        let previous = store.reinitialize(handle(1), feature(3), resized).unwrap();
        assert_eq!(previous, feature(2));

        let record = store.resolve(handle(1)).unwrap();
        assert_eq!(record.parameters, params(1));
        assert_eq!(record.feature, feature(3));
        assert_eq!(record.motion_scale, Scale::new(2.0, 2.0));
        assert_eq!(
            record.init.output_resolution(),
            Some(Resolution::new(3840, 2160))
        );
    }

    #[test]
    fn test_handles_and_clear() {
        let store = ContextStore::new();
        for raw in [3, 1, 2] {
            store
                .register(
                    handle(raw),
                    Registration::new(params(raw), feature(raw), InitParams::None),
                )
                .unwrap();
        }

        assert_eq!(store.len(), 3);
        assert_eq!(store.handles(), vec![handle(1), handle(2), handle(3)]);

        let drained = store.clear();
        assert_eq!(drained.len(), 3);
        assert_eq!(drained[0].0, handle(1));
        assert_eq!(drained[2].1.feature, feature(3));
        assert!(store.is_empty());
    }

    #[test]
    fn test_concurrent_disjoint_handles() {
        const THREADS: usize = 8;
        const ROUNDS: usize = 200;

        let store = ContextStore::new();

        // Long-lived record that every thread reads but nobody touches
        let sentinel = handle(0xDEAD);
        store
            .register(
                sentinel,
                Registration::new(params(0xAA), feature(0xBB), d3d12_init())
                    .with_jitter_scale(Scale::new(0.25, 0.75)),
            )
            .unwrap();
        let expected = store.resolve(sentinel).unwrap();

        thread::scope(|scope| {
            for t in 0..THREADS {
                let store = &store;
                scope.spawn(move || {
                    for round in 0..ROUNDS {
                        let raw = 0x1000 + t * ROUNDS + round;
                        let h = handle(raw);
                        let scale = Scale::new(t as f32, round as f32);

                        store
                            .register(
                                h,
                                Registration::new(params(raw), feature(raw), VkInitParams::default())
                                    .with_motion_scale(scale),
                            )
                            .unwrap();
                        store.update_scales(h, None, Some(scale)).unwrap();

                        let record = store.resolve(h).unwrap();
                        assert_eq!(record.parameters, params(raw));
                        assert_eq!(record.feature, feature(raw));
                        assert_eq!(record.motion_scale, scale);
                        assert_eq!(record.jitter_scale, scale);

                        assert_eq!(store.resolve(sentinel).unwrap(), expected);

                        let removed = store.unregister(h).unwrap();
                        assert_eq!(removed.feature, feature(raw));
                    }
                });
            }
        });

        assert_eq!(store.len(), 1);
        assert_eq!(store.resolve(sentinel).unwrap(), expected);
    }
}
