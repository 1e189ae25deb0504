use super::{InitParams, NgxFeatureHandle, NgxParameterHandle, Scale};

/// Everything needed to forward a call made on one source context.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TranslationRecord {
    pub parameters: NgxParameterHandle,
    pub feature: NgxFeatureHandle,
    pub motion_scale: Scale,
    pub jitter_scale: Scale,
    pub init: InitParams,
}

/// Input to [`ContextStore::register`](super::ContextStore::register).
///
/// Scales left unset take the store's defaults.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Registration {
    pub parameters: NgxParameterHandle,
    pub feature: NgxFeatureHandle,
    pub motion_scale: Option<Scale>,
    pub jitter_scale: Option<Scale>,
    pub init: InitParams,
}

impl Registration {
    pub fn new(
        parameters: NgxParameterHandle,
        feature: NgxFeatureHandle,
        init: impl Into<InitParams>,
    ) -> Self {
        Self {
            parameters,
            feature,
            motion_scale: None,
            jitter_scale: None,
            init: init.into(),
        }
    }

    pub fn with_motion_scale(mut self, scale: Scale) -> Self {
        self.motion_scale = Some(scale);
        self
    }

    pub fn with_jitter_scale(mut self, scale: Scale) -> Self {
        self.jitter_scale = Some(scale);
        self
    }

    pub(crate) fn into_record(self, default_motion: Scale, default_jitter: Scale) -> TranslationRecord {
        TranslationRecord {
            parameters: self.parameters,
            feature: self.feature,
            motion_scale: self.motion_scale.unwrap_or(default_motion),
            jitter_scale: self.jitter_scale.unwrap_or(default_jitter),
            init: self.init,
        }
    }
}
