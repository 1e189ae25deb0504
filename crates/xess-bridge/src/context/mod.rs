//! Translation from source-API contexts to backend state.

mod handle;
mod init;
mod record;
mod scale;
mod store;

pub use handle::{NativeHandle, NgxFeatureHandle, NgxParameterHandle, XessContextHandle};
pub use init::{
    D3D12InitParams, GraphicsApi, InitFlags, InitParams, QualitySetting, Resolution, VkInitParams,
};
pub use record::{Registration, TranslationRecord};
pub use scale::Scale;
pub use store::ContextStore;
