//! Initialization parameters for the two supported graphics APIs.
//!
//! Layouts follow `xess_d3d12_init_params_t` and `xess_vk_init_params_t`.
//! Native objects are kept as opaque [`NativeHandle`]s and never dereferenced.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, FromRepr, IntoStaticStr};

use super::NativeHandle;

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    FromRepr,
    EnumString,
    IntoStaticStr,
    Display,
)]
#[repr(u32)]
pub enum QualitySetting {
    #[strum(serialize = "ULTRA_PERFORMANCE")]
    UltraPerformance = 100,
    #[strum(serialize = "PERFORMANCE")]
    Performance = 101,
    #[default]
    #[strum(serialize = "BALANCED")]
    Balanced = 102,
    #[strum(serialize = "QUALITY")]
    Quality = 103,
    #[strum(serialize = "ULTRA_QUALITY")]
    UltraQuality = 104,
    #[strum(serialize = "ULTRA_QUALITY_PLUS")]
    UltraQualityPlus = 105,
    #[strum(serialize = "AA")]
    NativeAntiAliasing = 106,
}

impl QualitySetting {
    pub fn from_u32(value: u32) -> Option<Self> {
        Self::from_repr(value)
    }

    /// Render-to-output resolution ratio per axis.
    pub fn upscale_ratio(&self) -> f32 {
        match self {
            Self::UltraPerformance => 3.0,
            Self::Performance => 2.3,
            Self::Balanced => 2.0,
            Self::Quality => 1.7,
            Self::UltraQuality => 1.5,
            Self::UltraQualityPlus => 1.3,
            Self::NativeAntiAliasing => 1.0,
        }
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct InitFlags: u32 {
        const HIGH_RES_MV = 1 << 0;
        const INVERTED_DEPTH = 1 << 1;
        const EXPOSURE_SCALE_TEXTURE = 1 << 2;
        const RESPONSIVE_PIXEL_MASK = 1 << 3;
        const USE_NDC_VELOCITY = 1 << 4;
        const EXTERNAL_DESCRIPTOR_HEAP = 1 << 5;
        const LDR_INPUT_COLOR = 1 << 6;
        const JITTERED_MV = 1 << 7;
        const ENABLE_AUTOEXPOSURE = 1 << 8;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Input resolution the application renders at for `quality`.
    pub fn render_resolution(&self, quality: QualitySetting) -> Resolution {
        let ratio = quality.upscale_ratio();
        Resolution {
            width: (self.width as f32 / ratio).round() as u32,
            height: (self.height as f32 / ratio).round() as u32,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct D3D12InitParams {
    pub output_resolution: Resolution,
    pub quality: QualitySetting,
    pub flags: InitFlags,
    pub creation_node_mask: u32,
    pub visible_node_mask: u32,
    /// `ID3D12Heap` for internal buffers, allocated by the upscaler when `None`
    pub temp_buffer_heap: Option<NativeHandle>,
    pub buffer_heap_offset: u64,
    /// `ID3D12Heap` for internal textures
    pub temp_texture_heap: Option<NativeHandle>,
    pub texture_heap_offset: u64,
    /// `ID3D12PipelineLibrary`
    pub pipeline_library: Option<NativeHandle>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VkInitParams {
    pub output_resolution: Resolution,
    pub quality: QualitySetting,
    pub flags: InitFlags,
    pub creation_node_mask: u32,
    pub visible_node_mask: u32,
    /// `VkDeviceMemory` for internal buffers
    pub temp_buffer_memory: Option<NativeHandle>,
    pub buffer_heap_offset: u64,
    /// `VkDeviceMemory` for internal textures
    pub temp_texture_memory: Option<NativeHandle>,
    pub texture_heap_offset: u64,
    /// `VkPipelineCache`
    pub pipeline_cache: Option<NativeHandle>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum GraphicsApi {
    #[strum(serialize = "D3D12")]
    D3D12,
    #[strum(serialize = "Vulkan")]
    Vulkan,
}

/// Init parameters of a session. At most one API variant exists per handle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InitParams {
    /// Context created but not yet initialized
    #[default]
    None,
    D3D12(D3D12InitParams),
    Vulkan(VkInitParams),
}

impl InitParams {
    pub fn api(&self) -> Option<GraphicsApi> {
        match self {
            Self::None => None,
            Self::D3D12(_) => Some(GraphicsApi::D3D12),
            Self::Vulkan(_) => Some(GraphicsApi::Vulkan),
        }
    }

    pub fn is_initialized(&self) -> bool {
        !matches!(self, Self::None)
    }

    pub fn d3d12(&self) -> Option<&D3D12InitParams> {
        match self {
            Self::D3D12(params) => Some(params),
            _ => None,
        }
    }

    pub fn vulkan(&self) -> Option<&VkInitParams> {
        match self {
            Self::Vulkan(params) => Some(params),
            _ => None,
        }
    }

    pub fn output_resolution(&self) -> Option<Resolution> {
        match self {
            Self::None => None,
            Self::D3D12(params) => Some(params.output_resolution),
            Self::Vulkan(params) => Some(params.output_resolution),
        }
    }

    pub fn quality(&self) -> Option<QualitySetting> {
        match self {
            Self::None => None,
            Self::D3D12(params) => Some(params.quality),
            Self::Vulkan(params) => Some(params.quality),
        }
    }

    pub fn flags(&self) -> InitFlags {
        match self {
            Self::None => InitFlags::empty(),
            Self::D3D12(params) => params.flags,
            Self::Vulkan(params) => params.flags,
        }
    }
}

impl From<D3D12InitParams> for InitParams {
    fn from(params: D3D12InitParams) -> Self {
        Self::D3D12(params)
    }
}

impl From<VkInitParams> for InitParams {
    fn from(params: VkInitParams) -> Self {
        Self::Vulkan(params)
    }
}
