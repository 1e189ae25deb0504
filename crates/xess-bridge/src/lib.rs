//! # xess-bridge
//!
//! Core library for serving a handle-based upscaler API from a different
//! upscaling backend.
//!
//! This crate provides:
//! - Signature scanning of loaded modules (wildcard patterns, rel32 resolution)
//! - Module lookup for the current process (Windows) and for in-memory images
//! - A thread-safe store translating source context handles to backend state
//! - Configuration and hook signature files

pub mod config;
pub mod context;
pub mod error;
pub mod memory;
pub mod scanner;

pub use config::{BridgeConfig, BridgeConfigBuilder};
pub use context::{
    ContextStore, D3D12InitParams, GraphicsApi, InitFlags, InitParams, NativeHandle,
    NgxFeatureHandle, NgxParameterHandle, QualitySetting, Registration, Resolution, Scale,
    TranslationRecord, VkInitParams, XessContextHandle,
};
pub use error::{Error, Result};
#[cfg(target_os = "windows")]
pub use memory::LoadedModules;
pub use memory::{InMemoryModules, ModuleImage, ModuleProvider};
pub use scanner::{
    HookSignature, Pattern, ResolvedSignature, Scanner, SignatureKind, SignatureSet, find_all,
    find_pattern, find_pattern_raw, load_signatures, save_signatures,
};
