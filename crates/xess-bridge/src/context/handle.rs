//! Opaque native handles.
//!
//! Each handle wraps the raw pointer value handed across the API boundary.
//! They can be compared and hashed but offer no arithmetic, and distinct
//! types keep a source context from being passed where a backend handle is
//! expected.

use std::fmt;
use std::num::NonZeroUsize;

macro_rules! opaque_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(transparent)]
        pub struct $name(NonZeroUsize);

        impl $name {
            /// `None` for a null value.
            pub fn from_raw(raw: usize) -> Option<Self> {
                NonZeroUsize::new(raw).map(Self)
            }

            pub fn from_ptr<T>(ptr: *mut T) -> Option<Self> {
                Self::from_raw(ptr as usize)
            }

            pub fn as_raw(self) -> usize {
                self.0.get()
            }

            pub fn as_ptr<T>(self) -> *mut T {
                self.0.get() as *mut T
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{:#x}", self.0.get())
            }
        }
    };
}

opaque_handle!(
    /// `xess_context_handle_t` issued to the application.
    XessContextHandle
);

opaque_handle!(
    /// Backend parameter block (`NVSDK_NGX_Parameter*`).
    NgxParameterHandle
);

opaque_handle!(
    /// Backend feature handle (`NVSDK_NGX_Handle*`).
    NgxFeatureHandle
);

opaque_handle!(
    /// Graphics API object referenced by init parameters (heap, device memory,
    /// pipeline library or cache).
    NativeHandle
);
