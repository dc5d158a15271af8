#[cfg(feature = "core")]
#[doc(inline)]
pub use resmap_core as core;

#[cfg(feature = "disorder")]
#[doc(inline)]
pub use resmap_disorder as disorder;
