//! Descriptor declaration macros.

/// Build a [`DescriptorSet`](crate::DescriptorSet) from descriptors, in slot order.
///
/// # Example
/// ```
/// use ugenwrap_core::{descriptors, ParamDescriptor};
///
/// let set = descriptors![
///     ParamDescriptor::float("gain", 1.0),
///     ParamDescriptor::buffer("target"),
/// ];
/// assert_eq!(set.token_arity(), 2);
/// ```
#[macro_export]
macro_rules! descriptors {
    ($($descriptor:expr),* $(,)?) => {
        $crate::DescriptorSet::new(vec![$($descriptor),*])
    };
}

/// Declare a lazily built, process-wide [`DescriptorSet`](crate::DescriptorSet)
/// and return a `'static` reference to it. Intended for
/// [`Client::descriptors`](crate::Client::descriptors).
///
/// # Example
/// ```
/// use ugenwrap_core::{static_descriptors, DescriptorSet, ParamDescriptor};
///
/// fn descriptors() -> &'static DescriptorSet {
///     static_descriptors![ParamDescriptor::float("gain", 1.0)]
/// }
/// assert_eq!(descriptors().len(), 1);
/// ```
#[macro_export]
macro_rules! static_descriptors {
    ($($descriptor:expr),* $(,)?) => {{
        static DESCRIPTORS: ::std::sync::OnceLock<$crate::DescriptorSet> =
            ::std::sync::OnceLock::new();
        DESCRIPTORS.get_or_init(|| $crate::descriptors![$($descriptor),*])
    }};
}
