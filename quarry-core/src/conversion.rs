use crate::{AsValue, Result};

mod sealed {
    pub trait Sealed {}
}

/// Types a [`Conversion`] is allowed to bridge through.
///
/// Sealed, the set is closed: `i64`, `u64`, `f64`, `String`, `Vec<u8>` and their
/// `Option` counterparts.
pub trait Bridge: AsValue + sealed::Sealed {}

macro_rules! impl_bridge {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl sealed::Sealed for $ty {}
            impl Bridge for $ty {}
            impl sealed::Sealed for Option<$ty> {}
            impl Bridge for Option<$ty> {}
        )+
    };
}
impl_bridge!(i64, u64, f64, String, Vec<u8>);

/// User supplied two way mapping between a field type and a bridge type the
/// database can store.
///
/// ```rust
/// use quarry_core::{Conversion, Result};
///
/// #[derive(Debug, Default, PartialEq)]
/// struct Flags(u32);
///
/// struct FlagsAsText;
/// impl Conversion for FlagsAsText {
///     type Target = Flags;
///     type Bridge = String;
///     fn to_bridge(value: &Flags) -> String {
///         format!("{:b}", value.0)
///     }
///     fn from_bridge(bridge: String) -> Result<Flags> {
///         Ok(Flags(u32::from_str_radix(&bridge, 2)?))
///     }
/// }
/// ```
pub trait Conversion {
    type Target;
    type Bridge: Bridge;

    fn to_bridge(value: &Self::Target) -> Self::Bridge;
    fn from_bridge(bridge: Self::Bridge) -> Result<Self::Target>;
}
