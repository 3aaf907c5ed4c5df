//! Helper macro for repository port error enums.
//!
//! Every generated enum carries the failure kinds shared by all storage
//! adapters (`Connection`, `Query`, `Conflict`, `MissingReference`) followed by
//! any port-specific variants, plus snake_case constructors for each.

/// Failure kinds every repository adapter can raise, so persistence helpers
/// can map driver errors without knowing the concrete port error type.
pub trait PortFailure: Sized {
    /// Storage could not be reached.
    fn connection_failure(message: String) -> Self;
    /// A query or mutation failed.
    fn query_failure(message: String) -> Self;
    /// A uniqueness rule rejected the write.
    fn conflict_failure(message: String) -> Self;
    /// A referenced record does not exist.
    fn missing_reference_failure(message: String) -> Self;
}

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_impl $variant () () $( $field : $ty, )*);
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_impl
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
    };

    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            /// Repository connection could not be established.
            #[error("repository connection failed: {message}")]
            Connection { message: String },
            /// Query or mutation failed during execution.
            #[error("repository query failed: {message}")]
            Query { message: String },
            /// A uniqueness rule rejected the write.
            #[error("repository write conflicts with existing data: {message}")]
            Conflict { message: String },
            /// The write referenced a record that does not exist.
            #[error("repository write references a missing record: {message}")]
            MissingReference { message: String },
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            define_port_error!(@ctor Connection { message: String });
            define_port_error!(@ctor Query { message: String });
            define_port_error!(@ctor Conflict { message: String });
            define_port_error!(@ctor MissingReference { message: String });
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*
        }

        impl $crate::domain::ports::PortFailure for $name {
            fn connection_failure(message: String) -> Self {
                Self::Connection { message }
            }

            fn query_failure(message: String) -> Self {
                Self::Query { message }
            }

            fn conflict_failure(message: String) -> Self {
                Self::Conflict { message }
            }

            fn missing_reference_failure(message: String) -> Self {
                Self::MissingReference { message }
            }
        }
    };
}

pub(crate) use define_port_error;
