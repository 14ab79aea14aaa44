//! `define_port_error!` builds port error enums with snake_case constructors.

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
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    define_port_error! {
        pub enum StorePortError {
            Unavailable => "store unavailable",
            Missing { key: String } => "missing record {key}",
            Stale { key: String, revision: u64 } => "stale write to {key} at revision {revision}",
        }
    }

    #[test]
    fn unit_variants_get_nullary_constructors() {
        assert_eq!(StorePortError::unavailable(), StorePortError::Unavailable);
        assert_eq!(StorePortError::unavailable().to_string(), "store unavailable");
    }

    #[test]
    fn string_fields_accept_borrowed_input() {
        let err = StorePortError::missing("job-7");
        assert_eq!(err.to_string(), "missing record job-7");
    }

    #[test]
    fn mixed_fields_keep_their_types() {
        let err = StorePortError::stale("job-7", 3_u64);
        assert_eq!(
            err,
            StorePortError::Stale {
                key: "job-7".to_owned(),
                revision: 3
            }
        );
        assert_eq!(err.to_string(), "stale write to job-7 at revision 3");
    }
}
