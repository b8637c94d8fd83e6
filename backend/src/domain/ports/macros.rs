//! Helper macro for declaring port error enums with snake-case constructors.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            #[doc = concat!("Build the `", stringify!($variant), "` variant.")]
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
            #[doc = concat!("Build the `", stringify!($variant), "` variant.")]
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
                $variant $( {
                    $(
                        #[allow(missing_docs)]
                        $field : $ty
                    ),*
                } )?,
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
    //! Constructor generation for port errors.

    define_port_error! {
        pub enum StoragePortError {
            Offline => "storage offline",
            Rejected { key: String } => "rejected key {key}",
            Truncated { key: String, written: u64 } => "truncated {key} after {written} bytes",
        }
    }

    #[test]
    fn unit_variants_get_constructors() {
        assert_eq!(StoragePortError::offline(), StoragePortError::Offline);
        assert_eq!(StoragePortError::offline().to_string(), "storage offline");
    }

    #[test]
    fn constructors_accept_str_for_string_fields() {
        let err = StoragePortError::rejected("owner/doc.pdf");
        assert_eq!(err.to_string(), "rejected key owner/doc.pdf");
    }

    #[test]
    fn constructors_support_mixed_fields() {
        let err = StoragePortError::truncated("owner/doc.pdf", 512_u64);
        assert_eq!(err.to_string(), "truncated owner/doc.pdf after 512 bytes");
    }
}
