//! Macro for declaring the error enums returned by domain ports.
//!
//! Every adapter-facing error in the recruitment backend has the same shape: a
//! `thiserror` enum whose variants carry either nothing or a few owned fields,
//! plus one snake_case constructor per variant so adapters can write
//! `UserPersistenceError::duplicate("email")` instead of spelling out the
//! struct literal. Constructor parameters take `impl Into<T>`.

macro_rules! define_port_error {
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
                define_port_error!(@constructor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };

    // Unit variant: zero-argument constructor.
    (@constructor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    // Struct variant: accumulate `field: impl Into<T>` parameters.
    (@constructor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@fields $variant [] [] $( $field : $ty, )*);
    };

    (@fields $variant:ident [$($param:tt)*] [$($init:tt)*]) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($param)*) -> Self {
                Self::$variant { $($init)* }
            }
        }
    };

    (@fields $variant:ident [$($param:tt)*] [$($init:tt)*] $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @fields
            $variant
            [$($param)* $field: impl Into<$ty>,]
            [$($init)* $field: $field.into(),]
            $($rest)*
        );
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    //! Constructor generation for port error enums.
    use rstest::rstest;

    define_port_error! {
        /// Shaped like the repository errors the adapters raise.
        pub enum RosterError {
            Closed => "roster is closed",
            Duplicate { field: String } => "duplicate {field}",
            Overbooked { slots: u32 } => "overbooked by {slots}",
            Rejected { field: String, slots: u32 } => "{field} rejected after {slots} slots",
        }
    }

    #[rstest]
    fn unit_variants_get_a_nullary_constructor() {
        assert_eq!(RosterError::closed(), RosterError::Closed);
        assert_eq!(RosterError::closed().to_string(), "roster is closed");
    }

    #[rstest]
    #[case(RosterError::duplicate("email"), "duplicate email")]
    #[case(RosterError::duplicate(String::from("username")), "duplicate username")]
    #[case(RosterError::overbooked(3_u32), "overbooked by 3")]
    #[case(RosterError::rejected("national_id", 2_u32), "national_id rejected after 2 slots")]
    fn struct_variants_convert_their_arguments(#[case] error: RosterError, #[case] rendered: &str) {
        assert_eq!(error.to_string(), rendered);
    }
}
