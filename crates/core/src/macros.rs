//! `record!`: declare a struct together with its [`Record`](crate::schema::Record) impl

/// Declare a record type
///
/// Fields may be marked `#[primary]` (exactly one, `String`) or `#[index]`.
/// Every field type must implement [`Scalar`](crate::value::Scalar), and the
/// struct must derive (or implement) `Default`. Doc comments and any other
/// attributes on a field are kept on the generated struct, before or after
/// the marker.
///
/// ```
/// use chrono::{DateTime, Utc};
///
/// slap_core::record! {
///     #[derive(Debug, Clone, Default, PartialEq)]
///     pub struct Person {
///         #[primary]
///         pub id: String,
///         /// Street address, queryable
///         #[index]
///         pub address: String,
///         pub name: String,
///         #[index]
///         pub age: i64,
///         pub nickname: Option<String>,
///         pub joined: DateTime<Utc>,
///     }
/// }
///
/// use slap_core::schema::Record;
/// assert_eq!(Person::table(), "Person");
/// assert_eq!(Person::fields().len(), 6);
/// ```
#[macro_export]
macro_rules! record {
    (@role primary) => {
        $crate::schema::FieldRole::Primary
    };
    (@role index) => {
        $crate::schema::FieldRole::Indexed
    };
    (@role) => {
        $crate::schema::FieldRole::Plain
    };

    // Field muncher: `[done] [pending attributes] [pending marker] rest`
    (@fields $hdr:tt [$($done:tt)*] [$($attr:tt)*] [$($role:ident)?]
        #[primary] $($rest:tt)*
    ) => {
        $crate::record!(@fields $hdr [$($done)*] [$($attr)*] [primary] $($rest)*);
    };
    (@fields $hdr:tt [$($done:tt)*] [$($attr:tt)*] [$($role:ident)?]
        #[index] $($rest:tt)*
    ) => {
        $crate::record!(@fields $hdr [$($done)*] [$($attr)*] [index] $($rest)*);
    };
    (@fields $hdr:tt [$($done:tt)*] [$($attr:tt)*] [$($role:ident)?]
        #[$($meta:tt)*] $($rest:tt)*
    ) => {
        $crate::record!(@fields $hdr [$($done)*] [$($attr)* #[$($meta)*]] [$($role)?] $($rest)*);
    };
    (@fields $hdr:tt [$($done:tt)*] [] []) => {
        $crate::record!(@emit $hdr $($done)*);
    };
    (@fields $hdr:tt [$($done:tt)*] [$($attr:tt)*] [$($role:ident)?]
        $fvis:vis $field:ident : $ty:ty $(, $($rest:tt)*)?
    ) => {
        $crate::record!(
            @fields $hdr
            [$($done)* { [$($attr)*] [$($role)?] [$fvis] $field [$ty] }]
            [] []
            $($($rest)*)?
        );
    };

    (@emit { [$($smeta:tt)*] [$vis:vis] $name:ident }
        $( { [$($fattr:tt)*] [$($role:ident)?] [$fvis:vis] $field:ident [$ty:ty] } )*
    ) => {
        $($smeta)*
        $vis struct $name {
            $( $($fattr)* $fvis $field: $ty, )*
        }

        impl $crate::schema::Record for $name {
            fn table() -> &'static str {
                stringify!($name)
            }

            fn fields() -> &'static [$crate::schema::FieldDef] {
                const FIELDS: &[$crate::schema::FieldDef] = &[
                    $(
                        $crate::schema::FieldDef {
                            name: stringify!($field),
                            ty: <$ty as $crate::value::Scalar>::TYPE,
                            optional: <$ty as $crate::value::Scalar>::OPTIONAL,
                            role: $crate::record!(@role $($role)?),
                        },
                    )*
                ];
                FIELDS
            }

            fn field(&self, name: &str) -> ::core::option::Option<$crate::value::Value> {
                match name {
                    $( stringify!($field) => $crate::value::Scalar::to_value(&self.$field), )*
                    _ => ::core::option::Option::None,
                }
            }

            fn set_field(
                &mut self,
                name: &str,
                value: $crate::value::Value,
            ) -> $crate::error::Result<()> {
                match name {
                    $(
                        stringify!($field) => {
                            self.$field = <$ty as $crate::value::Scalar>::from_value(value)?;
                            ::core::result::Result::Ok(())
                        }
                    )*
                    _ => ::core::result::Result::Err($crate::error::Error::InvalidParameter(
                        ::std::format!("{} has no field {}", stringify!($name), name),
                    )),
                }
            }
        }
    };

    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $($body:tt)*
        }
    ) => {
        $crate::record!(@fields { [$(#[$meta])*] [$vis] $name } [] [] [] $($body)*);
    };
}
