/// Serde through a plain parameters struct whose conversion back runs the checked constructor
///
/// The parameters struct has the same fields as the profile, so the serialized form and the
/// derived JSON schema of the profile are unchanged.
macro_rules! deserialize_checked {
    (
        $profile:ident,
        $parameters:ident { $($field:ident: $ty:ty),+ $(,)? },
        |$p:ident| $construct:expr $(,)?
    ) => {
        #[derive(Serialize, Deserialize, JsonSchema)]
        #[serde(bound = "T: Float")]
        struct $parameters<T> {
            $($field: $ty,)+
        }

        impl<T: Float> From<$profile<T>> for $parameters<T> {
            fn from(profile: $profile<T>) -> Self {
                Self {
                    $($field: profile.$field,)+
                }
            }
        }

        impl<T: Float> TryFrom<$parameters<T>> for $profile<T> {
            type Error = ProfileError;

            fn try_from($p: $parameters<T>) -> Result<Self, Self::Error> {
                $construct
            }
        }
    };
}
