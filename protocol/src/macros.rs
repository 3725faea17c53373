//! Internal helper macros.

/// Implements hex display, hex parsing, and hex serde for a `[u8; N]` newtype.
macro_rules! hex_bytes_newtype {
    ($name:ident, $len:expr, $err_ty:ty, $err:expr) => {
        impl $name {
            /// Wrap raw bytes.
            pub const fn from_bytes(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }

            /// Copy from a slice, checking the length.
            pub fn try_from_slice(slice: &[u8]) -> Result<Self, $err_ty> {
                let bytes: [u8; $len] = slice.try_into().map_err(|_| $err)?;
                Ok(Self(bytes))
            }

            /// Parse a hex string of exactly the right length.
            pub fn from_hex(s: &str) -> Result<Self, $err_ty> {
                let bytes = hex::decode(s).map_err(|_| $err)?;
                Self::try_from_slice(&bytes)
            }

            /// Borrow the raw bytes.
            pub fn as_bytes(&self) -> &[u8; $len] {
                &self.0
            }

            /// Lowercase hex rendering.
            pub fn to_hex(&self) -> String {
                hex::encode(self.0)
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.to_hex())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $err_ty;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_hex(s)
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.to_hex())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = <String as serde::Deserialize>::deserialize(deserializer)?;
                Self::from_hex(&s).map_err(serde::de::Error::custom)
            }
        }
    };
}
