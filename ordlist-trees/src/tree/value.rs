//! [`Hashable`] implementations for common key and value types.

use std::fmt::{Display, Formatter};

use crate::tree::traits::{Hashable, Hasher};

/// An opaque byte string displayed as hex.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct BytesValue(pub Vec<u8>);

impl Display for BytesValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&hex::encode(&self.0))
    }
}

impl Hashable for BytesValue {
    fn hash(&self, digest: &mut dyn Hasher) -> anyhow::Result<()> {
        digest.update(&self.0);
        Ok(())
    }
}

impl From<&[u8]> for BytesValue {
    fn from(bytes: &[u8]) -> Self {
        BytesValue(bytes.to_vec())
    }
}

macro_rules! hashable_big_endian {
    ($($t:ty),*) => {
        $(
            impl Hashable for $t {
                fn hash(&self, digest: &mut dyn Hasher) -> anyhow::Result<()> {
                    digest.update(&self.to_be_bytes());
                    Ok(())
                }
            }
        )*
    };
}

hashable_big_endian!(i8, i16, i32, i64, i128, u8, u16, u32, u64, u128);

impl Hashable for String {
    fn hash(&self, digest: &mut dyn Hasher) -> anyhow::Result<()> {
        digest.update(self.as_bytes());
        Ok(())
    }
}

// a payload-free set contributes nothing
impl Hashable for () {
    fn hash(&self, _digest: &mut dyn Hasher) -> anyhow::Result<()> {
        Ok(())
    }
}
