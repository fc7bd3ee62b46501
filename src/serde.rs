use core::marker::PhantomData;
use serde_core::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{SeqAccess, Visitor},
    ser::SerializeSeq,
};

use crate::DynamicArray;

/// Upper bound on what a length hint may preallocate, so a hostile hint
/// cannot force a huge allocation before any element has been read.
const MAX_PREALLOC_BYTES: usize = 1024 * 1024;

impl<T: Serialize> Serialize for DynamicArray<T> {
    /// Serialize a `DynamicArray` as a sequence.
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for element in self {
            seq.serialize_element(element)?;
        }
        seq.end()
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for DynamicArray<T> {
    /// Deserialize a `DynamicArray` from a sequence.
    ///
    /// The length hint, if any, is used to preallocate (bounded to about 1 MiB).
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct DynamicArrayVisitor<T> {
            _marker: PhantomData<T>,
        }

        impl<'de, T: Deserialize<'de>> Visitor<'de> for DynamicArrayVisitor<T> {
            type Value = DynamicArray<T>;

            fn expecting(&self, formatter: &mut core::fmt::Formatter) -> core::fmt::Result {
                formatter.write_str("a sequence")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let limit = MAX_PREALLOC_BYTES / core::mem::size_of::<T>().max(1);
                let mut arr = match seq.size_hint() {
                    Some(hint) => DynamicArray::with_capacity(hint.min(limit)),
                    None => DynamicArray::new(),
                };

                while let Some(element) = seq.next_element()? {
                    arr.push(element);
                }

                Ok(arr)
            }
        }

        deserializer.deserialize_seq(DynamicArrayVisitor {
            _marker: PhantomData,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::{DynamicArray, dynarray};

    #[test]
    fn dynarray_json() {
        let arr = dynarray![1, 2, 3];
        let s = serde_json::to_string(&arr).unwrap();
        assert_eq!(s, "[1,2,3]");
        let r: DynamicArray<i32> = serde_json::from_str(&s).unwrap();
        assert_eq!(r, [1, 2, 3]);
    }

    #[test]
    fn empty_json() {
        let r: DynamicArray<String> = serde_json::from_str("[]").unwrap();
        assert!(r.is_empty());
        assert_eq!(r.capacity(), 0);
    }

    #[test]
    fn rejects_non_sequence() {
        assert!(serde_json::from_str::<DynamicArray<i32>>("{\"a\":1}").is_err());
    }
}
