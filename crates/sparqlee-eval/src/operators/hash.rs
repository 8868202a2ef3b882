//! Hash Functions
//!
//! Implements: MD5, SHA1, SHA256, SHA384, SHA512 over the UTF-8 bytes of a
//! simple literal, as lowercase hex.

use crate::builder::OverloadBuilder;
use crate::overload::OverloadTable;
use md5::Md5;
use sha1::Sha1;
use sha2::{Digest, Sha256, Sha384, Sha512};
use sparqlee_types::Term;

fn hex_digest<D: Digest>(value: &str) -> String {
    hex::encode(D::digest(value.as_bytes()))
}

fn hash_table<D: Digest + 'static>(name: &'static str) -> OverloadTable {
    OverloadBuilder::new(name)
        .on_string1(|value| Ok(Term::string(hex_digest::<D>(value))))
        .collect()
}

pub fn md5() -> OverloadTable {
    hash_table::<Md5>("md5")
}

pub fn sha1() -> OverloadTable {
    hash_table::<Sha1>("sha1")
}

pub fn sha256() -> OverloadTable {
    hash_table::<Sha256>("sha256")
}

pub fn sha384() -> OverloadTable {
    hash_table::<Sha384>("sha384")
}

pub fn sha512() -> OverloadTable {
    hash_table::<Sha512>("sha512")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::EvaluationContext;
    use rstest::rstest;

    fn digest(table: &OverloadTable, input: &str) -> String {
        let ctx = EvaluationContext::new();
        table.apply(&[Term::string(input)], &ctx).unwrap().str().unwrap()
    }

    #[rstest]
    #[case::md5(md5(), "900150983cd24fb0d6963f7d28e17f72")]
    #[case::sha1(sha1(), "a9993e364706816aba3e25717850c26c9cd0d89d")]
    #[case::sha256(sha256(), "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad")]
    #[case::sha384(
        sha384(),
        "cb00753f45a35e8bb5a03d699ac65007272c32ab0eded1631a8b605a43ff5bed8086072ba1e7cc2358baeca134c825a7"
    )]
    #[case::sha512(
        sha512(),
        "ddaf35a193617abacc417349ae20413112e6fa4e89a97ea20a9eeee64b55d39a2192992a274fc1a836ba3c23a3feebbd454d4423643ce80e2a9ac94fa54ca49f"
    )]
    fn test_known_digests(#[case] table: OverloadTable, #[case] expected: &str) {
        assert_eq!(digest(&table, "abc"), expected);
    }

    #[rstest]
    #[case::md5(md5(), "66ddcd97cfdeabb2f6fb8a999b4bc76f")]
    #[case::sha1(sha1(), "bf15be717ac1b080b4f1c456692825891ff5073d")]
    #[case::sha256(sha256(), "4a99557e4033c3539de2eb65472017cad5f9557f7a0625a09f1c3f6e2ba69c4c")]
    #[case::sha384(
        sha384(),
        "41a2ddb34dca0b400fa9b73a368307acbed758e85ce50527d1655a263a10e20eefa18f8116767a128877a97c11160a26"
    )]
    #[case::sha512(
        sha512(),
        "9e2ad28633f24451bd4f3c1cb20586a21a44c3aeedbdc01b9cc8fa72917ea7bd689c82b8bf1fef89b911cf8cc46fa2c1ccc10087b2094fd4d3350ecd88526a2c"
    )]
    fn test_digest_of_multibyte_input(#[case] table: OverloadTable, #[case] expected: &str) {
        // hashed as the two UTF-8 bytes c3 a9
        assert_eq!(digest(&table, "\u{e9}"), expected);
    }

    #[test]
    fn test_language_tagged_input_rejected() {
        let ctx = EvaluationContext::new();
        assert!(md5().apply(&[Term::lang_string("abc", "en")], &ctx).is_err());
    }
}
