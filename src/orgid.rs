use md5::{Digest, Md5};

/// Default prefix for derived organisation identifiers.
pub const ORG_ID_PREFIX: &str = "GB-CASC";

/// Hashed in place of a missing name or postcode. Published identifiers were
/// derived with this exact string, so it must never change.
const NULL_PLACEHOLDER: &str = "None";

/// How many hex digest characters end up in the identifier.
const HASH_PREFIX_LEN: usize = 8;

/// Derive the organisation id for a club.
///
/// CASCs are published without any identifier, so we mint one: concatenate
/// name then postcode (no separator), MD5 the UTF-8 bytes, and keep the
/// first 8 characters of the lowercase hex digest. The id is therefore a
/// pure function of `(name, postcode)` — a renamed or relocated club gets a
/// new id, and two clubs sharing both fields collide.
pub fn derive_org_id(prefix: &str, name: Option<&str>, postcode: Option<&str>) -> String {
    let mut input = String::new();
    input.push_str(name.unwrap_or(NULL_PLACEHOLDER));
    input.push_str(postcode.unwrap_or(NULL_PLACEHOLDER));

    let digest = Md5::digest(input.as_bytes());
    let hex = hex::encode(digest);
    format!("{}-{}", prefix, &hex[..HASH_PREFIX_LEN])
}
