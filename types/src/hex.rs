//! Inline hex encoding to avoid pulling the `hex` crate into types.

pub(crate) fn encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
