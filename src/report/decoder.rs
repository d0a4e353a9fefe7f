/// A `<genre>_<ageband>` column name split into its two dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodedColumn<'a> {
    pub genre: &'a str,
    pub age_band: &'a str,
}

/// Decode an encoded column name; names with fewer than two `_` tokens are not encoded columns.
/// Tokens past the second are ignored and matching stays exact-string.
pub fn decode_column(name: &str) -> Option<EncodedColumn<'_>> {
    let mut tokens = name.split('_');
    let genre = tokens.next()?;
    let age_band = tokens.next()?;
    Some(EncodedColumn { genre, age_band })
}
