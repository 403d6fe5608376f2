//! Display colors for tasks, written as `#rrggbb`.
use rand::Rng;

/// Builds a color from three independent uniform random bytes.
pub fn random_color<R: Rng + ?Sized>(rng: &mut R) -> String {
    let r: u8 = rng.r#gen();
    let g: u8 = rng.r#gen();
    let b: u8 = rng.r#gen();
    format!("#{:02x}{:02x}{:02x}", r, g, b)
}

/// True for `#` followed by exactly six lowercase hex digits.
pub fn is_valid_color(color: &str) -> bool {
    match color.strip_prefix('#') {
        Some(hex) => {
            hex.len() == 6
                && hex
                    .bytes()
                    .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
        }
        None => false,
    }
}
