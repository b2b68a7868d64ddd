//! Placeholder vendor/RFP compatibility heuristic. Deterministic, carries no predictive meaning.

pub const MATCH_FLOOR: u8 = 60;
pub const MATCH_CEILING: u8 = 95;
const MATCH_SPREAD: u64 = 36;

pub fn match_percentage(subject_id: &str, vendor_id: &str) -> u8 {
    let seed: u64 = format!("{subject_id}_{vendor_id}")
        .encode_utf16()
        .map(u64::from)
        .sum();
    let spread = (seed % MATCH_SPREAD) as u8;
    (MATCH_FLOOR + spread).min(MATCH_CEILING)
}
