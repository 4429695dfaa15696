pub mod mrz;

pub use mrz::{correct_leading_digit, MrzParser, MRZ_LINE_LEN};
