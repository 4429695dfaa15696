pub mod data;
pub mod gazetteer;

pub use data::{
    CacheEntry, GeoCandidate, IdentityRecord, MrzFields, OcrSpan, PlaceMatches,
    RecognizedDocument, PLACE_NOT_FOUND,
};
pub use gazetteer::{Gazetteer, GazetteerEntry};
