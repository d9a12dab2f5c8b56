// Per-file signal extraction: hashing, decode, capture metadata, all under
// bounded deadlines.

pub mod capture;
pub mod cryptographic;
pub mod extractor;
pub mod perceptual;
pub mod timeout;

pub use cryptographic::content_hash;
pub use extractor::{extract, ExtractOptions};
pub use perceptual::{fingerprint, PerceptualHash};
