//! Term search over a loaded [`Vocabulary`](crate::vocabulary::Vocabulary).
//!
//! Two strategies share one result shape: substring matching on folded names
//! ([`exact`]) and edit-distance matching on whitespace-free names with synonym hints
//! ([`approximate`]). Both are synchronous and operate on a borrowed snapshot.

pub(crate) mod approximate;
pub(crate) mod details;
pub(crate) mod exact;
pub(crate) mod result;
pub(crate) mod scoring;
pub(crate) mod synonyms;

pub use approximate::search_approximate;
pub use details::{PtDetails, RelatedTerm, TermSummary, pt_details};
pub use exact::search_exact;
pub use result::{build_result, select_primary};
pub use scoring::{approximate_score, exact_score, round_score, similarity_ratio, variant_ratio};
pub use synonyms::SynonymHints;
