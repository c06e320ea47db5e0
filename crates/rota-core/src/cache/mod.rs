// ── Query cache ──
//
// Filter results keyed by a normalized filter signature, with absolute
// expiry. Each controller owns its own cache; nothing here is global.

mod clock;
mod signature;
mod ttl;

pub use clock::{Clock, ManualClock, SystemClock};
pub use signature::{FilterSignature, signature_of};
pub use ttl::{CacheEntry, TtlCache, spawn_sweeper};
