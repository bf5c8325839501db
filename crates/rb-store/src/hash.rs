//! Content fingerprints for derived-address snapshots.

use rb_schema::{Child, Institution, RouteType};
use sha2::{Digest, Sha256};

/// Fingerprint of everything a route stop's addresses are derived from:
/// the route type, the child's first institution (if it still resolves)
/// and, on morning routes only, the child's home address. A snapshot is
/// stale when the digest of the current records no longer matches the
/// stored one.
pub fn compute_snapshot_digest(
    route_type: RouteType,
    child: &Child,
    institution: Option<&Institution>,
) -> String {
    let mut hasher = Sha256::new();

    hasher.update(route_type.name().as_bytes());
    hasher.update([0u8]);
    hasher.update(child.id.as_str().as_bytes());
    hasher.update([0u8]);
    if route_type == RouteType::Morning {
        hasher.update(child.home_address.as_bytes());
        hasher.update([0u8]);
        hasher.update(child.city.as_deref().unwrap_or("").as_bytes());
        hasher.update([0u8]);
    }

    if let Some(inst) = institution {
        hasher.update(inst.id.as_str().as_bytes());
        hasher.update([0u8]);
        hasher.update(inst.address.as_bytes());
        hasher.update([0u8]);
        hasher.update(inst.city.as_deref().unwrap_or("").as_bytes());
    }

    let result = hasher.finalize();
    format!("{:x}", result)
}
