use crate::profile::Profile;
use crate::property::PropertyType;

/// Pluggable per-property merge policy.
///
/// The merge engine resolves zero or more executors for a property's
/// declared strategy id and invokes each in registration order. Property
/// enumeration order across a merge is not guaranteed, so implementations
/// must be commutative and idempotent: re-running the same merge must
/// neither change the outcome nor report a spurious change.
pub trait MergeStrategyExecutor: Send + Sync {
    /// Merges one property across the source profiles into the master.
    ///
    /// `sources` are the superseded profiles in first-seen order; the master
    /// is not among them. Returns true if the master was modified.
    fn merge_property(
        &self,
        property_name: &str,
        property_type: Option<&PropertyType>,
        sources: &[Profile],
        master: &mut Profile,
    ) -> bool;
}
