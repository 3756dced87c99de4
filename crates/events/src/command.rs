use laundrypay_core::AggregateId;

/// A command targets a specific aggregate.
///
/// Commands represent **intent** ("add a wash for Ana"); they are rejected
/// when invalid and otherwise turned into events ("service added").
///
/// Commands must own all their data and be cheap to clone so they can be
/// logged or retried.
pub trait Command: Clone + core::fmt::Debug + Send + Sync + 'static {
    fn target_aggregate_id(&self) -> AggregateId;
}
