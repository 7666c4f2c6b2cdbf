use prometheus::{Encoder, IntCounter, IntGauge, Registry, TextEncoder};

#[derive(Clone)]
pub struct IssuerMetrics {
    registry: Registry,
    pub issued: IntCounter,
    pub recorded: IntCounter,
    pub collisions: IntCounter,
    pub exhausted: IntCounter,
    pub dedup_passes: IntCounter,
    pub used_set_size: IntGauge,
}

impl IssuerMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let issued = IntCounter::new("unique_phone_issued_total", "Phone numbers issued")?;
        let recorded = IntCounter::new("unique_phone_recorded_total", "Phone numbers recorded as used by callers")?;
        let collisions = IntCounter::new("unique_phone_collisions_total", "Candidates rejected as already used")?;
        let exhausted = IntCounter::new("unique_phone_exhausted_total", "Issuances that ran out of attempts")?;
        let dedup_passes = IntCounter::new("unique_phone_dedup_passes_total", "Deduplication passes over the used-set")?;
        let used_set_size = IntGauge::new("unique_phone_used_set_size", "Entries in the used-set after the last write")?;

        registry.register(Box::new(issued.clone()))?;
        registry.register(Box::new(recorded.clone()))?;
        registry.register(Box::new(collisions.clone()))?;
        registry.register(Box::new(exhausted.clone()))?;
        registry.register(Box::new(dedup_passes.clone()))?;
        registry.register(Box::new(used_set_size.clone()))?;

        #[cfg(target_os = "linux")]
        registry.register(Box::new(prometheus::process_collector::ProcessCollector::for_self()))?;

        Ok(IssuerMetrics {
            registry,
            issued,
            recorded,
            collisions,
            exhausted,
            dedup_passes,
            used_set_size,
        })
    }

    /// Text exposition of everything registered.
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
