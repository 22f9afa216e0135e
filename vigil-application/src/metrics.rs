use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct Metrics {
    item_updates: AtomicU64,
    rejected_updates: AtomicU64,
    findings: AtomicU64,
    purged_activities: AtomicU64,
}

impl Metrics {
    pub fn record_item_update(&self) {
        self.item_updates.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rejected_update(&self) {
        self.rejected_updates.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_findings(&self, count: usize) {
        self.findings.fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn record_purged_activities(&self, count: usize) {
        self.purged_activities
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn render_prometheus(&self) -> String {
        let updates = self.item_updates.load(Ordering::Relaxed);
        let rejected = self.rejected_updates.load(Ordering::Relaxed);
        let findings = self.findings.load(Ordering::Relaxed);
        let purged = self.purged_activities.load(Ordering::Relaxed);

        format!(
            "# TYPE vigil_item_updates_total counter\n\
vigil_item_updates_total {}\n\
# TYPE vigil_rejected_updates_total counter\n\
vigil_rejected_updates_total {}\n\
# TYPE vigil_findings_total counter\n\
vigil_findings_total {}\n\
# TYPE vigil_purged_activities_total counter\n\
vigil_purged_activities_total {}\n",
            updates, rejected, findings, purged
        )
    }
}
