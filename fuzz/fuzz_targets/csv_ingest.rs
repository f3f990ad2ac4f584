#![no_main]

use downtime::ingest::{EventTable, InputFormat};
use downtime::{DowntimeAggregator, DowntimeConfig};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Loading and aggregating arbitrary bytes must never panic
    if let Ok(table) = EventTable::from_bytes(data, InputFormat::Csv) {
        if let Ok(aggregator) = DowntimeAggregator::new(&DowntimeConfig::default()) {
            let _ = aggregator.aggregate(&table.events);
        }
    }
});
