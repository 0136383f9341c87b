//! Radio duty cycle analysis.
//!
//! Energest reports carry per-interval tick deltas, so a node's duty cycle
//! over the experiment is the radio ticks summed over all its reports
//! divided by the summed CPU and LPM ticks.

use std::collections::BTreeMap;

use super::types::*;

#[derive(Debug, Default, Clone, Copy)]
struct TickTotals {
    time: u128,
    radio: u128,
}

/// Compute per-node duty cycles and their aggregates.
///
/// Samples with `report_count < warmup_reports` are ignored. A node whose
/// remaining samples add up to zero CPU+LPM ticks gets a NaN duty cycle and
/// is left out of the aggregates.
pub fn analyze_duty_cycle(samples: &[DutyCycleSampleRow], warmup_reports: u64) -> DutyCycleReport {
    let mut totals: BTreeMap<u32, TickTotals> = BTreeMap::new();

    for sample in samples.iter().filter(|s| s.report_count >= warmup_reports) {
        let entry = totals.entry(sample.node_id).or_default();
        entry.time += sample.cpu_ticks as u128 + sample.lpm_ticks as u128;
        entry.radio += sample.tx_ticks as u128 + sample.rx_ticks as u128;
    }

    let per_node: Vec<NodeDutyCycle> = totals
        .into_iter()
        .map(|(node_id, t)| {
            let duty_cycle_percent = if t.time == 0 {
                log::warn!(
                    "Node {} has no CPU/LPM time after warm-up, duty cycle undefined",
                    node_id
                );
                f64::NAN
            } else {
                100.0 * t.radio as f64 / t.time as f64
            };
            NodeDutyCycle { node_id, duty_cycle_percent }
        })
        .collect();

    let finite: Vec<f64> = per_node
        .iter()
        .map(|n| n.duty_cycle_percent)
        .filter(|dc| dc.is_finite())
        .collect();

    DutyCycleReport {
        stats: summarize(&finite),
        per_node,
    }
}

/// Mean, population standard deviation, min and max
fn summarize(values: &[f64]) -> Option<DutyCycleStats> {
    if values.is_empty() {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    Some(DutyCycleStats {
        mean,
        std_dev: variance.sqrt(),
        min: values.iter().copied().fold(f64::INFINITY, f64::min),
        max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(node_id: u32, cnt: u64, cpu: u64, lpm: u64, tx: u64, rx: u64) -> DutyCycleSampleRow {
        DutyCycleSampleRow {
            timestamp: cnt as f64 * 1000.0,
            node_id,
            report_count: cnt,
            cpu_ticks: cpu,
            lpm_ticks: lpm,
            tx_ticks: tx,
            rx_ticks: rx,
        }
    }

    #[test]
    fn test_single_node() {
        let samples = vec![sample(3, 2, 50, 50, 0, 0), sample(3, 3, 100, 100, 10, 10)];
        let report = analyze_duty_cycle(&samples, 2);
        assert_eq!(report.per_node.len(), 1);
        assert_eq!(report.per_node[0].node_id, 3);
        // 100 * 20 / 300
        assert!((report.per_node[0].duty_cycle_percent - 20.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_warmup_samples_never_contribute() {
        let kept = vec![sample(1, 2, 90, 10, 2, 3), sample(2, 5, 40, 60, 1, 0)];
        let mut with_warmup = kept.clone();
        with_warmup.insert(0, sample(1, 0, 1, 1, 500, 500));
        with_warmup.insert(1, sample(2, 1, 0, 0, 9, 9));
        with_warmup.push(sample(7, 1, 10, 10, 10, 10));

        assert_eq!(analyze_duty_cycle(&kept, 2), analyze_duty_cycle(&with_warmup, 2));
    }

    #[test]
    fn test_sorted_nodes_and_stats() {
        let samples = vec![
            sample(5, 2, 100, 0, 4, 0),
            sample(1, 2, 100, 0, 2, 0),
            sample(3, 2, 50, 50, 3, 3),
        ];
        let report = analyze_duty_cycle(&samples, 2);
        let nodes: Vec<u32> = report.per_node.iter().map(|n| n.node_id).collect();
        assert_eq!(nodes, vec![1, 3, 5]);

        let stats = report.stats.unwrap();
        assert!((stats.mean - 4.0).abs() < 1e-9);
        // population std of [2, 6, 4]
        assert!((stats.std_dev - (8.0f64 / 3.0).sqrt()).abs() < 1e-9);
        assert_eq!(stats.min, 2.0);
        assert_eq!(stats.max, 6.0);
    }

    #[test]
    fn test_zero_time_is_nan_and_excluded() {
        let samples = vec![sample(1, 2, 0, 0, 0, 0), sample(2, 2, 100, 100, 2, 2)];
        let report = analyze_duty_cycle(&samples, 2);
        assert!(report.per_node[0].duty_cycle_percent.is_nan());
        let stats = report.stats.unwrap();
        assert_eq!(stats.mean, 2.0);
        assert_eq!(stats.std_dev, 0.0);
    }

    #[test]
    fn test_no_samples() {
        let report = analyze_duty_cycle(&[], 2);
        assert!(report.per_node.is_empty());
        assert!(report.stats.is_none());
    }
}
