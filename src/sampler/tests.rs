use {
    super::*,
    crate::{
        helper::MockHelper,
        source::{MockClock, MockProcFs},
    },
    std::time::Duration,
};

const STAT: &str = "\
cpu  30 10 20 30 10 0 0 0 0 0
cpu0 30 10 20 30 10 0 0 0 0 0
intr 1462898
";

const MEMINFO: &str = "\
MemTotal:       16000000 kB
MemFree:         2000000 kB
MemAvailable:    8000000 kB
";

const LOADAVG: &str = "0.52 0.58 0.59 1/1024 12345\n";

const UPTIME: &str = "350735.47 234388.90\n";

const PIDS: [&str; 5] = ["1", "2", "300", "self", "net"];

type MockSampler = Sampler<MockProcFs, MockClock, MockHelper>;

fn net_dev(rx: u64, tx: u64) -> String {
    format!(
        "\
Inter-|   Receive                                                |  Transmit
 face |bytes    packets errs drop fifo frame compressed multicast|bytes    packets errs drop fifo colls carrier compressed
    lo: 9999999    1000    0    0    0     0          0         0  9999999    1000    0    0    0     0       0          0
  eth0: {rx}      10    0    0    0     0          0         0     {tx}      40    0    0    0     0       0          0
"
    )
}

fn diskstats(sectors_read: u64, sectors_written: u64) -> String {
    format!(
        "\
   8       0 sda 1000 0 {sectors_read} 0 0 0 {sectors_written} 0 0 0 0
   8       1 sda1 900 0 77777 0 0 0 77777 0 0 0 0
"
    )
}

/// a sampler over a fully populated, fake `/proc`.
fn sampler(helper: Option<MockHelper>) -> MockSampler {
    let source = MockProcFs::default();
    source
        .set(Counter::Stat, STAT)
        .set(Counter::MemInfo, MEMINFO)
        .set(Counter::NetDev, net_dev(1000, 4000))
        .set(Counter::DiskStats, diskstats(100, 200))
        .set(Counter::LoadAvg, LOADAVG)
        .set(Counter::Uptime, UPTIME)
        .set_entries(PIDS);

    Sampler::with_parts(helper, source, MockClock::default())
}

fn source(sampler: &MockSampler) -> &MockProcFs {
    &sampler.fallback.source
}

fn clock(sampler: &MockSampler) -> &MockClock {
    &sampler.fallback.clock
}

mod fallback_tests {
    use super::*;

    #[test]
    fn populates_every_metric() {
        let sampler = sampler(None);
        let mut snapshot = sampler.snapshot();
        clock(&sampler).advance(Duration::from_secs(3));
        sampler.update(&mut snapshot);

        let metrics = snapshot.metrics();
        assert_eq!(metrics.cpu_usage_pct(), 60.0);
        assert_eq!(metrics.memory_usage_pct(), 50.0);
        assert!((metrics.memory_used_gb() - 7.629).abs() < 0.001);
        assert_eq!(metrics.load_average(), [0.52, 0.58, 0.59]);
        assert_eq!(metrics.process_count(), 3);
        assert_eq!(metrics.uptime_seconds(), 350735);
    }

    #[test]
    fn first_sample_is_a_baseline() {
        let sampler = sampler(None);
        let mut snapshot = sampler.snapshot();
        clock(&sampler).advance(Duration::from_secs(3));
        sampler.update(&mut snapshot);

        let metrics = snapshot.metrics();
        assert_eq!(metrics.network_rx_rate(), 0.0);
        assert_eq!(metrics.network_tx_rate(), 0.0);
        assert_eq!(metrics.disk_read_rate(), 0.0);
        assert_eq!(metrics.disk_write_rate(), 0.0);

        let calibration = &snapshot.calibration;
        assert_eq!(calibration.net_rx.get(), 1000);
        assert_eq!(calibration.net_tx.get(), 4000);
        assert_eq!(calibration.disk_read.get(), 100 * 512);
        assert_eq!(calibration.disk_write.get(), 200 * 512);
    }

    #[test]
    fn rates() {
        let sampler = sampler(None);
        let mut snapshot = sampler.snapshot();
        clock(&sampler).advance(Duration::from_secs(3));
        sampler.update(&mut snapshot);

        source(&sampler)
            .set(Counter::NetDev, net_dev(2000, 8000))
            .set(Counter::DiskStats, diskstats(108, 216));
        clock(&sampler).advance(Duration::from_secs(2));
        sampler.update(&mut snapshot);

        let metrics = snapshot.metrics();
        assert_eq!(metrics.network_rx_rate(), 500.0);
        assert_eq!(metrics.network_tx_rate(), 2000.0);
        assert_eq!(metrics.disk_read_rate(), 8.0 * 512.0 / 2.0);
        assert_eq!(metrics.disk_write_rate(), 16.0 * 512.0 / 2.0);
    }

    #[test]
    fn unchanged_counters_have_no_rate() {
        let sampler = sampler(None);
        let mut snapshot = sampler.snapshot();
        for _ in 0..3 {
            clock(&sampler).advance(Duration::from_secs(3));
            sampler.update(&mut snapshot);
        }

        let metrics = snapshot.metrics();
        assert_eq!(metrics.network_rx_rate(), 0.0);
        assert_eq!(metrics.disk_write_rate(), 0.0);
    }

    #[test]
    fn counter_reset_is_a_new_baseline() {
        let sampler = sampler(None);
        let mut snapshot = sampler.snapshot();
        clock(&sampler).advance(Duration::from_secs(1));
        sampler.update(&mut snapshot);

        source(&sampler).set(Counter::NetDev, net_dev(10, 10));
        clock(&sampler).advance(Duration::from_secs(1));
        sampler.update(&mut snapshot);
        assert_eq!(snapshot.metrics().network_rx_rate(), 0.0);
        assert_eq!(snapshot.calibration.net_rx.get(), 10);

        source(&sampler).set(Counter::NetDev, net_dev(110, 10));
        clock(&sampler).advance(Duration::from_secs(1));
        sampler.update(&mut snapshot);
        assert_eq!(snapshot.metrics().network_rx_rate(), 100.0);
    }

    #[test]
    fn no_time_elapsed_keeps_rates() {
        let sampler = sampler(None);
        let mut snapshot = sampler.snapshot();
        clock(&sampler).advance(Duration::from_secs(1));
        sampler.update(&mut snapshot);

        source(&sampler).set(Counter::NetDev, net_dev(2000, 4000));
        clock(&sampler).advance(Duration::from_secs(1));
        sampler.update(&mut snapshot);
        assert_eq!(snapshot.metrics().network_rx_rate(), 1000.0);

        // the clock does not move, so the previous rate stands.
        source(&sampler).set(Counter::NetDev, net_dev(9000, 4000));
        sampler.update(&mut snapshot);
        assert_eq!(snapshot.metrics().network_rx_rate(), 1000.0);
        assert_eq!(snapshot.calibration.net_rx.get(), 9000);
    }

    #[test]
    fn last_update_advances() {
        let sampler = sampler(None);
        let mut snapshot = sampler.snapshot();
        let start = snapshot.calibration.last_update;

        clock(&sampler).advance(Duration::from_secs(3));
        sampler.update(&mut snapshot);
        assert_eq!(snapshot.calibration.last_update, start + Duration::from_secs(3));
    }

    #[test]
    fn malformed_meminfo_does_not_block_other_metrics() {
        let sampler = sampler(None);
        let mut snapshot = sampler.snapshot();
        clock(&sampler).advance(Duration::from_secs(1));
        sampler.update(&mut snapshot);
        assert_eq!(snapshot.metrics().memory_usage_pct(), 50.0);

        source(&sampler)
            .set(Counter::MemInfo, "MemTotal: lots kB\nMemAvailable: some kB\n")
            .set(Counter::NetDev, net_dev(3000, 4000))
            .set(Counter::DiskStats, diskstats(300, 200))
            .set(Counter::LoadAvg, "1.00 2.00 3.00 1/1 1\n");
        clock(&sampler).advance(Duration::from_secs(1));
        sampler.update(&mut snapshot);

        let metrics = snapshot.metrics();
        // memory keeps its previous value.
        assert_eq!(metrics.memory_usage_pct(), 50.0);
        assert_eq!(metrics.network_rx_rate(), 2000.0);
        assert_eq!(metrics.disk_read_rate(), 200.0 * 512.0);
        assert_eq!(metrics.load_average(), [1.0, 2.0, 3.0]);
    }

    #[test]
    fn missing_sources_are_skipped() {
        let sampler = sampler(None);
        for counter in Counter::ALL {
            if counter != Counter::Uptime {
                source(&sampler).remove(counter);
            }
        }

        let mut snapshot = sampler.snapshot();
        sampler.update(&mut snapshot);

        let metrics = snapshot.metrics();
        assert_eq!(metrics.uptime_seconds(), 350735);
        assert_eq!(metrics.process_count(), 3);
        assert_eq!(metrics.cpu_usage_pct(), 0.0);
        assert_eq!(metrics.load_average(), [0.0; 3]);
    }
}

mod helper_tests {
    use super::*;

    #[test]
    fn helper_is_authoritative() {
        let helper = MockHelper::default();
        helper.push_json(r#"{"cpu_usage": 42.5, "process_count": 150}"#);
        let sampler = sampler(Some(helper));
        let mut snapshot = sampler.snapshot();
        clock(&sampler).advance(Duration::from_secs(3));
        sampler.update(&mut snapshot);

        // every other field is zero, rather than computed from counters.
        assert_eq!(
            *snapshot.metrics(),
            Metrics {
                cpu_usage_pct: 42.5,
                process_count: 150,
                ..Metrics::default()
            }
        );
        assert_eq!(snapshot.calibration.net_rx.get(), 0);
    }

    #[test]
    fn helper_replaces_every_field() {
        let helper = MockHelper::default();
        helper.push_json(r#"{"uptime_seconds": 5}"#);
        let sampler = sampler(Some(helper));
        let mut snapshot = sampler.snapshot();
        snapshot.metrics.memory_usage_pct = 99.0;
        sampler.update(&mut snapshot);

        assert_eq!(snapshot.metrics().memory_usage_pct(), 0.0);
        assert_eq!(snapshot.metrics().uptime_seconds(), 5);
    }

    #[test]
    fn unavailable_helper_falls_back() {
        let sampler = sampler(Some(MockHelper::default()));
        let mut snapshot = sampler.snapshot();
        sampler.update(&mut snapshot);

        assert_eq!(snapshot.metrics().process_count(), 3);
        assert_eq!(snapshot.metrics().cpu_usage_pct(), 60.0);
    }

    #[test]
    fn malformed_output_falls_back() {
        let helper = MockHelper::default();
        helper.push_json("cpu: 42.5%");
        let sampler = sampler(Some(helper));
        let mut snapshot = sampler.snapshot();
        sampler.update(&mut snapshot);

        assert_eq!(snapshot.metrics().cpu_usage_pct(), 60.0);
    }

    #[test]
    fn non_object_output_falls_back() {
        let helper = MockHelper::default();
        helper.push_json("[]").push_json("[42.5]");
        let sampler = sampler(Some(helper));
        let mut snapshot = sampler.snapshot();

        sampler.update(&mut snapshot);
        assert_eq!(snapshot.metrics().cpu_usage_pct(), 60.0);
        assert_eq!(snapshot.metrics().process_count(), 3);

        sampler.update(&mut snapshot);
        assert_eq!(snapshot.metrics().cpu_usage_pct(), 60.0);
    }

    #[test]
    fn failed_helper_falls_back() {
        let helper = MockHelper::default();
        helper.push(Err(HelperError::Timeout(Duration::from_secs(5))));
        let sampler = sampler(Some(helper));
        let mut snapshot = sampler.snapshot();
        sampler.update(&mut snapshot);

        assert_eq!(snapshot.metrics().uptime_seconds(), 350735);
    }

    #[test]
    fn fallback_resumes_after_helper_disappears() {
        let helper = MockHelper::default();
        helper.push_json(r#"{"cpu_usage": 1.0}"#);
        let sampler = sampler(Some(helper));
        let mut snapshot = sampler.snapshot();

        sampler.update(&mut snapshot);
        assert_eq!(snapshot.metrics().cpu_usage_pct(), 1.0);

        clock(&sampler).advance(Duration::from_secs(3));
        sampler.update(&mut snapshot);
        assert_eq!(snapshot.metrics().cpu_usage_pct(), 60.0);
        assert_eq!(snapshot.metrics().network_rx_rate(), 0.0);
    }
}
