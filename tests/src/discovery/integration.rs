#![cfg(test)]
use std::net::IpAddr;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use exposr_common::asset::{FIREWALL_ASSET_TYPE, FirewallRule, INSTANCE_ASSET_TYPE, Instance};
use exposr_common::config::WorkerConfig;
use exposr_common::network::id::NetworkId;
use exposr_common::scan::ScanDescriptor;
use exposr_core::engine::{self, Aggregation};
use exposr_core::health::Readiness;
use exposr_core::sink::{DescriptorSink, QueueFile, ScanConfigFile};
use exposr_core::source::{AssetSource, ExportFileSource};
use exposr_core::worker::{self, WorkerReport};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::{Value, json};

const NET_N: &str = "projects/acme/global/networks/web";
const NET_M: &str = "projects/acme/global/networks/legacy";
const NET_P: &str = "projects/acme/global/networks/private";

fn firewall(name: &str, network: &str, allowed: Value) -> Value {
    json!({
        "name": format!("//compute.googleapis.com/projects/acme/global/firewalls/{name}"),
        "assetType": FIREWALL_ASSET_TYPE,
        "resource": { "data": {
            "name": name,
            "id": "1001",
            "network": network,
            "direction": "INGRESS",
            "sourceRanges": ["0.0.0.0/0"],
            "allowed": allowed,
            "targetTags": ["public"]
        }}
    })
}

fn instance(name: &str, network: &str, nat_ips: &[&str]) -> Value {
    let access: Vec<Value> = nat_ips.iter().map(|ip| json!({ "natIP": ip })).collect();
    json!({
        "name": format!("//compute.googleapis.com/projects/acme/zones/z/instances/{name}"),
        "assetType": INSTANCE_ASSET_TYPE,
        "resource": { "data": {
            "name": name,
            "networkInterfaces": [{ "network": network, "accessConfigs": access }]
        }}
    })
}

fn export() -> Value {
    json!([
        firewall("r1", NET_N, json!([{ "IPProtocol": "tcp", "ports": ["80", "443"] }])),
        firewall("r2", NET_N, json!([{ "IPProtocol": "tcp", "ports": ["8000-9000"] }])),
        firewall("r3", NET_M, json!([{ "IPProtocol": "all" }])),
        firewall("r4", NET_P, json!([{ "IPProtocol": "icmp" }])),
        instance("i1", NET_N, &["1.2.3.4"]),
        instance("i2", NET_M, &["5.6.7.8", "9.9.9.9"]),
        instance("i3", NET_P, &["7.7.7.7"]),
        instance("i4", "projects/acme/global/networks/closed", &["8.8.4.4"])
    ])
}

async fn load(dir: &Path) -> (Vec<FirewallRule>, Vec<Instance>) {
    let path: PathBuf = dir.join("assets.json");
    tokio::fs::write(&path, export().to_string()).await.unwrap();

    let source = ExportFileSource::new(&path, &path);
    (source.firewalls().await.unwrap(), source.instances().await.unwrap())
}

fn by_network(mut descriptors: Vec<ScanDescriptor>) -> Vec<ScanDescriptor> {
    descriptors.sort_by(|a, b| a.network.cmp(&b.network));
    descriptors
}

fn ports(descriptor: &ScanDescriptor) -> Vec<String> {
    descriptor.ports.iter().map(ToString::to_string).collect()
}

#[tokio::test]
async fn aggregation_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let (rules, instances) = load(dir.path()).await;
    assert_eq!(rules.len(), 4);
    assert_eq!(instances.len(), 4);

    let aggregation: Aggregation = engine::aggregate(&rules, &instances, Some(1));
    let descriptors = by_network(aggregation.descriptors);
    assert_eq!(descriptors.len(), 2, "only exposed networks with addresses are scanned");

    let legacy = &descriptors[0];
    assert_eq!(legacy.network, NetworkId::from(NET_M));
    assert_eq!(ports(legacy), vec!["1-65535"]);
    let expected: Vec<IpAddr> = vec!["5.6.7.8".parse().unwrap(), "9.9.9.9".parse().unwrap()];
    assert_eq!(legacy.ips, expected);

    let web = &descriptors[1];
    assert_eq!(web.network, NetworkId::from(NET_N));
    assert_eq!(ports(web), vec!["443", "80", "8000-9000"]);
    assert_eq!(web.ips, vec!["1.2.3.4".parse::<IpAddr>().unwrap()]);

    let open = aggregation.exposure.open_rules();
    assert_eq!(open.len(), 1, "fully open rule should be recorded once");
    assert_eq!(open[0].rule, "r3");
    assert_eq!(open[0].network, NetworkId::from(NET_M));
}

#[tokio::test]
async fn aggregation_is_deterministic_modulo_order() {
    let dir = tempfile::tempdir().unwrap();
    let (mut rules, mut instances) = load(dir.path()).await;

    let baseline = by_network(engine::aggregate(&rules, &instances, None).descriptors);

    let mut rng = StdRng::seed_from_u64(99);
    for seed in 0..16 {
        instances.shuffle(&mut rng);
        rules.shuffle(&mut rng);
        let run = by_network(engine::aggregate(&rules, &instances, Some(seed)).descriptors);
        assert_eq!(
            run.iter().map(|d| (&d.network, ports(d))).collect::<Vec<_>>(),
            baseline.iter().map(|d| (&d.network, ports(d))).collect::<Vec<_>>()
        );
        for (a, b) in run.iter().zip(&baseline) {
            let mut a_ips = a.ips.clone();
            let mut b_ips = b.ips.clone();
            a_ips.sort();
            b_ips.sort();
            assert_eq!(a_ips, b_ips);
        }
    }
}

#[tokio::test]
async fn sinks_feed_the_scan_worker() {
    let dir = tempfile::tempdir().unwrap();
    let (rules, instances) = load(dir.path()).await;
    let descriptors = engine::aggregate(&rules, &instances, Some(3)).descriptors;

    let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
    let config_path = ScanConfigFile::with_date(dir.path(), date)
        .emit(&descriptors)
        .await
        .unwrap()
        .path;
    assert_eq!(config_path, dir.path().join("2024-05-01").join("scan-config.txt"));

    let queue_path = dir.path().join("queue.jsonl");
    let queued = QueueFile::new(&queue_path).emit(&descriptors).await.unwrap();
    assert_eq!(queued.written, descriptors.len());

    // Both encodings decode back to the same descriptors.
    let records = tokio::fs::read_to_string(&config_path).await.unwrap();
    let from_records: Vec<ScanDescriptor> = records.lines().map(|l| l.parse().unwrap()).collect();
    let messages = tokio::fs::read_to_string(&queue_path).await.unwrap();
    let from_messages: Vec<ScanDescriptor> = messages
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(from_records, descriptors);
    assert_eq!(from_messages, descriptors);

    for input in [config_path, queue_path] {
        let cfg = WorkerConfig {
            input,
            dry_run: true,
            results_dir: None,
            health_addr: None,
        };
        let report: WorkerReport = worker::run_worker(&cfg, Readiness::new()).await.unwrap();
        assert_eq!(report.planned, 2);
        assert_eq!(report.skipped, 0);
        assert_eq!(report.failed, 0);
    }
}

#[tokio::test]
async fn bad_records_do_not_abort_aggregation() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("assets.ndjson");

    let lines: Vec<String> = vec![
        firewall("ok", NET_N, json!([{ "IPProtocol": "tcp", "ports": ["22", "ssh"] }])).to_string(),
        "{ this is not json".to_string(),
        json!({ "name": "broken", "assetType": FIREWALL_ASSET_TYPE, "resource": { "data": { "network": NET_N } } })
            .to_string(),
        instance("vm", NET_N, &["1.1.1.1", "not-an-ip"]).to_string(),
        json!({
            "name": "//compute.googleapis.com/projects/acme/zones/z/instances/dual",
            "assetType": INSTANCE_ASSET_TYPE,
            "resource": { "data": {
                "name": "dual",
                "networkInterfaces": [
                    { "accessConfigs": [{ "natIP": "3.3.3.3" }] },
                    { "network": NET_N, "accessConfigs": [{ "natIP": "2.2.2.2" }] }
                ]
            }}
        })
        .to_string(),
    ];
    tokio::fs::write(&path, lines.join("\n")).await.unwrap();

    let source = ExportFileSource::new(&path, &path);
    let rules = source.firewalls().await.unwrap();
    let instances = source.instances().await.unwrap();
    assert_eq!(rules.len(), 1);

    let descriptors = engine::aggregate(&rules, &instances, None).descriptors;
    assert_eq!(descriptors.len(), 1);
    assert_eq!(ports(&descriptors[0]), vec!["22"]);
    let expected: Vec<IpAddr> = vec!["1.1.1.1".parse().unwrap(), "2.2.2.2".parse().unwrap()];
    assert_eq!(descriptors[0].ips, expected);
}
