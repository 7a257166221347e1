//! Status document to metric records.
//!
//! # Output
//! - `upstream_check`: fields `total`, `generation`; endpoint tags
//! - `upstream_check_peer`: fields `status`, `rise`, `fall`, `type`, `port`;
//!   tags `upstream_name`, `upstream_server` and `index` when reported
//!
//! `generation` is left out of the aggregate record when the document does
//! not carry it. No sentinel value is written.

use crate::mapping::record::MetricRecord;
use crate::status::{PeerStatus, UpstreamStatus};
use crate::target::Tags;

pub const UPSTREAM_MEASUREMENT: &str = "upstream_check";
pub const PEER_MEASUREMENT: &str = "upstream_check_peer";

/// Map one decoded document to its records: the aggregate first, then one
/// record per peer in document order.
pub fn map_status(status: &UpstreamStatus, base_tags: &Tags) -> Vec<MetricRecord> {
    let mut records = Vec::with_capacity(status.peers.len() + 1);
    records.push(upstream_record(status, base_tags));
    records.extend(status.peers.iter().map(peer_record));
    records
}

fn upstream_record(status: &UpstreamStatus, base_tags: &Tags) -> MetricRecord {
    let mut record = MetricRecord::new(UPSTREAM_MEASUREMENT)
        .with_field("total", status.total)
        .with_tags(base_tags);

    if let Some(generation) = status.generation {
        record = record.with_field("generation", generation);
    }
    record
}

fn peer_record(peer: &PeerStatus) -> MetricRecord {
    let mut record = MetricRecord::new(PEER_MEASUREMENT)
        .with_field("status", peer.status.as_str())
        .with_field("rise", peer.rise)
        .with_field("fall", peer.fall)
        .with_field("type", peer.check_type.as_str())
        .with_field("port", peer.port)
        .with_tag("upstream_name", peer.upstream.as_str())
        .with_tag("upstream_server", peer.name.as_str());

    if let Some(index) = peer.index {
        record = record.with_tag("index", index.to_string());
    }
    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::record::FieldValue;
    use crate::status::decode_status;
    use crate::target::Endpoint;

    const SAMPLE: &str = r#"
    {
        "servers": {
            "total": 2,
            "generation": 1,
            "server": [
                {"index": 0, "upstream": "upstreamcluster", "name": "1.2.3.4:8180",
                 "status": "down", "rise": 0, "fall": 1471, "type": "http", "port": 0},
                {"index": 1, "upstream": "upstreamcluster", "name": "1.2.3.4:8280",
                 "status": "down", "rise": 0, "fall": 1471, "type": "http", "port": 0}
            ]
        }
    }
    "#;

    fn base_tags() -> Tags {
        Endpoint::parse("http://lb.local:8080/status?format=json")
            .unwrap()
            .tags()
    }

    #[test]
    fn test_sample_payload_records() {
        let status = decode_status(SAMPLE.as_bytes()).unwrap();
        let records = map_status(&status, &base_tags());
        assert_eq!(records.len(), 3);

        let upstream = &records[0];
        assert_eq!(upstream.name, "upstream_check");
        assert_eq!(upstream.field("total"), Some(&FieldValue::Integer(2)));
        assert_eq!(upstream.field("generation"), Some(&FieldValue::Integer(1)));
        assert_eq!(upstream.tag("server"), Some("lb.local"));
        assert_eq!(upstream.tag("port"), Some("8080"));
        assert_eq!(upstream.tags.len(), 2);

        for (record, (server, index)) in records[1..]
            .iter()
            .zip([("1.2.3.4:8180", "0"), ("1.2.3.4:8280", "1")])
        {
            assert_eq!(record.name, "upstream_check_peer");
            assert_eq!(record.field("status"), Some(&FieldValue::Text("down".into())));
            assert_eq!(record.field("rise"), Some(&FieldValue::Integer(0)));
            assert_eq!(record.field("fall"), Some(&FieldValue::Integer(1471)));
            assert_eq!(record.field("type"), Some(&FieldValue::Text("http".into())));
            assert_eq!(record.field("port"), Some(&FieldValue::Integer(0)));
            assert_eq!(record.fields.len(), 5);

            assert_eq!(record.tag("upstream_name"), Some("upstreamcluster"));
            assert_eq!(record.tag("upstream_server"), Some(server));
            assert_eq!(record.tag("index"), Some(index));
            assert_eq!(record.tags.len(), 3);
        }
    }

    #[test]
    fn test_missing_generation_is_omitted() {
        let status = UpstreamStatus {
            total: 4,
            generation: None,
            peers: Vec::new(),
        };
        let records = map_status(&status, &base_tags());

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].field("total"), Some(&FieldValue::Integer(4)));
        assert!(records[0].field("generation").is_none());
    }

    #[test]
    fn test_index_tag_only_when_present() {
        let status = UpstreamStatus {
            total: 2,
            generation: Some(3),
            peers: vec![
                PeerStatus {
                    index: None,
                    name: "10.0.0.1:80".into(),
                    ..PeerStatus::default()
                },
                PeerStatus {
                    index: Some(12),
                    name: "10.0.0.2:80".into(),
                    ..PeerStatus::default()
                },
            ],
        };
        let records = map_status(&status, &Tags::new());

        assert!(records[1].tag("index").is_none());
        assert_eq!(records[1].tags.len(), 2);
        assert_eq!(records[2].tag("index"), Some("12"));
    }

    #[test]
    fn test_total_is_preserved_exactly() {
        let status = UpstreamStatus {
            total: i64::MAX,
            generation: Some(i64::MIN),
            peers: Vec::new(),
        };
        let records = map_status(&status, &Tags::new());
        assert_eq!(records[0].field("total"), Some(&FieldValue::Integer(i64::MAX)));
        assert_eq!(records[0].field("generation"), Some(&FieldValue::Integer(i64::MIN)));
    }

    #[test]
    fn test_decode_and_map_are_repeatable() {
        let first = map_status(&decode_status(SAMPLE.as_bytes()).unwrap(), &base_tags());
        let second = map_status(&decode_status(SAMPLE.as_bytes()).unwrap(), &base_tags());
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_vec(&first).unwrap(),
            serde_json::to_vec(&second).unwrap()
        );
    }
}
