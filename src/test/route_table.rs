use super::ip;
use crate::routing::{
    RouteKind, RoutingTable, RoutingTableEntry, find_close_match, mask_to_prefix, prefix_to_mask,
};

fn via(net: &str, len: u16, gw: &str, iface: u32) -> RoutingTableEntry {
    RoutingTableEntry::network_route(ip(net), prefix_to_mask(len), Some(ip(gw)), iface)
}

#[test]
fn prefix_length_and_mask_conversions() {
    assert_eq!(prefix_to_mask(30), ip("255.255.255.252"));
    assert_eq!(prefix_to_mask(16), ip("255.255.0.0"));
    assert_eq!(prefix_to_mask(0), ip("0.0.0.0"));
    assert_eq!(prefix_to_mask(40), ip("255.255.255.255"));
    assert_eq!(mask_to_prefix(ip("255.255.255.252")), 30);
    assert_eq!(mask_to_prefix(ip("0.0.0.0")), 0);
}

#[test]
fn network_route_stores_the_masked_network() {
    let r = via("10.2.7.9", 16, "10.4.0.9", 3);
    assert_eq!(r.dest_network, ip("10.2.0.0"));
    assert!(r.matches(ip("10.2.200.1")));
    assert!(!r.matches(ip("10.3.0.1")));
    assert!(r.is_gateway());
    assert!(!r.is_host());
    assert!(!r.is_default());
}

#[test]
fn unique_insert_skips_identical_network_and_mask() {
    let mut t = RoutingTable::new();
    assert!(t.add_network_route_unique(via("10.1.2.0", 16, "10.4.0.5", 2)));
    assert!(!t.add_network_route_unique(via("10.1.3.4", 16, "10.4.0.5", 2)));
    assert!(t.add_network_route_unique(via("10.1.0.0", 24, "10.4.0.5", 2)));
    assert_eq!(t.network_routes().len(), 2);
}

#[test]
fn plain_insert_keeps_duplicates() {
    let mut t = RoutingTable::new();
    t.add_network_route(via("10.1.0.0", 30, "10.1.2.1", 1));
    t.add_network_route(via("10.1.0.0", 30, "10.1.2.5", 2));
    assert_eq!(t.network_candidates(ip("10.1.0.1"), None).len(), 2);
    assert_eq!(t.network_candidates(ip("10.1.0.1"), Some(2)).len(), 1);
}

#[test]
fn close_match_picks_numerically_nearest_network() {
    let a = via("10.4.0.4", 30, "10.4.0.6", 3);
    let b = via("10.4.1.4", 30, "10.4.1.6", 4);
    assert_eq!(find_close_match(&[&a, &b], ip("10.0.0.2")), Some(&a));
    assert_eq!(find_close_match(&[&a, &b], ip("10.9.0.0")), Some(&b));
    assert_eq!(find_close_match(&[], ip("10.0.0.2")), None);
}

#[test]
fn close_match_ties_go_to_the_first_candidate() {
    let lo = via("10.0.0.4", 30, "10.0.0.5", 1);
    let hi = via("10.0.0.12", 30, "10.0.0.13", 2);
    assert_eq!(find_close_match(&[&lo, &hi], ip("10.0.0.8")), Some(&lo));
    assert_eq!(find_close_match(&[&hi, &lo], ip("10.0.0.8")), Some(&hi));
}

#[test]
fn routes_are_indexed_network_first_then_suffix() {
    let mut t = RoutingTable::new();
    t.add_suffix_route(via("10.4.0.4", 30, "10.4.0.6", 3));
    t.add_network_route(via("10.1.0.0", 30, "10.1.2.1", 1));
    t.add_network_route(via("10.1.1.0", 30, "10.1.2.5", 2));

    assert_eq!(t.n_routes(), 3);
    assert_eq!(t.route(0).map(|(k, r)| (k, r.dest_network)), Some((RouteKind::Network, ip("10.1.0.0"))));
    assert_eq!(t.route(1).map(|(k, r)| (k, r.dest_network)), Some((RouteKind::Network, ip("10.1.1.0"))));
    assert_eq!(t.route(2).map(|(k, r)| (k, r.dest_network)), Some((RouteKind::Suffix, ip("10.4.0.4"))));
    assert!(t.route(3).is_none());
    assert_eq!(t.iter().count(), 3);
}

#[test]
fn table_prints_in_route_n_layout() {
    let mut t = RoutingTable::new();
    assert_eq!(t.to_string(), "");

    t.add_network_route(via("10.0.0.0", 30, "10.0.0.1", 1));
    t.add_suffix_route(RoutingTableEntry::network_route(
        ip("10.0.0.2"),
        prefix_to_mask(32),
        None,
        2,
    ));
    let text = t.to_string();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines,
        [
            "Destination     Gateway         Genmask         Flags Metric Ref    Use Iface",
            "10.0.0.0        10.0.0.1        255.255.255.252 UG    -      -      -   1",
            "10.0.0.2        0.0.0.0         255.255.255.255 UH    -      -      -   2",
        ]
    );
}
