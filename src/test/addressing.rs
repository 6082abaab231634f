use super::ip;
use crate::error::ConfigError;
use crate::topo::FatTreeAddressing;

#[test]
fn addressing_rejects_odd_small_and_oversized_k() {
    assert!(matches!(FatTreeAddressing::new(10, 3), Err(ConfigError::InvalidK(3))));
    assert!(matches!(FatTreeAddressing::new(10, 2), Err(ConfigError::InvalidK(2))));
    assert!(matches!(
        FatTreeAddressing::new(10, 34),
        Err(ConfigError::AddressSpace(34))
    ));
    assert!(FatTreeAddressing::new(10, FatTreeAddressing::MAX_K).is_ok());
}

#[test]
fn links_take_consecutive_slash_30s_inside_their_slot() {
    let a = FatTreeAddressing::new(10, 4).expect("k=4");
    assert_eq!(a.host_link(0, 0, 0).to_string(), "10.0.0.0/30");
    assert_eq!(a.host_link(3, 1, 1).to_string(), "10.3.1.4/30");
    // aggregation slots follow the k/2 edge slots
    assert_eq!(a.edge_agg_link(2, 1, 0).to_string(), "10.2.2.4/30");
    assert_eq!(a.edge_agg_link(2, 0, 1).to_string(), "10.2.3.0/30");
    // core pod = k, one slot per core switch, one link per pod
    assert_eq!(a.agg_core_link(0, 0).to_string(), "10.4.0.0/30");
    assert_eq!(a.agg_core_link(3, 2).to_string(), "10.4.2.12/30");
    assert_eq!(a.core_pod(), 4);
}

#[test]
fn host_takes_the_first_address_of_its_link() {
    let a = FatTreeAddressing::new(172, 8).expect("k=8");
    assert_eq!(a.host_address(5, 3, 2), ip("172.5.3.9"));
    assert_eq!(a.half(), 4);
}

#[test]
fn addressing_rejects_loopback_and_multicast_base_octets() {
    for base in [127, 224, 239] {
        let err = FatTreeAddressing::new(base, 4).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBaseOctet(b) if b == base), "base={base}");
    }
    assert!(FatTreeAddressing::new(126, 4).is_ok());
    assert!(FatTreeAddressing::new(223, 4).is_ok());
}
