use std::fmt;
use std::net::Ipv4Addr;

use crate::net::IfIndex;

/// A resolved forwarding decision handed back to the IP layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ipv4Route {
    pub destination: Ipv4Addr,
    /// The node's address on the outbound interface.
    pub source: Ipv4Addr,
    pub gateway: Option<Ipv4Addr>,
    pub out_interface: IfIndex,
}

impl Ipv4Route {
    /// Gateway for routed destinations, the destination itself when directly connected.
    pub fn next_hop(&self) -> Ipv4Addr {
        self.gateway.unwrap_or(self.destination)
    }
}

impl fmt::Display for Ipv4Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} via {} src {} dev {}",
            self.destination,
            self.next_hop(),
            self.source,
            self.out_interface
        )
    }
}
