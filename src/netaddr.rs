use if_addrs::{get_if_addrs, IfAddr};
use std::net::Ipv4Addr;

/// First RFC1918 IPv4 address on a non-loopback interface, in platform
/// enumeration order. Falls back to loopback when the host has no private
/// address (or interfaces cannot be enumerated at all).
pub fn first_private_ipv4() -> String {
    let candidates = get_if_addrs().unwrap_or_default().into_iter().map(|ifa| {
        let loopback = ifa.is_loopback();
        match ifa.addr {
            IfAddr::V4(v4) => (loopback, Some(v4.ip)),
            IfAddr::V6(_) => (loopback, None),
        }
    });
    select_private(candidates)
        .map(|ip| ip.to_string())
        .unwrap_or_else(|| "127.0.0.1".to_string())
}

/// First-match scan over (is_loopback, address) pairs; enumeration order is
/// authoritative when several private addresses exist.
fn select_private(
    candidates: impl IntoIterator<Item = (bool, Option<Ipv4Addr>)>,
) -> Option<Ipv4Addr> {
    candidates
        .into_iter()
        .filter(|(loopback, _)| !loopback)
        .filter_map(|(_, ip)| ip)
        .find(|ip| ip.is_private())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v4(s: &str) -> Option<Ipv4Addr> {
        Some(s.parse().unwrap())
    }

    #[test]
    fn picks_first_private_over_public() {
        let found = select_private([
            (true, v4("127.0.0.1")),
            (false, v4("10.0.0.5")),
            (false, v4("203.0.113.9")),
        ]);
        assert_eq!(found, v4("10.0.0.5"));
    }

    #[test]
    fn loopback_only_yields_none() {
        assert_eq!(select_private([(true, v4("127.0.0.1"))]), None);
    }

    #[test]
    fn public_only_yields_none() {
        assert_eq!(select_private([(false, v4("203.0.113.9"))]), None);
    }

    #[test]
    fn all_rfc1918_ranges_qualify() {
        for addr in ["10.255.1.2", "172.16.0.1", "172.31.255.254", "192.168.1.100"] {
            assert_eq!(select_private([(false, v4(addr))]), v4(addr), "{addr}");
        }
        for addr in ["172.15.0.1", "172.32.0.1", "192.169.0.1", "9.9.9.9"] {
            assert_eq!(select_private([(false, v4(addr))]), None, "{addr}");
        }
    }

    #[test]
    fn enumeration_order_breaks_ties() {
        let found = select_private([
            (false, v4("192.168.1.10")),
            (false, v4("10.0.0.5")),
        ]);
        assert_eq!(found, v4("192.168.1.10"));
    }
}
