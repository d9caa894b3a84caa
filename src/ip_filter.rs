//! Classification of IP addresses that must never be contacted on behalf of a
//! user: private, loopback, link-local, reserved, multicast and documentation
//! ranges, for both address families.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// Returns `true` if `ip` is not a publicly routable unicast address.
pub fn is_non_public_ip(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => is_non_public_ipv4(v4),
        IpAddr::V6(v6) => is_non_public_ipv6(v6),
    }
}

/// IPv4 ranges: this-network, RFC 1918, shared address space, loopback,
/// link-local, IETF protocol assignments, documentation, benchmarking,
/// multicast, reserved and broadcast.
pub fn is_non_public_ipv4(ip: Ipv4Addr) -> bool {
    let [a, b, c, _] = ip.octets();

    ip.is_unspecified()
        || a == 0
        || ip.is_private()
        || (a == 100 && (64..=127).contains(&b))
        || ip.is_loopback()
        || ip.is_link_local()
        || (a == 192 && b == 0 && c == 0)
        || ip.is_documentation()
        || (a == 198 && (b == 18 || b == 19))
        || ip.is_multicast()
        || a >= 240
}

/// IPv6 ranges: unspecified, loopback, multicast, IPv4-mapped/compatible and
/// NAT64 (checked as IPv4), anything outside global unicast `2000::/3`, IETF
/// protocol assignments `2001::/23` (Teredo, ORCHID), documentation and 6to4.
pub fn is_non_public_ipv6(ip: Ipv6Addr) -> bool {
    if ip.is_unspecified() || ip.is_loopback() || ip.is_multicast() {
        return true;
    }

    if let Some(v4) = embedded_ipv4(ip) {
        return is_non_public_ipv4(v4);
    }

    let segments = ip.segments();
    let first = segments[0];

    (first & 0xe000) != 0x2000
        || (first == 0x2001 && segments[1] < 0x0200)
        || (first == 0x2001 && segments[1] == 0x0db8)
        || first == 0x2002
}

/// IPv4 address carried inside an IPv4-mapped (`::ffff:a.b.c.d`),
/// IPv4-compatible (`::a.b.c.d`) or NAT64 (`64:ff9b::a.b.c.d`) address.
fn embedded_ipv4(ip: Ipv6Addr) -> Option<Ipv4Addr> {
    let segments = ip.segments();
    let tail = Ipv4Addr::new(
        (segments[6] >> 8) as u8,
        segments[6] as u8,
        (segments[7] >> 8) as u8,
        segments[7] as u8,
    );

    match &segments[..6] {
        [0, 0, 0, 0, 0, 0xffff] | [0, 0, 0, 0, 0, 0] => Some(tail),
        [0x0064, 0xff9b, 0, 0, 0, 0] => Some(tail),
        _ => None,
    }
}
