//! IPv4 integer and CIDR mask utilities.
//!
//! Provides the [`ReservedBlock`] table of special-use IPv4 ranges that are
//! never sent to the geolocation service, and the helpers to test membership.

use std::error::Error;
use std::net::Ipv4Addr;

/// Maximum length for an IPv4 subnet mask (32 bits).
pub const MAX_LENGTH: u8 = 32;

/// A special-use IPv4 range and the message shown when an address falls in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReservedBlock {
    /// Network base address.
    pub base: Ipv4Addr,
    /// Prefix length (0-32).
    pub prefix: u8,
    /// User facing rejection reason.
    pub reason: &'static str,
}

impl ReservedBlock {
    const fn new(base: [u8; 4], prefix: u8, reason: &'static str) -> Self {
        ReservedBlock {
            base: Ipv4Addr::new(base[0], base[1], base[2], base[3]),
            prefix,
            reason,
        }
    }

    /// True when `addr` lies inside this block.
    pub fn contains(&self, addr: Ipv4Addr) -> bool {
        in_cidr(addr, self.base, self.prefix)
    }
}

impl std::fmt::Display for ReservedBlock {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}/{}", self.base, self.prefix)
    }
}

/// Reserved ranges, checked in order. First match wins.
pub static RESERVED_BLOCKS: [ReservedBlock; 14] = [
    ReservedBlock::new([127, 0, 0, 0], 8, "Loopback IP is not supported"),
    ReservedBlock::new([0, 0, 0, 0], 8, "This-network IP is not supported"),
    ReservedBlock::new([169, 254, 0, 0], 16, "Link-local IP is not supported"),
    ReservedBlock::new([255, 255, 255, 255], 32, "Broadcast IP is not supported"),
    ReservedBlock::new([10, 0, 0, 0], 8, "Private IP is not supported"),
    ReservedBlock::new([172, 16, 0, 0], 12, "Private IP is not supported"),
    ReservedBlock::new([192, 168, 0, 0], 16, "Private IP is not supported"),
    ReservedBlock::new([100, 64, 0, 0], 10, "Carrier-grade NAT IP is not supported"),
    ReservedBlock::new([224, 0, 0, 0], 4, "Multicast IP is not supported"),
    ReservedBlock::new([240, 0, 0, 0], 4, "Reserved IP is not supported"),
    ReservedBlock::new([192, 0, 2, 0], 24, "Documentation IP is not supported"),
    ReservedBlock::new([198, 51, 100, 0], 24, "Documentation IP is not supported"),
    ReservedBlock::new([203, 0, 113, 0], 24, "Documentation IP is not supported"),
    ReservedBlock::new([198, 18, 0, 0], 15, "Benchmark/testing IP is not supported"),
];

/// Convert a CIDR prefix length to a subnet mask as u32.
///
/// # Examples
/// ```
/// use ip_geo_lookup::models::get_cidr_mask;
/// assert_eq!(get_cidr_mask(24).unwrap(), 0xFFFFFF00);
/// ```
pub fn get_cidr_mask(len: u8) -> Result<u32, Box<dyn Error>> {
    if len > MAX_LENGTH {
        Err("Network length is too long".into())
    } else {
        Ok(prefix_mask(len))
    }
}

// Shift in u64 so that len == 0 (shift by 32) does not overflow.
fn prefix_mask(len: u8) -> u32 {
    let right_len = MAX_LENGTH - len.min(MAX_LENGTH);
    let all_bits = u32::MAX as u64;
    ((all_bits >> right_len) << right_len) as u32
}

/// Big-endian integer form of an address (`a<<24 | b<<16 | c<<8 | d`).
pub fn ipv4_to_u32(addr: Ipv4Addr) -> u32 {
    let [a, b, c, d] = addr.octets();
    ((a as u32) << 24) | ((b as u32) << 16) | ((c as u32) << 8) | d as u32
}

/// True when `addr` is inside `base/prefix`. A prefix above 32 is treated as 32.
pub fn in_cidr(addr: Ipv4Addr, base: Ipv4Addr, prefix: u8) -> bool {
    let mask = prefix_mask(prefix);
    ipv4_to_u32(addr) & mask == ipv4_to_u32(base) & mask
}

/// The first reserved block containing `addr`, if any.
pub fn reserved_block(addr: Ipv4Addr) -> Option<&'static ReservedBlock> {
    RESERVED_BLOCKS.iter().find(|block| block.contains(addr))
}

/// Rejection reason for a reserved address, `None` for a public one.
pub fn reserved_reason(addr: Ipv4Addr) -> Option<&'static str> {
    reserved_block(addr).map(|block| block.reason)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_cidr_mask() {
        assert_eq!(get_cidr_mask(0).unwrap(), 0x00000000);
        assert_eq!(get_cidr_mask(4).unwrap(), 0xF0000000);
        assert_eq!(get_cidr_mask(8).unwrap(), 0xFF000000);
        assert_eq!(get_cidr_mask(10).unwrap(), 0xFFC00000);
        assert_eq!(get_cidr_mask(12).unwrap(), 0xFFF00000);
        assert_eq!(get_cidr_mask(15).unwrap(), 0xFFFE0000);
        assert_eq!(get_cidr_mask(24).unwrap(), 0xFFFFFF00);
        assert_eq!(get_cidr_mask(32).unwrap(), 0xFFFFFFFF);
        assert!(get_cidr_mask(33).is_err());
    }

    #[test]
    fn test_ipv4_to_u32() {
        assert_eq!(ipv4_to_u32(Ipv4Addr::new(0, 0, 0, 0)), 0);
        assert_eq!(ipv4_to_u32(Ipv4Addr::new(1, 2, 3, 4)), 0x01020304);
        assert_eq!(ipv4_to_u32(Ipv4Addr::new(255, 255, 255, 255)), u32::MAX);
        assert_eq!(ipv4_to_u32(Ipv4Addr::new(192, 168, 1, 42)), 0xC0A8012A);
    }

    #[test]
    fn test_in_cidr() {
        let base = Ipv4Addr::new(172, 16, 0, 0);
        assert!(in_cidr(Ipv4Addr::new(172, 16, 0, 1), base, 12));
        assert!(in_cidr(Ipv4Addr::new(172, 31, 255, 255), base, 12));
        assert!(!in_cidr(Ipv4Addr::new(172, 32, 0, 0), base, 12));
        assert!(!in_cidr(Ipv4Addr::new(172, 15, 255, 255), base, 12));
        // prefix 0 matches everything
        assert!(in_cidr(Ipv4Addr::new(8, 8, 8, 8), base, 0));
        // prefix 32 is an exact match
        let bcast = Ipv4Addr::new(255, 255, 255, 255);
        assert!(in_cidr(bcast, bcast, 32));
        assert!(!in_cidr(Ipv4Addr::new(255, 255, 255, 254), bcast, 32));
    }

    #[test]
    fn test_reserved_table_bases_are_network_addresses() {
        for block in RESERVED_BLOCKS.iter() {
            let mask = get_cidr_mask(block.prefix).unwrap();
            assert_eq!(
                ipv4_to_u32(block.base) & mask,
                ipv4_to_u32(block.base),
                "{block} has host bits set"
            );
        }
    }

    #[test]
    fn test_reserved_reason() {
        assert_eq!(
            reserved_reason(Ipv4Addr::new(127, 0, 0, 1)),
            Some("Loopback IP is not supported")
        );
        assert_eq!(
            reserved_reason(Ipv4Addr::new(198, 19, 255, 255)),
            Some("Benchmark/testing IP is not supported")
        );
        assert_eq!(reserved_reason(Ipv4Addr::new(198, 20, 0, 0)), None);
        assert_eq!(reserved_reason(Ipv4Addr::new(8, 8, 8, 8)), None);
    }

    #[test]
    fn test_reserved_first_match_wins() {
        // 255.255.255.255 is also inside 240.0.0.0/4; the broadcast row comes first.
        let block = reserved_block(Ipv4Addr::new(255, 255, 255, 255)).unwrap();
        assert_eq!(block.reason, "Broadcast IP is not supported");
        assert_eq!(block.to_string(), "255.255.255.255/32");
    }
}
