//! Description of the IPv4 prefix type `Ipv4Prefix`.

use std::{fmt, net::Ipv4Addr, str::FromStr};

use num_traits::{PrimInt, Zero};

use crate::Error;

/// Longest prefix length of an IPv4 prefix.
pub const MAX_PREFIX_LEN: u8 = 32;

/// An IPv4 prefix: a network address together with its prefix length.
///
/// All bits of `addr` beyond the prefix length are zero. This is guaranteed by every constructor,
/// which is what allows two prefixes to be compared with `==`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "(u32, u8)", into = "(u32, u8)"))]
pub struct Ipv4Prefix {
    addr: u32,
    len: u8,
}

impl Ipv4Prefix {
    /// Create a new prefix, masking away all host bits of `addr`. Returns
    /// [`Error::InvalidPrefixLength`] if `len` is larger than 32.
    ///
    /// ```
    /// # use fib_trie::*;
    /// let p = Ipv4Prefix::new(0x0a01_0203, 16).unwrap();
    /// assert_eq!(p.addr(), 0x0a01_0000);
    /// assert_eq!(p.to_string(), "10.1.0.0/16");
    /// assert!(Ipv4Prefix::new(0, 33).is_err());
    /// ```
    pub fn new(addr: u32, len: u8) -> Result<Self, Error> {
        if len > MAX_PREFIX_LEN {
            return Err(Error::InvalidPrefixLength(len));
        }
        Ok(Self {
            addr: addr & mask_from_prefix_len::<u32>(len),
            len,
        })
    }

    /// The prefix that matches everything, `0.0.0.0/0`.
    pub const fn root() -> Self {
        Self { addr: 0, len: 0 }
    }

    /// Create a host prefix (`/32`) of a single address.
    pub const fn host(addr: u32) -> Self {
        Self {
            addr,
            len: MAX_PREFIX_LEN,
        }
    }

    /// The network address, with all bits beyond `self.len()` cleared.
    #[inline(always)]
    pub fn addr(&self) -> u32 {
        self.addr
    }

    /// Prefix length
    #[inline(always)]
    pub fn len(&self) -> u8 {
        self.len
    }

    /// Whether this is the zero-length prefix matching every address.
    #[inline(always)]
    pub fn is_root(&self) -> bool {
        self.len == 0
    }

    /// The network mask of this prefix.
    #[inline(always)]
    pub fn mask(&self) -> u32 {
        mask_from_prefix_len(self.len)
    }

    /// Check if a specific bit of the network address is set (counted from the left, where 0 is
    /// the first bit from the left). Bits at or beyond 32 are never set.
    pub fn is_bit_set(&self, bit: u8) -> bool {
        is_addr_bit_set(self.addr, bit)
    }

    /// Check if `addr` lies inside this prefix.
    #[inline(always)]
    pub fn matches(&self, addr: u32) -> bool {
        addr & self.mask() == self.addr
    }

    /// Check if `self` contains `other` in its prefix range. This function also returns `true` if
    /// `self` is identical to `other`.
    pub fn contains(&self, other: &Self) -> bool {
        self.len <= other.len && self.matches(other.addr)
    }

    /// The prefix one bit longer than `self`, with that bit set if `right` is true. Returns `None`
    /// for a `/32`.
    ///
    /// ```
    /// # use fib_trie::*;
    /// let p: Ipv4Prefix = "10.0.0.0/8".parse().unwrap();
    /// assert_eq!(p.child(false).unwrap().to_string(), "10.0.0.0/9");
    /// assert_eq!(p.child(true).unwrap().to_string(), "10.128.0.0/9");
    /// assert_eq!(Ipv4Prefix::host(1).child(true), None);
    /// ```
    pub fn child(&self, right: bool) -> Option<Self> {
        if self.len >= MAX_PREFIX_LEN {
            return None;
        }
        let bit = if right {
            1u32 << (MAX_PREFIX_LEN - 1 - self.len)
        } else {
            0
        };
        Some(Self {
            addr: self.addr | bit,
            len: self.len + 1,
        })
    }
}

/// Check if bit `bit` (counted from the most significant bit) of `addr` is set.
#[inline(always)]
pub(crate) fn is_addr_bit_set(addr: u32, bit: u8) -> bool {
    match 0x8000_0000u32.checked_shr(bit as u32) {
        Some(mask) => addr & mask != 0,
        None => false,
    }
}

/// The mask with the top `len` bits set. `len == 0` yields zero, a full-width `len` yields all
/// ones; no shift by the full width of `R` is ever performed.
pub(crate) fn mask_from_prefix_len<R>(len: u8) -> R
where
    R: PrimInt + Zero,
{
    if len as u32 >= R::zero().count_zeros() {
        !R::zero()
    } else if len == 0 {
        R::zero()
    } else {
        !((!R::zero()) >> len as usize)
    }
}

impl fmt::Display for Ipv4Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", Ipv4Addr::from(self.addr), self.len)
    }
}

impl fmt::Debug for Ipv4Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl FromStr for Ipv4Prefix {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| Error::InvalidPrefix {
            input: s.to_string(),
            reason: reason.to_string(),
        };
        let (addr, len) = s.split_once('/').ok_or_else(|| invalid("missing `/`"))?;
        let addr: Ipv4Addr = addr
            .trim()
            .parse()
            .map_err(|_| invalid("bad network address"))?;
        let len: u8 = len
            .trim()
            .parse()
            .map_err(|_| invalid("bad prefix length"))?;
        Self::new(addr.into(), len)
    }
}

impl TryFrom<(u32, u8)> for Ipv4Prefix {
    type Error = Error;

    fn try_from((addr, len): (u32, u8)) -> Result<Self, Self::Error> {
        Self::new(addr, len)
    }
}

impl From<Ipv4Prefix> for (u32, u8) {
    fn from(p: Ipv4Prefix) -> Self {
        (p.addr, p.len)
    }
}

#[cfg(feature = "ipnet")]
impl From<ipnet::Ipv4Net> for Ipv4Prefix {
    fn from(net: ipnet::Ipv4Net) -> Self {
        Self {
            addr: net.network().into(),
            len: net.prefix_len(),
        }
    }
}

#[cfg(feature = "ipnet")]
impl From<Ipv4Prefix> for ipnet::Ipv4Net {
    fn from(p: Ipv4Prefix) -> Self {
        // the length is always within 0..=32
        ipnet::Ipv4Net::new(p.addr.into(), p.len).unwrap_or_default()
    }
}
