// Copyright 2026 Anapaya Systems
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::{fmt, str::FromStr};

use super::AddressError;

const ASN_MASK: u64 = 0x0000_FFFF_FFFF_FFFF;
/// AS numbers up to this value are printed in decimal, as in BGP.
const MAX_BGP_ASN: u64 = u32::MAX as u64;

/// Isolation domain identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Isd(pub u16);
impl Isd {
    /// The wildcard ISD.
    pub const WILDCARD: Isd = Isd(0);
}
impl From<u16> for Isd {
    fn from(value: u16) -> Self {
        Isd(value)
    }
}
impl fmt::Display for Isd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Autonomous system number, 48 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Asn(u64);
impl Asn {
    /// The wildcard AS.
    pub const WILDCARD: Asn = Asn(0);

    /// Creates an AS number, truncating to 48 bits.
    pub const fn new(value: u64) -> Self {
        Asn(value & ASN_MASK)
    }

    /// The numeric value.
    pub const fn value(&self) -> u64 {
        self.0
    }
}
impl From<u64> for Asn {
    fn from(value: u64) -> Self {
        Asn::new(value)
    }
}
impl fmt::Display for Asn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 <= MAX_BGP_ASN {
            return write!(f, "{}", self.0);
        }
        write!(
            f,
            "{:x}:{:x}:{:x}",
            (self.0 >> 32) & 0xFFFF,
            (self.0 >> 16) & 0xFFFF,
            self.0 & 0xFFFF
        )
    }
}
impl FromStr for Asn {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !s.contains(':') {
            let value: u64 = parse_decimal(s)?;
            if value > MAX_BGP_ASN {
                return Err(AddressError::InvalidIsdAsn);
            }
            return Ok(Asn(value));
        }

        let mut value = 0u64;
        let mut groups = 0;
        for group in s.split(':') {
            if group.is_empty()
                || group.len() > 4
                || !group.bytes().all(|b| b.is_ascii_hexdigit())
            {
                return Err(AddressError::InvalidIsdAsn);
            }
            let group = u16::from_str_radix(group, 16).map_err(|_| AddressError::InvalidIsdAsn)?;
            value = (value << 16) | u64::from(group);
            groups += 1;
        }
        if groups != 3 {
            return Err(AddressError::InvalidIsdAsn);
        }
        Ok(Asn(value))
    }
}

/// Parses unsigned decimal digits only, without sign or whitespace.
fn parse_decimal<T: FromStr>(s: &str) -> Result<T, AddressError> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AddressError::InvalidIsdAsn);
    }
    s.parse().map_err(|_| AddressError::InvalidIsdAsn)
}

/// ISD-AS identifier: 16-bit ISD followed by the 48-bit AS number, as carried on the wire.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct IsdAsn(pub u64);
impl IsdAsn {
    /// The all-zero wildcard identifier.
    pub const WILDCARD: IsdAsn = IsdAsn(0);

    /// Combines an ISD and an AS number.
    pub const fn new(isd: Isd, asn: Asn) -> Self {
        IsdAsn(((isd.0 as u64) << 48) | asn.0)
    }

    /// The ISD part.
    pub const fn isd(&self) -> Isd {
        Isd((self.0 >> 48) as u16)
    }

    /// The AS part.
    pub const fn asn(&self) -> Asn {
        Asn(self.0 & ASN_MASK)
    }

    /// Whether ISD and AS are both zero. Representable on the wire, but not routable.
    pub const fn is_wildcard(&self) -> bool {
        self.0 == 0
    }
}
impl fmt::Display for IsdAsn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.isd(), self.asn())
    }
}
impl fmt::Debug for IsdAsn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
impl FromStr for IsdAsn {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (isd, asn) = s.split_once('-').ok_or(AddressError::InvalidIsdAsn)?;
        let isd: u16 = parse_decimal(isd)?;
        Ok(IsdAsn::new(Isd(isd), asn.parse()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_split_isd_and_asn() {
        let ia = IsdAsn(0x0001_FF00_0000_0110);
        assert_eq!(ia.isd(), Isd(1));
        assert_eq!(ia.asn(), Asn::new(0xFF00_0000_0110));
        assert_eq!(IsdAsn::new(ia.isd(), ia.asn()), ia);
    }

    #[test]
    fn should_format_and_parse_hex_asn() {
        let ia: IsdAsn = "1-ff00:0:110".parse().unwrap();
        assert_eq!(ia, IsdAsn(0x0001_FF00_0000_0110));
        assert_eq!(ia.to_string(), "1-ff00:0:110");
    }

    #[test]
    fn should_format_and_parse_bgp_asn() {
        let ia: IsdAsn = "64-559".parse().unwrap();
        assert_eq!(ia.isd(), Isd(64));
        assert_eq!(ia.asn().value(), 559);
        assert_eq!(ia.to_string(), "64-559");
    }

    #[test]
    fn should_truncate_asn_to_48_bits() {
        assert_eq!(Asn::new(u64::MAX).value(), ASN_MASK);
    }

    #[test]
    fn should_reject_malformed_text() {
        for text in [
            "", "1", "1-", "-ff00:0:110", "1-ff00:0", "1-ff00:0:110:1", "1-fffff:0:1",
            "65536-1", "1-4294967296", "1-ff00::110", "+1-ff00:0:110", "1-+ff00:0:110",
            "1-ff00:+0:110", "1-+559", " 1-559", "1-0x1:0:1",
        ] {
            assert_eq!(
                text.parse::<IsdAsn>(),
                Err(AddressError::InvalidIsdAsn),
                "{text:?} must be rejected"
            );
        }
    }

    #[test]
    fn should_detect_wildcard() {
        assert!(IsdAsn::WILDCARD.is_wildcard());
        assert!(!IsdAsn::new(Isd(1), Asn::WILDCARD).is_wildcard());
    }
}
